//! Shipping address captured at checkout.

use serde::{Deserialize, Deserializer, Serialize};

/// Destination for an order.
///
/// Every field is required; a field containing only whitespace counts as
/// missing. Fields default to empty so that partially filled payloads can be
/// deserialized and then rejected by [`ShippingAddress::is_complete`].
/// Numbers and booleans are accepted in place of strings (a numeric `zipCode`
/// or `phone` is common) and `null` reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address_line: String,
    #[serde(deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(deserialize_with = "lenient_string")]
    pub zip_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub country: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Unsigned(n)) => n.to_string(),
        Some(Scalar::Signed(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}

impl ShippingAddress {
    /// All fields paired with their wire names.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("fullName", self.full_name.as_str()),
            ("phone", self.phone.as_str()),
            ("addressLine", self.address_line.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("zipCode", self.zip_code.as_str()),
            ("country", self.country.as_str()),
        ]
    }

    /// Wire names of the fields that are blank after trimming.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// `true` when every field is non-empty after trimming.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Single-line `city, state, zip` rendering used in notifications.
    #[must_use]
    pub fn locality(&self) -> String {
        format!("{}, {}, {}", self.city, self.state, self.zip_code)
    }
}
