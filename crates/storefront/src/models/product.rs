//! Catalog product types and admin payload coercion.
//!
//! Admin payloads are loosely typed: prices may arrive as numbers or numeric
//! strings and `isNew` as any JSON value. [`ProductDraft`] and
//! [`ProductPatch`] normalise such payloads into typed fields.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use arluxe_core::{ProductId, clamp_discount};

/// A perfume in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// List price in PKR, never negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Discount percentage in `[0, 90]`.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    pub image: String,
    pub scent: String,
    pub category: String,
    pub is_new: bool,
}

impl Product {
    /// Build a product with a fresh id from an admin draft.
    #[must_use]
    pub fn from_draft(draft: ProductDraft) -> Self {
        Self {
            id: ProductId::generate(),
            name: draft.name,
            price: draft.price,
            discount_percent: draft.discount_percent,
            image: draft.image,
            scent: draft.scent,
            category: draft.category,
            is_new: draft.is_new,
        }
    }

    /// Shallow-merge the fields present in `patch`.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(discount) = patch.discount_percent {
            self.discount_percent = discount;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(scent) = patch.scent {
            self.scent = scent;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(is_new) = patch.is_new {
            self.is_new = is_new;
        }
    }
}

/// Fields for a new product, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub discount_percent: Decimal,
    pub image: String,
    pub scent: String,
    pub category: String,
    pub is_new: bool,
}

impl ProductDraft {
    /// Coerce an admin create payload.
    ///
    /// Missing or falsy text fields take their defaults (`"Unnamed Product"`,
    /// `"General"`, empty image and scent). Non-numeric prices become zero and
    /// negative prices are clamped to zero. The discount is clamped to
    /// `[0, 90]`.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        let field = |key: &str| body.as_object().and_then(|map| map.get(key));

        Self {
            name: text_or(field("name"), "Unnamed Product"),
            price: price_from(field("price")),
            discount_percent: clamp_discount(number_from(field("discountPercent"))),
            image: text_or(field("image"), ""),
            scent: text_or(field("scent"), ""),
            category: text_or(field("category"), "General"),
            is_new: field("isNew").is_some_and(is_truthy),
        }
    }
}

/// Partial update of a product. `None` leaves the field untouched.
///
/// Only the recognised catalog fields can be patched; `id` and unknown keys
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub image: Option<String>,
    pub scent: Option<String>,
    pub category: Option<String>,
    pub is_new: Option<bool>,
}

impl ProductPatch {
    /// Coerce an admin update payload.
    ///
    /// A key set to `null` is treated as absent.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        let empty = Map::new();
        let map = body.as_object().unwrap_or(&empty);
        let present = |key: &str| map.get(key).filter(|v| !v.is_null());

        Self {
            name: present("name").map(|v| text_or(Some(v), "")),
            price: present("price").map(|v| price_from(Some(v))),
            discount_percent: present("discountPercent")
                .map(|v| clamp_discount(number_from(Some(v)))),
            image: present("image").map(|v| text_or(Some(v), "")),
            scent: present("scent").map(|v| text_or(Some(v), "")),
            category: present("category").map(|v| text_or(Some(v), "")),
            is_new: present("isNew").map(is_truthy),
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Numeric coercion: numbers pass through, numeric strings are parsed,
/// `true` is one and anything else is zero.
fn number_from(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .unwrap_or_default(),
        Some(Value::String(s)) => parse_decimal(s.trim()).unwrap_or_default(),
        Some(Value::Bool(true)) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

fn price_from(value: Option<&Value>) -> Decimal {
    number_from(value).max(Decimal::ZERO)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(Decimal::from_f64))
}

/// Text coercion: falsy values take `default`, scalars are stringified.
fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(true))) if is_truthy(v) => v.to_string(),
        _ => default.to_owned(),
    }
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
