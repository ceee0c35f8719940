//! User domain types.

use serde::{Deserialize, Serialize};

use arluxe_core::{Email, Role, UserId};

/// A storefront account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique case-insensitively.
    pub email: Email,
    /// Argon2 PHC string. `None` for accounts created through a magic link,
    /// which cannot log in with a password.
    pub password_hash: Option<String>,
    /// Account role, fixed at creation.
    pub role: Role,
}

impl User {
    /// The projection returned by the API.
    #[must_use]
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// User as exposed over HTTP. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_omits_hash() {
        let user = User {
            id: UserId::new("u_admin"),
            name: "Admin User".to_owned(),
            email: Email::parse("abdurrafayfarhan3@gmail.com").unwrap(),
            password_hash: Some("$argon2id$v=19$secret".to_owned()),
            role: Role::Admin,
        };

        let json = serde_json::to_value(user.public()).unwrap();
        assert_eq!(json["id"], "u_admin");
        assert_eq!(json["role"], "admin");
        assert_eq!(json.as_object().unwrap().len(), 4);
        assert!(!json.to_string().contains("argon2"));
    }
}
