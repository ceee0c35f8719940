//! Session and magic-link token types.

use chrono::{DateTime, Utc};

use arluxe_core::{UserId, define_id};

define_id!(SessionToken);
define_id!(MagicToken);

/// A pending magic-link login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicLink {
    /// Account the link logs into.
    pub user_id: UserId,
    /// Last instant at which the link is accepted.
    pub expires_at: DateTime<Utc>,
}

impl MagicLink {
    /// A link is still valid at its exact expiry instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_magic_link_expiry_boundary() {
        let now = Utc::now();
        let link = MagicLink {
            user_id: UserId::new("u_customer"),
            expires_at: now,
        };

        assert!(!link.is_expired(now));
        assert!(link.is_expired(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
        assert_ne!(MagicToken::generate(), MagicToken::generate());
    }
}
