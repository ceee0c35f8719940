//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 4000)
//! - `FRONTEND_URL` - Base URL used in magic links (default: <http://localhost:5173>)
//! - `MAGIC_LINK_TTL_MINUTES` - Magic link lifetime (default: 15)
//! - `MAGIC_LINK_INSTANT_SESSION` - Return a session token together with the
//!   magic link (default: true, demo behaviour)
//! - `RESEND_API_KEY` - Resend API key; order e-mails are disabled without it
//! - `RESEND_API_URL` - Resend API base URL (default: <https://api.resend.com>)
//! - `SELLER_EMAIL` - Recipient of order notifications
//! - `SENDER_EMAIL` - Sender of order notifications (default: onboarding@resend.dev)
//! - `NOTIFY_MAX_ATTEMPTS` - Delivery attempts per notification (default: 3)
//! - `NOTIFY_RETRY_BASE_MS` - First retry delay, doubled per attempt (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default recipient of seller notifications.
pub const DEFAULT_SELLER_EMAIL: &str = "abdurrafayfarhan3@gmail.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Magic link settings
    pub auth: AuthConfig,
    /// Seller notification settings
    pub notifications: NotificationConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// Magic link configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Frontend base URL; the magic link points at `{frontend_url}/login`
    pub frontend_url: String,
    /// How long a magic link stays valid
    pub magic_link_ttl: Duration,
    /// Whether requesting a magic link also returns a session token.
    ///
    /// This grants a session without proof of mailbox ownership and is only
    /// suitable for demos.
    pub instant_session: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_owned(),
            magic_link_ttl: Duration::from_secs(15 * 60),
            instant_session: true,
        }
    }
}

/// Seller notification configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct NotificationConfig {
    /// Resend API key; `None` disables delivery
    pub resend_api_key: Option<SecretString>,
    /// Resend API base URL
    pub resend_api_url: String,
    /// Recipient of order notifications
    pub seller_email: String,
    /// Sender address
    pub sender_email: String,
    /// Delivery attempts per order (at least 1)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub retry_base_delay: Duration,
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("resend_api_url", &self.resend_api_url)
            .field("seller_email", &self.seller_email)
            .field("sender_email", &self.sender_email)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay", &self.retry_base_delay)
            .finish()
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            resend_api_url: "https://api.resend.com".to_owned(),
            seller_email: DEFAULT_SELLER_EMAIL.to_owned(),
            sender_email: "onboarding@resend.dev".to_owned(),
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 4000,
            auth: AuthConfig::default(),
            notifications: NotificationConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the Resend API
    /// key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = get_parsed_or("STOREFRONT_HOST", defaults.host)?;
        let port = get_parsed_or("PORT", defaults.port)?;
        let auth = AuthConfig::from_env()?;
        let notifications = NotificationConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            auth,
            notifications,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let ttl_minutes: u64 = get_parsed_or(
            "MAGIC_LINK_TTL_MINUTES",
            defaults.magic_link_ttl.as_secs() / 60,
        )?;

        Ok(Self {
            frontend_url: get_env_or_default("FRONTEND_URL", &defaults.frontend_url),
            magic_link_ttl: Duration::from_secs(ttl_minutes * 60),
            instant_session: get_parsed_or("MAGIC_LINK_INSTANT_SESSION", defaults.instant_session)?,
        })
    }
}

impl NotificationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let resend_api_key = get_optional_env("RESEND_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|key| {
                validate_secret_strength(&key, "RESEND_API_KEY")?;
                Ok::<_, ConfigError>(SecretString::from(key))
            })
            .transpose()?;

        let max_attempts: u32 = get_parsed_or("NOTIFY_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "NOTIFY_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let retry_base_ms: u64 = get_parsed_or(
            "NOTIFY_RETRY_BASE_MS",
            u64::try_from(defaults.retry_base_delay.as_millis()).unwrap_or(500),
        )?;

        Ok(Self {
            resend_api_key,
            resend_api_url: get_env_or_default("RESEND_API_URL", &defaults.resend_api_url),
            seller_email: get_env_or_default("SELLER_EMAIL", &defaults.seller_email),
            sender_email: get_env_or_default("SENDER_EMAIL", &defaults.sender_email),
            max_attempts,
            retry_base_delay: Duration::from_millis(retry_base_ms),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-resend-key", "RESEND_API_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("re_aaaaaaaaaaaaaaaaaaaaaaaa", "RESEND_API_KEY");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("re_9fK2xLq7TzB4mWc8RvN1pYs6", "RESEND_API_KEY");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "PORT"));

        assert_eq!(parse_value::<u16>("PORT", " 8080 ").unwrap(), 8080);
        assert!(parse_value::<bool>("MAGIC_LINK_INSTANT_SESSION", "false").is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.port, 4000);
        assert_eq!(config.auth.magic_link_ttl, Duration::from_secs(900));
        assert!(config.auth.instant_session);
        assert_eq!(config.notifications.max_attempts, 3);
        assert!(config.notifications.resend_api_key.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_notification_config_debug_redacts_key() {
        let config = NotificationConfig {
            resend_api_key: Some(SecretString::from("re_super_secret_value_9x")),
            ..NotificationConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("api.resend.com"));
        assert!(!debug_output.contains("re_super_secret_value_9x"));
    }
}
