//! Authentication service.
//!
//! Provides password login, registration and magic-link authentication.
//! Every successful authentication mints an opaque bearer token that the
//! client sends back as `Authorization: Bearer <token>`.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use url::Url;

use arluxe_core::{Email, Role, UserId};

use crate::config::AuthConfig;
use crate::db::{RepositoryError, SessionStore, UserStore};
use crate::models::{MagicLink, MagicToken, SessionToken, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Name given to magic-link accounts whose email has an empty local part.
const FALLBACK_NAME: &str = "Customer";

/// A freshly minted session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: SessionToken,
    pub user: User,
}

/// Result of requesting a magic link.
#[derive(Debug, Clone)]
pub struct MagicLinkGrant {
    /// Login URL carrying the magic token.
    pub link: Url,
    /// Session minted together with the link when instant sessions are on.
    pub session: Option<SessionToken>,
    pub user: User,
}

/// Authentication service.
///
/// Handles login, registration, magic links and bearer token resolution.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    sessions: &'a dyn SessionStore,
    config: &'a AuthConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        users: &'a dyn UserStore,
        sessions: &'a dyn SessionStore,
        config: &'a AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown, the
    /// account has no password, or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = Email::normalize(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        verify_password(password, hash)?;

        self.start_session(user).await
    }

    /// Register a new customer with email and password.
    ///
    /// The name defaults to the local part of the email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = Email::normalize(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_name(&email), str::to_owned);

        let user = self
            .users
            .insert(User {
                id: UserId::generate(),
                name,
                email,
                password_hash: Some(password_hash),
                role: Role::Customer,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Registered new customer");

        self.start_session(user).await
    }

    // =========================================================================
    // Magic Links
    // =========================================================================

    /// Issue a magic link, creating a customer account for unknown emails.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is empty or has no `@`.
    /// Returns `AuthError::InvalidLinkBase` if `FRONTEND_URL` is not a valid base URL;
    /// no account is created in that case.
    pub async fn request_magic_link(&self, email: &str) -> Result<MagicLinkGrant, AuthError> {
        let email = Email::normalize(email)?;
        let token = MagicToken::generate();
        let link = login_link(&self.config.frontend_url, &token)?;

        let user = self
            .users
            .find_or_insert(User {
                id: UserId::generate(),
                name: default_name(&email),
                email,
                password_hash: None,
                role: Role::Customer,
            })
            .await?;

        let ttl = chrono::Duration::from_std(self.config.magic_link_ttl)
            .unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(chrono::DateTime::<Utc>::MAX_UTC);

        self.sessions
            .insert_magic_link(
                token,
                MagicLink {
                    user_id: user.id.clone(),
                    expires_at,
                },
            )
            .await?;

        tracing::info!(email = %user.email, magic_link = %link, "Magic link issued");

        let session = if self.config.instant_session {
            let token = SessionToken::generate();
            self.sessions
                .insert_session(token.clone(), user.id.clone())
                .await?;
            Some(token)
        } else {
            None
        };

        Ok(MagicLinkGrant {
            link,
            session,
            user,
        })
    }

    /// Exchange a magic-link token for a session.
    ///
    /// The token is consumed whenever it is found, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidOrExpiredLink` if the token is unknown.
    /// Returns `AuthError::LinkExpired` if the token is past its expiry.
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    pub async fn verify_magic_link(&self, token: &str) -> Result<AuthSession, AuthError> {
        let token = MagicToken::new(token.trim());
        let link = self
            .sessions
            .take_magic_link(&token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredLink)?;

        if link.is_expired(Utc::now()) {
            return Err(AuthError::LinkExpired);
        }

        let user = self
            .users
            .get(&link.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.start_session(user).await
    }

    // =========================================================================
    // Bearer Tokens
    // =========================================================================

    /// Resolve an `Authorization` header value to a user.
    ///
    /// Returns `None` when the header is absent, lacks the `Bearer ` prefix,
    /// or carries an unknown token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if a store lookup fails.
    pub async fn resolve_bearer(&self, header: Option<&str>) -> Result<Option<User>, AuthError> {
        let Some(token) = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            return Ok(None);
        };

        let Some(user_id) = self
            .sessions
            .resolve_session(&SessionToken::new(token))
            .await?
        else {
            return Ok(None);
        };

        Ok(self.users.get(&user_id).await?)
    }

    async fn start_session(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = SessionToken::generate();
        self.sessions
            .insert_session(token.clone(), user.id.clone())
            .await?;
        Ok(AuthSession { token, user })
    }
}

/// Build `{frontend_url}/login?token=<token>`.
fn login_link(frontend_url: &str, token: &MagicToken) -> Result<Url, AuthError> {
    let mut url = Url::parse(frontend_url)?;
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push("login");
    url.query_pairs_mut().append_pair("token", token.as_str());
    Ok(url)
}

fn default_name(email: &Email) -> String {
    let local = email.local_part();
    if local.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        local.to_owned()
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the hash is malformed or the
/// password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
