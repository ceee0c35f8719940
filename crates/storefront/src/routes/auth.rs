//! Authentication route handlers.
//!
//! Password login and registration, magic-link request and verification,
//! and the current-user lookup. Successful sign-ins return a bearer token
//! that clients send back as `Authorization: Bearer <token>`.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{PublicUser, SessionToken};
use crate::services::auth::AuthSession;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Magic-link request body.
#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    #[serde(default)]
    pub email: String,
}

/// Magic-link verification body.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// A bearer token and the user it belongs to.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: SessionToken,
    pub user: PublicUser,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: session.user.public(),
        }
    }
}

/// Response to a magic-link request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkResponse {
    pub message: &'static str,
    pub magic_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<SessionToken>,
    pub user: PublicUser,
}

// =============================================================================
// Handlers
// =============================================================================

/// Sign in with email and password.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state.auth().login(&body.email, &body.password).await?;
    tracing::info!(user_id = %session.user.id, "User logged in");
    Ok(Json(session.into()))
}

/// Create a customer account with a password.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let session = state
        .auth()
        .register(body.name.as_deref(), &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Issue a magic link for an email, creating the account if needed.
#[tracing::instrument(skip_all)]
pub async fn request_magic_link(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>> {
    let grant = state.auth().request_magic_link(&body.email).await?;

    let message = if grant.session.is_some() {
        "Email confirmed instantly"
    } else {
        "Magic link sent"
    };

    Ok(Json(MagicLinkResponse {
        message,
        magic_link: grant.link.into(),
        token: grant.session,
        user: grant.user.public(),
    }))
}

/// Exchange a magic-link token for a session.
#[tracing::instrument(skip_all)]
pub async fn verify_magic_link(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state.auth().verify_magic_link(&body.token).await?;
    Ok(Json(session.into()))
}

/// The authenticated user.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<PublicUser> {
    Json(user.public())
}
