//! Authentication extractors.
//!
//! Resolve the `Authorization: Bearer <token>` header to a user in route
//! handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Rejects with `401 {"message": "Unauthorized"}` when the header is missing,
/// malformed or carries an unknown token.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(RequireAuth(user): RequireAuth) -> Json<PublicUser> {
///     Json(user.public())
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let user = state
            .auth()
            .resolve_bearer(header)
            .await?
            .ok_or(AppError::Unauthorized)?;

        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::Span::current().record("user_id", user.id.as_str());

        Ok(Self(user))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Rejects with 401 like [`RequireAuth`], then with
/// `403 {"message": "Admin access required"}` for non-admins.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            tracing::debug!(user_id = %user.id, "Admin access denied");
            return Err(AppError::Forbidden);
        }

        Ok(Self(user))
    }
}
