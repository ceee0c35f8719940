//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::error::{ApiJson, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{CheckoutRequest, Order};
use crate::state::AppState;
use arluxe_core::OrderId;

/// Status update body.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

/// Orders visible to the caller: all for admins, their own for customers.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.checkout().list_orders(&user).await?))
}

/// Place an order for the caller's cart.
///
/// The seller notification is sent in the background; the returned order
/// carries a pending dispatch record.
#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .checkout()
        .create_order(&user, &body.items, body.shipping_address)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Move an order forward through its status workflow.
#[tracing::instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<OrderId>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> Result<Json<Order>> {
    let order = state
        .checkout()
        .update_status(&id, body.status.as_deref())
        .await?;

    Ok(Json(order))
}
