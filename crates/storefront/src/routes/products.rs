//! Product route handlers.
//!
//! Listing and lookup are public; create, update and delete require an
//! admin. Write payloads are taken as loose JSON and coerced by the catalog.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;

use crate::error::{ApiJson, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::state::AppState;
use arluxe_core::ProductId;

/// List the catalog, most recent first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list().await?))
}

/// Display one product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().get(&id).await?))
}

/// Add a product to the front of the catalog.
#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ApiJson(payload): ApiJson<Value>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().create(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Merge the recognised fields of the payload into a product.
#[tracing::instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<Product>> {
    let product = state.catalog().update(&id, &payload).await?;
    Ok(Json(product))
}

/// Remove a product and return it.
#[tracing::instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state.catalog().delete(&id).await?;
    Ok(Json(product))
}
