//! Order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arluxe_core::{Email, OrderId, OrderStatus, ProductId, ShippingAddress, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owner of the order.
    pub user_id: UserId,
    pub buyer_email: Email,
    pub items: Vec<OrderItem>,
    /// Sum of `price * quantity` over the items.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
    /// Outcome of the seller notification.
    pub email_dispatch: EmailDispatch,
}

/// A priced order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product the line was priced from.
    pub id: ProductId,
    pub name: String,
    /// Discounted unit price at checkout time.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

/// State of the seller notification for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmailDispatch {
    /// Delivery has not finished yet.
    #[default]
    Pending,
    /// The provider accepted the message.
    Sent {
        provider: String,
        id: Option<String>,
        attempts: u32,
    },
    /// Delivery gave up.
    Failed { error: String, attempts: u32 },
}

impl EmailDispatch {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Checkout request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

/// A line submitted at checkout.
///
/// Clients may also send `name` and `price`; they are display hints and are
/// not read. Lines are priced from the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub id: ProductId,
    #[serde(default)]
    pub quantity: i64,
}
