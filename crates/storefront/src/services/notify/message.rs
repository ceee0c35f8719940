//! Seller notification e-mail content.

use askama::Template;
use chrono::{DateTime, FixedOffset, Utc};

use arluxe_core::{ShippingAddress, format_pkr};

use crate::models::{Order, User};

/// Pakistan Standard Time, UTC+5.
const PKT_OFFSET_SECS: i32 = 5 * 3600;

/// One row of the item table.
struct ItemLine {
    name: String,
    quantity: u32,
    unit_price: String,
}

/// HTML order summary.
#[derive(Template)]
#[template(path = "email/order_notification.html")]
struct OrderNotificationHtml<'a> {
    order_id: &'a str,
    order_date: &'a str,
    buyer_name: &'a str,
    buyer_email: &'a str,
    buyer_phone: &'a str,
    total: &'a str,
    address: &'a ShippingAddress,
    items: &'a [ItemLine],
}

/// Plain text order summary.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    order_id: &'a str,
    order_date: &'a str,
    buyer_name: &'a str,
    buyer_email: &'a str,
    buyer_phone: &'a str,
    total: &'a str,
    address: &'a ShippingAddress,
    items: &'a [ItemLine],
}

/// A rendered order notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OrderEmail {
    /// Render the notification for `order` placed by `buyer`.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if a template fails to render.
    pub fn render(order: &Order, buyer: &User) -> Result<Self, askama::Error> {
        let order_id = order.id.as_str();
        let order_date = format_order_date(order.created_at);
        let total = format_pkr(order.total);
        let buyer_phone = match order.shipping_address.phone.trim() {
            "" => "N/A",
            phone => phone,
        };
        let items: Vec<ItemLine> = order
            .items
            .iter()
            .map(|item| ItemLine {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: format_pkr(item.price),
            })
            .collect();

        let text = OrderNotificationText {
            order_id,
            order_date: &order_date,
            buyer_name: &buyer.name,
            buyer_email: buyer.email.as_str(),
            buyer_phone,
            total: &total,
            address: &order.shipping_address,
            items: &items,
        }
        .render()?;

        let html = OrderNotificationHtml {
            order_id,
            order_date: &order_date,
            buyer_name: &buyer.name,
            buyer_email: buyer.email.as_str(),
            buyer_phone,
            total: &total,
            address: &order.shipping_address,
            items: &items,
        }
        .render()?;

        Ok(Self {
            subject: format!("New Order {} - {}", order.id, buyer.email),
            text,
            html,
        })
    }
}

/// Order timestamp in Pakistan local time, e.g. `16/10/2026, 3:04:05 pm`.
fn format_order_date(created_at: DateTime<Utc>) -> String {
    FixedOffset::east_opt(PKT_OFFSET_SECS).map_or_else(
        || created_at.format("%-d/%-m/%Y, %-I:%M:%S %P UTC").to_string(),
        |pkt| {
            created_at
                .with_timezone(&pkt)
                .format("%-d/%-m/%Y, %-I:%M:%S %P")
                .to_string()
        },
    )
}
