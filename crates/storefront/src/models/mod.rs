//! Domain models for the storefront.
//!
//! These are the records held by the stores in [`crate::db`] and the JSON
//! shapes the API returns.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{CheckoutItem, CheckoutRequest, EmailDispatch, Order, OrderItem};
pub use product::{Product, ProductDraft, ProductPatch};
pub use session::{MagicLink, MagicToken, SessionToken};
pub use user::{PublicUser, User};
