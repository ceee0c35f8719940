//! Core types for the Arluxe storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use address::ShippingAddress;
pub use cart::{Cart, CartLine};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{MAX_DISCOUNT_PERCENT, clamp_discount, discounted_price, format_pkr, has_discount};
pub use status::*;
