//! Arluxe Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront API:
//! emails, typed IDs, roles, order statuses, shipping addresses, pricing and
//! cart arithmetic.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and pricing helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

// Re-exported so callers can use monetary values without a direct dependency.
pub use rust_decimal::Decimal;
