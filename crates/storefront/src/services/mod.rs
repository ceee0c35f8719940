//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Password login, registration, magic links and bearer sessions
//! - `catalog` - Product listing and admin maintenance
//! - `checkout` - Server-priced order creation and status workflow
//! - `notify` - Seller order e-mails with retry and dispatch recording

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod notify;
