//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (answers preflight requests)
//!
//! Authentication is not a layer: handlers opt in with the
//! [`RequireAuth`] and [`RequireAdmin`] extractors.

pub mod auth;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
