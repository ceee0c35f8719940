//! Storage for users, sessions, products and orders.
//!
//! Each collection sits behind an async store trait so handlers and services
//! never touch the underlying collections directly. The bundled
//! implementations keep everything in process memory; state does not survive
//! a restart.
//!
//! # Stores
//!
//! - [`UserStore`] - Accounts, unique by case-insensitive email
//! - [`SessionStore`] - Bearer tokens and single-use magic-link tokens
//! - [`ProductStore`] - Catalog, most recent first
//! - [`OrderStore`] - Orders, most recent first
//!
//! Locks are never held across an `.await`.

pub mod orders;
pub mod products;
pub mod seed;
pub mod sessions;
pub mod users;

use async_trait::async_trait;
use thiserror::Error;

use arluxe_core::{Email, OrderId, OrderStatus, ProductId, UserId};

use crate::models::{
    EmailDispatch, MagicLink, MagicToken, Order, Product, ProductPatch, SessionToken, User,
};

pub use orders::MemoryOrderStore;
pub use products::MemoryProductStore;
pub use sessions::MemorySessionStore;
pub use users::MemoryUserStore;

/// Errors from store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, stale status).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by id.
    async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Look up a user by email, ignoring ASCII case.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert(&self, user: User) -> Result<User, RepositoryError>;

    /// Return the user owning `candidate.email`, inserting `candidate` when
    /// there is none. The lookup and insert happen atomically.
    async fn find_or_insert(&self, candidate: User) -> Result<User, RepositoryError>;
}

/// Bearer session and magic-link token storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Bind a bearer token to a user. Sessions never expire.
    async fn insert_session(
        &self,
        token: SessionToken,
        user_id: UserId,
    ) -> Result<(), RepositoryError>;

    /// Resolve a bearer token to its user id.
    async fn resolve_session(&self, token: &SessionToken)
    -> Result<Option<UserId>, RepositoryError>;

    /// Store a magic-link token.
    async fn insert_magic_link(
        &self,
        token: MagicToken,
        link: MagicLink,
    ) -> Result<(), RepositoryError>;

    /// Remove and return a magic-link token.
    async fn take_magic_link(&self, token: &MagicToken)
    -> Result<Option<MagicLink>, RepositoryError>;
}

/// Catalog storage.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, most recently inserted first.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Look up a product by id.
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product at the front of the catalog.
    async fn insert_front(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Apply a patch and return the updated product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn update(&self, id: &ProductId, patch: ProductPatch)
    -> Result<Product, RepositoryError>;

    /// Remove and return a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn remove(&self, id: &ProductId) -> Result<Product, RepositoryError>;
}

/// Order storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, most recent first.
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Orders owned by `user_id`, most recent first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Look up an order by id.
    async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Insert an order at the front of the collection.
    async fn insert_front(&self, order: Order) -> Result<Order, RepositoryError>;

    /// Set the status of an order if it is still `expected`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist and
    /// `RepositoryError::Conflict` if its status is no longer `expected`.
    async fn replace_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError>;

    /// Record the outcome of the seller notification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    async fn set_email_dispatch(
        &self,
        id: &OrderId,
        dispatch: EmailDispatch,
    ) -> Result<(), RepositoryError>;
}
