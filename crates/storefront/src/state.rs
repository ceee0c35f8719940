//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::StorefrontConfig;
use crate::db::{
    MemoryOrderStore, MemoryProductStore, MemorySessionStore, MemoryUserStore, OrderStore,
    ProductStore, SessionStore, UserStore, seed,
};
use crate::services::auth::{AuthError, AuthService};
use crate::services::catalog::CatalogService;
use crate::services::checkout::CheckoutService;
use crate::services::notify::{NotificationDispatcher, Notifier, NotifyError, notifier_from_config};

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to seed users: {0}")]
    Seed(#[from] AuthError),
    #[error("failed to build notifier: {0}")]
    Notifier(#[from] NotifyError),
}

/// The stores backing the application.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub products: Arc<dyn ProductStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Stores {
    /// In-memory stores loaded with the seed users and catalog.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if hashing a seed password fails.
    pub fn seeded() -> Result<Self, AuthError> {
        Ok(Self {
            users: Arc::new(MemoryUserStore::with_users(seed::users()?)),
            sessions: Arc::new(MemorySessionStore::new()),
            products: Arc::new(MemoryProductStore::with_products(seed::products())),
            orders: Arc::new(MemoryOrderStore::new()),
        })
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores, services and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stores: Stores,
    dispatcher: NotificationDispatcher,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        let dispatcher =
            NotificationDispatcher::new(notifier, stores.orders.clone(), &config.notifications);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                dispatcher,
            }),
        }
    }

    /// Seeded in-memory state with the notifier selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if seeding fails or the notifier cannot be built.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let stores = Stores::seeded()?;
        let notifier = notifier_from_config(&config.notifications)?;
        Ok(Self::new(config, stores, notifier))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.stores.users.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &dyn SessionStore {
        self.inner.stores.sessions.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.stores.products.as_ref()
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.stores.orders.as_ref()
    }

    /// Get a reference to the notification dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.inner.dispatcher
    }

    /// Authentication service over this state's stores.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users(), self.sessions(), &self.inner.config.auth)
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.products())
    }

    #[must_use]
    pub fn checkout(&self) -> CheckoutService<'_> {
        CheckoutService::new(self.products(), self.orders(), self.dispatcher())
    }
}
