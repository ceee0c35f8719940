//! In-memory catalog store.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use arluxe_core::ProductId;

use super::{ProductStore, RepositoryError};
use crate::models::{Product, ProductPatch};

/// Products ordered most recent first.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `products` in the given order.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.read().clone())
    }

    async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().iter().find(|p| &p.id == id).cloned())
    }

    async fn insert_front(&self, product: Product) -> Result<Product, RepositoryError> {
        self.products.write().insert(0, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut products = self.products.write();
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.apply(patch);
        Ok(product.clone())
    }

    async fn remove(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let mut products = self.products.write();
        let index = products
            .iter()
            .position(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(products.remove(index))
    }
}
