//! Catalog service.
//!
//! Public reads plus the admin create/update/delete operations.

use serde_json::Value;
use thiserror::Error;

use arluxe_core::ProductId;

use crate::db::{ProductStore, RepositoryError};
use crate::models::{Product, ProductDraft, ProductPatch};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found")]
    ProductNotFound,

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::ProductNotFound,
            other => Self::Repository(other),
        }
    }
}

pub struct CatalogService<'a> {
    products: &'a dyn ProductStore,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(products: &'a dyn ProductStore) -> Self {
        Self { products }
    }

    /// All products, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if there is no such product.
    pub async fn get(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Create a product from a loosely typed admin payload.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn create(&self, payload: &Value) -> Result<Product, CatalogError> {
        let product = Product::from_draft(ProductDraft::from_json(payload));
        let product = self.products.insert_front(product).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Merge the recognised fields of `payload` into a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if there is no such product.
    pub async fn update(&self, id: &ProductId, payload: &Value) -> Result<Product, CatalogError> {
        let patch = ProductPatch::from_json(payload);
        let product = self.products.update(id, patch).await?;

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Remove a product and return it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if there is no such product.
    pub async fn delete(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let product = self.products.remove(id).await?;

        tracing::info!(product_id = %product.id, "Product deleted");
        Ok(product)
    }
}
