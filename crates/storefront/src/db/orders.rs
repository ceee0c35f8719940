//! In-memory order store.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use arluxe_core::{OrderId, OrderStatus, UserId};

use super::{OrderStore, RepositoryError};
use crate::models::{EmailDispatch, Order};

/// Orders ordered most recent first.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.orders.read().clone())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.orders.read().iter().find(|o| &o.id == id).cloned())
    }

    async fn insert_front(&self, order: Order) -> Result<Order, RepositoryError> {
        self.orders.write().insert(0, order.clone());
        Ok(order)
    }

    async fn replace_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut orders = self.orders.write();
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if order.status != expected {
            return Err(RepositoryError::Conflict(format!(
                "order status is {}, expected {expected}",
                order.status
            )));
        }

        order.status = next;
        Ok(order.clone())
    }

    async fn set_email_dispatch(
        &self,
        id: &OrderId,
        dispatch: EmailDispatch,
    ) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write();
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        order.email_dispatch = dispatch;
        Ok(())
    }
}
