//! In-memory user store.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use arluxe_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::User;

/// Users kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `users`.
    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.email.matches(email))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.email.matches(&user.email)) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_or_insert(&self, candidate: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write();
        if let Some(existing) = users.iter().find(|u| u.email.matches(&candidate.email)) {
            return Ok(existing.clone());
        }
        users.push(candidate.clone());
        Ok(candidate)
    }
}
