//! In-memory session and magic-link token store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use arluxe_core::UserId;

use super::{RepositoryError, SessionStore};
use crate::models::{MagicLink, MagicToken, SessionToken};

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, UserId>>>,
    magic_links: Arc<RwLock<HashMap<MagicToken, MagicLink>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert_session(
        &self,
        token: SessionToken,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        self.sessions.write().insert(token, user_id);
        Ok(())
    }

    async fn resolve_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<UserId>, RepositoryError> {
        Ok(self.sessions.read().get(token).cloned())
    }

    async fn insert_magic_link(
        &self,
        token: MagicToken,
        link: MagicLink,
    ) -> Result<(), RepositoryError> {
        self.magic_links.write().insert(token, link);
        Ok(())
    }

    async fn take_magic_link(
        &self,
        token: &MagicToken,
    ) -> Result<Option<MagicLink>, RepositoryError> {
        Ok(self.magic_links.write().remove(token))
    }
}
