//! In-Memory Repository Implementation
//!
//! Credential and session store held in process memory. Used by tests
//! and for running the app without a database.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::entity::{credential::Credential, session::SessionRecord};
use crate::domain::repository::{CredentialRepository, SessionStore};
use crate::domain::value_object::{SessionId, UserId, user_name::UserName};
use crate::error::{StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    credentials: HashMap<UserId, Credential>,
    /// user_name -> user_id, the uniqueness index
    user_names: HashMap<UserName, UserId>,
    sessions: HashMap<SessionId, SessionRecord>,
}

/// Memory-backed credential and session store
///
/// Clones share the same underlying maps.
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    inner: Arc<RwLock<Inner>>,
    offline: Arc<AtomicBool>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backing store going away: every call fails with
    /// `StoreError::Unavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.offline.store(unavailable, Ordering::SeqCst);
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    #[cfg(test)]
    pub(crate) async fn remove_credential(&self, user_id: &UserId) {
        let mut inner = self.inner.write().await;
        if let Some(credential) = inner.credentials.remove(user_id) {
            inner.user_names.remove(&credential.user_name);
        }
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

impl CredentialRepository for MemoryAuthRepository {
    async fn find_by_user_name(&self, user_name: &UserName) -> StoreResult<Option<Credential>> {
        self.check_available()?;
        let inner = self.inner.read().await;

        Ok(inner
            .user_names
            .get(user_name)
            .and_then(|id| inner.credentials.get(id))
            .cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> StoreResult<Option<Credential>> {
        self.check_available()?;
        Ok(self.inner.read().await.credentials.get(user_id).cloned())
    }

    async fn insert(&self, credential: &Credential) -> StoreResult<UserId> {
        self.check_available()?;
        let mut inner = self.inner.write().await;

        if inner.user_names.contains_key(&credential.user_name)
            || inner.credentials.contains_key(&credential.user_id)
        {
            return Err(StoreError::Duplicate);
        }

        inner
            .user_names
            .insert(credential.user_name.clone(), credential.user_id);
        inner
            .credentials
            .insert(credential.user_id, credential.clone());

        Ok(credential.user_id)
    }
}

impl SessionStore for MemoryAuthRepository {
    async fn load(&self, session_id: &SessionId) -> StoreResult<Option<SessionRecord>> {
        self.check_available()?;
        Ok(self
            .inner
            .read()
            .await
            .sessions
            .get(session_id)
            .filter(|record| !record.is_expired())
            .cloned())
    }

    async fn save(&self, record: &SessionRecord) -> StoreResult<()> {
        self.check_available()?;
        self.inner
            .write()
            .await
            .sessions
            .insert(record.session_id, record.clone());
        Ok(())
    }

    async fn destroy(&self, session_id: &SessionId) -> StoreResult<()> {
        self.check_available()?;
        self.inner.write().await.sessions.remove(session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> StoreResult<u64> {
        self.check_available()?;
        let now_ms = Utc::now().timestamp_millis();
        let mut inner = self.inner.write().await;

        let before = inner.sessions.len();
        inner.sessions.retain(|_, record| !record.is_expired_at(now_ms));
        let deleted = (before - inner.sessions.len()) as u64;

        if deleted > 0 {
            tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");
        } else {
            tracing::debug!("No expired sessions to clean up");
        }

        Ok(deleted)
    }
}
