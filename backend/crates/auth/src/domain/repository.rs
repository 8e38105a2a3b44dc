//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use crate::domain::entity::{credential::Credential, session::SessionRecord};
use crate::domain::value_object::{SessionId, UserId, user_name::UserName};
use crate::error::StoreResult;

/// Credential store
///
/// Credentials are insert-only: there is no update or delete path.
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Find the credential whose user name matches exactly (case-sensitive)
    async fn find_by_user_name(&self, user_name: &UserName) -> StoreResult<Option<Credential>>;

    /// Find credential by ID
    async fn find_by_id(&self, user_id: &UserId) -> StoreResult<Option<Credential>>;

    /// Insert a new credential.
    ///
    /// Fails with `StoreError::Duplicate` if the user name is taken.
    async fn insert(&self, credential: &Credential) -> StoreResult<UserId>;
}

/// Server-side session store, keyed by session ID
///
/// Expiry is owned by the store: `load` never returns an expired record.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    async fn load(&self, session_id: &SessionId) -> StoreResult<Option<SessionRecord>>;

    /// Insert or replace
    async fn save(&self, record: &SessionRecord) -> StoreResult<()>;

    /// Delete. Deleting a missing session is not an error.
    async fn destroy(&self, session_id: &SessionId) -> StoreResult<()>;

    /// Purge expired sessions, returning the number removed
    async fn cleanup_expired(&self) -> StoreResult<u64>;
}
