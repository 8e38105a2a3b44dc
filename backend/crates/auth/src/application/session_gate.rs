//! Session Gate
//!
//! Resolves a client's session token to a [`SessionRecord`] and an optional
//! [`Identity`], and decides access to protected resources.
//!
//! ## State machine
//! ```text
//! Anonymous --login(identity)--> Authenticated
//! Authenticated --logout--> (destroyed; next request starts Anonymous)
//! ```
//!
//! The gate never mutates ambient state: callers receive the record by
//! value, change it with the pure functions below, and hand it back to
//! [`SessionGate::commit`] or [`SessionGate::destroy`].

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{identity::Identity, session::SessionRecord};
use crate::domain::repository::{CredentialRepository, SessionStore};
use crate::domain::value_object::SessionId;
use crate::error::SessionError;

/// Queued when an anonymous client requests a protected resource
pub const ACCESS_DENIED_MESSAGE: &str = "You can't access that page before logon.";

/// Queued when a login attempt fails, whatever the reason
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect username or password.";

/// Counter incremented on every authorized visit to the restricted page
pub const PAGE_COUNT: &str = "page_count";

/// Result of [`SessionGate::open`]
#[derive(Debug)]
pub struct OpenedSession {
    pub record: SessionRecord,
    /// No valid token was presented; the record has never been saved
    pub is_new: bool,
}

/// Result of [`SessionGate::resolve`]
#[derive(Debug)]
pub struct ResolvedIdentity {
    pub identity: Option<Identity>,
    /// A stale binding was cleared and the record needs saving
    pub unbound: bool,
}

/// Authorization decision for a protected resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(Identity),
    Denied,
}

pub struct SessionGate<R>
where
    R: CredentialRepository + SessionStore,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SessionGate<R>
where
    R: CredentialRepository + SessionStore,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Load the session named by `token`, or start a fresh one.
    ///
    /// Forged, malformed, unknown and expired tokens all start a fresh
    /// session. Only a store fault is an error.
    pub async fn open(&self, token: Option<&str>) -> Result<OpenedSession, SessionError> {
        if let Some(session_id) = token.and_then(|t| self.parse_token(t)) {
            if let Some(record) = SessionStore::load(self.repo.as_ref(), &session_id).await? {
                return Ok(OpenedSession {
                    record,
                    is_new: false,
                });
            }
            tracing::debug!(%session_id, "Session not found or expired");
        }

        Ok(OpenedSession {
            record: SessionRecord::new(self.config.session_ttl),
            is_new: true,
        })
    }

    /// Resolve the record's user binding to an Identity.
    ///
    /// A binding to a credential that no longer exists is cleared.
    pub async fn resolve(
        &self,
        record: &mut SessionRecord,
    ) -> Result<ResolvedIdentity, SessionError> {
        let Some(user_id) = record.user_id else {
            return Ok(ResolvedIdentity {
                identity: None,
                unbound: false,
            });
        };

        match self.repo.find_by_id(&user_id).await? {
            Some(credential) => Ok(ResolvedIdentity {
                identity: Some(credential.identity()),
                unbound: false,
            }),
            None => {
                tracing::warn!(
                    session_id = %record.session_id,
                    %user_id,
                    "Session bound to missing credential, unbinding"
                );
                record.unbind();
                Ok(ResolvedIdentity {
                    identity: None,
                    unbound: true,
                })
            }
        }
    }

    /// Signed cookie value for `record`
    pub fn issue_token(&self, record: &SessionRecord) -> Result<String, SessionError> {
        platform::crypto::sign_token(&self.config.session_secret, &record.session_id.to_string())
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    /// Slide expiry, persist, and return the cookie value
    pub async fn commit(&self, record: &mut SessionRecord) -> Result<String, SessionError> {
        record.touch(self.config.session_ttl);
        SessionStore::save(self.repo.as_ref(), record).await?;
        self.issue_token(record)
    }

    /// Logout: delete the record server-side
    pub async fn destroy(&self, session_id: &SessionId) -> Result<(), SessionError> {
        SessionStore::destroy(self.repo.as_ref(), session_id).await?;
        tracing::info!(%session_id, "Session destroyed");
        Ok(())
    }

    fn parse_token(&self, token: &str) -> Option<SessionId> {
        let payload = platform::crypto::verify_token(&self.config.session_secret, token)?;
        payload.parse().ok()
    }
}

/// Gate a protected resource.
///
/// Anonymous requests get [`ACCESS_DENIED_MESSAGE`] queued on the record.
pub fn authorize(record: &mut SessionRecord, identity: Option<&Identity>) -> Access {
    match identity {
        Some(identity) => Access::Granted(identity.clone()),
        None => {
            record.push_message(ACCESS_DENIED_MESSAGE);
            Access::Denied
        }
    }
}

/// Anonymous -> Authenticated, on the current token
pub fn login(record: &mut SessionRecord, identity: &Identity) {
    record.bind(identity.user_id);
}

/// Count an authorized visit to the restricted page
pub fn record_visit(record: &mut SessionRecord) -> i64 {
    record.increment(PAGE_COUNT)
}

/// Read-and-clear the transient message queue
pub fn drain_messages(record: &mut SessionRecord) -> Vec<String> {
    record.take_messages()
}
