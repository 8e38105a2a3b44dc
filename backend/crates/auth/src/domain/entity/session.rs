//! Session Entity
//!
//! Server-side per-browser state: the bound user (if any), queued
//! transient messages, and named counters.

use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::value_object::{SessionId, UserId};

/// Authentication state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(UserId),
}

/// Session record
///
/// `messages` keeps insertion order and is emptied as a whole by
/// [`take_messages`](Self::take_messages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub user_id: Option<UserId>,
    pub messages: Vec<String>,
    pub counters: BTreeMap<String, i64>,
    /// Unix epoch milliseconds
    pub expires_at_ms: i64,
}

impl SessionRecord {
    /// Fresh anonymous session expiring `ttl` from now
    pub fn new(ttl: Duration) -> Self {
        Self {
            session_id: SessionId::new(),
            user_id: None,
            messages: Vec::new(),
            counters: BTreeMap::new(),
            expires_at_ms: expiry_from_now(ttl),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at_ms <= now_ms
    }

    pub fn state(&self) -> SessionState {
        match self.user_id {
            Some(user_id) => SessionState::Authenticated(user_id),
            None => SessionState::Anonymous,
        }
    }

    pub fn bind(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
    }

    pub fn unbind(&mut self) {
        self.user_id = None;
    }

    /// Queue a message for the next page that displays messages
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Remove and return every queued message, oldest first
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Increment a counter (absent counts as 0) and return the new value
    pub fn increment(&mut self, name: &str) -> i64 {
        let value = self.counters.entry(name.to_string()).or_insert(0);
        *value = value.saturating_add(1);
        *value
    }

    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Slide expiry to `ttl` from now
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at_ms = expiry_from_now(ttl);
    }
}

fn expiry_from_now(ttl: Duration) -> i64 {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    Utc::now().timestamp_millis().saturating_add(ttl_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_new_session_is_anonymous_and_live() {
        let record = SessionRecord::new(TTL);
        assert_eq!(record.state(), SessionState::Anonymous);
        assert!(!record.is_expired());
        assert!(record.messages.is_empty());
        assert_eq!(record.counter("page_count"), 0);
    }

    #[test]
    fn test_bind_and_unbind() {
        let mut record = SessionRecord::new(TTL);
        let user_id = UserId::new();

        record.bind(user_id);
        assert_eq!(record.state(), SessionState::Authenticated(user_id));

        record.unbind();
        assert_eq!(record.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_messages_drain_in_order() {
        let mut record = SessionRecord::new(TTL);
        record.push_message("first");
        record.push_message("second");

        assert_eq!(record.take_messages(), vec!["first", "second"]);
        assert!(record.take_messages().is_empty());
    }

    #[test]
    fn test_counter_increments_from_zero() {
        let mut record = SessionRecord::new(TTL);
        assert_eq!(record.increment("page_count"), 1);
        assert_eq!(record.increment("page_count"), 2);
        assert_eq!(record.increment("other"), 1);
        assert_eq!(record.counter("page_count"), 2);
    }

    #[test]
    fn test_expiry() {
        let record = SessionRecord::new(Duration::ZERO);
        assert!(record.is_expired_at(record.expires_at_ms));

        let mut record = SessionRecord::new(TTL);
        let before = record.expires_at_ms;
        assert!(!record.is_expired_at(before - 1));
        record.touch(Duration::from_secs(3600));
        assert!(record.expires_at_ms > before);
    }
}
