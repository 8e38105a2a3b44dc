//! Credential Entity
//!
//! A registered user: identifier, user name and password hash.

use chrono::{DateTime, Utc};

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{
    UserId, user_name::UserName, user_password::UserPassword,
};

/// Credential entity
///
/// The only place a password hash lives. Never leaves the auth crate
/// except as an [`Identity`].
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    /// Unique, case-sensitive
    pub user_name: UserName,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Create a new credential with a fresh ID
    pub fn new(user_name: UserName, password_hash: UserPassword) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Public projection, without the hash
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
        }
    }
}
