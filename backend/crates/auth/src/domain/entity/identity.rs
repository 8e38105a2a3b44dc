//! Identity
//!
//! The authenticated user as seen by request handlers.

use crate::domain::value_object::{UserId, user_name::UserName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub user_name: UserName,
}
