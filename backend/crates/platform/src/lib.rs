//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, salted, cost embedded in the PHC string)
//! - Signed opaque tokens (HMAC-SHA256, Base64url)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
