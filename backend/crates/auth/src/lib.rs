//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases: register, authenticate, session gate
//! - `infra/` - PostgreSQL and in-memory stores, expired-session sweeper
//! - `presentation/` - HTTP handlers, views, router, session middleware
//!
//! ## Features
//! - Sign-up and log-in with username + password
//! - Server-side sessions behind an HMAC-signed cookie
//! - One restricted page gated on login, with a per-session visit counter
//! - Read-once transient messages
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; plaintext is zeroized and never logged
//! - Unknown user and wrong password are indistinguishable to the client
//! - Session cookies are HttpOnly and signed; forged tokens start a fresh session

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthFailure, RegistrationError, SessionError, StoreError};
pub use infra::{
    memory::MemoryAuthRepository, postgres::PgAuthRepository, sweeper::SessionSweeper,
};
pub use presentation::router::{app_router, app_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::AppError,
    kind::ErrorKind,
};
