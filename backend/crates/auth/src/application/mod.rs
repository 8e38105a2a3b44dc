//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod register;
pub mod session_gate;

// Re-exports
pub use authenticate::Authenticator;
pub use config::AuthConfig;
pub use register::Registrar;
pub use session_gate::{Access, OpenedSession, ResolvedIdentity, SessionGate};
