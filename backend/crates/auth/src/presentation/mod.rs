//! Presentation Layer
//!
//! HTTP handlers, DTOs, views, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session;
pub mod views;

pub use handlers::AuthAppState;
pub use middleware::{require_login, session_layer};
pub use router::{app_router, app_router_generic};
pub use session::{SessionChange, SessionContext};
