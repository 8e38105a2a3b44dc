//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by every crate in the workspace:
//! - Typed identifiers (`Id<T>`)
//! - The unified error type (`AppError`) and its classification (`ErrorKind`)
//!
//! Only things whose meaning is identical across all domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
