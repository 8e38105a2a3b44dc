//! Auth Error Types
//!
//! Auth-specific error enums that integrate with the unified
//! `kernel::error::AppError` system. Each one knows its HTTP status,
//! its `ErrorKind`, how loudly to log itself, and how to render.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Storage-level result type alias
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Storage
// ============================================================================

/// Faults reported by the credential store and the session store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violated
    #[error("Duplicate key")]
    Duplicate,

    /// Store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Duplicate => ErrorKind::Conflict,
            StoreError::Unavailable(_) => ErrorKind::ServiceUnavailable,
            StoreError::Database(e) => database_error_kind(e),
            StoreError::Corrupt(_) => ErrorKind::InternalServerError,
        }
    }
}

/// https://www.postgresql.org/docs/current/errcodes-appendix.html
fn database_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => ErrorKind::Conflict,
            // insufficient_resources, admin/crash shutdown, cannot_connect_now
            Some("53000" | "53100" | "53200" | "53300" | "57P01" | "57P02" | "57P03") => {
                ErrorKind::ServiceUnavailable
            }
            _ => ErrorKind::InternalServerError,
        },
        _ => ErrorKind::InternalServerError,
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Result of a failed `authenticate` call
#[derive(Debug, Error)]
pub enum AuthFailure {
    /// Unknown user or wrong password. The two are never distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The hash comparison itself failed (e.g. malformed stored hash)
    #[error("Credential verification failed: {0}")]
    MechanismError(String),

    /// Credential lookup failed
    #[error("Credential lookup failed: {0}")]
    Storage(#[from] StoreError),
}

impl AuthFailure {
    pub fn status_code(&self) -> StatusCode {
        status_of(self.kind())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthFailure::InvalidCredentials => ErrorKind::Unauthorized,
            AuthFailure::MechanismError(_) => ErrorKind::InternalServerError,
            AuthFailure::Storage(e) => e.kind(),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthFailure::InvalidCredentials => {
                AppError::unauthorized("Invalid username or password")
            }
            AuthFailure::MechanismError(_) => AppError::internal("Login failed"),
            AuthFailure::Storage(e) => storage_app_error(e),
        }
    }

    fn log(&self) {
        match self {
            AuthFailure::InvalidCredentials => tracing::warn!("Invalid login attempt"),
            AuthFailure::MechanismError(msg) => {
                tracing::error!(error = %msg, "Password verification mechanism failed")
            }
            AuthFailure::Storage(e) => tracing::error!(error = %e, "Credential lookup failed"),
        }
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Result of a failed `register` call
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// User name already exists
    #[error("User name already exists")]
    DuplicateUsername,

    /// User name or password rejected before hashing
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hash derivation failed
    #[error("Password hashing failed: {0}")]
    MechanismError(String),

    /// Any other persistence fault
    #[error("Storage error: {0}")]
    StorageError(StoreError),
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => RegistrationError::DuplicateUsername,
            other => RegistrationError::StorageError(other),
        }
    }
}

impl RegistrationError {
    pub fn status_code(&self) -> StatusCode {
        status_of(self.kind())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistrationError::DuplicateUsername => ErrorKind::Conflict,
            RegistrationError::InvalidInput(_) => ErrorKind::BadRequest,
            RegistrationError::MechanismError(_) => ErrorKind::InternalServerError,
            RegistrationError::StorageError(e) => e.kind(),
        }
    }

    /// Message safe to show on the sign-up form
    pub fn user_message(&self) -> String {
        match self {
            RegistrationError::DuplicateUsername => "That username is already taken.".to_string(),
            RegistrationError::InvalidInput(msg) => msg.clone(),
            RegistrationError::MechanismError(_) | RegistrationError::StorageError(_) => {
                "Sign-up failed. Please try again later.".to_string()
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            RegistrationError::StorageError(e) => storage_app_error(e),
            _ => AppError::new(self.kind(), self.user_message()),
        }
    }

    fn log(&self) {
        match self {
            RegistrationError::StorageError(e) => {
                tracing::error!(error = %e, "Registration storage error")
            }
            RegistrationError::MechanismError(msg) => {
                tracing::error!(error = %msg, "Registration hashing error")
            }
            _ => tracing::debug!(error = %self, "Registration rejected"),
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

// ============================================================================
// Session
// ============================================================================

/// Session layer faults
#[derive(Debug, Error)]
pub enum SessionError {
    /// Session store (or identity lookup) failed
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Token could not be signed
    #[error("Session token signing failed: {0}")]
    Signing(String),

    /// A handler asked for the session but the session layer is not installed
    #[error("Session layer not installed")]
    MissingLayer,
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        status_of(self.kind())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
            SessionError::Signing(_) | SessionError::MissingLayer => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            SessionError::StoreUnavailable(_) => AppError::service_unavailable(
                "Session storage is unavailable",
            )
            .with_action("Please try again in a moment"),
            _ => AppError::internal("Session error"),
        }
    }

    fn log(&self) {
        tracing::error!(error = %self, "Session error");
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn status_of(kind: ErrorKind) -> StatusCode {
    StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn storage_app_error(err: &StoreError) -> AppError {
    match err.kind() {
        ErrorKind::ServiceUnavailable => AppError::service_unavailable("Storage unavailable"),
        kind => AppError::new(kind, "Storage error"),
    }
}
