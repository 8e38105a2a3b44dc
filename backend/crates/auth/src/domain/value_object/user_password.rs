//! User Password Value Object
//!
//! Domain wrappers around `platform::password`.
//!
//! Both derivation and verification are CPU-bound and run on tokio's
//! blocking pool, so callers simply `.await` them like any other I/O.
//!
//! ## Usage
//! ```rust,no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::HashCost;
//!
//! let raw = RawPassword::new("secret1".to_string())?;
//! let hashed = UserPassword::derive(raw, None, HashCost::default()).await?;
//!
//! let attempt = RawPassword::new("secret1".to_string())?;
//! assert!(hashed.verify(attempt, None).await?);
//! # Ok(())
//! # }
//! ```

use platform::password::{ClearTextPassword, HashCost, HashedPassword, PasswordHashError};
use std::fmt;

pub use platform::password::PasswordPolicyError;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input. Zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password, Argon2id PHC string
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash `raw` with a fresh salt at the given cost.
    pub async fn derive(
        raw: RawPassword,
        pepper: Option<Vec<u8>>,
        cost: HashCost,
    ) -> Result<Self, PasswordHashError> {
        let hashed = tokio::task::spawn_blocking(move || raw.0.hash(pepper.as_deref(), cost))
            .await
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))??;

        Ok(Self(hashed))
    }

    /// Wrap a stored hash. Malformed values are reported by `verify`.
    pub fn from_db(stored: impl Into<String>) -> Self {
        Self(HashedPassword::from_stored(stored))
    }

    /// Stand-in hash for a user that does not exist. Never matches.
    pub fn dummy(cost: HashCost) -> Self {
        Self(HashedPassword::dummy(cost))
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Compare `raw` against this hash in constant time.
    ///
    /// `Ok(false)` means mismatch; `Err` means the comparison could not be
    /// performed at all.
    pub async fn verify(
        &self,
        raw: RawPassword,
        pepper: Option<Vec<u8>>,
    ) -> Result<bool, PasswordHashError> {
        let hashed = self.0.clone();
        tokio::task::spawn_blocking(move || hashed.verify(&raw.0, pepper.as_deref()))
            .await
            .map_err(|e| PasswordHashError::VerificationFailed(e.to_string()))?
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> RawPassword {
        RawPassword::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_derive_and_verify() {
        let hashed = UserPassword::derive(raw("secret1"), None, HashCost::minimal())
            .await
            .unwrap();

        assert_ne!(hashed.as_phc_string(), "secret1");
        assert!(hashed.verify(raw("secret1"), None).await.unwrap());
        assert!(!hashed.verify(raw("secret2"), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_roundtrip_through_db_string() {
        let hashed = UserPassword::derive(raw("secret1"), None, HashCost::minimal())
            .await
            .unwrap();
        let restored = UserPassword::from_db(hashed.as_phc_string());

        assert!(restored.verify(raw("secret1"), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_error() {
        let stored = UserPassword::from_db("$2a$10$definitely-not-argon");
        assert!(stored.verify(raw("secret1"), None).await.is_err());
    }

    #[tokio::test]
    async fn test_dummy_never_matches() {
        let dummy = UserPassword::dummy(HashCost::minimal());
        assert!(!dummy.verify(raw("secret1"), None).await.unwrap());
        assert!(!dummy.verify(raw(" "), Some(b"pepper".to_vec())).await.unwrap());
    }

    #[test]
    fn test_debug_redaction() {
        let debug = format!("{:?}", raw("SecretPassword123!"));
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Secret"));

        let hashed = UserPassword::from_db("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA");
        assert!(format!("{:?}", hashed).contains("HASH"));
        assert_eq!(hashed.to_string(), "[HASHED_PASSWORD]");
    }
}
