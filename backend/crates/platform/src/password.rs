//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Per-hash random salt; salt and cost parameters live in the PHC string
//! - Zeroization of clear text
//! - Constant-time comparison (inside `argon2`)
//!
//! Hashing is CPU-bound. Async callers should run [`ClearTextPassword::hash`]
//! and [`HashedPassword::verify`] on a blocking thread.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Maximum password length in characters. Bounds the hashing work per request.
pub const MAX_PASSWORD_LENGTH: usize = 1024;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    Empty,

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),

    #[error("Invalid hash cost: {0}")]
    InvalidCost(String),
}

// ============================================================================
// Hash Cost
// ============================================================================

/// Argon2id cost parameters used when deriving new hashes.
///
/// Verification never uses this: it reads the parameters embedded in the
/// stored hash, so raising the cost does not invalidate existing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Smallest parameters Argon2 accepts. Only for tests.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password.
    ///
    /// The input is kept byte-for-byte. The only policy is "not empty" and
    /// [`MAX_PASSWORD_LENGTH`].
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self(raw);

        if password.0.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        let char_count = password.0.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(password)
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut combined = Zeroizing::new(self.as_bytes().to_vec());
        if let Some(p) = pepper {
            combined.extend_from_slice(p);
        }
        combined
    }

    /// Hash the password using Argon2id with a fresh random salt.
    ///
    /// ## Returns
    /// PHC-formatted hash string wrapped in `HashedPassword`
    pub fn hash(
        &self,
        pepper: Option<&[u8]>,
        cost: HashCost,
    ) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = self.peppered(pepper);

        // 128-bit salt
        let salt = SaltString::generate(OsRng);

        let hash = cost
            .hasher()?
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

const DUMMY_SALT: &str = "c2FsdHNhbHRzYWx0c2FsdA";
// 32 zero bytes
const DUMMY_OUTPUT: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, parameters, salt and hash.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored value without parsing it.
    ///
    /// A malformed value is reported by [`verify`](Self::verify) instead, so
    /// a corrupt row surfaces as a verification fault at login time.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// A well-formed hash with the given cost that no password matches.
    ///
    /// Verifying against it costs the same as verifying a real credential
    /// of that cost.
    pub fn dummy(cost: HashCost) -> Self {
        Self {
            hash: format!(
                "$argon2id$v=19$m={},t={},p={}${}${}",
                cost.memory_kib, cost.iterations, cost.parallelism, DUMMY_SALT, DUMMY_OUTPUT,
            ),
        }
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash.
    ///
    /// ## Returns
    /// - `Ok(true)` on match
    /// - `Ok(false)` on mismatch
    /// - `Err(_)` if the stored hash is malformed or the hasher failed
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<bool, PasswordHashError> {
        let password_bytes = password.peppered(pepper);

        let parsed_hash =
            PasswordHash::new(&self.hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        // Parameters come from the parsed hash, not from this instance.
        match Argon2::default().verify_password(&password_bytes, &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::VerificationFailed(e.to_string())),
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn password(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new(String::new());
        assert!(matches!(result, Err(PasswordPolicyError::Empty)));
    }

    #[test]
    fn test_password_whitespace_only_allowed() {
        let hashed = password("   \t ").hash(None, HashCost::minimal()).unwrap();
        assert!(hashed.verify(&password("   \t "), None).unwrap());
        assert!(!hashed.verify(&password("  \t "), None).unwrap());
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_short_password_allowed() {
        // No strength policy beyond "not empty"
        assert!(ClearTextPassword::new("a".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hashed = password("secret1").hash(None, HashCost::minimal()).unwrap();

        assert!(hashed.verify(&password("secret1"), None).unwrap());
        assert!(!hashed.verify(&password("secret2"), None).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let a = password("secret1").hash(None, HashCost::minimal()).unwrap();
        let b = password("secret1").hash(None, HashCost::minimal()).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
        assert!(!a.as_phc_string().contains("secret1"));
    }

    #[test]
    fn test_cost_embedded_in_hash() {
        let hashed = password("secret1").hash(None, HashCost::minimal()).unwrap();
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.as_phc_string().contains("m=8,t=1,p=1"));
    }

    #[test]
    fn test_hash_with_pepper() {
        let pepper = b"my_secret_pepper";
        let hashed = password("TestPassword123!")
            .hash(Some(pepper), HashCost::minimal())
            .unwrap();

        assert!(hashed.verify(&password("TestPassword123!"), Some(pepper)).unwrap());
        assert!(!hashed.verify(&password("TestPassword123!"), None).unwrap());
        assert!(
            !hashed
                .verify(&password("TestPassword123!"), Some(b"wrong_pepper"))
                .unwrap()
        );
    }

    #[test]
    fn test_compatibility_equivalent_passwords_differ() {
        // U+FB01 LATIN SMALL LIGATURE FI
        let hashed = password("\u{FB01}sh").hash(None, HashCost::minimal()).unwrap();
        assert!(!hashed.verify(&password("fish"), None).unwrap());
        assert!(hashed.verify(&password("\u{FB01}sh"), None).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_error() {
        let stored = HashedPassword::from_stored("not_a_valid_hash");
        let result = stored.verify(&password("secret1"), None);
        assert!(matches!(result, Err(PasswordHashError::InvalidHashFormat)));
    }

    #[test]
    fn test_dummy_hash_never_matches() {
        let dummy = HashedPassword::dummy(HashCost::minimal());
        assert!(dummy.as_phc_string().contains("m=8,t=1,p=1"));
        assert!(!dummy.verify(&password("secret1"), None).unwrap());
        assert!(!dummy.verify(&password("secret1"), Some(b"pepper")).unwrap());
    }

    #[test]
    fn test_invalid_cost() {
        let cost = HashCost {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        };
        let result = password("secret1").hash(None, cost);
        assert!(matches!(result, Err(PasswordHashError::InvalidCost(_))));
    }

    #[test]
    fn test_debug_redaction() {
        let debug_output = format!("{:?}", password("secret"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
