//! User Name Value Object
//!
//! The public handle a user signs up and logs in with.
//!
//! ## Invariants
//! - Not empty and not whitespace-only
//! - At most [`USER_NAME_MAX_LENGTH`] characters
//! - No control characters
//!
//! Names are stored and compared exactly as entered: no trimming, no case
//! folding, no Unicode normalization. `Alice` and `alice` are two users.

use std::fmt;
use thiserror::Error;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username cannot be empty")]
    Empty,

    #[error("Username must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Username contains invalid characters")]
    InvalidCharacter,
}

/// Validated user name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    pub fn new(input: impl Into<String>) -> Result<Self, UserNameError> {
        let input = input.into();
        Self::validate(&input)?;
        Ok(Self(input))
    }

    /// Restore from the database. Validation still applies.
    pub fn from_db(stored: &str) -> Result<Self, UserNameError> {
        Self::new(stored)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(input: &str) -> Result<(), UserNameError> {
        if input.trim().is_empty() {
            return Err(UserNameError::Empty);
        }

        let char_count = input.chars().count();
        if char_count > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: USER_NAME_MAX_LENGTH,
                actual: char_count,
            });
        }

        if input.chars().any(char::is_control) {
            return Err(UserNameError::InvalidCharacter);
        }

        Ok(())
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(UserName::new("alice").is_ok());
        assert!(UserName::new("Alice Smith").is_ok());
        assert!(UserName::new("ユーザー").is_ok());
        assert!(UserName::new("a").is_ok());
    }

    #[test]
    fn test_empty_fails() {
        assert_eq!(UserName::new(""), Err(UserNameError::Empty));
        assert_eq!(UserName::new("   "), Err(UserNameError::Empty));
    }

    #[test]
    fn test_length_limit() {
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(matches!(
            UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
            Err(UserNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_control_characters_rejected() {
        assert_eq!(
            UserName::new("ali\u{0}ce"),
            Err(UserNameError::InvalidCharacter)
        );
        assert_eq!(UserName::new("alice\n"), Err(UserNameError::InvalidCharacter));
    }

    #[test]
    fn test_kept_verbatim() {
        let name = UserName::new(" Alice ").unwrap();
        assert_eq!(name.as_str(), " Alice ");
        assert_ne!(UserName::new("Alice").unwrap(), UserName::new("alice").unwrap());
    }
}
