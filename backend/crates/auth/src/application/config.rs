//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::HashCost;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default session lifetime (14 days)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(14 * 24 * 3600);

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HMAC key for session tokens
    pub session_secret: Vec<u8>,
    /// Sliding session lifetime
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id work factor
    pub hash_cost: HashCost,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "sid".to_string(),
            session_secret: Vec::new(),
            session_ttl: DEFAULT_SESSION_TTL,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            hash_cost: HashCost::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with the given session secret
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            session_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Get password pepper as an owned buffer for the blocking pool
    pub fn pepper(&self) -> Option<Vec<u8>> {
        self.password_pepper.clone()
    }

    /// Cookie attributes for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.session_cookie_name, "sid");
        assert_eq!(config.session_ttl, Duration::from_secs(1_209_600));
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_cookie_config() {
        let cookie = AuthConfig::with_secret(b"k".to_vec()).cookie_config();
        let header = cookie.build_set_cookie("abc");
        assert!(header.starts_with("sid=abc"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("Max-Age=1209600"));
    }
}
