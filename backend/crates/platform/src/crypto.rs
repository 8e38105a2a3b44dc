//! Cryptographic Utilities
//!
//! HMAC-signed opaque tokens of the form
//! `<payload>.<base64url(HMAC-SHA256(key, payload))>`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Signing key rejected")]
    InvalidKey,
}

fn mac(key: &[u8]) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(key).map_err(|_| TokenError::InvalidKey)
}

/// Sign `payload` and return the combined token.
///
/// `payload` must not contain `.`.
pub fn sign_token(key: &[u8], payload: &str) -> Result<String, TokenError> {
    let mut mac = mac(key)?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify a token produced by [`sign_token`] and return its payload.
///
/// Any malformed or forged token yields `None`. The signature check is
/// constant-time.
pub fn verify_token<'a>(key: &[u8], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.split_once('.')?;
    if signature_b64.contains('.') {
        return None;
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

    let mut mac = mac(key).ok()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"keyboard cat";

    #[test]
    fn test_sign_and_verify() {
        let token = sign_token(KEY, "session-1").unwrap();
        assert!(token.starts_with("session-1."));
        assert_eq!(verify_token(KEY, &token), Some("session-1"));
    }

    #[test]
    fn test_signature_is_deterministic() {
        assert_eq!(
            sign_token(KEY, "abc").unwrap(),
            sign_token(KEY, "abc").unwrap()
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = sign_token(KEY, "session-1").unwrap();
        assert_eq!(verify_token(b"another secret", &token), None);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = sign_token(KEY, "session-1").unwrap();
        let forged = token.replacen("session-1", "session-2", 1);
        assert_eq!(verify_token(KEY, &forged), None);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(verify_token(KEY, ""), None);
        assert_eq!(verify_token(KEY, "no-signature"), None);
        assert_eq!(verify_token(KEY, "a.!!!"), None);
        assert_eq!(verify_token(KEY, "a.b.c"), None);
    }
}
