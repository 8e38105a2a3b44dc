//! Server Configuration
//!
//! Read once from the process environment at startup.

use anyhow::{Context, bail};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use auth::AuthConfig;
use auth::infra::sweeper::DEFAULT_SWEEP_PERIOD;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub sweep_period: Duration,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let session_secret = required(&lookup, "SESSION_SECRET")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DB_MAX_CONNECTIONS must be an integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(v) => v.parse().context("COOKIE_SECURE must be true or false")?,
            None => false,
        };

        let mut auth = AuthConfig::with_secret(session_secret.into_bytes());
        auth.cookie_secure = cookie_secure;
        if let Some(v) = lookup("SESSION_TTL_SECS") {
            auth.session_ttl = positive_secs(&v, "SESSION_TTL_SECS")?;
        }

        let sweep_period = match lookup("SESSION_SWEEP_SECS") {
            Some(v) => positive_secs(&v, "SESSION_SWEEP_SECS")?,
            None => DEFAULT_SWEEP_PERIOD,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            sweep_period,
            auth,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => bail!("{key} must not be empty"),
        None => bail!("{key} must be set in environment"),
    }
}

fn positive_secs(value: &str, key: &str) -> anyhow::Result<Duration> {
    let secs: u64 = value
        .parse()
        .with_context(|| format!("{key} must be an integer"))?;
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("SESSION_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_connections, 5);
        assert!(!config.auth.cookie_secure);
        assert_eq!(config.auth.session_secret, b"s3cret");
        assert_eq!(config.auth.session_ttl, Duration::from_secs(1_209_600));
        assert_eq!(config.sweep_period, Duration::from_secs(600));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("SESSION_SECRET", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("COOKIE_SECURE", "true"),
            ("SESSION_TTL_SECS", "60"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("SESSION_SWEEP_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.session_ttl, Duration::from_secs(60));
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.sweep_period, Duration::from_secs(30));
    }

    #[test]
    fn test_required_values() {
        assert!(load(&[("SESSION_SECRET", "s3cret")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://localhost/app")]).is_err());
        assert!(
            load(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("SESSION_SECRET", "  "),
            ])
            .is_err()
        );
    }

    #[test]
    fn test_invalid_number_rejected() {
        assert!(
            load(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("SESSION_SECRET", "s3cret"),
                ("SESSION_TTL_SECS", "two weeks"),
            ])
            .is_err()
        );
    }

    #[test]
    fn test_zero_durations_rejected() {
        for key in ["SESSION_TTL_SECS", "SESSION_SWEEP_SECS"] {
            let err = load(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("SESSION_SECRET", "s3cret"),
                (key, "0"),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("greater than zero"), "{key}: {err}");
        }
    }
}
