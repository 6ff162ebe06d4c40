//! Configuration module for the events portal.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the community events service REST API
    pub upstream_url: String,
    /// Pre-shared key guarding the admin routes
    pub admin_psk: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let upstream_url = env::var("PORTAL_UPSTREAM_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000/api".to_string());

        let admin_psk = env::var("PORTAL_ADMIN_PSK")
            .ok()
            .filter(|key| !key.is_empty());

        let bind_addr = env::var("PORTAL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid PORTAL_BIND_ADDR format");

        let log_level = env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            upstream_url,
            admin_psk,
            bind_addr,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("PORTAL_UPSTREAM_URL");
        env::remove_var("PORTAL_ADMIN_PSK");
        env::remove_var("PORTAL_BIND_ADDR");
        env::remove_var("PORTAL_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.upstream_url, "http://127.0.0.1:3000/api");
        assert!(config.admin_psk.is_none());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }
}
