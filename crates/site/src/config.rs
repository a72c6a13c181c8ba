//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SITE_BASE_URL` - Public URL for the site
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_CONTENT_DIR` - Markdown page directory (default: crates/site/content)
//! - `SITE_STATIC_DIR` - Static asset directory (default: crates/site/static)
//! - `MEDIA_DIR` - Uploaded media served at `/media` (default: media)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use lumen_core::env::{self, ConfigError, SentrySettings};
use secrecy::SecretString;

/// Public site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, without a trailing slash
    pub base_url: String,
    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
    pub media_dir: PathBuf,
    pub sentry: SentrySettings,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: env::database_url("SITE_DATABASE_URL")?,
            host: env::parse_or("SITE_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env::parse_or("SITE_PORT", 3000)?,
            base_url: env::base_url("SITE_BASE_URL")?,
            content_dir: env::or_default("SITE_CONTENT_DIR", "crates/site/content").into(),
            static_dir: env::or_default("SITE_STATIC_DIR", "crates/site/static").into(),
            media_dir: env::or_default("MEDIA_DIR", "media").into(),
            sentry: SentrySettings::from_env(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SiteConfig {
        SiteConfig {
            database_url: SecretString::from("postgres://localhost/lumen"),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            base_url: base_url.to_owned(),
            content_dir: PathBuf::from("content"),
            static_dir: PathBuf::from("static"),
            media_dir: PathBuf::from("media"),
            sentry: SentrySettings::default(),
        }
    }

    #[test]
    fn test_socket_addr() {
        assert_eq!(config("http://localhost").socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_is_secure() {
        assert!(config("https://lumen.studio").is_secure());
        assert!(!config("http://localhost:3000").is_secure());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let debug = format!("{:?}", config("http://localhost"));
        assert!(!debug.contains("postgres://localhost/lumen"));
    }
}
