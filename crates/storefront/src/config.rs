//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_LOCALES` - Comma-separated supported locales (default: en,es,hi)
//! - `STOREFRONT_DEFAULT_LOCALE` - Fallback locale (default: en)
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON file
//!   (default: crates/storefront/content/products.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (default: development)
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate, 0.0-1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use emporium_core::{LocaleSettings, PricingPolicy};
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_PATH: &str = "crates/storefront/content/products.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Supported locales and the fallback
    pub locales: LocaleSettings,
    /// Path to the product catalog JSON
    pub catalog_path: PathBuf,
    /// Tax and shipping rules
    pub pricing: PricingPolicy,
    /// Error tracking
    pub sentry: SentryConfig,
}

/// Sentry client settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: String,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: "development".to_string(),
            sample_rate: 1.0,
            traces_sample_rate: 0.1,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .get_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("STOREFRONT_HOST", e))?;
        let port = env
            .get_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| invalid("STOREFRONT_PORT", e))?;

        let base_url = env.get_required("STOREFRONT_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| invalid("STOREFRONT_BASE_URL", e))?;

        let locales = LocaleSettings::parse(
            &env.get_or_default("STOREFRONT_LOCALES", "en,es,hi"),
            &env.get_or_default("STOREFRONT_DEFAULT_LOCALE", "en"),
        )
        .map_err(|e| invalid("STOREFRONT_LOCALES", e))?;

        let catalog_path =
            PathBuf::from(env.get_or_default("STOREFRONT_CATALOG_PATH", DEFAULT_CATALOG_PATH));

        let sentry = SentryConfig {
            dsn: env.get_optional("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            environment: env.get_or_default("SENTRY_ENVIRONMENT", "development"),
            sample_rate: env.get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: env.get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            locales,
            catalog_path,
            pricing: PricingPolicy::default(),
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required environment variable.
    fn get_required(&self, key: &str) -> Result<String, ConfigError> {
        self.get_optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional environment variable.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get an environment variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a sample rate in `0.0..=1.0`.
    fn get_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.get_optional(key) else {
            return Ok(default);
        };
        let rate = raw.parse::<f32>().map_err(|e| invalid(key, e))?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(invalid(key, format!("{rate} is outside 0.0..=1.0")))
        }
    }
}

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}
