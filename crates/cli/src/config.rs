//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPCART_CATALOG_URL` - Catalog collection endpoint (default: `http://localhost:3001/produtos`)
//! - `SHOPCART_CATALOG_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `SHOPCART_CATALOG_CACHE_TTL_SECS` - Catalog read cache TTL (default: 300)
//! - `SHOPCART_CURRENCY` - Cart and price display currency (default: BRL)
//! - `SHOPCART_LOG_FORMAT` - `text` or `json` (default: text)
//! - `RUST_LOG` - Tracing filter directives

use std::time::Duration;

use shopcart_catalog::CatalogConfig;
use shopcart_catalog::config::DEFAULT_BASE_URL;
use shopcart_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct ShopcartConfig {
    /// Catalog backend settings
    pub catalog: CatalogConfig,
    /// Currency for cart totals and price display
    pub currency: CurrencyCode,
    /// Log output format
    pub log_format: LogFormat,
}

impl ShopcartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = Url::parse(&env_or("SHOPCART_CATALOG_URL", DEFAULT_BASE_URL))
            .map_err(|e| invalid("SHOPCART_CATALOG_URL", e))?;
        let timeout = parse_secs(
            "SHOPCART_CATALOG_TIMEOUT_SECS",
            &env_or("SHOPCART_CATALOG_TIMEOUT_SECS", "10"),
        )?;
        let cache_ttl = parse_secs(
            "SHOPCART_CATALOG_CACHE_TTL_SECS",
            &env_or("SHOPCART_CATALOG_CACHE_TTL_SECS", "300"),
        )?;
        let currency = env_or("SHOPCART_CURRENCY", "BRL")
            .parse::<CurrencyCode>()
            .map_err(|e| invalid("SHOPCART_CURRENCY", e))?;
        let log_format = match env_or("SHOPCART_LOG_FORMAT", "text")
            .to_ascii_lowercase()
            .as_str()
        {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(invalid(
                    "SHOPCART_LOG_FORMAT",
                    format!("expected 'text' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                timeout,
                cache_ttl,
            },
            currency,
            log_format,
        })
    }
}

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| invalid(key, e))
}
