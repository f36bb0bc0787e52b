//! Catalog client configuration.

use std::time::Duration;

use url::Url;

/// Default backend collection URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/produtos";

/// Catalog backend settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Collection endpoint; product `id` lives at `{base_url}/{id}`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long list and product reads stay cached.
    pub cache_ttl: Duration,
}

impl Default for CatalogConfig {
    // DEFAULT_BASE_URL is a fixed literal; parsing it is covered by tests.
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default catalog URL is valid"),
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        }
    }
}
