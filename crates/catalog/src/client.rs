//! REST catalog client.
//!
//! Talks to a JSON collection endpoint with one resource per product:
//!
//! | Operation | Request |
//! |---|---|
//! | list | `GET {base}` |
//! | get | `GET {base}/{id}` |
//! | create | `POST {base}` |
//! | update | `PUT {base}/{id}` |
//! | delete | `DELETE {base}/{id}` |
//!
//! Reads are cached (list and single products); any mutation clears the
//! cache.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shopcart_core::{Product, ProductDraft, ProductId};
use tracing::{debug, instrument};
use url::Url;

use crate::cache::{CacheKey, CacheValue};
use crate::config::CatalogConfig;
use crate::{CatalogError, Result};

/// Longest slice of a response body kept in errors and logs.
const BODY_PREVIEW_CHARS: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog REST backend.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot have path segments appended
    /// or the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// The collection endpoint.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// URL of a single product resource.
    ///
    /// The id is percent-encoded as one path segment.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if the base URL cannot carry
    /// path segments.
    pub fn product_url(&self, id: &ProductId) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    /// Send a request and decode the JSON response body.
    async fn execute<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response_text = self.send(method, url, body).await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&response_text),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Send a request and return the raw response body.
    async fn send<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.inner.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&response_text),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: preview(&response_text),
            });
        }

        Ok(response_text)
    }

    // =========================================================================
    // Read Methods
    // =========================================================================

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .execute::<(), _>(Method::GET, self.inner.base_url.clone(), None)
            .await?;

        debug!(count = products.len(), "Fetched product list");
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get one product.
    ///
    /// Served from a cached list when one is present, so a card grid that
    /// was just listed does not trigger a request per product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the backend has no such product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
            && let Some(product) = products.into_iter().find(|p| &p.id == id)
        {
            debug!("Product served from cached list");
            return Ok(product);
        }

        let url = self.product_url(id)?;
        let product: Product = self.execute::<(), _>(Method::GET, url, None).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Write Methods
    // =========================================================================

    /// Create a product. The backend assigns its id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] without sending anything if the
    /// draft fails validation, or an HTTP/parse error from the backend.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        draft.validate().map_err(CatalogError::Invalid)?;

        let product: Product = self
            .execute(Method::POST, self.inner.base_url.clone(), Some(draft))
            .await?;

        self.inner.cache.invalidate_all();
        debug!(product_id = %product.id, "Created product");
        Ok(product)
    }

    /// Replace a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] without sending anything if the
    /// draft fails validation, [`CatalogError::NotFound`] if the product does
    /// not exist, or an HTTP/parse error.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product> {
        draft.validate().map_err(CatalogError::Invalid)?;

        let url = self.product_url(id)?;
        let product: Product = self.execute(Method::PUT, url, Some(draft)).await?;

        self.inner.cache.invalidate_all();
        debug!("Updated product");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the product does not exist, or
    /// an HTTP error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let url = self.product_url(id)?;
        self.send::<()>(Method::DELETE, url, None).await?;

        self.inner.cache.invalidate_all();
        debug!("Deleted product");
        Ok(())
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
