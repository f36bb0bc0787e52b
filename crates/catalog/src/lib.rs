//! Product catalog collaborators for the cart.
//!
//! # Architecture
//!
//! - [`CatalogClient`] talks to the JSON REST backend
//!   (`GET/POST/PUT/DELETE {base}/{id}`), caching reads via `moka`
//! - [`InMemoryCatalog`] holds a fixed product list for offline use and tests
//!
//! The cart never calls either of these; callers look a product up and hand
//! the record to [`shopcart_cart`]-style operations themselves.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopcart_catalog::{CatalogClient, CatalogConfig};
//!
//! let client = CatalogClient::new(&CatalogConfig::default())?;
//! let products = client.list_products().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cache;
mod client;
pub mod config;
mod memory;

pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use memory::InMemoryCatalog;

use shopcart_core::ProductValidationError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Base URL cannot carry path segments.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Draft failed validation; nothing was sent.
    #[error("Invalid product: {}", format_validation_errors(.0))]
    Invalid(Vec<ProductValidationError>),
}

fn format_validation_errors(errors: &[ProductValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
