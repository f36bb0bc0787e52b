//! Integration tests for Shopcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart walkthroughs against a catalog
//! - `cart_properties` - Property tests for the cart invariants
//! - `catalog_client` - REST client against a local stub backend
//!
//! Nothing here needs a running catalog service; [`StubBackend`] is a small
//! `axum` app answering from a canned route table on a loopback port.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use rust_decimal::Decimal;
use shopcart_catalog::CatalogConfig;
use shopcart_core::{Product, ProductId};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

// =============================================================================
// Fixtures
// =============================================================================

/// A catalog product with a whole-unit price.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
pub fn product(id: &str, name: &str, price: i64, stock: u32) -> Product {
    Product {
        id: ProductId::parse(id).expect("fixture ids are not blank"),
        name: name.to_string(),
        description: None,
        price: Decimal::new(price, 0),
        stock,
        image_url: None,
    }
}

/// Parse a fixture product id.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
pub fn id(id: &str) -> ProductId {
    ProductId::parse(id).expect("fixture ids are not blank")
}

// =============================================================================
// Stub backend
// =============================================================================

/// A request the stub received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Canned response for one `METHOD /path` route.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Catalog backend stand-in answering from a fixed route table.
///
/// Unknown routes get a 404 with an empty JSON object. The server task is
/// aborted when the stub is dropped.
#[derive(Debug)]
pub struct StubBackend {
    base_url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: JoinHandle<std::io::Result<()>>,
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, StubResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubBackend {
    /// Bind a loopback port and start serving in the background.
    ///
    /// Routes are keyed by `"METHOD /path"`, e.g. `"GET /produtos/1"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(routes: HashMap<String, StubResponse>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/produtos"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(routes),
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(respond).with_state(state);

        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self {
            base_url,
            requests,
            server,
        })
    }

    /// Collection endpoint served by this stub.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client configuration pointed at this stub.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(60),
        }
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn respond(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let key = format!("{method} {}", uri.path());
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            body,
        });

    match state.routes.get(&key) {
        Some(response) => (
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, "application/json")],
            response.body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response(),
    }
}
