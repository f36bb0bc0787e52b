//! Cart session replay.
//!
//! Runs a scripted list of cart operations through a fresh [`CartSession`]
//! and reports what each one did. Useful for reproducing stock-limit
//! behavior against real catalog data.
//!
//! # Operations file
//!
//! ```yaml
//! - op: add
//!   product: 1
//!   quantity: 2      # optional, defaults to 1
//! - op: increment
//!   product: 1
//! - op: decrement
//!   product: 1
//! - op: remove
//!   product: 1
//! - op: clear
//! ```
//!
//! # Catalog file
//!
//! A JSON or YAML list of product records, in the backend's format.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shopcart_cart::{AddRejected, AddedItem, Cart, CartSession, LineItem};
use shopcart_catalog::{CatalogClient, CatalogError, InMemoryCatalog};
use shopcart_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::catalog::emit;
use crate::config::ShopcartConfig;

/// Errors that can occur while replaying a session.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A YAML file could not be parsed.
    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A JSON file could not be parsed.
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Loading the remote catalog failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// An `add` step names a product the catalog does not have.
    #[error("Step {step}: product {product_id} is not in the catalog")]
    UnknownProduct { step: usize, product_id: ProductId },

    /// Rendering the final cart failed.
    #[error("Failed to render cart: {0}")]
    Render(serde_json::Error),
}

/// Where replay takes its products from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    File(PathBuf),
    Remote,
}

/// One scripted cart operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartOp {
    Add {
        product: ProductId,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    Increment {
        product: ProductId,
    },
    Decrement {
        product: ProductId,
    },
    Remove {
        product: ProductId,
    },
    Clear,
}

const fn default_quantity() -> u32 {
    1
}

impl fmt::Display for CartOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { product, quantity } => write!(f, "add {product} x{quantity}"),
            Self::Increment { product } => write!(f, "increment {product}"),
            Self::Decrement { product } => write!(f, "decrement {product}"),
            Self::Remove { product } => write!(f, "remove {product}"),
            Self::Clear => f.write_str("clear"),
        }
    }
}

/// What a step did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Added(AddedItem),
    Rejected(AddRejected),
    Changed,
    Unchanged,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(AddedItem {
                quantity,
                merged: true,
            }) => write!(f, "merged, now {quantity}"),
            Self::Added(AddedItem { quantity, .. }) => write!(f, "added, now {quantity}"),
            Self::Rejected(reason) => write!(f, "rejected: {reason}"),
            Self::Changed => f.write_str("ok"),
            Self::Unchanged => f.write_str("ignored"),
        }
    }
}

/// Report line for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based position in the operations file.
    pub step: usize,
    pub op: CartOp,
    pub outcome: StepOutcome,
    pub version: u64,
}

/// Final cart state for JSON output.
#[derive(Debug, Serialize)]
struct CartSummary<'a> {
    session_id: String,
    version: u64,
    currency: &'a str,
    items: &'a [LineItem],
    item_count: u64,
    total: rust_decimal::Decimal,
    total_display: String,
}

/// Replay `ops` against `catalog` in a fresh session and print a report.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, the remote catalog
/// cannot be loaded, or an `add` names an unknown product.
pub async fn replay(
    config: &ShopcartConfig,
    source: CatalogSource,
    ops_path: &Path,
    json: bool,
) -> Result<(), ReplayError> {
    let catalog = match source {
        CatalogSource::File(path) => load_catalog_file(&path)?,
        CatalogSource::Remote => {
            let client = CatalogClient::new(&config.catalog)?;
            InMemoryCatalog::new(client.list_products().await?)
        }
    };
    info!(products = catalog.len(), "Catalog loaded");

    let ops: Vec<CartOp> = parse_yaml(ops_path)?;
    info!(steps = ops.len(), "Operations loaded");

    let mut session = CartSession::start(config.currency);
    session.cart_mut().subscribe(|event| {
        debug!(version = event.version, change = ?event.change, "Cart changed");
    });

    let reports = apply_ops(&catalog, &ops, session.cart_mut())?;
    for report in &reports {
        if let StepOutcome::Rejected(reason) = &report.outcome {
            warn!(step = report.step, %reason, "Add rejected");
        }
    }

    if json {
        emit(&render_json(&session)?);
    } else {
        let mut lines: Vec<String> = reports.iter().map(render_step).collect();
        lines.push(render_cart(session.cart()));
        emit(&lines.join("\n"));
    }

    let cart = session.end();
    info!(lines = cart.len(), total = %cart.total_price(), "Replay finished");
    Ok(())
}

/// Apply every operation in order.
///
/// Stops at the first `add` whose product is missing from the catalog;
/// steps before it remain applied.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownProduct`] for such an `add`.
pub fn apply_ops(
    catalog: &InMemoryCatalog,
    ops: &[CartOp],
    cart: &mut Cart,
) -> Result<Vec<StepReport>, ReplayError> {
    let mut reports = Vec::with_capacity(ops.len());

    for (index, op) in ops.iter().enumerate() {
        let step = index + 1;
        let outcome = match op {
            CartOp::Add { product, quantity } => {
                let record = lookup(catalog, product, step)?;
                match cart.add_item(record, *quantity) {
                    Ok(added) => StepOutcome::Added(added),
                    Err(reason) => StepOutcome::Rejected(reason),
                }
            }
            CartOp::Increment { product } => changed(cart.increment_quantity(product)),
            CartOp::Decrement { product } => changed(cart.decrement_quantity(product)),
            CartOp::Remove { product } => changed(cart.remove_item(product)),
            CartOp::Clear => changed(cart.clear()),
        };

        reports.push(StepReport {
            step,
            op: op.clone(),
            outcome,
            version: cart.version(),
        });
    }

    Ok(reports)
}

fn lookup<'a>(
    catalog: &'a InMemoryCatalog,
    product_id: &ProductId,
    step: usize,
) -> Result<&'a Product, ReplayError> {
    catalog
        .find(product_id)
        .ok_or_else(|| ReplayError::UnknownProduct {
            step,
            product_id: product_id.clone(),
        })
}

const fn changed(did_change: bool) -> StepOutcome {
    if did_change {
        StepOutcome::Changed
    } else {
        StepOutcome::Unchanged
    }
}

fn render_step(report: &StepReport) -> String {
    format!(
        "{:>3}. {:<24} {} (v{})",
        report.step,
        report.op.to_string(),
        report.outcome,
        report.version
    )
}

fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return format!("\nCart is empty\nTotal: {}", cart.total_price());
    }

    let mut lines = vec![String::new(), "Cart:".to_string()];
    for item in cart {
        let ceiling = if item.at_stock_ceiling() {
            " [max stock]"
        } else {
            ""
        };
        lines.push(format!(
            "  {} x{} @ {} = {}{ceiling}",
            display_name(item),
            item.quantity(),
            shopcart_core::Price::new(item.unit_price(), cart.currency()),
            shopcart_core::Price::new(item.line_total(), cart.currency()),
        ));
    }
    lines.push(format!(
        "Total: {} ({} items)",
        cart.total_price(),
        cart.item_count()
    ));
    lines.join("\n")
}

fn display_name(item: &LineItem) -> String {
    if item.name().is_empty() {
        item.product_id().to_string()
    } else {
        format!("{} ({})", item.name(), item.product_id())
    }
}

fn render_json(session: &CartSession) -> Result<String, ReplayError> {
    let cart = session.cart();
    let items = cart.items();
    let summary = CartSummary {
        session_id: session.id().to_string(),
        version: cart.version(),
        currency: cart.currency().code(),
        items: &items,
        item_count: cart.item_count(),
        total: cart.total(),
        total_display: cart.total_price().display(),
    };
    serde_json::to_string_pretty(&summary).map_err(ReplayError::Render)
}

fn load_catalog_file(path: &Path) -> Result<InMemoryCatalog, ReplayError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let products: Vec<Product> = if is_json {
        let content = read(path)?;
        serde_json::from_str(&content).map_err(|source| ReplayError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        parse_yaml(path)?
    };

    Ok(InMemoryCatalog::new(products))
}

fn parse_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ReplayError> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|source| ReplayError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopcart_core::CurrencyCode;

    use super::*;

    fn catalog() -> InMemoryCatalog {
        serde_yaml::from_str::<Vec<Product>>(
            r"
- id: 1
  nome: Camiseta
  preco: 89.9
  estoque: 2
- id: 2
  nome: Notebook
  preco: 8500
  estoque: 1
",
        )
        .map(InMemoryCatalog::new)
        .unwrap()
    }

    fn ops(yaml: &str) -> Vec<CartOp> {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[test]
    fn test_parse_ops() {
        let parsed = ops(
            r#"
- op: add
  product: 1
- op: add
  product: "2"
  quantity: 3
- op: increment
  product: 1
- op: clear
"#,
        );
        assert_eq!(
            parsed,
            vec![
                CartOp::Add {
                    product: id("1"),
                    quantity: 1
                },
                CartOp::Add {
                    product: id("2"),
                    quantity: 3
                },
                CartOp::Increment { product: id("1") },
                CartOp::Clear,
            ]
        );
    }

    #[test]
    fn test_apply_ops_reports_each_step() {
        let mut cart = Cart::new(CurrencyCode::BRL);
        let reports = apply_ops(
            &catalog(),
            &ops(
                r"
- op: add
  product: 1
- op: add
  product: 1
  quantity: 2
- op: increment
  product: 1
- op: increment
  product: 1
- op: decrement
  product: 1
- op: remove
  product: 1
- op: remove
  product: 1
",
            ),
            &mut cart,
        )
        .unwrap();

        let outcomes: Vec<String> = reports.iter().map(|r| r.outcome.to_string()).collect();
        assert_eq!(
            outcomes,
            vec![
                "added, now 1",
                "rejected: only 2 of product 1 in stock, cart would hold 3",
                "ok",
                "ignored",
                "ok",
                "ok",
                "ignored",
            ]
        );
        let versions: Vec<u64> = reports.iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![1, 1, 2, 2, 3, 4, 4]);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_apply_ops_unknown_product() {
        let mut cart = Cart::default();
        let err = apply_ops(
            &catalog(),
            &ops(
                r"
- op: add
  product: 2
- op: add
  product: 99
",
            ),
            &mut cart,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ReplayError::UnknownProduct { step: 2, ref product_id } if product_id.as_str() == "99"
        ));
        // The first step stays applied.
        assert_eq!(cart.quantity_of(&id("2")), 1);
    }

    #[test]
    fn test_render_cart() {
        let mut cart = Cart::new(CurrencyCode::BRL);
        apply_ops(
            &catalog(),
            &ops(
                r"
- op: add
  product: 1
  quantity: 2
- op: add
  product: 2
",
            ),
            &mut cart,
        )
        .unwrap();

        assert_eq!(cart.total(), Decimal::new(86798, 1));
        assert_eq!(
            render_cart(&cart),
            "\nCart:\n  Camiseta (1) x2 @ R$ 89,90 = R$ 179,80 [max stock]\n  Notebook (2) x1 @ R$ 8.500,00 = R$ 8.500,00 [max stock]\nTotal: R$ 8.679,80 (3 items)"
        );
    }

    #[test]
    fn test_render_empty_cart() {
        let cart = Cart::new(CurrencyCode::USD);
        assert_eq!(render_cart(&cart), "\nCart is empty\nTotal: $0.00");
    }

    #[test]
    fn test_render_json() {
        let mut session = CartSession::start(CurrencyCode::BRL);
        apply_ops(
            &catalog(),
            &ops("- op: add\n  product: 1\n"),
            session.cart_mut(),
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&render_json(&session).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["currency"], "BRL");
        assert_eq!(value["item_count"], 1);
        assert_eq!(value["total_display"], "R$ 89,90");
        assert_eq!(value["items"][0]["product_id"], "1");
        assert_eq!(value["items"][0]["quantity"], 1);
    }
}
