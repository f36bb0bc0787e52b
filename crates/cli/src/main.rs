//! Shopcart CLI - catalog management and cart session replay.
//!
//! # Usage
//!
//! ```bash
//! # List products from the catalog backend
//! shopcart catalog list
//!
//! # Show one product
//! shopcart catalog show 3
//!
//! # Create a product
//! shopcart catalog add --name "Mug" --description "Ceramic" --price 29.90 \
//!     --stock 12 --image-url https://img.example/mug.png
//!
//! # Replay a scripted cart session against a catalog file
//! shopcart cart replay --catalog catalog.yaml --ops session.yaml
//!
//! # ...or against the live catalog, printing the final cart as JSON
//! shopcart cart replay --remote --ops session.yaml --json
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show, create, update and delete products
//! - `cart replay` - Run cart operations from a file and report each outcome

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use shopcart_core::{ProductDraft, ProductId};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{LogFormat, ShopcartConfig};

#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about = "Shopcart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Work with cart sessions
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all products
    List,
    /// Show a single product
    Show {
        /// Product id
        id: ProductId,
    },
    /// Create a product
    Add(ProductArgs),
    /// Replace a product
    Update {
        /// Product id
        id: ProductId,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: ProductId,
    },
}

#[derive(Args)]
struct ProductArgs {
    /// Display name
    #[arg(short, long)]
    name: String,

    /// Description
    #[arg(short, long)]
    description: String,

    /// Unit price (e.g. 89.90)
    #[arg(short, long)]
    price: Decimal,

    /// Units in stock
    #[arg(short, long)]
    stock: u32,

    /// Image URL
    #[arg(short, long)]
    image_url: String,
}

impl From<ProductArgs> for ProductDraft {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            stock: args.stock,
            image_url: args.image_url,
        }
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Replay cart operations from a YAML file
    Replay {
        /// Catalog file (`.json`, `.yaml` or `.yml`)
        #[arg(short, long, required_unless_present = "remote", conflicts_with = "remote")]
        catalog: Option<PathBuf>,

        /// Load the catalog from the configured backend instead of a file
        #[arg(long)]
        remote: bool,

        /// Operations file
        #[arg(short, long)]
        ops: PathBuf,

        /// Print the final cart as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopcart=info,shopcart_cart=info,shopcart_catalog=info".into());

    // Logs go to stderr so command output on stdout stays machine-readable
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let config = match ShopcartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ShopcartConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(config).await?,
            CatalogAction::Show { id } => commands::catalog::show(config, &id).await?,
            CatalogAction::Add(product) => {
                commands::catalog::add(config, &product.into()).await?;
            }
            CatalogAction::Update { id, product } => {
                commands::catalog::update(config, &id, &product.into()).await?;
            }
            CatalogAction::Delete { id } => commands::catalog::delete(config, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Replay {
                catalog,
                remote,
                ops,
                json,
            } => {
                let source = match catalog {
                    Some(path) if !remote => commands::cart::CatalogSource::File(path),
                    _ => commands::cart::CatalogSource::Remote,
                };
                commands::cart::replay(config, source, &ops, json).await?;
            }
        },
    }
    Ok(())
}
