//! Catalog management commands.
//!
//! # Usage
//!
//! ```bash
//! shopcart catalog list
//! shopcart catalog show 3
//! shopcart catalog add -n "Mug" -d "Ceramic" -p 29.90 -s 12 -i https://img.example/mug.png
//! shopcart catalog update 3 -n "Mug" -d "Ceramic" -p 24.90 -s 10 -i https://img.example/mug.png
//! shopcart catalog delete 3
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPCART_CATALOG_URL` - Catalog collection endpoint

use shopcart_catalog::{CatalogClient, CatalogError};
use shopcart_core::{CurrencyCode, Price, Product, ProductDraft, ProductId};
use tracing::info;

use crate::config::ShopcartConfig;

/// Print every product, one per line.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn list(config: &ShopcartConfig) -> Result<(), CatalogError> {
    let client = CatalogClient::new(&config.catalog)?;
    let products = client.list_products().await?;

    info!(count = products.len(), "Loaded catalog");
    let lines: Vec<String> = products
        .iter()
        .map(|product| summary_line(product, config.currency))
        .collect();
    emit(&lines.join("\n"));
    Ok(())
}

/// Print one product in detail.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] if the product does not exist.
pub async fn show(config: &ShopcartConfig, id: &ProductId) -> Result<(), CatalogError> {
    let client = CatalogClient::new(&config.catalog)?;
    let product = client.get_product(id).await?;
    emit(&details(&product, config.currency));
    Ok(())
}

/// Create a product and print the stored record.
///
/// # Errors
///
/// Returns [`CatalogError::Invalid`] if the draft fails validation.
pub async fn add(config: &ShopcartConfig, draft: &ProductDraft) -> Result<(), CatalogError> {
    let client = CatalogClient::new(&config.catalog)?;
    let product = client.create_product(draft).await?;
    info!(product_id = %product.id, "Product created");
    emit(&details(&product, config.currency));
    Ok(())
}

/// Replace a product and print the stored record.
///
/// # Errors
///
/// Returns [`CatalogError::Invalid`] or [`CatalogError::NotFound`].
pub async fn update(
    config: &ShopcartConfig,
    id: &ProductId,
    draft: &ProductDraft,
) -> Result<(), CatalogError> {
    let client = CatalogClient::new(&config.catalog)?;
    let product = client.update_product(id, draft).await?;
    info!(product_id = %product.id, "Product updated");
    emit(&details(&product, config.currency));
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] if the product does not exist.
pub async fn delete(config: &ShopcartConfig, id: &ProductId) -> Result<(), CatalogError> {
    let client = CatalogClient::new(&config.catalog)?;
    client.delete_product(id).await?;
    info!(product_id = %id, "Product deleted");
    Ok(())
}

fn stock_label(product: &Product) -> String {
    if product.is_sold_out() {
        "sold out".to_string()
    } else {
        format!("{} in stock", product.stock)
    }
}

fn summary_line(product: &Product, currency: CurrencyCode) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        product.id,
        product.name,
        Price::new(product.price, currency),
        stock_label(product)
    )
}

fn details(product: &Product, currency: CurrencyCode) -> String {
    let mut out = format!(
        "{} ({})\n  price: {}\n  stock: {}",
        product.name,
        product.id,
        Price::new(product.price, currency),
        stock_label(product)
    );
    if let Some(description) = &product.description {
        out.push_str(&format!("\n  description: {description}"));
    }
    if let Some(image_url) = &product.image_url {
        out.push_str(&format!("\n  image: {image_url}"));
    }
    out
}

#[allow(clippy::print_stdout)]
pub(crate) fn emit(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::parse("1").unwrap(),
            name: "Camiseta".to_string(),
            description: Some("Algodão".to_string()),
            price: Decimal::new(8990, 2),
            stock,
            image_url: None,
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(&product(5), CurrencyCode::BRL),
            "1\tCamiseta\tR$ 89,90\t5 in stock"
        );
        assert_eq!(
            summary_line(&product(0), CurrencyCode::USD),
            "1\tCamiseta\t$89.90\tsold out"
        );
    }

    #[test]
    fn test_details() {
        let text = details(&product(2), CurrencyCode::BRL);
        assert_eq!(
            text,
            "Camiseta (1)\n  price: R$ 89,90\n  stock: 2 in stock\n  description: Algodão"
        );
    }
}
