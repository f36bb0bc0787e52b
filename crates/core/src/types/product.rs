//! Catalog product records.
//!
//! Field names on the wire follow the catalog backend's JSON schema
//! (`nome`, `preco`, `estoque`, ...). English aliases are accepted on input
//! so hand-written fixture files can use either spelling.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::serialize_amount_as_number;

/// A product as stored by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    /// Longer description shown on the detail page.
    #[serde(rename = "descricao", alias = "description", default)]
    pub description: Option<String>,
    /// Unit price in the store currency.
    #[serde(
        rename = "preco",
        alias = "price",
        serialize_with = "serialize_amount_as_number"
    )]
    pub price: Decimal,
    /// Units available for sale.
    #[serde(rename = "estoque", alias = "stock")]
    pub stock: u32,
    /// Product image URL.
    #[serde(rename = "urlImagem", alias = "image_url", default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Whether the product has no stock left.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.stock == 0
    }
}

/// Field names reported by [`ProductValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Description,
    Price,
    Stock,
    ImageUrl,
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::ImageUrl => "image_url",
        };
        f.write_str(name)
    }
}

/// A single failed check on a [`ProductDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// A required text field is empty.
    #[error("{0} is required")]
    Required(ProductField),
    /// The price is negative.
    #[error("price must be greater than or equal to zero")]
    NegativePrice,
}

impl ProductValidationError {
    /// The field the error refers to.
    #[must_use]
    pub const fn field(&self) -> ProductField {
        match self {
            Self::Required(field) => *field,
            Self::NegativePrice => ProductField::Price,
        }
    }
}

/// Request body for creating or replacing a product.
///
/// The backend assigns the id on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(rename = "descricao", alias = "description")]
    pub description: String,
    #[serde(
        rename = "preco",
        alias = "price",
        serialize_with = "serialize_amount_as_number"
    )]
    pub price: Decimal,
    #[serde(rename = "estoque", alias = "stock")]
    pub stock: u32,
    #[serde(rename = "urlImagem", alias = "image_url")]
    pub image_url: String,
}

impl ProductDraft {
    /// Check every field and collect all failures.
    ///
    /// Text fields must be non-blank and the price must not be negative.
    /// Stock is unsigned, so it is valid by construction.
    ///
    /// # Errors
    ///
    /// Returns every failed check, in field order.
    pub fn validate(&self) -> Result<(), Vec<ProductValidationError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ProductValidationError::Required(ProductField::Name));
        }
        if self.description.trim().is_empty() {
            errors.push(ProductValidationError::Required(ProductField::Description));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            errors.push(ProductValidationError::NegativePrice);
        }
        if self.image_url.trim().is_empty() {
            errors.push(ProductValidationError::Required(ProductField::ImageUrl));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Combine the draft with a backend-assigned id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: Some(self.description),
            price: self.price,
            stock: self.stock,
            image_url: Some(self.image_url),
        }
    }
}
