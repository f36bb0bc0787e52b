//! The product reference the cart reads from.

use rust_decimal::Decimal;
use shopcart_core::{Product, ProductId};

/// Anything the cart can add: a catalog record, a view model, a test fixture.
///
/// The cart trusts these values as given at call time and copies them into
/// the line item; it never calls back into the catalog.
pub trait CartProduct {
    /// Catalog identifier; lines are unique by this id.
    fn product_id(&self) -> &ProductId;

    /// Current unit price. Must not be negative.
    fn unit_price(&self) -> Decimal;

    /// Units currently available for sale.
    fn stock_quantity(&self) -> u32;

    /// Name copied onto the line for display.
    fn display_name(&self) -> &str {
        ""
    }

    /// Image URL copied onto the line for display.
    fn image_url(&self) -> Option<&str> {
        None
    }
}

impl CartProduct for Product {
    fn product_id(&self) -> &ProductId {
        &self.id
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn stock_quantity(&self) -> u32 {
        self.stock
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}
