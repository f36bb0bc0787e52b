//! Cart error types.

use shopcart_core::ProductId;
use thiserror::Error;

/// Reasons [`Cart::add_item`](crate::Cart::add_item) declines a request.
///
/// All are expected outcomes the caller is meant to surface to the user;
/// the cart is left untouched when either is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddRejected {
    /// The requested quantity was zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The line would hold more units than the product has in stock.
    #[error("only {available} of product {product_id} in stock, cart would hold {requested}")]
    ExceedsStock {
        /// Product that was being added.
        product_id: ProductId,
        /// Quantity the line would have held after the add.
        requested: u64,
        /// Stock reported by the product reference.
        available: u32,
    },

    /// The line or cart total would exceed what a `Decimal` can hold.
    #[error("adding {quantity} of product {product_id} would overflow the cart total")]
    TotalOverflow {
        /// Product that was being added.
        product_id: ProductId,
        /// Quantity the line would have held after the add.
        quantity: u32,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AddRejected::ExceedsStock {
            product_id: ProductId::parse("p1").unwrap(),
            requested: 3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "only 2 of product p1 in stock, cart would hold 3"
        );
        assert_eq!(
            AddRejected::ZeroQuantity.to_string(),
            "quantity must be at least 1"
        );
        assert_eq!(
            AddRejected::TotalOverflow {
                product_id: ProductId::parse("p1").unwrap(),
                quantity: 2,
            }
            .to_string(),
            "adding 2 of product p1 would overflow the cart total"
        );
    }
}
