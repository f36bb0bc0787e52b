//! One product's entry in the cart.

use rust_decimal::Decimal;
use serde::Serialize;
use shopcart_core::ProductId;

use crate::product::CartProduct;

/// A product line: quantity plus the product fields copied at add time.
///
/// Price, stock, name and image are snapshots. They are not re-synced when
/// the catalog changes; merging more units into an existing line only
/// replaces its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    product_id: ProductId,
    name: String,
    image_url: Option<String>,
    unit_price: Decimal,
    quantity: u32,
    stock_quantity: u32,
}

impl LineItem {
    pub(crate) fn from_product<P: CartProduct + ?Sized>(product: &P, quantity: u32) -> Self {
        Self {
            product_id: product.product_id().clone(),
            name: product.display_name().to_owned(),
            image_url: product.image_url().map(str::to_owned),
            unit_price: product.unit_price(),
            quantity,
            stock_quantity: product.stock_quantity(),
        }
    }

    pub(crate) fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Unit price copied from the product when the line was created.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stock copied from the product when the line was created.
    ///
    /// This is the ceiling [`Cart::increment_quantity`](crate::Cart::increment_quantity)
    /// checks against.
    #[must_use]
    pub const fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Whether one more unit fits under the stored stock.
    #[must_use]
    pub fn can_increment(&self) -> bool {
        self.quantity
            .checked_add(1)
            .is_some_and(|next| next <= self.stock_quantity)
    }

    /// Whether the quantity is above the floor of 1.
    #[must_use]
    pub const fn can_decrement(&self) -> bool {
        self.quantity > 1
    }

    /// Whether the line already holds every unit in stock.
    #[must_use]
    pub const fn at_stock_ceiling(&self) -> bool {
        self.quantity >= self.stock_quantity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopcart_core::Product;

    use super::*;

    fn line(quantity: u32, stock: u32) -> LineItem {
        let product = Product {
            id: ProductId::parse("7").unwrap(),
            name: "Caneca".to_string(),
            description: None,
            price: Decimal::new(2990, 2),
            stock,
            image_url: None,
        };
        LineItem::from_product(&product, quantity)
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(3, 5).line_total(), Decimal::new(8970, 2));
    }

    #[test]
    fn test_bounds() {
        let single = line(1, 2);
        assert!(single.can_increment());
        assert!(!single.can_decrement());
        assert!(!single.at_stock_ceiling());

        let full = single.with_quantity(2);
        assert!(!full.can_increment());
        assert!(full.can_decrement());
        assert!(full.at_stock_ceiling());
    }

    #[test]
    fn test_can_increment_at_u32_max() {
        assert!(!line(u32::MAX, u32::MAX).can_increment());
    }

    #[test]
    fn test_serialize() {
        let value = serde_json::to_value(line(2, 4)).unwrap();
        assert_eq!(value["product_id"], "7");
        assert_eq!(value["name"], "Caneca");
        assert_eq!(value["image_url"], serde_json::Value::Null);
        assert_eq!(value["unit_price"], "29.90");
        assert_eq!(value["quantity"], 2);
        assert_eq!(value["stock_quantity"], 4);
    }
}
