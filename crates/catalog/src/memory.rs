//! In-memory catalog.

use shopcart_core::{Product, ProductId};

/// A fixed product list, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Build a catalog from a product list.
    ///
    /// Later entries replace earlier ones with the same id.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        products.into_iter().collect()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Insert or replace a product, returning the replaced record.
    pub fn upsert(&mut self, product: Product) -> Option<Product> {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => Some(std::mem::replace(slot, product)),
            None => {
                self.products.push(product);
                None
            }
        }
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == product_id)?;
        Some(self.products.remove(index))
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Self::default();
        for product in iter {
            catalog.upsert(product);
        }
        catalog
    }
}
