//! The cart state manager.

use std::sync::Arc;

use rust_decimal::Decimal;
use shopcart_core::{CurrencyCode, Price, ProductId};
use tracing::debug;

use crate::error::AddRejected;
use crate::events::{CartChange, CartEvent, Subscribers, SubscriptionId};
use crate::line_item::LineItem;
use crate::product::CartProduct;

/// Result of a successful [`Cart::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedItem {
    /// Quantity the line holds after the add.
    pub quantity: u32,
    /// `true` if the units were merged into an existing line.
    pub merged: bool,
}

/// A shopping cart for one session.
///
/// Items are held as an immutable snapshot. Every successful mutation builds
/// a complete new snapshot and swaps it in, so a snapshot obtained from
/// [`Cart::items`] never changes underneath its holder.
///
/// Invariants, upheld by every operation:
/// - `1 <= quantity <= stock_quantity` for every line
/// - at most one line per product id
#[derive(Debug, Default)]
pub struct Cart {
    items: Arc<[LineItem]>,
    currency: CurrencyCode,
    version: u64,
    subscribers: Subscribers,
}

impl Cart {
    /// Create an empty cart priced in `currency`.
    #[must_use]
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            ..Self::default()
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// A product already in the cart has the units merged into its line;
    /// otherwise a new line is appended with the product's price, stock,
    /// name and image copied in.
    ///
    /// # Errors
    ///
    /// Returns [`AddRejected::ZeroQuantity`] for a zero quantity and
    /// [`AddRejected::ExceedsStock`] when the resulting line would exceed
    /// `product.stock_quantity()`, or [`AddRejected::TotalOverflow`] when
    /// the line or cart total would not fit in a `Decimal`. The cart is
    /// unchanged in every case.
    pub fn add_item<P: CartProduct + ?Sized>(
        &mut self,
        product: &P,
        quantity: u32,
    ) -> Result<AddedItem, AddRejected> {
        let product_id = product.product_id();
        if quantity == 0 {
            debug!(%product_id, "Rejected add of zero units");
            return Err(AddRejected::ZeroQuantity);
        }

        let available = product.stock_quantity();
        let existing = self.position(product_id);
        let current = existing
            .and_then(|index| self.items.get(index))
            .map_or(0, LineItem::quantity);
        let requested = u64::from(current) + u64::from(quantity);

        if requested > u64::from(available) {
            debug!(
                %product_id,
                requested,
                available,
                "Rejected add beyond stock"
            );
            return Err(AddRejected::ExceedsStock {
                product_id: product_id.clone(),
                requested,
                available,
            });
        }

        // requested <= available, so it fits in u32
        let new_quantity = current + quantity;

        let unit_price = existing
            .and_then(|index| self.items.get(index))
            .map_or_else(|| product.unit_price(), LineItem::unit_price);
        if self.total_with_line(existing, unit_price, new_quantity).is_none() {
            debug!(%product_id, quantity = new_quantity, "Rejected add that overflows total");
            return Err(AddRejected::TotalOverflow {
                product_id: product_id.clone(),
                quantity: new_quantity,
            });
        }

        match existing {
            Some(index) => {
                let items = self
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        if i == index {
                            item.with_quantity(new_quantity)
                        } else {
                            item.clone()
                        }
                    })
                    .collect();
                self.commit(
                    items,
                    CartChange::QuantityChanged {
                        product_id: product_id.clone(),
                        from: current,
                        to: new_quantity,
                    },
                );
            }
            None => {
                let items = self
                    .items
                    .iter()
                    .cloned()
                    .chain(std::iter::once(LineItem::from_product(product, quantity)))
                    .collect();
                self.commit(
                    items,
                    CartChange::Added {
                        product_id: product_id.clone(),
                        quantity,
                    },
                );
            }
        }

        debug!(%product_id, quantity = new_quantity, "Added to cart");
        Ok(AddedItem {
            quantity: new_quantity,
            merged: existing.is_some(),
        })
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`Cart::add_item`].
    pub fn add_one<P: CartProduct + ?Sized>(
        &mut self,
        product: &P,
    ) -> Result<AddedItem, AddRejected> {
        self.add_item(product, 1)
    }

    /// Add one unit to the line for `product_id`.
    ///
    /// Does nothing if the product is not in the cart, the line already
    /// holds its stored stock quantity, or the cart total would overflow.
    /// Returns whether the cart changed.
    pub fn increment_quantity(&mut self, product_id: &ProductId) -> bool {
        let Some(item) = self.get(product_id) else {
            return false;
        };
        if !item.can_increment() {
            debug!(%product_id, quantity = item.quantity(), "Increment ignored at stock ceiling");
            return false;
        }
        let next = item.quantity() + 1;
        let unit_price = item.unit_price();
        if self
            .total_with_line(self.position(product_id), unit_price, next)
            .is_none()
        {
            debug!(%product_id, quantity = next, "Increment ignored, total would overflow");
            return false;
        }
        self.set_quantity(product_id, next)
    }

    /// Remove one unit from the line for `product_id`.
    ///
    /// Does nothing if the product is not in the cart or the line holds a
    /// single unit; removal only happens through [`Cart::remove_item`].
    /// Returns whether the cart changed.
    pub fn decrement_quantity(&mut self, product_id: &ProductId) -> bool {
        let Some(item) = self.get(product_id) else {
            return false;
        };
        if !item.can_decrement() {
            return false;
        }
        let next = item.quantity() - 1;
        self.set_quantity(product_id, next)
    }

    /// Remove the line for `product_id`, if present.
    ///
    /// Returns whether the cart changed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        if self.position(product_id).is_none() {
            return false;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.product_id() != product_id)
            .cloned()
            .collect();
        self.commit(
            items,
            CartChange::Removed {
                product_id: product_id.clone(),
            },
        );
        debug!(%product_id, "Removed from cart");
        true
    }

    /// Remove every line.
    ///
    /// Returns whether the cart changed.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let removed = self.items.len();
        self.commit(Vec::new(), CartChange::Cleared { removed });
        debug!(removed, "Cleared cart");
        true
    }

    fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        let mut from = None;
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.product_id() == product_id {
                    from = Some(item.quantity());
                    item.with_quantity(quantity)
                } else {
                    item.clone()
                }
            })
            .collect();

        let Some(from) = from else {
            return false;
        };
        self.commit(
            items,
            CartChange::QuantityChanged {
                product_id: product_id.clone(),
                from,
                to: quantity,
            },
        );
        debug!(%product_id, from, to = quantity, "Changed quantity");
        true
    }

    /// The cart total if the line at `replaced` (or a new line) held
    /// `quantity` units at `unit_price`; `None` on overflow.
    ///
    /// Every committed snapshot passes this check, so [`Cart::total`] and
    /// [`LineItem::line_total`] never overflow.
    fn total_with_line(
        &self,
        replaced: Option<usize>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Option<Decimal> {
        let line_total = unit_price.checked_mul(Decimal::from(quantity))?;
        self.items
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replaced)
            .try_fold(line_total, |sum, (_, item)| sum.checked_add(item.line_total()))
    }

    fn commit(&mut self, items: Vec<LineItem>, change: CartChange) {
        self.items = items.into();
        self.version += 1;
        let event = CartEvent {
            version: self.version,
            change,
        };
        self.subscribers.notify(&event);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of the current lines, in insertion order.
    ///
    /// The snapshot is immutable; a later mutation produces a new one.
    #[must_use]
    pub fn items(&self) -> Arc<[LineItem]> {
        Arc::clone(&self.items)
    }

    /// Iterate over the current lines.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
    }

    /// Units of `product_id` in the cart; 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, LineItem::quantity)
    }

    /// Whether `product` could take at least one more unit.
    ///
    /// False when the product is sold out or the cart already holds its
    /// full stock.
    #[must_use]
    pub fn can_add<P: CartProduct + ?Sized>(&self, product: &P) -> bool {
        self.quantity_of(product.product_id()) < product.stock_quantity()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// `Σ unit_price × quantity`, recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// [`Cart::total`] in the cart's currency.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::new(self.total(), self.currency)
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Counter bumped by every mutation that changed the cart.
    ///
    /// Presentation layers can poll it instead of subscribing.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback invoked after every change.
    ///
    /// No-op operations do not trigger callbacks.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent) + Send + 'static,
    {
        self.subscribers.add(Box::new(callback))
    }

    /// Remove a callback. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
