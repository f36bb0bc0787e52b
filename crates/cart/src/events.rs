//! Change notifications for presentation layers.
//!
//! Subscribers are plain callbacks invoked synchronously, in registration
//! order, after the new item snapshot is in place. A callback therefore
//! always observes the post-change state through the event it receives.

use std::fmt;

use shopcart_core::ProductId;

/// What a successful mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added {
        product_id: ProductId,
        quantity: u32,
    },
    /// An existing line's quantity changed.
    QuantityChanged {
        product_id: ProductId,
        from: u32,
        to: u32,
    },
    /// A line was removed.
    Removed { product_id: ProductId },
    /// Every line was removed at once.
    Cleared { removed: usize },
}

/// A change together with the cart version it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEvent {
    pub version: u64,
    pub change: CartChange,
}

/// Handle returned by [`Cart::subscribe`](crate::Cart::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&CartEvent) + Send>;

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < before
    }

    pub(crate) fn notify(&mut self, event: &CartEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}
