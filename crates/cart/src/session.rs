//! Session ownership of a cart.
//!
//! A cart lives exactly as long as the session that owns it. There is no
//! process-wide cart: whatever renders or handles requests for a session
//! is handed the `CartSession` (or a reference to its cart) explicitly.

use chrono::{DateTime, Utc};
use shopcart_core::{CurrencyCode, SessionId};
use tracing::info;

use crate::cart::Cart;

/// One user's session and the cart it owns.
#[derive(Debug)]
pub struct CartSession {
    id: SessionId,
    started_at: DateTime<Utc>,
    cart: Cart,
}

impl CartSession {
    /// Start a session with an empty cart.
    #[must_use]
    pub fn start(currency: CurrencyCode) -> Self {
        let session = Self {
            id: SessionId::generate(),
            started_at: Utc::now(),
            cart: Cart::new(currency),
        };
        info!(session_id = %session.id, %currency, "Cart session started");
        session
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Read access for rendering.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access for event handlers.
    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// End the session, discarding the cart.
    ///
    /// Returns the cart so the caller can inspect its final state.
    #[must_use]
    pub fn end(self) -> Cart {
        info!(
            session_id = %self.id,
            lines = self.cart.len(),
            version = self.cart.version(),
            "Cart session ended"
        );
        self.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopcart_core::{Product, ProductId};

    use super::*;

    #[test]
    fn test_session_starts_with_empty_cart() {
        let session = CartSession::start(CurrencyCode::USD);
        assert!(session.cart().is_empty());
        assert_eq!(session.cart().currency(), CurrencyCode::USD);
        assert!(session.started_at() <= Utc::now());
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let a = CartSession::start(CurrencyCode::BRL);
        let b = CartSession::start(CurrencyCode::BRL);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_end_returns_final_cart() {
        let mut session = CartSession::start(CurrencyCode::BRL);
        let product = Product {
            id: ProductId::parse("p1").unwrap(),
            name: "Mug".to_string(),
            description: None,
            price: Decimal::new(10, 0),
            stock: 3,
            image_url: None,
        };
        session.cart_mut().add_item(&product, 2).unwrap();

        let cart = session.end();
        assert_eq!(cart.total(), Decimal::new(20, 0));
    }
}
