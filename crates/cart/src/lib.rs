//! Shopcart Cart - session-scoped shopping cart state manager.
//!
//! A [`Cart`] holds an ordered list of [`LineItem`]s, at most one per
//! product, and keeps every quantity between 1 and the product's stock.
//! It is owned by a [`CartSession`] and mutated only through four
//! operations:
//!
//! - [`Cart::add_item`] - add a product or merge into its existing line
//! - [`Cart::increment_quantity`] - +1, ignored at the stock ceiling
//! - [`Cart::decrement_quantity`] - -1, ignored at quantity 1
//! - [`Cart::remove_item`] - drop a line
//!
//! The total is recomputed on every read. Each successful mutation swaps in
//! a new item snapshot, bumps [`Cart::version`], and notifies subscribers
//! registered via [`Cart::subscribe`].
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use shopcart_cart::Cart;
//! use shopcart_core::{Product, ProductId};
//!
//! let mug = Product {
//!     id: ProductId::parse("p1").unwrap(),
//!     name: "Mug".to_string(),
//!     description: None,
//!     price: Decimal::new(10, 0),
//!     stock: 2,
//!     image_url: None,
//! };
//!
//! let mut cart = Cart::default();
//! assert!(cart.add_one(&mug).is_ok());
//! assert!(cart.add_item(&mug, 2).is_err()); // 1 + 2 > 2 in stock
//! assert_eq!(cart.total(), Decimal::new(10, 0));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cart;
mod error;
mod events;
mod line_item;
mod product;
mod session;

pub use cart::{AddedItem, Cart};
pub use error::AddRejected;
pub use events::{CartChange, CartEvent, SubscriptionId};
pub use line_item::LineItem;
pub use product::CartProduct;
pub use session::CartSession;
