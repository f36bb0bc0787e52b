//! Core types for Shopcart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::{ProductId, ProductIdError, SessionId};
pub use price::{CurrencyCode, Price, UnknownCurrency};
pub use product::{Product, ProductDraft, ProductField, ProductValidationError};
