//! Shopcart Core - Shared types library.
//!
//! This crate provides common types used across all Shopcart components:
//! - `cart` - Session-scoped shopping cart state manager
//! - `catalog` - Product catalog clients (REST and in-memory)
//! - `cli` - Command-line tools for catalog management and cart replay
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and product records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
