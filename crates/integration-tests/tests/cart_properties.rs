//! Property tests for the cart invariants.
//!
//! Random operation sequences over a small catalog; after every step the
//! cart must still hold at most one line per product, every quantity must
//! sit within `1..=stock`, and the total must equal the line sum.
//!
//! A second family changes catalog stock and prices between steps: `add`
//! must check the product passed in, while `increment` keeps checking the
//! stock stored on the line.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashSet;

use proptest::prelude::*;
use rust_decimal::Decimal;
use shopcart_cart::{Cart, LineItem};
use shopcart_core::Product;
use shopcart_integration_tests::product;

#[derive(Debug, Clone)]
enum Op {
    Add(usize, u32),
    Increment(usize),
    Decrement(usize),
    Remove(usize),
    Clear,
}

fn catalog() -> Vec<Product> {
    vec![
        product("1", "Camiseta", 90, 3),
        product("2", "Caneca", 30, 1),
        product("3", "Esgotado", 50, 0),
        product("4", "Notebook", 8500, 10),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..4, 0u32..5).prop_map(|(p, q)| Op::Add(p, q)),
        3 => (0usize..4).prop_map(Op::Increment),
        2 => (0usize..4).prop_map(Op::Decrement),
        1 => (0usize..4).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

/// Apply `op`, returning whether it reported a change.
fn apply(cart: &mut Cart, products: &[Product], op: &Op) -> bool {
    match *op {
        Op::Add(p, quantity) => cart.add_item(&products[p], quantity).is_ok(),
        Op::Increment(p) => cart.increment_quantity(&products[p].id),
        Op::Decrement(p) => cart.decrement_quantity(&products[p].id),
        Op::Remove(p) => cart.remove_item(&products[p].id),
        Op::Clear => cart.clear(),
    }
}

/// Steps for the catalog-change properties.
#[derive(Debug, Clone)]
enum StockOp {
    Add(usize, u32),
    Increment(usize),
    Restock(usize, u32),
}

fn stock_op() -> impl Strategy<Value = StockOp> {
    prop_oneof![
        3 => (0usize..3, 1u32..4).prop_map(|(p, q)| StockOp::Add(p, q)),
        3 => (0usize..3).prop_map(StockOp::Increment),
        2 => (0usize..3, 0u32..6).prop_map(|(p, s)| StockOp::Restock(p, s)),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_after_every_step(ops in prop::collection::vec(op(), 1..60)) {
        let products = catalog();
        let mut cart = Cart::default();

        for op in &ops {
            apply(&mut cart, &products, op);

            let mut seen = HashSet::new();
            for item in &cart {
                prop_assert!(seen.insert(item.product_id().clone()), "duplicate line");
                prop_assert!(item.quantity() >= 1);
                prop_assert!(item.quantity() <= item.stock_quantity());
            }

            let expected: Decimal = cart
                .iter()
                .map(|item| item.unit_price() * Decimal::from(item.quantity()))
                .sum();
            prop_assert_eq!(cart.total(), expected);
        }
    }

    #[test]
    fn version_counts_changes(ops in prop::collection::vec(op(), 1..60)) {
        let products = catalog();
        let mut cart = Cart::default();
        let mut changes = 0_u64;

        for op in &ops {
            let before = cart.items();
            let changed = apply(&mut cart, &products, op);
            if changed {
                changes += 1;
            } else {
                // Rejected and ignored operations keep the same snapshot.
                prop_assert!(std::sync::Arc::ptr_eq(&before, &cart.items()));
            }
            prop_assert_eq!(cart.version(), changes);
        }
    }

    #[test]
    fn remove_is_idempotent(ops in prop::collection::vec(op(), 0..30), target in 0usize..4) {
        let products = catalog();
        let mut cart = Cart::default();
        for op in &ops {
            apply(&mut cart, &products, op);
        }

        let id = &products[target].id;
        cart.remove_item(id);
        let version = cart.version();

        prop_assert!(!cart.remove_item(id));
        prop_assert_eq!(cart.quantity_of(id), 0);
        prop_assert_eq!(cart.version(), version);
    }

    #[test]
    fn add_checks_fresh_stock_and_increment_checks_stored_stock(
        ops in prop::collection::vec(stock_op(), 1..60)
    ) {
        let mut products = vec![
            product("1", "Camiseta", 90, 2),
            product("2", "Caneca", 30, 1),
            product("3", "Boné", 50, 0),
        ];
        let mut cart = Cart::default();

        for op in &ops {
            match *op {
                StockOp::Restock(p, stock) => {
                    products[p].stock = stock;
                    products[p].price += Decimal::ONE;
                }
                StockOp::Add(p, quantity) => {
                    let product = &products[p];
                    let before = cart.get(&product.id).cloned();
                    let held = before.as_ref().map_or(0, LineItem::quantity);

                    let result = cart.add_item(product, quantity);
                    prop_assert_eq!(result.is_ok(), held + quantity <= product.stock);

                    if result.is_ok() {
                        let after = cart.get(&product.id).unwrap();
                        prop_assert_eq!(after.quantity(), held + quantity);
                        match &before {
                            // A merge keeps the line's snapshot.
                            Some(line) => {
                                prop_assert_eq!(after.stock_quantity(), line.stock_quantity());
                                prop_assert_eq!(after.unit_price(), line.unit_price());
                            }
                            None => {
                                prop_assert_eq!(after.stock_quantity(), product.stock);
                                prop_assert_eq!(after.unit_price(), product.price);
                            }
                        }
                    }
                }
                StockOp::Increment(p) => {
                    let id = &products[p].id;
                    let before = cart.get(id).cloned();

                    let changed = cart.increment_quantity(id);
                    let expected = before
                        .as_ref()
                        .is_some_and(|line| line.quantity() < line.stock_quantity());
                    prop_assert_eq!(changed, expected);
                }
            }
        }
    }
}
