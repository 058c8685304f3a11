//! Shared fixtures for Till end-to-end tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p till-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart session, persistence and order recording
//! - `permissions` - role to permission tables
//! - `user_access` - user-management guards

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;
use till_core::{
    CartSession, InMemoryCartRepository, Money, Principal, ProductId, Role, TaxRate, UserId,
};

/// A catalog product as the counter sees it.
#[derive(Debug, Clone, Copy)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub cents: i64,
}

impl Product {
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        ProductId::new(self.id)
    }

    #[must_use]
    pub fn price(&self) -> Money {
        Money::from_cents(self.cents)
    }
}

pub const COFFEE: Product = Product {
    id: "coffee",
    name: "House Coffee",
    cents: 599,
};

pub const BAGEL_BOX: Product = Product {
    id: "bagels",
    name: "Bagel Box",
    cents: 1299,
};

pub const MUFFIN: Product = Product {
    id: "muffin",
    name: "Blueberry Muffin",
    cents: 325,
};

/// An empty in-memory cart session at the default tax rate.
///
/// # Errors
///
/// Never fails in practice; the in-memory repository cannot error.
pub fn fresh_session() -> Result<CartSession<InMemoryCartRepository>, till_core::StoreError> {
    CartSession::open(InMemoryCartRepository::new(), TaxRate::DEFAULT)
}

/// Add `quantity` units of `product`, returning whether the cart changed.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn ring_up(
    session: &mut CartSession<InMemoryCartRepository>,
    product: Product,
    quantity: i64,
) -> Result<bool, till_core::StoreError> {
    let change = session.add_line(product.product_id(), product.name, product.price(), quantity)?;
    Ok(change.is_applied())
}

/// A principal with a numeric id.
#[must_use]
pub fn user(id: u32, role: Role) -> Principal {
    Principal::new(UserId::new(id.to_string()), role)
}

/// Parse a decimal literal such as `"24.97"`.
///
/// # Panics
///
/// Panics on malformed input; fixtures only pass literals.
#[must_use]
#[allow(clippy::expect_used)]
pub fn dec(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}
