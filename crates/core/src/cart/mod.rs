//! The cart engine.
//!
//! A cart holds the sale currently being rung up: an insertion-ordered list
//! of lines, at most one per product, each with a quantity of at least one.
//! [`CartState`] is the pure data and arithmetic; [`CartSession`] wraps it
//! with a [`CartRepository`] so every applied change is persisted.
//!
//! Bad input (a negative price, a zero quantity, an unknown line, an
//! amount too large to total) never raises an error. The operation is skipped and reported back as
//! [`Change::Ignored`] so the caller can decide whether to mention it.
//! An empty cart at checkout is different and always fails with
//! [`CartError::EmptyCart`].

mod session;
mod state;
mod store;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orders::OrderError;
use crate::store::StoreError;
use crate::types::{Money, ProductId, TaxRate};

pub use session::CartSession;
pub use state::{CartPhase, CartState};
pub use store::{CartRepository, InMemoryCartRepository, PersistedCart};

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product the line sells.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Money,
    /// Number of units, always at least one.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity, unrounded.
    ///
    /// Always `Some` for a line held by a [`CartState`]; `None` only for a
    /// line whose amount cannot be represented.
    #[must_use]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Monetary totals for the current cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of every line total.
    pub subtotal: Money,
    /// `subtotal` times the tax rate.
    pub tax_amount: Money,
    /// Rate the tax was computed at.
    pub tax_rate: TaxRate,
    /// `subtotal` plus `tax_amount`.
    pub total: Money,
}

/// Why a cart operation was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// A unit price below zero.
    #[error("unit price cannot be negative: {0}")]
    NegativePrice(Money),

    /// A quantity of zero or less.
    #[error("quantity must be at least 1, got {0}")]
    NonPositiveQuantity(i64),

    /// A quantity that does not fit in a line.
    #[error("quantity {0} is too large")]
    QuantityOverflow(i64),

    /// A tax rate below zero.
    #[error("tax rate cannot be negative: {0}%")]
    NegativeTaxRate(Decimal),

    /// The resulting line total, subtotal or tax is too large to represent.
    #[error("amount is too large for the cart")]
    AmountOverflow,

    /// No line exists for the product.
    #[error("no cart line for product {0}")]
    UnknownLine(ProductId),
}

/// Outcome of a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Change {
    /// The cart was updated.
    Applied,
    /// The input was invalid and the cart is unchanged.
    Ignored(InvalidInput),
}

impl Change {
    /// Whether the cart was updated.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Checkout was attempted with no lines in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The cart could not be loaded or saved.
    #[error("cart storage error: {0}")]
    Store(#[from] StoreError),

    /// The order store rejected the new order.
    #[error("order error: {0}")]
    Order(#[from] OrderError),
}
