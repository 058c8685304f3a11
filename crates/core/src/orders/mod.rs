//! Orders produced at checkout.
//!
//! An [`Order`] is a frozen copy of the cart plus the computed totals. After
//! creation only its status changes. Order stores sit behind the
//! [`OrderStore`] port; [`OrderLedger`] implements the shared bookkeeping
//! (id assignment, status rules) so every store behaves the same.

mod ledger;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLine;
use crate::store::StoreError;
use crate::types::{Money, OrderId, OrderStatus, PaymentMethod, TaxRate};

pub use ledger::OrderLedger;

/// Customer name recorded for sales without a customer record.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// The checkout snapshot handed to an order store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub lines: Vec<CartLine>,
    pub customer_name: String,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub tax_rate: TaxRate,
    pub total: Money,
    pub payment_method: PaymentMethod,
}

/// A recorded sale.
///
/// Field names in storage follow the order history layout (`items`,
/// `customer`, `tax`, `date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(rename = "items")]
    pub lines: Vec<CartLine>,
    #[serde(rename = "customer")]
    pub customer_name: String,
    pub subtotal: Money,
    #[serde(rename = "tax")]
    pub tax_amount: Money,
    pub tax_rate: TaxRate,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Total units sold.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Errors raised by order stores.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No order has the given id.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// The requested status change is not allowed.
    #[error("order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Every order number is taken.
    #[error("no free order number left")]
    IdsExhausted,

    /// The backing store failed.
    #[error("order storage error: {0}")]
    Store(#[from] StoreError),
}

/// Port for recording and managing orders.
pub trait OrderStore {
    /// Record a checkout snapshot, assigning its id, timestamp and status.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be stored.
    fn create_order(&mut self, order: NewOrder) -> Result<Order, OrderError>;

    /// Look up an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn get_order(&self, id: &OrderId) -> Result<Option<Order>, OrderError>;

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn list_orders(&self) -> Result<Vec<Order>, OrderError>;

    /// Move an order to `status`, returning the updated order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown id and
    /// [`OrderError::InvalidTransition`] for a forbidden change.
    fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError>;

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown id.
    fn delete_order(&mut self, id: &OrderId) -> Result<(), OrderError>;
}

/// Order store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    ledger: OrderLedger,
}

impl InMemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn create_order(&mut self, order: NewOrder) -> Result<Order, OrderError> {
        self.ledger.create(order, Utc::now())
    }

    fn get_order(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.ledger.get(id).cloned())
    }

    fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.ledger.orders().to_vec())
    }

    fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        self.ledger.update_status(id, status)
    }

    fn delete_order(&mut self, id: &OrderId) -> Result<(), OrderError> {
        self.ledger.delete(id)
    }
}
