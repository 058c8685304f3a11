//! Order bookkeeping shared by every order store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{NewOrder, Order, OrderError};
use crate::types::{OrderId, OrderStatus};

/// Order numbers are six digits after the prefix.
const ORDER_NUMBER_SPACE: i64 = 1_000_000;

/// Orders held newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLedger {
    orders: Vec<Order>,
}

impl OrderLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Every order, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Record `order` as completed at `now`.
    ///
    /// The id is `ORD-` followed by the last six digits of `now` in
    /// milliseconds, bumped until it is unused.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::IdsExhausted`] if every six-digit number is taken.
    #[instrument(skip(self, order), fields(customer = %order.customer_name))]
    pub fn create(&mut self, order: NewOrder, now: DateTime<Utc>) -> Result<Order, OrderError> {
        let id = self.next_id(now.timestamp_millis())?;
        let order = Order {
            id,
            lines: order.lines,
            customer_name: order.customer_name,
            subtotal: order.subtotal,
            tax_amount: order.tax_amount,
            tax_rate: order.tax_rate,
            total: order.total,
            payment_method: order.payment_method,
            created_at: now,
            status: OrderStatus::Completed,
        };
        info!(order_id = %order.id, total = %order.total, "Order created");
        self.orders.insert(0, order.clone());
        Ok(order)
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] or [`OrderError::InvalidTransition`].
    pub fn update_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;

        if !order.status.can_transition_to(status) {
            return Err(OrderError::InvalidTransition {
                id: id.clone(),
                from: order.status,
                to: status,
            });
        }

        if order.status != status {
            info!(order_id = %id, from = %order.status, to = %status, "Order status updated");
            order.status = status;
        }
        Ok(order.clone())
    }

    /// Remove an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown id.
    pub fn delete(&mut self, id: &OrderId) -> Result<(), OrderError> {
        let before = self.orders.len();
        self.orders.retain(|order| &order.id != id);
        if self.orders.len() == before {
            return Err(OrderError::NotFound(id.clone()));
        }
        info!(order_id = %id, "Order deleted");
        Ok(())
    }

    fn next_id(&self, millis: i64) -> Result<OrderId, OrderError> {
        let start = millis.rem_euclid(ORDER_NUMBER_SPACE);
        (0..ORDER_NUMBER_SPACE)
            .map(|offset| format!("ORD-{:06}", (start + offset) % ORDER_NUMBER_SPACE))
            .map(OrderId::new)
            .find(|candidate| self.get(candidate).is_none())
            .ok_or(OrderError::IdsExhausted)
    }
}
