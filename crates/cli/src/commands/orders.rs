//! Order history commands.
//!
//! # Usage
//!
//! ```bash
//! till orders list
//! till orders show ORD-123456
//! till orders status ORD-123456 cancelled
//! till orders delete ORD-123456
//! ```

use std::io::Write;

use till_core::{OrderId, OrderStatus, OrderStore, Permission};

use super::cart::write_receipt;
use super::{CommandError, Context};

/// Permission needed to move an order to `status`.
const fn status_permission(status: OrderStatus) -> Permission {
    match status {
        OrderStatus::Cancelled => Permission::OrdersCancel,
        OrderStatus::Pending | OrderStatus::Completed => Permission::OrdersEdit,
    }
}

/// List every order, newest first.
///
/// # Errors
///
/// Returns an error if the operator may not view orders or the history
/// cannot be read.
pub fn list(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersView)?;
    let orders = ctx.open_orders()?.list_orders()?;

    if orders.is_empty() {
        writeln!(out, "No orders yet.")?;
        return Ok(());
    }

    for order in &orders {
        writeln!(
            out,
            "{}  {}  {:<24} {:>3} item(s)  {:>10}  {:<14} {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.customer_name,
            order.item_count(),
            order.total,
            order.payment_method,
            order.status
        )?;
    }
    Ok(())
}

/// Print one order as a receipt.
///
/// # Errors
///
/// Returns [`CommandError::Order`] with `NotFound` for an unknown id.
pub fn show(ctx: &Context, out: &mut impl Write, id: &str) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersView)?;
    let id = OrderId::new(id);
    let order = ctx
        .open_orders()?
        .get_order(&id)?
        .ok_or(till_core::OrderError::NotFound(id))?;
    write_receipt(out, &order)?;
    Ok(())
}

/// Change an order's status.
///
/// Cancelling needs `orders:cancel`; any other change needs `orders:edit`.
///
/// # Errors
///
/// Returns an error for a missing permission, an unknown order, or a
/// forbidden transition.
pub fn set_status(
    ctx: &Context,
    out: &mut impl Write,
    id: &str,
    status: OrderStatus,
) -> Result<(), CommandError> {
    ctx.require(status_permission(status))?;
    let order = ctx
        .open_orders()?
        .update_order_status(&OrderId::new(id), status)?;
    writeln!(out, "Order {} is now {}.", order.id, order.status)?;
    Ok(())
}

/// Delete an order.
///
/// # Errors
///
/// Returns an error for a missing permission or an unknown order.
pub fn delete(ctx: &Context, out: &mut impl Write, id: &str) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersEdit)?;
    let id = OrderId::new(id);
    ctx.open_orders()?.delete_order(&id)?;
    writeln!(out, "Order {id} deleted.")?;
    Ok(())
}
