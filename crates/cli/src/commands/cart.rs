//! Cart and checkout commands.
//!
//! # Usage
//!
//! ```bash
//! till cart add coffee "House Coffee" 5.99 --qty 2
//! till cart qty coffee 3
//! till cart tax 8.25
//! till cart show
//! till checkout --customer "Ada Lovelace" --payment "credit card"
//! ```

use std::io::Write;

use rust_decimal::Decimal;
use till_core::{
    CartError, CartLine, CartState, Money, Order, PaymentMethod, Permission, ProductId,
};
use tracing::info;

use super::{CommandError, Context, report_change};

/// Print the cart and its totals.
///
/// # Errors
///
/// Returns an error if the operator may not ring up sales or the cart
/// cannot be read.
pub fn show(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersCreate)?;
    let session = ctx.open_cart()?;
    write_cart(out, session.state())?;
    Ok(())
}

/// Add units of a product.
///
/// # Errors
///
/// Returns an error if the operator may not ring up sales or the cart
/// cannot be saved.
pub fn add(
    ctx: &Context,
    out: &mut impl Write,
    id: &str,
    name: &str,
    unit_price: Decimal,
    quantity: i64,
) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersCreate)?;
    let mut session = ctx.open_cart()?;
    let change = session.add_line(ProductId::new(id), name, Money::new(unit_price), quantity)?;
    report_change(out, &change)?;
    write_cart(out, session.state())?;
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the operator may not ring up sales or the cart
/// cannot be saved.
pub fn remove(ctx: &Context, out: &mut impl Write, id: &str) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersCreate)?;
    let mut session = ctx.open_cart()?;
    let change = session.remove_line(&ProductId::new(id))?;
    report_change(out, &change)?;
    write_cart(out, session.state())?;
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the operator may not ring up sales or the cart
/// cannot be saved.
pub fn set_quantity(
    ctx: &Context,
    out: &mut impl Write,
    id: &str,
    quantity: i64,
) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersCreate)?;
    let mut session = ctx.open_cart()?;
    let change = session.set_quantity(&ProductId::new(id), quantity)?;
    report_change(out, &change)?;
    write_cart(out, session.state())?;
    Ok(())
}

/// Empty the cart, keeping the tax rate.
///
/// # Errors
///
/// Returns an error if the operator may not ring up sales or the cart
/// cannot be saved.
pub fn clear(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersCreate)?;
    let mut session = ctx.open_cart()?;
    let change = session.clear()?;
    report_change(out, &change)?;
    writeln!(out, "Cart cleared.")?;
    Ok(())
}

/// Set the tax rate in percent.
///
/// # Errors
///
/// Returns an error if the operator may not ring up sales or the cart
/// cannot be saved.
pub fn set_tax_rate(
    ctx: &Context,
    out: &mut impl Write,
    percent: Decimal,
) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersCreate)?;
    let mut session = ctx.open_cart()?;
    let change = session.set_tax_rate(percent)?;
    report_change(out, &change)?;
    writeln!(out, "Tax rate: {}", session.state().tax_rate())?;
    Ok(())
}

/// Record the cart as an order and print a receipt summary.
///
/// The cart is cleared afterwards unless `keep` is set.
///
/// # Errors
///
/// Returns [`CartError::EmptyCart`] (wrapped) if there is nothing to sell,
/// or an error if the operator may not ring up sales or storage fails.
pub fn checkout(
    ctx: &Context,
    out: &mut impl Write,
    customer: &str,
    payment: PaymentMethod,
    keep: bool,
) -> Result<(), CommandError> {
    ctx.require(Permission::OrdersCreate)?;
    let mut session = ctx.open_cart()?;
    let mut orders = ctx.open_orders()?;

    let order = match session.checkout(customer, payment, &mut orders) {
        Ok(order) => order,
        Err(CartError::EmptyCart) => {
            writeln!(out, "Cart is empty. Add items before checking out.")?;
            return Err(CartError::EmptyCart.into());
        }
        Err(e) => return Err(e.into()),
    };

    write_receipt(out, &order)?;

    if keep {
        info!(order_id = %order.id, "Cart kept after checkout");
    } else {
        let _ = session.clear()?;
    }
    Ok(())
}

fn write_cart(out: &mut impl Write, cart: &CartState) -> std::io::Result<()> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty (tax rate {}).", cart.tax_rate())?;
        return Ok(());
    }

    writeln!(
        out,
        "Cart: {} line(s), {} item(s)",
        cart.line_count(),
        cart.item_count()
    )?;
    for line in cart.lines() {
        writeln!(
            out,
            "  {:<12} {:<24} {:>4} x {:>9} = {:>10}",
            line.id,
            line.name,
            line.quantity,
            line.unit_price,
            line_amount(line)
        )?;
    }

    let totals = cart.compute_totals();
    writeln!(out, "Subtotal: {}", totals.subtotal)?;
    writeln!(out, "Tax ({}): {}", totals.tax_rate, totals.tax_amount)?;
    writeln!(out, "Total: {}", totals.total)
}

/// A line total for display; a stored order may hold one too large to compute.
fn line_amount(line: &CartLine) -> String {
    line.line_total()
        .map_or_else(|| "overflow".to_owned(), |total| total.to_string())
}

/// Print an order as a receipt.
pub(super) fn write_receipt(out: &mut impl Write, order: &Order) -> std::io::Result<()> {
    writeln!(out, "Order {} ({})", order.id, order.status)?;
    writeln!(out, "Date: {}", order.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "Customer: {}", order.customer_name)?;
    for line in &order.lines {
        writeln!(
            out,
            "  {} x {} @ {} = {}",
            line.quantity,
            line.name,
            line.unit_price,
            line_amount(line)
        )?;
    }
    writeln!(out, "Subtotal: {}", order.subtotal)?;
    writeln!(out, "Tax ({}): {}", order.tax_rate, order.tax_amount)?;
    writeln!(out, "Total: {}", order.total)?;
    writeln!(out, "Paid by: {}", order.payment_method)
}
