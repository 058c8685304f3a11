//! Cart data and arithmetic, free of persistence.

use rust_decimal::Decimal;
use tracing::debug;

use super::{CartError, CartLine, Change, InvalidInput, Totals};
use crate::orders::{NewOrder, WALK_IN_CUSTOMER};
use crate::types::{Money, PaymentMethod, ProductId, TaxRate};

/// Whether the cart currently holds anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPhase {
    Empty,
    Populated,
}

/// The lines of the sale in progress and the session tax rate.
///
/// Invariants: no two lines share a product id, every quantity is at least
/// one, and the totals can always be represented. Every mutator preserves
/// all three, so [`Self::compute_totals`] cannot fail.
///
/// ```
/// use rust_decimal::Decimal;
/// use till_core::{CartState, Money, ProductId};
///
/// let mut cart = CartState::default();
/// let _ = cart.add_line(ProductId::new("coffee"), "Coffee", Money::from_cents(599), 2);
/// let _ = cart.add_line(ProductId::new("bagel"), "Bagel", Money::from_cents(1299), 1);
///
/// let totals = cart.compute_totals();
/// assert_eq!(totals.subtotal.amount(), Decimal::new(2497, 2));
/// assert_eq!(totals.tax_amount.amount(), Decimal::new(17479, 4));
/// assert_eq!(totals.total.display(), "$26.72");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
    tax_rate: TaxRate,
    totals: Totals,
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(TaxRate::DEFAULT)
    }
}

impl CartState {
    /// An empty cart taxed at `tax_rate`.
    #[must_use]
    pub const fn new(tax_rate: TaxRate) -> Self {
        Self {
            lines: Vec::new(),
            tax_rate,
            totals: zero_totals(tax_rate),
        }
    }

    /// The lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// The current tax rate.
    #[must_use]
    pub const fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn phase(&self) -> CartPhase {
        if self.lines.is_empty() {
            CartPhase::Empty
        } else {
            CartPhase::Populated
        }
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product already has a line its quantity grows by `quantity`
    /// and its name and price are kept; otherwise a new line is appended.
    pub fn add_line(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Change {
        if unit_price.is_negative() {
            return ignored(InvalidInput::NegativePrice(unit_price));
        }
        let quantity = match validate_quantity(quantity) {
            Ok(quantity) => quantity,
            Err(invalid) => return ignored(invalid),
        };

        let mut lines = self.lines.clone();
        if let Some(line) = lines.iter_mut().find(|line| line.id == id) {
            let Some(merged) = line.quantity.checked_add(quantity) else {
                return ignored(InvalidInput::QuantityOverflow(i64::from(quantity)));
            };
            line.quantity = merged;
        } else {
            lines.push(CartLine {
                id: id.clone(),
                name: name.into(),
                unit_price,
                quantity,
            });
        }

        if let Err(invalid) = self.commit(lines) {
            return ignored(invalid);
        }
        debug!(product = %id, quantity, "Added to cart line");
        Change::Applied
    }

    /// Remove the line for `id`.
    pub fn remove_line(&mut self, id: &ProductId) -> Change {
        if self.line(id).is_none() {
            return ignored(InvalidInput::UnknownLine(id.clone()));
        }
        let lines = self
            .lines
            .iter()
            .filter(|line| &line.id != id)
            .cloned()
            .collect();
        if let Err(invalid) = self.commit(lines) {
            return ignored(invalid);
        }
        debug!(product = %id, "Removed cart line");
        Change::Applied
    }

    /// Replace the quantity of the line for `id`.
    ///
    /// A quantity below one is ignored rather than treated as a removal.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Change {
        let quantity = match validate_quantity(quantity) {
            Ok(quantity) => quantity,
            Err(invalid) => return ignored(invalid),
        };
        let mut lines = self.lines.clone();
        let Some(line) = lines.iter_mut().find(|line| &line.id == id) else {
            return ignored(InvalidInput::UnknownLine(id.clone()));
        };
        line.quantity = quantity;
        if let Err(invalid) = self.commit(lines) {
            return ignored(invalid);
        }
        debug!(product = %id, quantity, "Set cart line quantity");
        Change::Applied
    }

    /// Remove every line. The tax rate is kept.
    pub fn clear(&mut self) -> Change {
        self.lines.clear();
        self.totals = zero_totals(self.tax_rate);
        debug!("Cleared cart");
        Change::Applied
    }

    /// Set the rate used for subsequent totals.
    pub fn set_tax_rate(&mut self, percent: Decimal) -> Change {
        let Ok(rate) = TaxRate::new(percent) else {
            return ignored(InvalidInput::NegativeTaxRate(percent));
        };
        let Some(totals) = price(&self.lines, rate) else {
            return ignored(InvalidInput::AmountOverflow);
        };
        self.tax_rate = rate;
        self.totals = totals;
        debug!(rate = %rate, "Set tax rate");
        Change::Applied
    }

    /// Subtotal, tax and total at full precision.
    #[must_use]
    pub const fn compute_totals(&self) -> Totals {
        self.totals
    }

    /// Snapshot the cart as an order ready for an order store.
    ///
    /// A blank `customer_name` becomes [`WALK_IN_CUSTOMER`]. The cart is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] if the cart has no lines.
    pub fn checkout_snapshot(
        &self,
        customer_name: &str,
        payment_method: PaymentMethod,
    ) -> Result<NewOrder, CartError> {
        if self.lines.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let customer_name = match customer_name.trim() {
            "" => WALK_IN_CUSTOMER.to_owned(),
            name => name.to_owned(),
        };
        let totals = self.compute_totals();

        Ok(NewOrder {
            lines: self.lines.clone(),
            customer_name,
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            tax_rate: totals.tax_rate,
            total: totals.total,
            payment_method,
        })
    }

    /// Append a stored line, keeping it only if the cart can still be totalled.
    pub(super) fn restore_line(&mut self, line: CartLine) -> bool {
        self.lines.push(line);
        if let Some(totals) = price(&self.lines, self.tax_rate) {
            self.totals = totals;
            true
        } else {
            self.lines.pop();
            false
        }
    }

    pub(super) fn into_parts(self) -> (Vec<CartLine>, TaxRate) {
        (self.lines, self.tax_rate)
    }

    /// Replace the lines if the result can still be totalled.
    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), InvalidInput> {
        let totals = price(&lines, self.tax_rate).ok_or(InvalidInput::AmountOverflow)?;
        self.lines = lines;
        self.totals = totals;
        Ok(())
    }
}

const fn zero_totals(tax_rate: TaxRate) -> Totals {
    Totals {
        subtotal: Money::ZERO,
        tax_amount: Money::ZERO,
        tax_rate,
        total: Money::ZERO,
    }
}

/// Totals for `lines`, or `None` if any amount overflows.
fn price(lines: &[CartLine], tax_rate: TaxRate) -> Option<Totals> {
    let subtotal = lines
        .iter()
        .try_fold(Money::ZERO, |sum, line| sum.checked_add(line.line_total()?))?;
    let tax_amount = tax_rate.checked_apply(subtotal)?;
    Some(Totals {
        subtotal,
        tax_amount,
        tax_rate,
        total: subtotal.checked_add(tax_amount)?,
    })
}

fn validate_quantity(quantity: i64) -> Result<u32, InvalidInput> {
    if quantity < 1 {
        return Err(InvalidInput::NonPositiveQuantity(quantity));
    }
    u32::try_from(quantity).map_err(|_| InvalidInput::QuantityOverflow(quantity))
}

fn ignored(reason: InvalidInput) -> Change {
    debug!(reason = %reason, "Ignored cart input");
    Change::Ignored(reason)
}
