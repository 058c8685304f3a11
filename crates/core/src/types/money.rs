//! Exact decimal money and tax-rate types.
//!
//! Amounts are carried at full precision through every calculation. Rounding
//! to cents happens only when an amount is shown to a person, so summing many
//! lines never compounds rounding error.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the store's currency.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use till_core::Money;
///
/// let price = Money::from_cents(599);
/// let line = price.checked_times(2).unwrap();
/// assert_eq!(line.display(), "$11.98");
/// assert_eq!(Money::new(Decimal::MAX).checked_times(2), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero in the store's currency.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value in whole currency units.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The full-precision amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiply by a line quantity, or `None` if the product is out of range.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Add two amounts, or `None` if the sum is out of range.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// The amount rounded half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded
    }

    /// Format for display (e.g., "$26.72").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.rounded();
        if rounded < Decimal::ZERO {
            format!("-${}", -rounded)
        } else {
            format!("${rounded}")
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.display())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Error returned when a tax rate below zero is supplied.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("tax rate cannot be negative: {0}%")]
pub struct NegativeTaxRate(pub Decimal);

/// A sales tax rate expressed in percent (e.g., `7` means 7%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Rate applied to a cart that has never been configured.
    pub const DEFAULT: Self = Self(Decimal::from_parts(7, 0, 0, false, 0));

    /// A zero rate.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a tax rate from a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`NegativeTaxRate`] if `percent` is below zero.
    pub fn new(percent: Decimal) -> Result<Self, NegativeTaxRate> {
        if percent < Decimal::ZERO {
            return Err(NegativeTaxRate(percent));
        }
        Ok(Self(percent))
    }

    /// The rate in percent.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Tax owed on `subtotal` at this rate, unrounded.
    ///
    /// Returns `None` if the amount cannot be represented.
    #[must_use]
    pub fn checked_apply(self, subtotal: Money) -> Option<Money> {
        subtotal
            .0
            .checked_mul(self.0)?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Money)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<Decimal> for TaxRate {
    type Error = NegativeTaxRate;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl From<TaxRate> for Decimal {
    fn from(rate: TaxRate) -> Self {
        rate.0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Money::new(Decimal::new(267_179, 4)).display(), "$26.72");
        assert_eq!(Money::new(Decimal::new(5, 3)).display(), "$0.01");
        assert_eq!(Money::new(Decimal::new(-5, 3)).display(), "-$0.01");
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Money::new(Decimal::new(267, 1)).display(), "$26.70");
        assert_eq!(Money::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_checked_times_and_add() {
        let line = Money::from_cents(599).checked_times(2).unwrap();
        let total = line.checked_add(Money::from_cents(1299)).unwrap();
        assert_eq!(total.amount(), Decimal::new(2497, 2));
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let huge = Money::new(Decimal::from_i128_with_scale(10_i128.pow(20), 0));
        assert_eq!(huge.checked_times(1_000_000_000), None);
        assert_eq!(Money::new(Decimal::MAX).checked_add(Money::from_cents(1)), None);

        let max_rate = TaxRate::new(Decimal::MAX).unwrap();
        assert_eq!(max_rate.checked_apply(Money::from_cents(599)), None);
        assert_eq!(max_rate.checked_apply(Money::ZERO), Some(Money::ZERO));
    }

    #[test]
    fn test_tax_rate_default_is_seven_percent() {
        assert_eq!(TaxRate::default().percent(), Decimal::from(7));
        assert_eq!(TaxRate::DEFAULT.to_string(), "7%");
    }

    #[test]
    fn test_tax_rate_rejects_negative() {
        let err = TaxRate::new(Decimal::new(-1, 0)).unwrap_err();
        assert_eq!(err, NegativeTaxRate(Decimal::new(-1, 0)));
        assert!(TaxRate::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_tax_is_not_rounded() {
        let tax = TaxRate::DEFAULT.checked_apply(Money::from_cents(2497)).unwrap();
        assert_eq!(tax.amount(), Decimal::new(17479, 4));
    }

    #[test]
    fn test_tax_rate_serde_rejects_negative() {
        assert!(serde_json::from_str::<TaxRate>("\"-3\"").is_err());
        let rate: TaxRate = serde_json::from_str("\"8.25\"").unwrap();
        assert_eq!(rate.percent(), Decimal::new(825, 2));
    }
}
