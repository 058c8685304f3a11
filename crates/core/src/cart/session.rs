//! A cart bound to its repository.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::{CartError, CartRepository, CartState, Change, PersistedCart};
use crate::orders::{Order, OrderStore};
use crate::store::StoreError;
use crate::types::{Money, PaymentMethod, ProductId, TaxRate};

/// The cart for one register, persisted after every applied change.
///
/// Ignored changes leave both the cart and the repository untouched.
#[derive(Debug)]
pub struct CartSession<R> {
    state: CartState,
    repository: R,
}

impl<R: CartRepository> CartSession<R> {
    /// Restore the saved cart, or start an empty one taxed at `default_rate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read.
    pub fn open(repository: R, default_rate: TaxRate) -> Result<Self, StoreError> {
        let state = repository
            .load()?
            .map_or_else(|| CartState::new(default_rate), PersistedCart::into_state);
        Ok(Self { state, repository })
    }

    /// The current cart contents.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// See [`CartState::add_line`].
    ///
    /// # Errors
    ///
    /// Returns an error if an applied change cannot be saved.
    pub fn add_line(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Result<Change, StoreError> {
        let change = self.state.add_line(id, name, unit_price, quantity);
        self.persist(change)
    }

    /// See [`CartState::remove_line`].
    ///
    /// # Errors
    ///
    /// Returns an error if an applied change cannot be saved.
    pub fn remove_line(&mut self, id: &ProductId) -> Result<Change, StoreError> {
        let change = self.state.remove_line(id);
        self.persist(change)
    }

    /// See [`CartState::set_quantity`].
    ///
    /// # Errors
    ///
    /// Returns an error if an applied change cannot be saved.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<Change, StoreError> {
        let change = self.state.set_quantity(id, quantity);
        self.persist(change)
    }

    /// See [`CartState::clear`].
    ///
    /// # Errors
    ///
    /// Returns an error if the emptied cart cannot be saved.
    pub fn clear(&mut self) -> Result<Change, StoreError> {
        let change = self.state.clear();
        self.persist(change)
    }

    /// See [`CartState::set_tax_rate`].
    ///
    /// # Errors
    ///
    /// Returns an error if an applied change cannot be saved.
    pub fn set_tax_rate(&mut self, percent: Decimal) -> Result<Change, StoreError> {
        let change = self.state.set_tax_rate(percent);
        self.persist(change)
    }

    /// Record the cart as an order in `orders`.
    ///
    /// The cart is not cleared; call [`Self::clear`] once the receipt has
    /// been shown.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] if there is nothing to sell, or the
    /// order store's error if it cannot record the order.
    #[instrument(skip(self, orders), fields(lines = self.state.line_count()))]
    pub fn checkout<O: OrderStore>(
        &self,
        customer_name: &str,
        payment_method: PaymentMethod,
        orders: &mut O,
    ) -> Result<Order, CartError> {
        let snapshot = self.state.checkout_snapshot(customer_name, payment_method)?;
        let order = orders.create_order(snapshot)?;
        info!(
            order_id = %order.id,
            total = %order.total,
            payment = %order.payment_method,
            "Checked out cart"
        );
        Ok(order)
    }

    /// Release the repository.
    pub fn into_repository(self) -> R {
        self.repository
    }

    fn persist(&mut self, change: Change) -> Result<Change, StoreError> {
        if change.is_applied() {
            self.repository
                .save(&PersistedCart::from(self.state.clone()))?;
        }
        Ok(change)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::InMemoryCartRepository;
    use crate::orders::InMemoryOrderStore;
    use crate::types::OrderStatus;

    fn open() -> CartSession<InMemoryCartRepository> {
        CartSession::open(InMemoryCartRepository::new(), TaxRate::DEFAULT).unwrap()
    }

    #[test]
    fn test_open_fresh_uses_default_rate() {
        let rate = TaxRate::new(Decimal::new(6, 0)).unwrap();
        let session = CartSession::open(InMemoryCartRepository::new(), rate).unwrap();
        assert!(session.state().is_empty());
        assert_eq!(session.state().tax_rate(), rate);
    }

    #[test]
    fn test_applied_changes_are_saved() {
        let mut session = open();
        let _ = session
            .add_line(ProductId::new("tea"), "Tea", Money::from_cents(250), 2)
            .unwrap();
        let _ = session.set_tax_rate(Decimal::new(5, 0)).unwrap();

        let repository = session.into_repository();
        assert_eq!(repository.save_count(), 2);
        let saved = repository.saved().unwrap();
        assert_eq!(saved.lines.len(), 1);
        assert_eq!(saved.tax_rate.percent(), Decimal::new(5, 0));
    }

    #[test]
    fn test_ignored_changes_are_not_saved() {
        let mut session = open();
        let _ = session
            .add_line(ProductId::new("tea"), "Tea", Money::from_cents(-250), 2)
            .unwrap();
        let _ = session.set_quantity(&ProductId::new("tea"), 0).unwrap();
        let _ = session.remove_line(&ProductId::new("tea")).unwrap();
        let _ = session.set_tax_rate(Decimal::new(-1, 0)).unwrap();

        assert_eq!(session.into_repository().save_count(), 0);
    }

    #[test]
    fn test_reopen_restores_state() {
        let mut session = open();
        let _ = session
            .add_line(ProductId::new("b"), "B", Money::from_cents(100), 1)
            .unwrap();
        let _ = session
            .add_line(ProductId::new("a"), "A", Money::from_cents(200), 3)
            .unwrap();
        let before = session.state().clone();

        let reopened = CartSession::open(session.into_repository(), TaxRate::ZERO).unwrap();
        assert_eq!(reopened.state(), &before);
    }

    #[test]
    fn test_checkout_does_not_clear() {
        let mut session = open();
        let _ = session
            .add_line(ProductId::new("tea"), "Tea", Money::from_cents(250), 2)
            .unwrap();
        let mut orders = InMemoryOrderStore::new();

        let order = session
            .checkout("Ada", PaymentMethod::Cash, &mut orders)
            .unwrap();
        assert_eq!(order.customer_name, "Ada");
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(session.state().line_count(), 1);

        let _ = session.clear().unwrap();
        assert!(session.state().is_empty());
    }

    #[test]
    fn test_checkout_empty_creates_no_order() {
        let session = open();
        let mut orders = InMemoryOrderStore::new();

        let result = session.checkout("Ada", PaymentMethod::Cash, &mut orders);
        assert!(matches!(result, Err(CartError::EmptyCart)));
        assert!(orders.list_orders().unwrap().is_empty());
    }
}
