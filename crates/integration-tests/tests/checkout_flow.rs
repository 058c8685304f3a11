//! End-to-end cart and checkout flows against the in-memory ports.

#![allow(clippy::unwrap_used)]

use till_core::{
    CartError, CartPhase, CartRepository, CartSession, Change, InMemoryOrderStore, InvalidInput,
    Money, OrderStatus, OrderStore, PaymentMethod, PersistedCart, ProductId, StoreError, TaxRate,
};
use till_integration_tests::{BAGEL_BOX, COFFEE, MUFFIN, dec, fresh_session, ring_up};

#[test]
fn worked_example_totals() {
    let mut session = fresh_session().unwrap();
    assert!(ring_up(&mut session, COFFEE, 2).unwrap());
    assert!(ring_up(&mut session, BAGEL_BOX, 1).unwrap());

    let totals = session.state().compute_totals();
    assert_eq!(totals.subtotal.amount(), dec("24.97"));
    assert_eq!(totals.tax_amount.amount(), dec("1.7479"));
    assert_eq!(totals.total.amount(), dec("26.7179"));
    assert_eq!(totals.total.to_string(), "$26.72");
}

#[test]
fn subtotal_ignores_insertion_order() {
    let mut forward = fresh_session().unwrap();
    let mut backward = fresh_session().unwrap();
    for (product, qty) in [(COFFEE, 3), (BAGEL_BOX, 1), (MUFFIN, 4)] {
        ring_up(&mut forward, product, qty).unwrap();
    }
    for (product, qty) in [(MUFFIN, 4), (BAGEL_BOX, 1), (COFFEE, 3)] {
        ring_up(&mut backward, product, qty).unwrap();
    }

    let expected = Money::from_cents(COFFEE.cents * 3 + BAGEL_BOX.cents + MUFFIN.cents * 4);
    assert_eq!(forward.state().compute_totals().subtotal, expected);
    assert_eq!(backward.state().compute_totals().subtotal, expected);
}

#[test]
fn repeated_product_merges_into_one_line() {
    let mut session = fresh_session().unwrap();
    ring_up(&mut session, COFFEE, 2).unwrap();
    ring_up(&mut session, COFFEE, 5).unwrap();

    assert_eq!(session.state().line_count(), 1);
    assert_eq!(session.state().lines()[0].quantity, 7);
}

#[test]
fn invalid_quantity_is_ignored_and_not_saved() {
    let mut session = fresh_session().unwrap();
    ring_up(&mut session, COFFEE, 2).unwrap();

    for bad in [0, -4] {
        let change = session.set_quantity(&COFFEE.product_id(), bad).unwrap();
        assert_eq!(
            change,
            Change::Ignored(InvalidInput::NonPositiveQuantity(bad))
        );
    }
    assert_eq!(session.state().lines()[0].quantity, 2);

    let repository = session.into_repository();
    assert_eq!(repository.save_count(), 1);
}

#[test]
fn clear_zeroes_totals_but_keeps_rate() {
    let mut session = fresh_session().unwrap();
    assert_eq!(session.set_tax_rate(dec("8.25")).unwrap(), Change::Applied);
    ring_up(&mut session, BAGEL_BOX, 3).unwrap();

    session.clear().unwrap();
    let totals = session.state().compute_totals();
    assert_eq!(totals.subtotal, Money::ZERO);
    assert_eq!(totals.tax_amount, Money::ZERO);
    assert_eq!(totals.total, Money::ZERO);
    assert_eq!(session.state().tax_rate().percent(), dec("8.25"));
    assert_eq!(session.state().phase(), CartPhase::Empty);
}

#[test]
fn oversized_amounts_never_break_totals() {
    let mut session = fresh_session().unwrap();
    ring_up(&mut session, COFFEE, 1).unwrap();

    let huge = Money::new(dec("100000000000000000000"));
    let change = session
        .add_line(ProductId::new("vault"), "Vault", huge, 1_000_000_000)
        .unwrap();
    assert_eq!(change, Change::Ignored(InvalidInput::AmountOverflow));
    assert_eq!(
        session.set_tax_rate(rust_decimal::Decimal::MAX).unwrap(),
        Change::Ignored(InvalidInput::AmountOverflow)
    );

    let repository = session.into_repository();
    assert_eq!(repository.save_count(), 1);
    let restored = CartSession::open(repository, TaxRate::DEFAULT).unwrap();
    assert_eq!(restored.state().compute_totals().total.to_string(), "$6.41");
}

#[test]
fn empty_checkout_records_nothing() {
    let session = fresh_session().unwrap();
    let mut orders = InMemoryOrderStore::new();

    let err = session
        .checkout("Ada", PaymentMethod::Cash, &mut orders)
        .unwrap_err();
    assert!(matches!(err, CartError::EmptyCart));
    assert!(orders.list_orders().unwrap().is_empty());
}

#[test]
fn checkout_snapshot_is_independent_of_later_edits() {
    let mut session = fresh_session().unwrap();
    let mut orders = InMemoryOrderStore::new();
    ring_up(&mut session, COFFEE, 2).unwrap();
    ring_up(&mut session, BAGEL_BOX, 1).unwrap();

    let order = session
        .checkout("  ", PaymentMethod::CreditCard, &mut orders)
        .unwrap();
    session.clear().unwrap();
    ring_up(&mut session, MUFFIN, 1).unwrap();

    let stored = orders.get_order(&order.id).unwrap().unwrap();
    assert_eq!(stored.customer_name, till_core::WALK_IN_CUSTOMER);
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_eq!(stored.item_count(), 3);
    assert_eq!(stored.total.amount(), dec("26.7179"));
    assert_eq!(stored.payment_method, PaymentMethod::CreditCard);
}

#[test]
fn cancelled_order_stays_cancelled() {
    let mut session = fresh_session().unwrap();
    let mut orders = InMemoryOrderStore::new();
    ring_up(&mut session, MUFFIN, 2).unwrap();
    let order = session
        .checkout("Grace", PaymentMethod::Cash, &mut orders)
        .unwrap();

    orders
        .update_order_status(&order.id, OrderStatus::Cancelled)
        .unwrap();
    assert!(
        orders
            .update_order_status(&order.id, OrderStatus::Completed)
            .is_err()
    );
    assert_eq!(
        orders.get_order(&order.id).unwrap().unwrap().status,
        OrderStatus::Cancelled
    );
}

#[test]
fn saved_cart_restores_in_a_new_session() {
    let mut session = fresh_session().unwrap();
    session.set_tax_rate(dec("5")).unwrap();
    ring_up(&mut session, COFFEE, 1).unwrap();
    let repository = session.into_repository();

    let restored = CartSession::open(repository, TaxRate::DEFAULT).unwrap();
    assert_eq!(restored.state().line_count(), 1);
    assert_eq!(restored.state().tax_rate().percent(), dec("5"));
}

#[test]
fn persisted_cart_rejects_newer_schema() {
    let err = PersistedCart::from_json(r#"{"version":2,"lines":[],"taxRate":"7"}"#).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedVersion { found: 2, .. }));
}

#[test]
fn persisted_cart_without_version_loads() {
    let json = serde_json::json!({
        "lines": [
            {"id": "coffee", "name": "House Coffee", "unitPrice": "5.99", "quantity": 2}
        ],
        "taxRate": "7"
    });
    let cart = PersistedCart::from_json(&json.to_string()).unwrap();
    let mut repository = till_core::InMemoryCartRepository::new();
    repository.save(&cart).unwrap();

    let session = CartSession::open(repository, TaxRate::ZERO).unwrap();
    assert_eq!(
        session.state().compute_totals().subtotal.amount(),
        dec("11.98")
    );
}
