//! Till Core - cart pricing, checkout and role permissions.
//!
//! This crate holds the parts of the Till point of sale that carry real
//! invariants:
//! - [`cart`] - the line-item cart, its totals and the checkout snapshot
//! - [`permissions`] - the role to permission tables
//! - [`access`] - user-management guards layered on top of the permission tables
//! - [`orders`] - immutable order records and the `OrderStore` port
//!
//! # Architecture
//!
//! The core crate performs no file, network or terminal I/O. Persistence is
//! reached through the [`cart::CartRepository`] and [`orders::OrderStore`]
//! ports; the `till` CLI supplies file-backed adapters and tests use the
//! in-memory ones shipped here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, tax rates, emails, roles and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod cart;
pub mod orders;
pub mod permissions;
pub mod store;
pub mod types;

pub use access::{Principal, UserSummary};
pub use cart::{
    CartError, CartLine, CartPhase, CartRepository, CartSession, CartState, Change,
    InMemoryCartRepository, InvalidInput, PersistedCart, Totals,
};
pub use orders::{
    InMemoryOrderStore, NewOrder, Order, OrderError, OrderLedger, OrderStore, WALK_IN_CUSTOMER,
};
pub use permissions::{Permission, has_permission, permissions_for};
pub use store::StoreError;
pub use types::*;
