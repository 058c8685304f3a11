//! Command implementations.
//!
//! Every command writes its human-readable output to the `out` writer it is
//! given and logs through `tracing`. Commands that change state check the
//! operator's permissions first.

pub mod access;
pub mod cart;
pub mod orders;

use std::io;

use thiserror::Error;
use till_core::{
    CartError, CartSession, Change, OrderError, Permission, Role, StoreError, has_permission,
};
use tracing::{debug, warn};

use crate::config::TillConfig;
use crate::storage::{FileCartRepository, FileOrderStore, JsonFileStore};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The operator's role does not grant the permission.
    #[error("Permission denied: {permission} requires a role that grants it (current role: {})", role_label(*.role))]
    Forbidden {
        permission: Permission,
        role: Option<Role>,
    },

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

fn role_label(role: Option<Role>) -> &'static str {
    role.map_or("not signed in", |role| role.as_str())
}

/// Shared state for a single CLI invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: TillConfig,
    store: JsonFileStore,
}

impl Context {
    #[must_use]
    pub fn new(config: TillConfig) -> Self {
        let store = JsonFileStore::new(config.data_dir.clone());
        debug!(
            dir = %store.dir().display(),
            role = role_label(config.role),
            "Opened data directory"
        );
        Self { config, store }
    }

    /// Fail unless the operator's role grants `permission`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Forbidden`] if the permission is missing.
    pub fn require(&self, permission: Permission) -> Result<(), CommandError> {
        let role = self.config.role;
        if has_permission(role, permission) {
            return Ok(());
        }
        warn!(%permission, role = role_label(role), "Permission denied");
        Err(CommandError::Forbidden { permission, role })
    }

    /// Open the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved cart cannot be read.
    pub fn open_cart(&self) -> Result<CartSession<FileCartRepository>, StoreError> {
        CartSession::open(
            FileCartRepository::new(self.store.clone()),
            self.config.default_tax_rate,
        )
    }

    /// Open the saved order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved history cannot be read.
    pub fn open_orders(&self) -> Result<FileOrderStore, StoreError> {
        FileOrderStore::open(self.store.clone())
    }
}

/// Tell the operator whether a cart change took effect.
///
/// Ignored input is not an error: the cart is simply unchanged.
fn report_change(out: &mut impl io::Write, change: &Change) -> io::Result<()> {
    match change {
        Change::Applied => Ok(()),
        Change::Ignored(reason) => {
            warn!(%reason, "Cart unchanged");
            writeln!(out, "Cart unchanged: {reason}")
        }
    }
}
