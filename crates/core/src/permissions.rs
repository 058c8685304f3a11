//! Role-based permission model.
//!
//! Each role's grants are listed explicitly below. The lists are data, not a
//! hierarchy: the manager set is close to a superset of the staff set and
//! close to a subset of the admin set, but grants are enumerated per role so
//! asymmetric ones (a manager may edit users yet never delete them) stay
//! visible. Do not derive one table from another.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// One gated action, written `<resource>:<action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "dashboard:view")]
    DashboardView,
    #[serde(rename = "products:view")]
    ProductsView,
    #[serde(rename = "products:create")]
    ProductsCreate,
    #[serde(rename = "products:edit")]
    ProductsEdit,
    #[serde(rename = "products:delete")]
    ProductsDelete,
    #[serde(rename = "orders:view")]
    OrdersView,
    #[serde(rename = "orders:create")]
    OrdersCreate,
    #[serde(rename = "orders:edit")]
    OrdersEdit,
    #[serde(rename = "orders:cancel")]
    OrdersCancel,
    #[serde(rename = "orders:refund")]
    OrdersRefund,
    #[serde(rename = "customers:view")]
    CustomersView,
    #[serde(rename = "customers:create")]
    CustomersCreate,
    #[serde(rename = "customers:edit")]
    CustomersEdit,
    #[serde(rename = "customers:delete")]
    CustomersDelete,
    #[serde(rename = "inventory:view")]
    InventoryView,
    #[serde(rename = "inventory:adjust")]
    InventoryAdjust,
    #[serde(rename = "reports:view")]
    ReportsView,
    #[serde(rename = "users:view")]
    UsersView,
    #[serde(rename = "users:create")]
    UsersCreate,
    #[serde(rename = "users:edit")]
    UsersEdit,
    #[serde(rename = "users:delete")]
    UsersDelete,
    #[serde(rename = "settings:view")]
    SettingsView,
    #[serde(rename = "settings:edit")]
    SettingsEdit,
    #[serde(rename = "returns:process")]
    ReturnsProcess,
}

impl Permission {
    /// Every permission tag, in display order.
    pub const ALL: [Self; 24] = [
        Self::DashboardView,
        Self::ProductsView,
        Self::ProductsCreate,
        Self::ProductsEdit,
        Self::ProductsDelete,
        Self::OrdersView,
        Self::OrdersCreate,
        Self::OrdersEdit,
        Self::OrdersCancel,
        Self::OrdersRefund,
        Self::CustomersView,
        Self::CustomersCreate,
        Self::CustomersEdit,
        Self::CustomersDelete,
        Self::InventoryView,
        Self::InventoryAdjust,
        Self::ReportsView,
        Self::UsersView,
        Self::UsersCreate,
        Self::UsersEdit,
        Self::UsersDelete,
        Self::SettingsView,
        Self::SettingsEdit,
        Self::ReturnsProcess,
    ];

    /// The permission tag (e.g., `"orders:refund"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DashboardView => "dashboard:view",
            Self::ProductsView => "products:view",
            Self::ProductsCreate => "products:create",
            Self::ProductsEdit => "products:edit",
            Self::ProductsDelete => "products:delete",
            Self::OrdersView => "orders:view",
            Self::OrdersCreate => "orders:create",
            Self::OrdersEdit => "orders:edit",
            Self::OrdersCancel => "orders:cancel",
            Self::OrdersRefund => "orders:refund",
            Self::CustomersView => "customers:view",
            Self::CustomersCreate => "customers:create",
            Self::CustomersEdit => "customers:edit",
            Self::CustomersDelete => "customers:delete",
            Self::InventoryView => "inventory:view",
            Self::InventoryAdjust => "inventory:adjust",
            Self::ReportsView => "reports:view",
            Self::UsersView => "users:view",
            Self::UsersCreate => "users:create",
            Self::UsersEdit => "users:edit",
            Self::UsersDelete => "users:delete",
            Self::SettingsView => "settings:view",
            Self::SettingsEdit => "settings:edit",
            Self::ReturnsProcess => "returns:process",
        }
    }

    /// The resource half of the tag (e.g., `"orders"`).
    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.as_str().split_once(':').map_or("", |(resource, _)| resource)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown permission tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown permission: {0}")]
pub struct ParsePermissionError(String);

impl std::str::FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| ParsePermissionError(s.to_owned()))
    }
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::DashboardView,
    Permission::ProductsView,
    Permission::ProductsCreate,
    Permission::ProductsEdit,
    Permission::ProductsDelete,
    Permission::OrdersView,
    Permission::OrdersCreate,
    Permission::OrdersEdit,
    Permission::OrdersCancel,
    Permission::OrdersRefund,
    Permission::CustomersView,
    Permission::CustomersCreate,
    Permission::CustomersEdit,
    Permission::CustomersDelete,
    Permission::InventoryView,
    Permission::InventoryAdjust,
    Permission::ReportsView,
    Permission::UsersView,
    Permission::UsersCreate,
    Permission::UsersEdit,
    Permission::UsersDelete,
    Permission::SettingsView,
    Permission::SettingsEdit,
    Permission::ReturnsProcess,
];

const MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::DashboardView,
    Permission::ProductsView,
    Permission::ProductsCreate,
    Permission::ProductsEdit,
    Permission::OrdersView,
    Permission::OrdersCreate,
    Permission::OrdersEdit,
    Permission::OrdersCancel,
    Permission::OrdersRefund,
    Permission::CustomersView,
    Permission::CustomersCreate,
    Permission::CustomersEdit,
    Permission::InventoryView,
    Permission::InventoryAdjust,
    Permission::ReportsView,
    Permission::UsersView,
    Permission::UsersCreate,
    // Staff and other managers only; see `access`.
    Permission::UsersEdit,
    Permission::SettingsView,
    Permission::ReturnsProcess,
];

const STAFF_PERMISSIONS: &[Permission] = &[
    Permission::DashboardView,
    Permission::ProductsView,
    Permission::OrdersView,
    Permission::OrdersCreate,
    Permission::CustomersView,
    Permission::CustomersCreate,
    Permission::InventoryView,
    Permission::ReturnsProcess,
];

/// Every permission granted to `role`.
///
/// ```
/// use till_core::{Permission, Role, permissions_for};
///
/// let manager = permissions_for(Role::Manager);
/// assert!(manager.contains(&Permission::UsersEdit));
/// assert!(!manager.contains(&Permission::UsersDelete));
/// ```
#[must_use]
pub const fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN_PERMISSIONS,
        Role::Manager => MANAGER_PERMISSIONS,
        Role::Staff => STAFF_PERMISSIONS,
    }
}

/// Whether `role` is granted `permission`.
///
/// An absent role (nobody signed in) holds no permissions.
#[must_use]
pub fn has_permission(role: Option<Role>, permission: Permission) -> bool {
    role.is_some_and(|role| permissions_for(role).contains(&permission))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_spot_checks() {
        assert!(!has_permission(Some(Role::Staff), Permission::UsersDelete));
        assert!(has_permission(Some(Role::Admin), Permission::UsersDelete));
        assert!(has_permission(Some(Role::Staff), Permission::ReturnsProcess));
        assert!(!has_permission(Some(Role::Manager), Permission::SettingsEdit));
    }

    #[test]
    fn test_absent_role_has_nothing() {
        for permission in Permission::ALL {
            assert!(!has_permission(None, permission));
        }
    }

    #[test]
    fn test_admin_holds_every_permission() {
        let admin: BTreeSet<_> = permissions_for(Role::Admin).iter().copied().collect();
        let all: BTreeSet<_> = Permission::ALL.into_iter().collect();
        assert_eq!(admin, all);
    }

    #[test]
    fn test_tables_have_no_duplicates() {
        for role in Role::ALL {
            let granted = permissions_for(role);
            let unique: BTreeSet<_> = granted.iter().collect();
            assert_eq!(unique.len(), granted.len(), "duplicate grant for {role}");
        }
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(permissions_for(Role::Admin).len(), 24);
        assert_eq!(permissions_for(Role::Manager).len(), 20);
        assert_eq!(permissions_for(Role::Staff).len(), 8);
    }

    #[test]
    fn test_manager_edits_but_never_deletes_users() {
        let manager = permissions_for(Role::Manager);
        assert!(manager.contains(&Permission::UsersEdit));
        assert!(manager.contains(&Permission::UsersCreate));
        assert!(!manager.contains(&Permission::UsersDelete));
    }

    #[test]
    fn test_tag_round_trip() {
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>().unwrap(), permission);
            let json = serde_json::to_string(&permission).unwrap();
            assert_eq!(json, format!("\"{}\"", permission.as_str()));
        }
        assert!("users:promote".parse::<Permission>().is_err());
    }

    #[test]
    fn test_resource() {
        assert_eq!(Permission::OrdersRefund.resource(), "orders");
        assert_eq!(Permission::ReturnsProcess.resource(), "returns");
    }
}
