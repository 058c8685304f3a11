//! Role permission tables as seen by callers outside the core crate.

#![allow(clippy::unwrap_used)]

use till_core::{Permission, Role, has_permission, permissions_for};

#[test]
fn user_deletion_is_admin_only() {
    assert!(has_permission(Some(Role::Admin), Permission::UsersDelete));
    assert!(!has_permission(Some(Role::Manager), Permission::UsersDelete));
    assert!(!has_permission(Some(Role::Staff), Permission::UsersDelete));
}

#[test]
fn signed_out_has_nothing() {
    for permission in Permission::ALL {
        assert!(!has_permission(None, permission), "{permission}");
    }
}

#[test]
fn manager_edits_users_without_deleting() {
    let granted = permissions_for(Role::Manager);
    assert!(granted.contains(&Permission::UsersEdit));
    assert!(!granted.contains(&Permission::UsersDelete));
}

#[test]
fn has_permission_agrees_with_tables() {
    for role in Role::ALL {
        for permission in Permission::ALL {
            assert_eq!(
                has_permission(Some(role), permission),
                permissions_for(role).contains(&permission),
                "{role} / {permission}"
            );
        }
    }
}

#[test]
fn staff_can_sell_but_not_cancel() {
    let staff = Some(Role::Staff);
    assert!(has_permission(staff, Permission::OrdersCreate));
    assert!(has_permission(staff, Permission::ReturnsProcess));
    assert!(!has_permission(staff, Permission::OrdersCancel));
    assert!(!has_permission(staff, Permission::OrdersEdit));
}

#[test]
fn tags_parse_back_to_permissions() {
    for permission in Permission::ALL {
        let parsed: Permission = permission.as_str().parse().unwrap();
        assert_eq!(parsed, permission);
    }
}
