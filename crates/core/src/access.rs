//! User-management guards.
//!
//! [`has_permission`] answers "may this role ever do X". Managing other
//! users also depends on who the target is, so every screen or command that
//! lists, creates, edits or deletes users goes through these checks:
//!
//! - a manager never sees, edits or deletes an admin account
//! - a manager never creates an admin or promotes anyone to admin
//! - nobody changes their own role or deletes their own account

use serde::{Deserialize, Serialize};

use crate::permissions::{Permission, has_permission};
use crate::types::{Email, Role, UserId};

/// The signed-in user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Whether this principal's role grants `permission`.
    #[must_use]
    pub fn can(&self, permission: Permission) -> bool {
        has_permission(Some(self.role), permission)
    }
}

/// A staff account as listed in user management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl UserSummary {
    /// The account as a principal, for guard checks.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::new(self.id.clone(), self.role)
    }
}

fn shields_admin(actor: &Principal, target_role: Role) -> bool {
    actor.role == Role::Manager && target_role == Role::Admin
}

/// Roles `actor` may give to a new or existing account.
#[must_use]
pub fn assignable_roles(actor: &Principal) -> Vec<Role> {
    if !actor.can(Permission::UsersCreate) {
        return Vec::new();
    }
    Role::ALL
        .into_iter()
        .filter(|role| !shields_admin(actor, *role))
        .collect()
}

#[must_use]
pub fn can_view_user(actor: &Principal, target: &Principal) -> bool {
    actor.can(Permission::UsersView) && !shields_admin(actor, target.role)
}

#[must_use]
pub fn can_edit_user(actor: &Principal, target: &Principal) -> bool {
    actor.can(Permission::UsersEdit) && !shields_admin(actor, target.role)
}

/// Whether `actor` may delete `target`. Self-deletion is never allowed.
#[must_use]
pub fn can_delete_user(actor: &Principal, target: &Principal) -> bool {
    actor.can(Permission::UsersDelete)
        && actor.id != target.id
        && !shields_admin(actor, target.role)
}

/// Whether `actor` may create an account with `role`.
#[must_use]
pub fn can_create_user(actor: &Principal, role: Role) -> bool {
    actor.can(Permission::UsersCreate) && !shields_admin(actor, role)
}

/// Whether `actor` may move `target` to `new_role`.
#[must_use]
pub fn can_change_role(actor: &Principal, target: &Principal, new_role: Role) -> bool {
    can_edit_user(actor, target) && actor.id != target.id && !shields_admin(actor, new_role)
}

/// The accounts `actor` is allowed to see, in their original order.
#[must_use]
pub fn visible_users<'a>(actor: &Principal, users: &'a [UserSummary]) -> Vec<&'a UserSummary> {
    users
        .iter()
        .filter(|user| can_view_user(actor, &user.principal()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn principal(id: &str, role: Role) -> Principal {
        Principal::new(UserId::new(id), role)
    }

    #[test]
    fn test_manager_cannot_touch_admins() {
        let manager = principal("2", Role::Manager);
        let admin = principal("1", Role::Admin);

        assert!(!can_view_user(&manager, &admin));
        assert!(!can_edit_user(&manager, &admin));
        assert!(!can_delete_user(&manager, &admin));
        assert!(!can_change_role(&manager, &admin, Role::Staff));
    }

    #[test]
    fn test_manager_manages_staff_but_never_deletes() {
        let manager = principal("2", Role::Manager);
        let staff = principal("3", Role::Staff);

        assert!(can_view_user(&manager, &staff));
        assert!(can_edit_user(&manager, &staff));
        assert!(can_change_role(&manager, &staff, Role::Manager));
        assert!(!can_change_role(&manager, &staff, Role::Admin));
        assert!(!can_delete_user(&manager, &staff));
    }

    #[test]
    fn test_manager_cannot_create_admin() {
        let manager = principal("2", Role::Manager);
        assert!(!can_create_user(&manager, Role::Admin));
        assert!(can_create_user(&manager, Role::Staff));
        assert_eq!(assignable_roles(&manager), vec![Role::Manager, Role::Staff]);
    }

    #[test]
    fn test_nobody_changes_own_role() {
        for role in Role::ALL {
            let me = principal("7", role);
            for new_role in Role::ALL {
                assert!(!can_change_role(&me, &me, new_role));
            }
        }
    }

    #[test]
    fn test_admin_deletes_others_but_not_self() {
        let admin = principal("1", Role::Admin);
        let other_admin = principal("9", Role::Admin);
        assert!(can_delete_user(&admin, &other_admin));
        assert!(!can_delete_user(&admin, &admin));
        assert!(can_change_role(&admin, &other_admin, Role::Staff));
        assert_eq!(assignable_roles(&admin), Role::ALL.to_vec());
    }

    #[test]
    fn test_staff_has_no_user_management() {
        let staff = principal("3", Role::Staff);
        let other = principal("4", Role::Staff);
        assert!(!can_view_user(&staff, &other));
        assert!(!can_create_user(&staff, Role::Staff));
        assert!(assignable_roles(&staff).is_empty());
    }

    #[test]
    fn test_visible_users_hides_admins_from_managers() {
        let user = |id: &str, email: &str, role| UserSummary {
            id: UserId::new(id),
            name: format!("User {id}"),
            email: Email::parse(email).unwrap(),
            role,
        };
        let users = vec![
            user("1", "admin@pos.com", Role::Admin),
            user("2", "manager@pos.com", Role::Manager),
            user("3", "staff@pos.com", Role::Staff),
        ];

        let manager = users[1].principal();
        let visible: Vec<_> = visible_users(&manager, &users)
            .into_iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(visible, vec!["2", "3"]);

        let admin = users[0].principal();
        assert_eq!(visible_users(&admin, &users).len(), 3);
    }
}
