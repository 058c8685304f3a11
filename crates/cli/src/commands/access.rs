//! Permission and user-access inspection.
//!
//! # Usage
//!
//! ```bash
//! # Permissions of the signed-in role (TILL_ROLE / --role)
//! till perms
//!
//! # Permissions of another role
//! till perms staff
//!
//! # What user 2 (a manager) may do to user 1 (an admin)
//! till access manager 2 admin 1
//! ```

use std::io::Write;

use till_core::access::{
    Principal, assignable_roles, can_change_role, can_delete_user, can_edit_user, can_view_user,
};
use till_core::{Permission, Role, UserId, permissions_for};

use super::{CommandError, Context};

/// List the permissions of `role`, or of the operator's role if `None`,
/// one line per resource.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn permissions(
    ctx: &Context,
    out: &mut impl Write,
    role: Option<Role>,
) -> Result<(), CommandError> {
    let role = match (role, ctx.config.principal()) {
        (Some(role), _) => role,
        (None, Some(operator)) => {
            writeln!(out, "Signed in as {} ({}).", operator.id, operator.role)?;
            operator.role
        }
        (None, None) => {
            writeln!(out, "Not signed in: no permissions.")?;
            return Ok(());
        }
    };

    writeln!(out, "{role}:")?;
    for group in permissions_for(role).chunk_by(|a, b| a.resource() == b.resource()) {
        let Some(first) = group.first() else {
            continue;
        };
        let tags: Vec<&str> = group.iter().map(Permission::as_str).collect();
        writeln!(out, "  {:<10} {}", first.resource(), tags.join(", "))?;
    }
    Ok(())
}

/// Print which user-management actions `actor` may take on `target`.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn matrix(
    out: &mut impl Write,
    actor_role: Role,
    actor_id: &str,
    target_role: Role,
    target_id: &str,
) -> Result<(), CommandError> {
    let actor = Principal::new(UserId::new(actor_id), actor_role);
    let target = Principal::new(UserId::new(target_id), target_role);
    let yes_no = |allowed: bool| if allowed { "yes" } else { "no" };

    writeln!(
        out,
        "{} {} -> {} {}",
        actor.role, actor.id, target.role, target.id
    )?;
    writeln!(out, "  view:   {}", yes_no(can_view_user(&actor, &target)))?;
    writeln!(out, "  edit:   {}", yes_no(can_edit_user(&actor, &target)))?;
    writeln!(out, "  delete: {}", yes_no(can_delete_user(&actor, &target)))?;

    let new_roles: Vec<&str> = Role::ALL
        .into_iter()
        .filter(|role| can_change_role(&actor, &target, *role))
        .map(|role| role.as_str())
        .collect();
    writeln!(out, "  change role to: {}", list_or_none(&new_roles))?;

    let creatable: Vec<&str> = assignable_roles(&actor)
        .into_iter()
        .map(|role| role.as_str())
        .collect();
    writeln!(out, "  may create: {}", list_or_none(&creatable))?;
    Ok(())
}

fn list_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
