// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Roles, permissions and delegation

use crate::error::HerdError;
use crate::types::{next_id, Delegation, Permission, Role, User};
use chrono::NaiveDate;

impl Role {
    /// Permissions granted by this role
    #[must_use]
    pub fn permissions(self) -> &'static [Permission] {
        use Permission as P;
        match self {
            Self::SuperAdmin => &[
                P::ViewAnimals,
                P::ManageAnimals,
                P::ManageBreeding,
                P::ViewFinance,
                P::ManageFinance,
                P::ManageInventory,
                P::ManageUsers,
                P::ViewAuditLogs,
                P::ManageTenants,
                P::ManageSubscriptions,
            ],
            Self::Owner => &[
                P::ViewAnimals,
                P::ManageAnimals,
                P::ManageBreeding,
                P::ViewFinance,
                P::ManageFinance,
                P::ManageInventory,
                P::ManageUsers,
                P::ViewAuditLogs,
                P::ManageSubscriptions,
            ],
            Self::Manager => &[
                P::ViewAnimals,
                P::ManageAnimals,
                P::ManageBreeding,
                P::ViewFinance,
                P::ManageFinance,
                P::ManageInventory,
                P::ManageUsers,
            ],
            Self::Veterinarian => &[P::ViewAnimals, P::ManageBreeding, P::ManageInventory],
            Self::Worker => &[P::ViewAnimals, P::ManageInventory],
            Self::Viewer => &[P::ViewAnimals],
        }
    }

    /// Whether this role grants a permission
    #[must_use]
    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Parse a role name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "super_admin" | "superadmin" => Some(Self::SuperAdmin),
            "owner" => Some(Self::Owner),
            "manager" => Some(Self::Manager),
            "veterinarian" | "vet" => Some(Self::Veterinarian),
            "worker" => Some(Self::Worker),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}

impl Delegation {
    /// Whether the grant applies on a date
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        !self.revoked && self.starts_on <= date && self.ends_on.map_or(true, |end| date <= end)
    }
}

/// The user's own role plus roles delegated to them and active on `on`,
/// most powerful first
#[must_use]
pub fn effective_roles(user: &User, delegations: &[Delegation], on: NaiveDate) -> Vec<Role> {
    let mut roles: Vec<Role> = std::iter::once(user.role)
        .chain(
            delegations
                .iter()
                .filter(|d| d.to_user_id == user.id && d.is_active_on(on))
                .filter(|d| user.tenant_id == Some(d.tenant_id))
                .map(|d| d.role),
        )
        .collect();
    roles.sort();
    roles.dedup();
    roles
}

/// Check that `user` may exercise `permission` on `tenant_id`
///
/// Super admins pass for every tenant. Everyone else must belong to the
/// tenant and hold the permission through an effective role. `tenant_id`
/// of `None` is a platform-level action.
pub fn authorize(
    user: &User,
    delegations: &[Delegation],
    permission: Permission,
    tenant_id: Option<u64>,
    today: NaiveDate,
) -> Result<(), HerdError> {
    if user.role == Role::SuperAdmin {
        return Ok(());
    }
    match (tenant_id, user.tenant_id) {
        (Some(target), Some(own)) if target == own => {}
        (Some(target), _) => {
            return Err(HerdError::TenantMismatch {
                user_id: user.id,
                tenant_id: target,
            })
        }
        (None, _) => {}
    }

    let roles = effective_roles(user, delegations, today);
    if roles.iter().any(|r| r.allows(permission)) {
        Ok(())
    } else {
        Err(HerdError::PermissionDenied {
            role: roles.first().copied().unwrap_or(user.role),
            permission,
        })
    }
}

/// Delegate `role` from one user to another
///
/// The grantor must hold `ManageUsers` on `today`; the grant window itself
/// may start later.
#[allow(clippy::too_many_arguments)]
pub fn grant_delegation(
    delegations: &mut Vec<Delegation>,
    from: &User,
    to: &User,
    role: Role,
    farm_id: Option<u64>,
    starts_on: NaiveDate,
    ends_on: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<u64, HerdError> {
    let tenant_id = from
        .tenant_id
        .or(to.tenant_id)
        .ok_or_else(|| HerdError::invalid("delegation", "delegation needs a tenant"))?;

    authorize(from, delegations, Permission::ManageUsers, Some(tenant_id), today)?;
    if to.tenant_id != Some(tenant_id) {
        return Err(HerdError::TenantMismatch {
            user_id: to.id,
            tenant_id,
        });
    }
    if from.id == to.id {
        return Err(HerdError::invalid("delegation", "cannot delegate to yourself"));
    }
    if role == Role::SuperAdmin || (from.role != Role::SuperAdmin && role < from.role) {
        return Err(HerdError::invalid(
            "delegation",
            format!("{:?} cannot delegate the {role:?} role", from.role),
        ));
    }
    if ends_on.is_some_and(|end| end < starts_on) {
        return Err(HerdError::invalid("delegation", "end date is before start date"));
    }

    let id = next_id(delegations, |d| d.id);
    delegations.push(Delegation {
        id,
        tenant_id,
        farm_id,
        from_user_id: from.id,
        to_user_id: to.id,
        role,
        starts_on,
        ends_on,
        revoked: false,
    });
    Ok(id)
}

/// Revoke a delegation
pub fn revoke_delegation(
    delegations: &mut [Delegation],
    id: u64,
    by: &User,
    today: NaiveDate,
) -> Result<(), HerdError> {
    let tenant_id = delegations
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.tenant_id)
        .ok_or(HerdError::NotFound { entity: "delegation", id })?;
    authorize(by, delegations, Permission::ManageUsers, Some(tenant_id), today)?;

    let delegation = delegations
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or(HerdError::NotFound { entity: "delegation", id })?;
    if delegation.revoked {
        return Err(HerdError::invalid("delegation", format!("delegation {id} is already revoked")));
    }
    delegation.revoked = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_store;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn user(store: &crate::types::HerdStore, id: u64) -> User {
        store.users.iter().find(|u| u.id == id).unwrap().clone()
    }

    #[test]
    fn test_role_matrix() {
        assert!(Role::Owner.allows(Permission::ViewAuditLogs));
        assert!(!Role::Owner.allows(Permission::ManageTenants));
        assert!(Role::Veterinarian.allows(Permission::ManageBreeding));
        assert!(!Role::Worker.allows(Permission::ManageAnimals));
        assert!(!Role::Viewer.allows(Permission::ViewFinance));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(Role::parse("Super-Admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("vet"), Some(Role::Veterinarian));
        assert_eq!(Role::parse("janitor"), None);
    }

    #[test]
    fn test_delegation_extends_worker() {
        let store = demo_store();
        let walt = user(&store, 5);
        let today = date(2025, 6, 1);
        assert_eq!(effective_roles(&walt, &store.delegations, today), vec![Role::Manager, Role::Worker]);
        assert!(authorize(&walt, &store.delegations, Permission::ManageAnimals, Some(1), today).is_ok());
        // before the delegation starts
        assert!(authorize(&walt, &store.delegations, Permission::ManageAnimals, Some(1), date(2024, 12, 31)).is_err());
    }

    #[test]
    fn test_revoked_delegation_ignored() {
        let store = demo_store();
        let vera = user(&store, 4);
        assert_eq!(effective_roles(&vera, &store.delegations, date(2024, 7, 1)), vec![Role::Veterinarian]);
    }

    #[test]
    fn test_cross_tenant_denied() {
        let store = demo_store();
        let olivia = user(&store, 2);
        let err = authorize(&olivia, &store.delegations, Permission::ViewAnimals, Some(2), date(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, HerdError::TenantMismatch { user_id: 2, tenant_id: 2 }));
        let ada = user(&store, 1);
        assert!(authorize(&ada, &store.delegations, Permission::ManageTenants, Some(2), date(2025, 6, 1)).is_ok());
    }

    #[test]
    fn test_grant_and_revoke() {
        let mut store = demo_store();
        let marco = user(&store, 3);
        let vera = user(&store, 4);
        let walt = user(&store, 5);
        let start = date(2025, 6, 1);

        // managers cannot hand out the owner role
        assert!(grant_delegation(&mut store.delegations, &marco, &vera, Role::Owner, None, start, None, start).is_err());
        // workers cannot delegate at all without their delegated manager role
        let before = date(2024, 1, 1);
        assert!(grant_delegation(&mut store.delegations, &walt, &vera, Role::Worker, None, before, None, before).is_err());

        let id = grant_delegation(&mut store.delegations, &marco, &vera, Role::Manager, Some(1), start, Some(date(2025, 6, 30)), start).unwrap();
        assert!(effective_roles(&vera, &store.delegations, date(2025, 6, 15)).contains(&Role::Manager));

        revoke_delegation(&mut store.delegations, id, &marco, start).unwrap();
        assert!(!effective_roles(&vera, &store.delegations, date(2025, 6, 15)).contains(&Role::Manager));
        assert!(revoke_delegation(&mut store.delegations, id, &marco, start).is_err());
    }

    #[test]
    fn test_grant_checks_authority_on_current_date() {
        let mut store = demo_store();
        // Walt's manager delegation ended in January
        store.delegations[0].ends_on = Some(date(2025, 1, 31));
        let walt = user(&store, 5);
        let vera = user(&store, 4);
        let today = date(2025, 6, 1);
        assert!(authorize(&walt, &store.delegations, Permission::ManageUsers, Some(1), today).is_err());

        // backdating the grant into the old window does not help
        let err = grant_delegation(
            &mut store.delegations,
            &walt,
            &vera,
            Role::Worker,
            None,
            date(2025, 1, 15),
            None,
            today,
        )
        .unwrap_err();
        assert!(matches!(err, HerdError::PermissionDenied { .. }));
        assert_eq!(store.delegations.len(), 2);
        assert_eq!(effective_roles(&vera, &store.delegations, today), vec![Role::Veterinarian]);
    }
}
