// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Delegation commands - temporary role grants between users

use super::{required, Context};
use crate::access;
use crate::types::{AuditAction, Permission, Role};
use anyhow::Result;
use chrono::NaiveDate;

/// Options for `herdbook delegation`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DelegationOpts {
    /// Recipient email (grant)
    #[arg(long)]
    pub to: Option<String>,

    /// Role to delegate (grant)
    #[arg(long)]
    pub role: Option<String>,

    /// Restrict the grant to one farm
    #[arg(long)]
    pub farm: Option<u64>,

    /// First day of the grant; defaults to today
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the grant; open-ended when omitted
    #[arg(long)]
    pub until: Option<NaiveDate>,
}

/// Run delegation command
pub fn run(ctx: &Context, action: &str, target: Option<String>, opts: DelegationOpts) -> Result<()> {
    let mut herd = ctx.load_herd()?;

    match action {
        "list" | "ls" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ManageUsers)?;
            let delegations: Vec<_> = herd
                .store
                .delegations
                .iter()
                .filter(|d| d.tenant_id == tenant_id)
                .collect();
            if ctx.json {
                return ctx.print_json(&delegations);
            }
            if delegations.is_empty() {
                println!("No delegations");
                return Ok(());
            }
            for d in delegations {
                let email = |id: u64| {
                    herd.store
                        .users
                        .iter()
                        .find(|u| u.id == id)
                        .map_or_else(|| format!("user#{id}"), |u| u.email.clone())
                };
                let state = if d.revoked {
                    "revoked"
                } else if d.is_active_on(ctx.today) {
                    "active"
                } else {
                    "inactive"
                };
                let until = d.ends_on.map_or_else(|| "open".to_string(), |e| e.to_string());
                println!(
                    "  #{:<3} {} -> {} as {:?} ({} to {}) {}",
                    d.id,
                    email(d.from_user_id),
                    email(d.to_user_id),
                    d.role,
                    d.starts_on,
                    until,
                    state
                );
            }
        }

        "grant" | "add" => {
            let from = ctx.acting_user(&herd)?;
            let to_email = opts.to.ok_or_else(|| anyhow::anyhow!("--to is required"))?;
            let to = herd
                .user_by_email(&to_email)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Unknown user: {}", to_email))?;
            let role_name = opts.role.ok_or_else(|| anyhow::anyhow!("--role is required"))?;
            let role = Role::parse(&role_name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown role: {}. Valid: owner, manager, veterinarian, worker, viewer",
                    role_name
                )
            })?;

            let id = access::grant_delegation(
                &mut herd.store.delegations,
                &from,
                &to,
                role,
                opts.farm,
                opts.from.unwrap_or(ctx.today),
                opts.until,
                ctx.today,
            )?;
            let tenant_id = herd.store.delegations.iter().find(|d| d.id == id).map(|d| d.tenant_id);
            crate::audit::record(
                &mut herd.store,
                tenant_id,
                from.id,
                AuditAction::Delegate,
                "delegation",
                Some(id),
                format!("Delegated {role:?} to {}", to.email),
            );
            ctx.save_herd(&herd)?;
            println!("Delegation #{id}: {} -> {} as {role:?}", from.email, to.email);
        }

        "revoke" => {
            let by = ctx.acting_user(&herd)?;
            let target = required(target, "Delegation id")?;
            let id: u64 = target
                .trim_start_matches('#')
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid delegation id: {}", target))?;

            access::revoke_delegation(&mut herd.store.delegations, id, &by, ctx.today)?;
            let tenant_id = herd.store.delegations.iter().find(|d| d.id == id).map(|d| d.tenant_id);
            crate::audit::record(
                &mut herd.store,
                tenant_id,
                by.id,
                AuditAction::Revoke,
                "delegation",
                Some(id),
                format!("Revoked delegation #{id}"),
            );
            ctx.save_herd(&herd)?;
            println!("Revoked delegation #{id}");
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: list, grant, revoke", other);
        }
    }

    Ok(())
}
