// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tenant commands - platform administration for super admins

use super::{required, Context};
use crate::access;
use crate::herd::Herd;
use crate::subscription;
use crate::types::{AuditAction, Permission, Tenant, TenantStatus, User};
use anyhow::Result;

/// Run tenant command
pub fn run(ctx: &Context, action: &str, target: Option<String>) -> Result<()> {
    let mut herd = ctx.load_herd()?;
    let admin = platform_admin(ctx, &herd)?;

    match action {
        "list" | "ls" => {
            if ctx.json {
                return ctx.print_json(&herd.store.tenants);
            }
            println!("Tenants ({}):", herd.store.tenants.len());
            for t in &herd.store.tenants {
                let plan = herd
                    .store
                    .subscriptions
                    .iter()
                    .find(|s| s.tenant_id == t.id)
                    .map_or_else(|| "none".to_string(), |s| format!("{:?}/{:?}", s.plan, s.status));
                let used = subscription::usage(&herd.store, t.id);
                println!(
                    "  #{:<3} {:<28} {:<10} {:<22} {} animals, {} farms, {} users",
                    t.id,
                    t.name,
                    format!("{:?}", t.status).to_lowercase(),
                    plan,
                    used.animals,
                    used.farms,
                    used.users
                );
            }
        }

        "show" | "get" => {
            let tenant = find_tenant(&herd, target)?;
            let used = subscription::usage(&herd.store, tenant.id);
            let sub = herd.store.subscriptions.iter().find(|s| s.tenant_id == tenant.id);

            if ctx.json {
                return ctx.print_json(&serde_json::json!({
                    "tenant": tenant,
                    "subscription": sub,
                    "usage": used,
                }));
            }
            println!("{} ({})", tenant.name, tenant.slug);
            println!("  id:       {}", tenant.id);
            println!("  contact:  {}", tenant.contact_email);
            println!("  status:   {:?}", tenant.status);
            println!("  created:  {}", tenant.created_on);
            if let Some(sub) = sub {
                println!("  plan:     {:?} ({:?}, {:?})", sub.plan, sub.status, sub.billing_cycle);
            }
            println!("  usage:    {} animals, {} farms, {} users", used.animals, used.farms, used.users);
            for farm in herd.farms_for(tenant.id) {
                println!("  farm #{}: {} ({}, {} ha)", farm.id, farm.name, farm.location, farm.size_hectares);
            }
        }

        "suspend" | "activate" => {
            let id = find_tenant(&herd, target)?.id;
            let status = if action == "suspend" {
                TenantStatus::Suspended
            } else {
                TenantStatus::Active
            };
            if let Some(tenant) = herd.store.tenants.iter_mut().find(|t| t.id == id) {
                tenant.status = status;
            }
            crate::audit::record(
                &mut herd.store,
                Some(id),
                admin.id,
                AuditAction::Update,
                "tenant",
                Some(id),
                format!("Tenant status set to {status:?}"),
            );
            ctx.save_herd(&herd)?;
            println!("Tenant #{id} is now {}", format!("{status:?}").to_lowercase());
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: list, show, suspend, activate", other);
        }
    }

    Ok(())
}

/// The acting user, required to hold ManageTenants at platform level
fn platform_admin(ctx: &Context, herd: &Herd) -> Result<User> {
    let user = ctx.acting_user(herd)?;
    access::authorize(&user, &herd.store.delegations, Permission::ManageTenants, None, ctx.today)?;
    Ok(user)
}

/// Find a tenant by id or slug
fn find_tenant(herd: &Herd, target: Option<String>) -> Result<&Tenant> {
    let target = required(target, "Tenant id or slug")?;
    herd.store
        .tenants
        .iter()
        .find(|t| t.slug.eq_ignore_ascii_case(&target) || t.id.to_string() == target)
        .ok_or_else(|| anyhow::anyhow!("Tenant not found: {}", target))
}
