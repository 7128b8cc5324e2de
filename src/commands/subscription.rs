// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Subscription commands - plan, usage and invoice preview

use super::Context;
use crate::subscription;
use crate::types::Permission;
use anyhow::Result;

/// Run subscription command
pub fn run(ctx: &Context, action: &str) -> Result<()> {
    let herd = ctx.load_herd()?;
    let (_, tenant_id) = ctx.authorize(&herd, Permission::ManageSubscriptions)?;
    let sub = herd
        .store
        .subscriptions
        .iter()
        .find(|s| s.tenant_id == tenant_id)
        .ok_or_else(|| anyhow::anyhow!("Tenant {} has no subscription", tenant_id))?;

    match action {
        "show" => {
            let limits = sub.plan.limits();
            if ctx.json {
                return ctx.print_json(&serde_json::json!({
                    "subscription": sub,
                    "limits": limits,
                    "entitled": subscription::is_entitled(sub),
                    "days_until_renewal": subscription::days_until_renewal(sub, ctx.today),
                }));
            }
            let limit = |l: Option<usize>| l.map_or_else(|| "unlimited".to_string(), |n| n.to_string());
            println!("Plan:     {:?} ({:?})", sub.plan, sub.billing_cycle);
            println!("Status:   {:?}", sub.status);
            println!("Price:    {}", ctx.money(sub.plan.price_cents(sub.billing_cycle)));
            println!(
                "Renews:   {} ({} days)",
                sub.renews_on,
                subscription::days_until_renewal(sub, ctx.today)
            );
            println!(
                "Limits:   {} animals, {} farms, {} users",
                limit(limits.max_animals),
                limit(limits.max_farms),
                limit(limits.max_users)
            );
            if !subscription::is_entitled(sub) {
                println!("Warning: subscription is not in good standing");
            }
        }

        "usage" => {
            let used = subscription::usage(&herd.store, tenant_id);
            let exceeded = subscription::check_limits(sub.plan, &used);
            if ctx.json {
                return ctx.print_json(&serde_json::json!({ "usage": used, "exceeded": exceeded }));
            }
            println!("Usage: {} animals, {} farms, {} users", used.animals, used.farms, used.users);
            if exceeded.is_empty() {
                println!("Within {:?} plan limits", sub.plan);
            }
            for e in exceeded {
                println!("Over limit: {} {} of {}", e.resource, e.used, e.limit);
            }
        }

        "invoice" => {
            let invoice = subscription::invoice_preview(sub, ctx.config.tax_rate_percent);
            if ctx.json {
                return ctx.print_json(&invoice);
            }
            println!("Invoice preview for period starting {}", invoice.period_start);
            println!("  {:?} plan, {:?}", invoice.plan, invoice.billing_cycle);
            println!("  subtotal: {}", ctx.money(invoice.subtotal_cents));
            println!("  tax ({}%): {}", invoice.tax_rate_percent, ctx.money(invoice.tax_cents));
            println!("  total:    {}", ctx.money(invoice.total_cents));
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: show, usage, invoice", other);
        }
    }

    Ok(())
}
