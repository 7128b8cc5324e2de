// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Finance command - expense and sales summaries

use super::Context;
use crate::finance::{self, FinanceFilter};
use crate::types::Permission;
use anyhow::Result;
use chrono::NaiveDate;

/// Run finance command
pub fn run(
    ctx: &Context,
    action: &str,
    farm: Option<u64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let herd = ctx.load_herd()?;

    match action {
        "summary" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewFinance)?;
            if let (Some(from), Some(to)) = (from, to) {
                if to < from {
                    anyhow::bail!("--to {} is before --from {}", to, from);
                }
            }
            let filter = FinanceFilter { tenant_id, farm_id: farm, from, to };
            let summary = finance::summarize(&herd.store.expenses, &herd.store.sales, &filter);

            if ctx.json {
                return ctx.print_json(&summary);
            }
            println!("Finance summary for tenant {tenant_id}");
            println!("  sales:    {} ({} records)", ctx.money(summary.total_sales_cents), summary.sale_count);
            println!("  expenses: {} ({} records)", ctx.money(summary.total_expenses_cents), summary.expense_count);
            println!("  net:      {}", ctx.money(summary.net_profit_cents));

            if !summary.expenses_by_category.is_empty() {
                println!("\nExpenses by category:");
                for (category, cents) in &summary.expenses_by_category {
                    println!("  {:<12} {}", format!("{category:?}"), ctx.money(*cents));
                }
            }
            if !summary.monthly.is_empty() {
                println!("\nMonthly:");
                for (month, totals) in &summary.monthly {
                    println!(
                        "  {month}  sales {}  expenses {}",
                        ctx.money(totals.sales_cents),
                        ctx.money(totals.expenses_cents)
                    );
                }
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: summary", other);
        }
    }

    Ok(())
}
