// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Inventory commands - stock levels and adjustments

use super::{required, Context};
use crate::inventory;
use crate::types::{AuditAction, InventoryItem, Permission};
use anyhow::Result;

/// Run inventory command
pub fn run(
    ctx: &Context,
    action: &str,
    target: Option<String>,
    delta: Option<f64>,
    farm: Option<u64>,
) -> Result<()> {
    let mut herd = ctx.load_herd()?;

    match action {
        "list" | "ls" | "low" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewAnimals)?;
            let items: Vec<&InventoryItem> = herd
                .store
                .inventory
                .iter()
                .filter(|i| i.tenant_id == tenant_id)
                .filter(|i| farm.map_or(true, |f| i.farm_id == f))
                .collect();
            let items = if action == "low" {
                inventory::low_stock(items)
            } else {
                items
            };

            if ctx.json {
                return ctx.print_json(&items);
            }
            if items.is_empty() {
                println!("{}", if action == "low" { "Nothing below reorder level" } else { "No inventory items" });
                return Ok(());
            }
            let value = inventory::valuation(items.iter().copied());
            for item in &items {
                let flag = if item.quantity <= item.reorder_level { " LOW" } else { "" };
                println!(
                    "  #{:<3} {:<22} {:>8.1} {:<8} reorder at {}{}",
                    item.id, item.name, item.quantity, item.unit, item.reorder_level, flag
                );
            }
            println!("\n{} item(s), stock value {}", items.len(), ctx.money(value));
        }

        "adjust" => {
            let (user, tenant_id) = ctx.authorize(&herd, Permission::ManageInventory)?;
            let target = required(target, "Inventory item id")?;
            let delta = delta.ok_or_else(|| anyhow::anyhow!("--delta is required"))?;
            let id: u64 = target
                .trim_start_matches('#')
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid item id: {}", target))?;

            let item = herd
                .store
                .inventory
                .iter_mut()
                .find(|i| i.id == id && i.tenant_id == tenant_id)
                .ok_or_else(|| anyhow::anyhow!("Inventory item #{} not found in tenant {}", id, tenant_id))?;
            let quantity = inventory::adjust(item, delta)?;
            let details = format!("{} adjusted by {delta} to {quantity} {}", item.name, item.unit);

            crate::audit::record(
                &mut herd.store,
                Some(tenant_id),
                user.id,
                AuditAction::Update,
                "inventory_item",
                Some(id),
                details.clone(),
            );
            ctx.save_herd(&herd)?;
            println!("{details}");
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: list, low, adjust", other);
        }
    }

    Ok(())
}
