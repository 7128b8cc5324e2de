// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Farm stock levels

use crate::error::HerdError;
use crate::types::InventoryItem;

/// Items at or below their reorder level
#[must_use]
pub fn low_stock<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Vec<&'a InventoryItem> {
    items
        .into_iter()
        .filter(|i| i.quantity <= i.reorder_level)
        .collect()
}

/// Change an item's quantity by `delta`, refusing to go below zero
pub fn adjust(item: &mut InventoryItem, delta: f64) -> Result<f64, HerdError> {
    let next = item.quantity + delta;
    if next < 0.0 {
        return Err(HerdError::InsufficientStock {
            item: item.name.clone(),
            available: item.quantity,
            requested: -delta,
        });
    }
    item.quantity = next;
    Ok(next)
}

/// Total stock value in minor units
#[must_use]
pub fn valuation<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> i64 {
    #[allow(clippy::cast_precision_loss)]
    let total: f64 = items
        .into_iter()
        .map(|i| i.quantity * i.unit_cost_cents as f64)
        .sum();
    #[allow(clippy::cast_possible_truncation)]
    let cents = total.round() as i64;
    cents
}
