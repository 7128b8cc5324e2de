// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Seed command - write the demo herd to the data directory

use super::Context;
use crate::herd::{Herd, HERD_FILE};
use crate::seed::demo_store;
use anyhow::Result;

/// Run seed command
pub fn run(ctx: &Context, force: bool) -> Result<()> {
    let path = ctx.data_dir.join(HERD_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists. Use --force to overwrite", path.display());
    }

    let herd = Herd::from_store(demo_store());
    ctx.save_herd(&herd)?;

    tracing::info!("Seeded {}", path.display());
    println!(
        "Seeded {} tenants, {} animals and {} breeding records into {}",
        herd.store.tenants.len(),
        herd.store.animals.len(),
        herd.store.breeding_records.len(),
        path.display()
    );
    Ok(())
}
