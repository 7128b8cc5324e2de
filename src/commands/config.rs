// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use super::Context;
use crate::config;
use anyhow::Result;

/// Print a configuration value, or write it to the config file
pub fn run(ctx: &Context, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => {
            let path = ctx
                .config_path
                .clone()
                .or_else(config::default_path)
                .ok_or_else(|| anyhow::anyhow!("No config file location. Pass --config <path>"))?;
            tracing::info!("Setting {} = {}", key, v);
            config::set(&path, key, &v)?;
            println!("{key} = {v} ({})", path.display());
        }
        None => {
            tracing::debug!("Getting {}", key);
            println!("{}", config::get(&ctx.config, key)?);
        }
    }
    Ok(())
}
