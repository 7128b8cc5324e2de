// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations
//!
//! Every command receives a [`Context`] holding the resolved data directory,
//! configuration, acting user and output options.

pub mod animal;
pub mod audit;
pub mod breeding;
pub mod completions;
pub mod config;
pub mod delegation;
pub mod export;
pub mod finance;
pub mod inventory;
pub mod lineage;
pub mod seed;
pub mod subscription;
pub mod tenant;

use crate::access;
use crate::config::Config;
use crate::herd::{Herd, HERD_FILE};
use crate::lineage::RiskLevel;
use crate::types::{Animal, Permission, User};
use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

/// Resolved settings shared by all commands
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory holding herd.json
    pub data_dir: PathBuf,
    /// Loaded configuration
    pub config: Config,
    /// Config file to write with `herdbook config`
    pub config_path: Option<PathBuf>,
    /// Email of the acting user
    pub acting_user: Option<String>,
    /// Tenant override for platform users
    pub tenant: Option<u64>,
    /// Date used for delegation windows and due dates
    pub today: NaiveDate,
    /// Print JSON instead of text
    pub json: bool,
    /// Colour risk levels
    pub color: bool,
}

impl Context {
    /// Load herd.json from the data directory, or the demo herd when absent
    pub fn load_herd(&self) -> Result<Herd> {
        if self.data_dir.join(HERD_FILE).exists() {
            Herd::load(&self.data_dir)
                .with_context(|| format!("Failed to load herd from {}", self.data_dir.display()))
        } else {
            tracing::debug!(
                "No {} in {}, using the demo herd",
                HERD_FILE,
                self.data_dir.display()
            );
            Ok(Herd::from_store(crate::seed::demo_store()))
        }
    }

    /// Write the herd back to the data directory
    pub fn save_herd(&self, herd: &Herd) -> Result<()> {
        herd.save(&self.data_dir)
            .with_context(|| format!("Failed to save herd to {}", self.data_dir.display()))
    }

    /// The user commands act as
    pub fn acting_user(&self, herd: &Herd) -> Result<User> {
        let email = self
            .acting_user
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No acting user. Pass --as <email> or set HERDBOOK_USER"))?;
        herd.user_by_email(email)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown user: {}", email))
    }

    /// Tenant a command applies to: `--tenant`, else the user's own
    pub fn tenant_for(&self, user: &User) -> Result<u64> {
        self.tenant
            .or(user.tenant_id)
            .ok_or_else(|| anyhow::anyhow!("--tenant is required for platform users"))
    }

    /// Resolve the acting user and tenant, and check a permission on it
    pub fn authorize(&self, herd: &Herd, permission: Permission) -> Result<(User, u64)> {
        let user = self.acting_user(herd)?;
        let tenant_id = self.tenant_for(&user)?;
        if herd.tenant(tenant_id).is_none() {
            anyhow::bail!("Tenant not found: {}", tenant_id);
        }
        access::authorize(
            &user,
            &herd.store.delegations,
            permission,
            Some(tenant_id),
            self.today,
        )?;
        tracing::debug!("{} authorized for {:?} on tenant {}", user.email, permission, tenant_id);
        Ok((user, tenant_id))
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("Failed to serialize output")?
        );
        Ok(())
    }

    /// Format an amount in the configured currency
    #[must_use]
    pub fn money(&self, cents: i64) -> String {
        crate::finance::format_money(cents, &self.config.currency)
    }

    /// Colour text by risk level
    #[must_use]
    pub fn paint_risk(&self, level: RiskLevel, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match level {
            RiskLevel::Low => text.green().to_string(),
            RiskLevel::Moderate => text.yellow().to_string(),
            RiskLevel::High => text.red().to_string(),
            RiskLevel::Critical => text.red().bold().to_string(),
        }
    }
}

/// Find an animal of a tenant by tag or id
pub fn resolve_animal<'a>(herd: &'a Herd, tenant_id: u64, target: &str) -> Result<&'a Animal> {
    herd.find_animal(tenant_id, target)
        .ok_or_else(|| anyhow::anyhow!("No animal matching '{}' in tenant {}", target, tenant_id))
}

/// Require a positional target
pub(crate) fn required(target: Option<String>, what: &str) -> Result<String> {
    target.ok_or_else(|| anyhow::anyhow!("{} is required", what))
}
