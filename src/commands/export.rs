// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - exports a tenant's pedigree graph or dataset

use super::Context;
use crate::herd::Herd;
use crate::types::{AuditAction, Permission};
use anyhow::{Context as _, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT pedigree graph
    Dot,
    /// JSON dataset
    Json,
}

impl ExportFormat {
    /// Parse format from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Some(Self::Dot),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Run the export command
pub fn run(ctx: &Context, format: &str, output: Option<PathBuf>) -> Result<()> {
    info!("Exporting to {}", format);

    let export_format = ExportFormat::parse(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown export format: {}. Supported: dot, json", format))?;

    let mut herd = ctx.load_herd()?;
    let (user, tenant_id) = ctx.authorize(&herd, Permission::ViewAnimals)?;

    if herd.animals_for(tenant_id).is_empty() {
        eprintln!("Warning: tenant {tenant_id} has no animals. Run 'herdbook seed' or add some first.");
    }

    let content = match export_format {
        ExportFormat::Dot => herd.to_dot(Some(tenant_id)),
        ExportFormat::Json => Herd::from_store(herd.tenant_store(tenant_id)).to_json()?,
    };

    crate::audit::record(
        &mut herd.store,
        Some(tenant_id),
        user.id,
        AuditAction::Export,
        "herd",
        None,
        format!("Exported {format} for tenant {tenant_id}"),
    );
    ctx.save_herd(&herd)?;

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(ExportFormat::parse("DOT"), Some(ExportFormat::Dot));
        assert_eq!(ExportFormat::parse("graphviz"), Some(ExportFormat::Dot));
        assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("yaml"), None);
    }
}
