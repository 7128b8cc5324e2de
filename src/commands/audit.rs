// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Audit command - browse the audit trail

use super::Context;
use crate::audit::{self, AuditFilter};
use crate::types::{AuditAction, Permission};
use anyhow::Result;
use chrono::NaiveDate;

/// Run audit command
pub fn run(
    ctx: &Context,
    action: &str,
    user: Option<String>,
    kind: Option<String>,
    since: Option<NaiveDate>,
    limit: usize,
) -> Result<()> {
    let herd = ctx.load_herd()?;

    match action {
        "list" | "ls" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewAuditLogs)?;
            let user_id = user
                .as_deref()
                .map(|email| {
                    herd.user_by_email(email)
                        .map(|u| u.id)
                        .ok_or_else(|| anyhow::anyhow!("Unknown user: {}", email))
                })
                .transpose()?;
            let action = kind
                .as_deref()
                .map(|k| {
                    AuditAction::parse(k).ok_or_else(|| {
                        anyhow::anyhow!(
                            "Unknown audit action: {}. Valid: create, update, delete, export, delegate, revoke",
                            k
                        )
                    })
                })
                .transpose()?;

            let filter = AuditFilter {
                tenant_id: Some(tenant_id),
                user_id,
                action,
                since: since.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc()),
            };
            let logs: Vec<_> = audit::filter(&herd.store.audit_logs, &filter)
                .into_iter()
                .take(limit)
                .collect();

            if ctx.json {
                return ctx.print_json(&logs);
            }
            if logs.is_empty() {
                println!("No audit entries");
                return Ok(());
            }
            for log in logs {
                let who = herd
                    .store
                    .users
                    .iter()
                    .find(|u| u.id == log.user_id)
                    .map_or_else(|| format!("user#{}", log.user_id), |u| u.email.clone());
                println!(
                    "  {} {:<8} {:<16} {:<24} {}",
                    log.timestamp.format("%Y-%m-%d %H:%M"),
                    format!("{:?}", log.action).to_lowercase(),
                    log.entity_type,
                    who,
                    log.details
                );
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: list", other);
        }
    }

    Ok(())
}
