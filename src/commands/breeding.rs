// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Breeding commands - matings, pregnancy checks and births

use super::{required, resolve_animal, Context};
use crate::breeding::{self, BreedingRequest, NewOffspring};
use crate::herd::Herd;
use crate::types::{AuditAction, BreedingMethod, Permission, Sex};
use anyhow::Result;
use chrono::NaiveDate;

/// Options for `herdbook breeding`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BreedingOpts {
    /// Dam tag or id (add)
    #[arg(long)]
    pub dam: Option<String>,

    /// Sire tag or id from the herd (add)
    #[arg(long, conflicts_with = "ext_sire")]
    pub sire: Option<String>,

    /// External sire id (add)
    #[arg(long)]
    pub ext_sire: Option<u64>,

    /// Method: natural, ai, et
    #[arg(long, default_value = "natural")]
    pub method: String,

    /// Farm id (add); defaults to the dam's farm
    #[arg(long)]
    pub farm: Option<u64>,

    /// Breeding or birth date, YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Offspring as TAG:SEX[:NAME] (birth), repeatable
    #[arg(long = "offspring")]
    pub offspring: Vec<String>,

    /// Horizon in days for `due`
    #[arg(long, default_value_t = 30)]
    pub within: i64,

    /// Notes (add)
    #[arg(long)]
    pub notes: Option<String>,
}

/// Run breeding command
pub fn run(ctx: &Context, action: &str, target: Option<String>, opts: BreedingOpts) -> Result<()> {
    let mut herd = ctx.load_herd()?;

    match action {
        "list" | "ls" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewAnimals)?;
            let records: Vec<_> = herd
                .store
                .breeding_records
                .iter()
                .filter(|r| r.tenant_id == tenant_id)
                .collect();
            if ctx.json {
                return ctx.print_json(&records);
            }
            if records.is_empty() {
                println!("No breeding records. Use 'herdbook breeding add' to record a mating.");
                return Ok(());
            }
            println!("Breeding records ({}):", records.len());
            for r in records {
                let due = r.expected_due_date.map_or_else(|| "-".to_string(), |d| d.to_string());
                println!(
                    "  #{:<3} {:<10} x {:<18} {} {:?} due {}",
                    r.id,
                    animal_label(&herd, r.female_animal_id),
                    sire_label(&herd, r.male_animal_id, r.external_male_id),
                    r.breeding_date,
                    r.status,
                    due
                );
            }
        }

        "add" | "create" => {
            let (user, tenant_id) = ctx.authorize(&herd, Permission::ManageBreeding)?;
            let dam = opts.dam.ok_or_else(|| anyhow::anyhow!("--dam is required"))?;
            let dam = resolve_animal(&herd, tenant_id, &dam)?;
            let male_animal_id = opts
                .sire
                .as_deref()
                .map(|s| resolve_animal(&herd, tenant_id, s).map(|a| a.id))
                .transpose()?;
            let method = BreedingMethod::parse(&opts.method)
                .ok_or_else(|| anyhow::anyhow!("Unknown method: {}. Valid: natural, ai, et", opts.method))?;

            let request = BreedingRequest {
                tenant_id,
                farm_id: opts.farm.unwrap_or(dam.farm_id),
                female_animal_id: dam.id,
                male_animal_id,
                external_male_id: opts.ext_sire,
                method,
                breeding_date: opts.date.unwrap_or(ctx.today),
                notes: opts.notes,
            };
            let outcome = breeding::register_breeding(&mut herd, request)?;
            crate::audit::record(
                &mut herd.store,
                Some(tenant_id),
                user.id,
                AuditAction::Create,
                "breeding_record",
                Some(outcome.record_id),
                format!("Recorded mating, due {}", outcome.expected_due_date),
            );
            ctx.save_herd(&herd)?;

            if ctx.json {
                return ctx.print_json(&outcome);
            }
            println!("Recorded breeding #{}", outcome.record_id);
            println!("  expected due: {}", outcome.expected_due_date);
            println!(
                "  inbreeding risk: {} (coi {:.4})",
                ctx.paint_risk(outcome.risk.level, &outcome.risk.level.to_string()),
                outcome.risk.coefficient
            );
        }

        "confirm" | "fail" => {
            let (user, tenant_id) = ctx.authorize(&herd, Permission::ManageBreeding)?;
            let record_id = record_in_tenant(&herd, target, tenant_id)?;
            if action == "confirm" {
                breeding::confirm_pregnancy(&mut herd, record_id)?;
            } else {
                breeding::mark_failed(&mut herd, record_id)?;
            }
            crate::audit::record(
                &mut herd.store,
                Some(tenant_id),
                user.id,
                AuditAction::Update,
                "breeding_record",
                Some(record_id),
                if action == "confirm" { "Pregnancy confirmed" } else { "Breeding failed" },
            );
            ctx.save_herd(&herd)?;
            println!(
                "Breeding #{record_id} marked {}",
                if action == "confirm" { "confirmed" } else { "failed" }
            );
        }

        "birth" => {
            let (user, tenant_id) = ctx.authorize(&herd, Permission::ManageBreeding)?;
            let record_id = record_in_tenant(&herd, target, tenant_id)?;
            if opts.offspring.is_empty() {
                anyhow::bail!("At least one --offspring TAG:SEX[:NAME] is required");
            }
            let offspring = opts
                .offspring
                .iter()
                .map(|spec| parse_offspring(spec))
                .collect::<Result<Vec<_>>>()?;

            let ids = breeding::record_birth(&mut herd, record_id, opts.date.unwrap_or(ctx.today), offspring)?;
            crate::audit::record(
                &mut herd.store,
                Some(tenant_id),
                user.id,
                AuditAction::Create,
                "birth",
                Some(record_id),
                format!("Registered {} offspring", ids.len()),
            );
            ctx.save_herd(&herd)?;

            if ctx.json {
                return ctx.print_json(&ids);
            }
            println!("Recorded birth on breeding #{record_id}");
            for id in ids {
                println!("  + {}", animal_label(&herd, id));
            }
        }

        "due" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewAnimals)?;
            let due: Vec<_> = breeding::upcoming_births(&herd.store.breeding_records, ctx.today, opts.within)
                .into_iter()
                .filter(|d| d.record.tenant_id == tenant_id)
                .collect();
            if ctx.json {
                return ctx.print_json(&due);
            }
            if due.is_empty() {
                println!("No births due within {} days", opts.within);
                return Ok(());
            }
            println!("Births due within {} days:", opts.within);
            for d in due {
                let when = if d.days_until < 0 {
                    format!("{} days overdue", -d.days_until)
                } else {
                    format!("in {} days", d.days_until)
                };
                let progress = herd
                    .animal(d.record.female_animal_id)
                    .map_or(0.0, |dam| breeding::pregnancy_progress(d.record, dam.species, ctx.today));
                println!(
                    "  #{:<3} {:<12} {} ({}, {:.0}% through gestation)",
                    d.record.id,
                    animal_label(&herd, d.record.female_animal_id),
                    d.due,
                    when,
                    progress
                );
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: list, add, confirm, fail, birth, due", other);
        }
    }

    Ok(())
}

/// Parse `TAG:SEX[:NAME]`
fn parse_offspring(spec: &str) -> Result<NewOffspring> {
    let mut parts = spec.splitn(3, ':');
    let tag = parts.next().filter(|t| !t.is_empty());
    let sex = parts.next().and_then(Sex::parse);
    match (tag, sex) {
        (Some(tag), Some(sex)) => Ok(NewOffspring {
            tag_number: tag.to_string(),
            name: parts.next().filter(|n| !n.is_empty()).map(str::to_string),
            sex,
            weight_kg: None,
        }),
        _ => anyhow::bail!("Invalid offspring '{}'. Expected TAG:SEX[:NAME]", spec),
    }
}

fn record_in_tenant(herd: &Herd, target: Option<String>, tenant_id: u64) -> Result<u64> {
    let target = required(target, "Breeding record id")?;
    let id: u64 = target
        .trim_start_matches('#')
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid record id: {}", target))?;
    match herd.breeding_record(id) {
        Some(r) if r.tenant_id == tenant_id => Ok(id),
        _ => anyhow::bail!("Breeding record #{} not found in tenant {}", id, tenant_id),
    }
}

fn animal_label(herd: &Herd, id: u64) -> String {
    herd.animal(id)
        .map_or_else(|| format!("#{id}"), |a| a.tag_number.clone())
}

fn sire_label(herd: &Herd, internal: Option<u64>, external: Option<u64>) -> String {
    match (internal, external) {
        (Some(id), _) => animal_label(herd, id),
        (None, Some(id)) => herd
            .external_animal(id)
            .map_or_else(|| format!("ext#{id}"), |e| e.name.clone()),
        (None, None) => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offspring() {
        let calf = parse_offspring("GA-020:f:Clover").unwrap();
        assert_eq!(calf.tag_number, "GA-020");
        assert_eq!(calf.sex, Sex::Female);
        assert_eq!(calf.name.as_deref(), Some("Clover"));

        let bull = parse_offspring("GA-021:male").unwrap();
        assert_eq!(bull.sex, Sex::Male);
        assert!(bull.name.is_none());

        assert!(parse_offspring("GA-022").is_err());
        assert!(parse_offspring(":f").is_err());
    }
}
