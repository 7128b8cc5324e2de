// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Animal commands - list, inspect, add and remove herd animals

use super::{required, resolve_animal, Context};
use crate::audit;
use crate::types::{
    next_id, Animal, AnimalStatus, AuditAction, ExternalAnimal, Permission, Sex, Species,
};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

/// Options for `herdbook animal`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AnimalOpts {
    /// Farm id (filter for list, required for add)
    #[arg(long)]
    pub farm: Option<u64>,

    /// Ear tag (add)
    #[arg(long)]
    pub tag: Option<String>,

    /// Call name (add)
    #[arg(long)]
    pub name: Option<String>,

    /// Species: cattle, sheep, goat, pig, horse
    #[arg(long)]
    pub species: Option<String>,

    /// Breed (add)
    #[arg(long)]
    pub breed: Option<String>,

    /// Sex: female or male (add)
    #[arg(long)]
    pub sex: Option<String>,

    /// Status filter for list: active, sold, deceased, culled
    #[arg(long)]
    pub status: Option<String>,

    /// Date of birth, YYYY-MM-DD (add)
    #[arg(long)]
    pub born: Option<NaiveDate>,

    /// Dam tag or id from this herd
    #[arg(long)]
    pub mother: Option<String>,

    /// Sire tag or id from this herd
    #[arg(long)]
    pub father: Option<String>,

    /// External dam id
    #[arg(long)]
    pub ext_mother: Option<u64>,

    /// External sire id
    #[arg(long)]
    pub ext_father: Option<u64>,

    /// Weight in kg
    #[arg(long)]
    pub weight: Option<f64>,

    /// Breed society registration number (add-external)
    #[arg(long)]
    pub registration: Option<String>,

    /// Stud, AI centre or seller (add-external)
    #[arg(long)]
    pub source: Option<String>,
}

/// Run animal command
pub fn run(ctx: &Context, action: &str, target: Option<String>, opts: AnimalOpts) -> Result<()> {
    let mut herd = ctx.load_herd()?;

    match action {
        "list" | "ls" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewAnimals)?;
            let species = opts.species.as_deref().map(parse_species).transpose()?;
            let status = opts
                .status
                .as_deref()
                .map(|s| AnimalStatus::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown status: {}", s)))
                .transpose()?;

            let animals: Vec<&Animal> = herd
                .animals_for(tenant_id)
                .into_iter()
                .filter(|a| opts.farm.map_or(true, |f| a.farm_id == f))
                .filter(|a| species.map_or(true, |s| a.species == s))
                .filter(|a| status.map_or(true, |s| a.status == s))
                .collect();

            if ctx.json {
                return ctx.print_json(&animals);
            }
            if animals.is_empty() {
                println!("No animals found. Use 'herdbook animal add' to register one.");
                return Ok(());
            }
            println!("Animals ({}):", animals.len());
            for a in animals {
                println!(
                    "  {:<8} {:<12} {:<7} {:<10} {:<6} {:?}",
                    a.tag_number,
                    a.display_name(),
                    format!("{:?}", a.species).to_lowercase(),
                    a.breed,
                    format!("{:?}", a.sex).to_lowercase(),
                    a.status
                );
            }
        }

        "show" | "get" => {
            let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewAnimals)?;
            let target = required(target, "Animal tag or id")?;
            let animal = resolve_animal(&herd, tenant_id, &target)?;

            if ctx.json {
                return ctx.print_json(animal);
            }
            println!("{} ({})", animal.display_name(), animal.tag_number);
            println!("  id:      {}", animal.id);
            println!("  species: {:?} / {}", animal.species, animal.breed);
            println!("  sex:     {:?}", animal.sex);
            println!("  status:  {:?}", animal.status);
            if let Some(born) = animal.birth_date {
                println!("  born:    {born}");
            }
            if let Some(farm) = herd.farm(animal.farm_id) {
                println!("  farm:    {}", farm.name);
            }
            println!("  dam:     {}", parent_label(&herd, animal.mother_animal_id, animal.external_mother_id));
            println!("  sire:    {}", parent_label(&herd, animal.father_animal_id, animal.external_father_id));
            if let Some(w) = animal.weight_kg {
                println!("  weight:  {w} kg");
            }
            if let Some(notes) = &animal.notes {
                println!("  notes:   {notes}");
            }
        }

        "add" | "create" => {
            let (user, tenant_id) = ctx.authorize(&herd, Permission::ManageAnimals)?;
            let tag = opts.tag.ok_or_else(|| anyhow::anyhow!("--tag is required"))?;
            let farm_id = opts.farm.ok_or_else(|| anyhow::anyhow!("--farm is required"))?;
            let species = parse_species(
                opts.species
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("--species is required"))?,
            )?;
            let sex = parse_sex(opts.sex.as_deref())?;
            let mother_animal_id = opts
                .mother
                .as_deref()
                .map(|m| resolve_animal(&herd, tenant_id, m).map(|a| a.id))
                .transpose()?;
            let father_animal_id = opts
                .father
                .as_deref()
                .map(|f| resolve_animal(&herd, tenant_id, f).map(|a| a.id))
                .transpose()?;

            let animal = Animal {
                id: next_id(&herd.store.animals, |a| a.id),
                tenant_id,
                farm_id,
                tag_number: tag,
                name: opts.name,
                species,
                breed: opts.breed.unwrap_or_else(|| "Unknown".to_string()),
                sex,
                birth_date: opts.born,
                status: AnimalStatus::Active,
                mother_animal_id,
                father_animal_id,
                external_mother_id: opts.ext_mother,
                external_father_id: opts.ext_father,
                weight_kg: opts.weight,
                notes: None,
            };
            let id = animal.id;
            let label = format!("{} ({})", animal.display_name(), animal.tag_number);

            herd.add_animal(animal)?;
            audit::record(
                &mut herd.store,
                Some(tenant_id),
                user.id,
                AuditAction::Create,
                "animal",
                Some(id),
                format!("Registered {label}"),
            );
            ctx.save_herd(&herd)?;

            info!("Added animal {} to tenant {}", id, tenant_id);
            println!("Added animal #{id}: {label}");
        }

        "add-external" => {
            let (user, tenant_id) = ctx.authorize(&herd, Permission::ManageAnimals)?;
            let name = opts.name.ok_or_else(|| anyhow::anyhow!("--name is required"))?;
            let species = parse_species(
                opts.species
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("--species is required"))?,
            )?;
            let sex = parse_sex(opts.sex.as_deref())?;

            let id = next_id(&herd.store.external_animals, |e| e.id);
            herd.add_external_animal(ExternalAnimal {
                id,
                tenant_id,
                name: name.clone(),
                registration_number: opts.registration,
                species,
                breed: opts.breed.unwrap_or_else(|| "Unknown".to_string()),
                sex,
                source: opts.source,
                mother_id: opts.ext_mother,
                father_id: opts.ext_father,
            })?;
            audit::record(
                &mut herd.store,
                Some(tenant_id),
                user.id,
                AuditAction::Create,
                "external_animal",
                Some(id),
                format!("Registered external {name}"),
            );
            ctx.save_herd(&herd)?;

            println!("Added external animal ext#{id}: {name}");
        }

        "remove" | "delete" | "rm" => {
            let (user, tenant_id) = ctx.authorize(&herd, Permission::ManageAnimals)?;
            let target = required(target, "Animal tag or id")?;
            let id = resolve_animal(&herd, tenant_id, &target)?.id;

            let removed = herd.remove_animal(id)?;
            audit::record(
                &mut herd.store,
                Some(tenant_id),
                user.id,
                AuditAction::Delete,
                "animal",
                Some(id),
                format!("Removed {} ({})", removed.display_name(), removed.tag_number),
            );
            ctx.save_herd(&herd)?;

            println!("Removed animal #{id}: {}", removed.tag_number);
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: list, show, add, add-external, remove", other);
        }
    }

    Ok(())
}

fn parse_species(s: &str) -> Result<Species> {
    Species::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown species: {}. Valid: cattle, sheep, goat, pig, horse", s))
}

fn parse_sex(s: Option<&str>) -> Result<Sex> {
    let s = s.ok_or_else(|| anyhow::anyhow!("--sex is required"))?;
    Sex::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown sex: {}. Valid: female, male", s))
}

fn parent_label(herd: &crate::herd::Herd, internal: Option<u64>, external: Option<u64>) -> String {
    if let Some(id) = internal {
        return herd
            .animal(id)
            .map_or_else(|| format!("#{id} (missing)"), |a| format!("{} ({})", a.display_name(), a.tag_number));
    }
    if let Some(id) = external {
        return herd
            .external_animal(id)
            .map_or_else(|| format!("ext#{id} (missing)"), |e| format!("{} [external]", e.name));
    }
    "unknown".to_string()
}
