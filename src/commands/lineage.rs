// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Lineage commands - pedigree trees, inbreeding and mate selection

use super::{required, resolve_animal, Context};
use crate::herd::Herd;
use crate::lineage::{self, DescendantNode, LineageNode};
use crate::types::Permission;
use anyhow::Result;

/// Run lineage command
pub fn run(
    ctx: &Context,
    action: &str,
    target: Option<String>,
    generations: Option<u32>,
    limit: usize,
) -> Result<()> {
    let herd = ctx.load_herd()?;
    let (_, tenant_id) = ctx.authorize(&herd, Permission::ViewAnimals)?;
    let target = required(target, "Animal tag or id")?;
    let animal = resolve_animal(&herd, tenant_id, &target)?;
    let generations = generations.unwrap_or(ctx.config.pedigree_generations);
    let store = &herd.store;

    match action {
        "ancestors" | "tree" => {
            let Some(tree) = lineage::get_ancestors(animal.id, generations, &store.animals, &store.external_animals)
            else {
                anyhow::bail!("Animal #{} not found", animal.id);
            };
            if ctx.json {
                return ctx.print_json(&tree);
            }
            print_ancestors(&tree, "", "");
            println!("\n{} ancestor(s) across {} generation(s)", tree.ancestor_count(), tree.depth());
        }

        "descendants" => {
            let forest = lineage::get_descendants(animal.id, generations, &store.breeding_records);
            if ctx.json {
                return ctx.print_json(&forest);
            }
            println!("{} ({})", animal.display_name(), animal.tag_number);
            if forest.is_empty() {
                println!("  no recorded offspring");
            }
            print_descendants(&herd, &forest, 1);
        }

        "pedigree" | "report" => {
            let Some(report) = lineage::build_pedigree_data(
                animal.id,
                generations,
                &store.animals,
                &store.external_animals,
                &store.breeding_records,
            ) else {
                anyhow::bail!("Animal #{} not found", animal.id);
            };
            if ctx.json {
                return ctx.print_json(&report);
            }
            println!("Pedigree report: {} ({})", animal.display_name(), animal.tag_number);
            println!(
                "  completeness:      {:.1}% ({}/{} ancestors)",
                report.completeness_percent, report.ancestors_tracked, report.possible_ancestors
            );
            println!("  generation:        {}", report.generation_number);
            println!("  descendants:       {}", report.descendant_count);
            println!("  coefficient:       {:.4}", report.inbreeding_coefficient);
            println!("  diversity score:   {:.1}", report.genetic_diversity_score);
            println!(
                "  risk:              {}",
                ctx.paint_risk(report.risk.level, &report.risk.level.to_string())
            );
            if !report.common_ancestors.is_empty() {
                let names: Vec<String> = report.common_ancestors.iter().map(ToString::to_string).collect();
                println!("  common ancestors:  {}", names.join(", "));
            }
            println!();
            print_ancestors(&report.tree, "", "");
        }

        "inbreeding" | "coi" => {
            let common = lineage::find_common_ancestors(animal.id, &store.animals, &store.external_animals);
            let coefficient =
                lineage::calculate_inbreeding_coefficient(animal.id, &store.animals, &store.external_animals);
            let risk = lineage::assess_inbreeding_risk(coefficient);
            if ctx.json {
                return ctx.print_json(&serde_json::json!({
                    "animal_id": animal.id,
                    "common_ancestors": common,
                    "coefficient": coefficient,
                    "risk": risk,
                }));
            }
            println!("{} ({})", animal.display_name(), animal.tag_number);
            println!("  coefficient: {coefficient:.4}");
            println!("  risk:        {}", ctx.paint_risk(risk.level, &risk.level.to_string()));
            println!("  {}", risk.message);
            for ancestor in &common {
                println!("  shared: {}", ref_label(&herd, *ancestor));
            }
            for rec in &risk.recommendations {
                println!("  - {rec}");
            }
        }

        "mates" => {
            let candidates = lineage::find_optimal_mates(
                animal.id,
                limit,
                &store.animals,
                &store.external_animals,
                &store.breeding_records,
            );
            if ctx.json {
                return ctx.print_json(&candidates);
            }
            if candidates.is_empty() {
                println!("No eligible sires for {}", animal.display_name());
                return Ok(());
            }
            println!("Suggested sires for {} ({}):", animal.display_name(), animal.tag_number);
            for c in &candidates {
                println!(
                    "  {:>5.1}  {:<20} {:<10} coi {:.4}  {}",
                    c.compatibility_score,
                    format!("{} {}", c.name, c.sire),
                    c.breed,
                    c.projected_coefficient,
                    ctx.paint_risk(c.risk_level, &c.risk_level.to_string())
                );
                for note in &c.notes {
                    println!("         {note}");
                }
            }
        }

        "generation" | "gen" => {
            let number = lineage::calculate_generation_number(animal.id, &store.animals, &store.external_animals);
            if ctx.json {
                return ctx.print_json(&serde_json::json!({ "animal_id": animal.id, "generation": number }));
            }
            println!("{} ({}) is generation {}", animal.display_name(), animal.tag_number, number);
        }

        other => {
            anyhow::bail!(
                "Unknown action: {}. Valid: ancestors, descendants, pedigree, inbreeding, mates, generation",
                other
            );
        }
    }

    Ok(())
}

fn print_ancestors(node: &LineageNode, prefix: &str, role: &str) {
    println!(
        "{prefix}{role}{} ({}) {} {:?}",
        node.name, node.identifier, node.breed, node.sex
    );
    let child_prefix = format!("{prefix}    ");
    if let Some(mother) = &node.mother {
        print_ancestors(mother, &child_prefix, "dam: ");
    }
    if let Some(father) = &node.father {
        print_ancestors(father, &child_prefix, "sire: ");
    }
}

fn print_descendants(herd: &Herd, nodes: &[DescendantNode], depth: usize) {
    for node in nodes {
        let label = herd
            .animal(node.animal_id)
            .map_or_else(|| format!("#{}", node.animal_id), |a| format!("{} ({})", a.display_name(), a.tag_number));
        println!("{}{} [record {}]", "    ".repeat(depth), label, node.record_id);
        print_descendants(herd, &node.offspring, depth + 1);
    }
}

fn ref_label(herd: &Herd, subject: lineage::AnimalRef) -> String {
    match subject {
        lineage::AnimalRef::Internal(id) => herd
            .animal(id)
            .map_or_else(|| subject.to_string(), |a| format!("{} ({})", a.display_name(), a.tag_number)),
        lineage::AnimalRef::External(id) => herd
            .external_animal(id)
            .map_or_else(|| subject.to_string(), |e| format!("{} [external]", e.name)),
    }
}
