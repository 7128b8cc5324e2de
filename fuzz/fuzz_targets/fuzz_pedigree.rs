// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Random parent links, cycles included, fed straight to the lineage
//! functions; analysis must terminate and stay in range.

#![no_main]

use arbitrary::Arbitrary;
use herdbook::lineage;
use herdbook::types::{Animal, AnimalStatus, Sex, Species};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Link {
    female: bool,
    mother: Option<u8>,
    father: Option<u8>,
}

fuzz_target!(|links: Vec<Link>| {
    let animals: Vec<Animal> = links
        .iter()
        .take(64)
        .enumerate()
        .map(|(i, link)| Animal {
            id: i as u64,
            tenant_id: 1,
            farm_id: 1,
            tag_number: i.to_string(),
            name: None,
            species: Species::Sheep,
            breed: "Texel".into(),
            sex: if link.female { Sex::Female } else { Sex::Male },
            birth_date: None,
            status: AnimalStatus::Active,
            mother_animal_id: link.mother.map(u64::from),
            father_animal_id: link.father.map(u64::from),
            external_mother_id: None,
            external_father_id: None,
            weight_kg: None,
            notes: None,
        })
        .collect();

    for animal in &animals {
        if let Some(report) = lineage::build_pedigree_data(animal.id, 5, &animals, &[], &[]) {
            assert!((0.0..=1.0).contains(&report.inbreeding_coefficient));
            assert!((0.0..=100.0).contains(&report.genetic_diversity_score));
        }
        let _ = lineage::get_descendants(animal.id, 5, &[]);
    }
});
