// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Arbitrary herd.json documents must load and analyse without panicking,
//! including dangling and cyclic parent links.

#![no_main]

use herdbook::herd::Herd;
use herdbook::lineage;
use herdbook::types::HerdStore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(store) = serde_json::from_slice::<HerdStore>(data) else {
        return;
    };
    let herd = Herd::from_store(store);
    let _ = herd.to_dot(None);

    let s = &herd.store;
    for animal in s.animals.iter().take(16) {
        let _ = lineage::build_pedigree_data(animal.id, 4, &s.animals, &s.external_animals, &s.breeding_records);
        let _ = lineage::calculate_generation_number(animal.id, &s.animals, &s.external_animals);
        let _ = lineage::find_optimal_mates(animal.id, 5, &s.animals, &s.external_animals, &s.breeding_records);
    }
});
