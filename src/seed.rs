// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Built-in demo dataset
//!
//! Two tenants: a cattle operation with a three-generation pedigree
//! (including a full-sibling mating) and a small sheep flock on trial.

use crate::types::{
    Activity, ActivityKind, Animal, AnimalStatus, AuditAction, AuditLog, BillingCycle,
    BreedingMethod, BreedingRecord, Delegation, Expense, ExpenseCategory, ExternalAnimal, Farm,
    HerdStore, InventoryCategory, InventoryItem, PlanTier, PregnancyStatus, Role, Sale, Sex,
    Species, Subscription, SubscriptionStatus, Tenant, TenantStatus, User,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> DateTime<Utc> {
    let naive = date(y, m, d).and_hms_opt(hour, min, 0).unwrap_or_default();
    Utc.from_utc_datetime(&naive)
}

#[allow(clippy::too_many_arguments)]
fn animal(
    id: u64,
    tenant_id: u64,
    farm_id: u64,
    tag: &str,
    name: &str,
    species: Species,
    breed: &str,
    sex: Sex,
    born: NaiveDate,
) -> Animal {
    Animal {
        id,
        tenant_id,
        farm_id,
        tag_number: tag.into(),
        name: Some(name.into()),
        species,
        breed: breed.into(),
        sex,
        birth_date: Some(born),
        status: AnimalStatus::Active,
        mother_animal_id: None,
        father_animal_id: None,
        external_mother_id: None,
        external_father_id: None,
        weight_kg: None,
        notes: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn mating(
    id: u64,
    tenant_id: u64,
    farm_id: u64,
    female: u64,
    male: Option<u64>,
    external_male: Option<u64>,
    method: BreedingMethod,
    bred: NaiveDate,
    species: Species,
) -> BreedingRecord {
    BreedingRecord {
        id,
        tenant_id,
        farm_id,
        female_animal_id: female,
        male_animal_id: male,
        external_male_id: external_male,
        method,
        breeding_date: bred,
        status: PregnancyStatus::Bred,
        expected_due_date: Some(crate::breeding::expected_due_date(species, bred)),
        actual_birth_date: None,
        offspring_ids: Vec::new(),
        notes: None,
    }
}

fn delivered(record: BreedingRecord, born: NaiveDate, offspring: &[u64]) -> BreedingRecord {
    BreedingRecord {
        status: PregnancyStatus::Delivered,
        actual_birth_date: Some(born),
        offspring_ids: offspring.to_vec(),
        ..record
    }
}

/// The demo dataset
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn demo_store() -> HerdStore {
    use ActivityKind as A;
    use BreedingMethod::{ArtificialInsemination as Ai, Natural};
    use ExpenseCategory as E;
    use Sex::{Female, Male};
    use Species::{Cattle, Sheep};

    let tenants = vec![
        Tenant {
            id: 1,
            name: "Green Acres Cattle Co".into(),
            slug: "green-acres".into(),
            contact_email: "owner@greenacres.test".into(),
            status: TenantStatus::Active,
            created_on: date(2024, 1, 1),
        },
        Tenant {
            id: 2,
            name: "Highland Sheep Collective".into(),
            slug: "highland".into(),
            contact_email: "owner@highland.test".into(),
            status: TenantStatus::Active,
            created_on: date(2025, 5, 1),
        },
    ];

    let subscriptions = vec![
        Subscription {
            id: 1,
            tenant_id: 1,
            plan: PlanTier::Professional,
            status: SubscriptionStatus::Active,
            billing_cycle: BillingCycle::Monthly,
            started_on: date(2024, 1, 1),
            renews_on: date(2025, 7, 1),
        },
        Subscription {
            id: 2,
            tenant_id: 2,
            plan: PlanTier::Basic,
            status: SubscriptionStatus::Trial,
            billing_cycle: BillingCycle::Monthly,
            started_on: date(2025, 5, 1),
            renews_on: date(2025, 5, 31),
        },
    ];

    let farms = vec![
        Farm { id: 1, tenant_id: 1, name: "Home Farm".into(), location: "Willow Creek Valley".into(), size_hectares: 240.0 },
        Farm { id: 2, tenant_id: 1, name: "River Paddocks".into(), location: "Lower Willow Creek".into(), size_hectares: 85.5 },
        Farm { id: 3, tenant_id: 2, name: "Hillside".into(), location: "Glen Morrow".into(), size_hectares: 410.0 },
    ];

    let users = vec![
        User { id: 1, tenant_id: None, name: "Ada Admin".into(), email: "admin@herdbook.test".into(), role: Role::SuperAdmin },
        User { id: 2, tenant_id: Some(1), name: "Olivia Owner".into(), email: "owner@greenacres.test".into(), role: Role::Owner },
        User { id: 3, tenant_id: Some(1), name: "Marco Manager".into(), email: "manager@greenacres.test".into(), role: Role::Manager },
        User { id: 4, tenant_id: Some(1), name: "Vera Vet".into(), email: "vet@greenacres.test".into(), role: Role::Veterinarian },
        User { id: 5, tenant_id: Some(1), name: "Walt Worker".into(), email: "worker@greenacres.test".into(), role: Role::Worker },
        User { id: 6, tenant_id: Some(2), name: "Hana Highland".into(), email: "owner@highland.test".into(), role: Role::Owner },
    ];

    let external_animals = vec![
        ExternalAnimal {
            id: 1,
            tenant_id: 1,
            name: "Highfield Resolute".into(),
            registration_number: Some("AAA-1984211".into()),
            species: Cattle,
            breed: "Angus".into(),
            sex: Male,
            source: Some("Highfield Genetics".into()),
            mother_id: None,
            father_id: None,
        },
        ExternalAnimal {
            id: 2,
            tenant_id: 1,
            name: "Bar Seven Legend".into(),
            registration_number: Some("HER-4471930".into()),
            species: Cattle,
            breed: "Hereford".into(),
            sex: Male,
            source: Some("Bar Seven Ranch".into()),
            mother_id: None,
            father_id: None,
        },
        ExternalAnimal {
            id: 3,
            tenant_id: 2,
            name: "Glen Lassie".into(),
            registration_number: None,
            species: Sheep,
            breed: "Cheviot".into(),
            sex: Female,
            source: Some("Glen Morrow sale".into()),
            mother_id: None,
            father_id: None,
        },
    ];

    let animals = vec![
        animal(1, 1, 1, "GA-001", "Daisy", Cattle, "Angus", Female, date(2018, 3, 12)),
        Animal { weight_kg: Some(910.0), ..animal(2, 1, 1, "GA-002", "Titan", Cattle, "Angus", Male, date(2017, 5, 2)) },
        Animal {
            external_father_id: Some(1),
            mother_animal_id: Some(1),
            ..animal(3, 1, 1, "GA-003", "Bella", Cattle, "Angus", Female, date(2020, 3, 19))
        },
        Animal {
            external_father_id: Some(1),
            mother_animal_id: Some(1),
            ..animal(4, 1, 1, "GA-004", "Duke", Cattle, "Angus", Male, date(2020, 3, 19))
        },
        Animal {
            mother_animal_id: Some(3),
            father_animal_id: Some(4),
            weight_kg: Some(412.0),
            notes: Some("Full-sibling mating, not for breeding".into()),
            ..animal(5, 1, 1, "GA-005", "Rosie", Cattle, "Angus", Female, date(2022, 2, 27))
        },
        animal(6, 1, 2, "GA-006", "Maple", Cattle, "Hereford", Female, date(2019, 4, 8)),
        Animal {
            mother_animal_id: Some(6),
            father_animal_id: Some(2),
            ..animal(7, 1, 2, "GA-007", "Ranger", Cattle, "Hereford x Angus", Male, date(2021, 3, 10))
        },
        Animal {
            mother_animal_id: Some(6),
            external_father_id: Some(2),
            ..animal(8, 1, 2, "GA-008", "Willow", Cattle, "Hereford", Female, date(2022, 2, 22))
        },
        Animal {
            status: AnimalStatus::Sold,
            ..animal(9, 1, 1, "GA-009", "Old Bess", Cattle, "Angus", Female, date(2012, 9, 30))
        },
        Animal {
            external_mother_id: Some(3),
            ..animal(10, 2, 3, "HS-010", "Fern", Sheep, "Cheviot", Female, date(2021, 4, 2))
        },
        animal(11, 2, 3, "HS-011", "Brodie", Sheep, "Cheviot", Male, date(2020, 3, 28)),
        Animal {
            mother_animal_id: Some(10),
            father_animal_id: Some(11),
            ..animal(12, 2, 3, "HS-012", "Thistle", Sheep, "Cheviot", Female, date(2025, 2, 25))
        },
    ];

    let breeding_records = vec![
        delivered(mating(1, 1, 1, 1, None, Some(1), Ai, date(2019, 6, 10), Cattle), date(2020, 3, 19), &[3, 4]),
        delivered(mating(2, 1, 2, 6, Some(2), None, Natural, date(2020, 6, 1), Cattle), date(2021, 3, 10), &[7]),
        delivered(mating(3, 1, 1, 3, Some(4), None, Natural, date(2021, 5, 20), Cattle), date(2022, 2, 27), &[5]),
        delivered(mating(4, 1, 2, 6, None, Some(2), Ai, date(2021, 5, 15), Cattle), date(2022, 2, 22), &[8]),
        BreedingRecord {
            status: PregnancyStatus::Confirmed,
            ..mating(5, 1, 2, 8, Some(7), None, Natural, date(2025, 2, 10), Cattle)
        },
        mating(6, 1, 1, 3, Some(2), None, Ai, date(2025, 3, 1), Cattle),
        delivered(mating(7, 2, 3, 10, Some(11), None, Natural, date(2024, 10, 1), Sheep), date(2025, 2, 25), &[12]),
    ];

    let activities = vec![
        Activity { id: 1, tenant_id: 1, farm_id: 1, animal_id: None, kind: A::Vaccination, title: "Clostridial booster, whole herd".into(), scheduled_on: date(2025, 4, 1), completed: true, notes: None },
        Activity { id: 2, tenant_id: 1, farm_id: 1, animal_id: Some(5), kind: A::Weighing, title: "Monthly weigh".into(), scheduled_on: date(2025, 4, 15), completed: false, notes: None },
        Activity { id: 3, tenant_id: 1, farm_id: 2, animal_id: Some(8), kind: A::HealthCheck, title: "Pregnancy scan".into(), scheduled_on: date(2025, 4, 20), completed: false, notes: Some("Vet visit".into()) },
        Activity { id: 4, tenant_id: 2, farm_id: 3, animal_id: None, kind: A::Movement, title: "Move ewes to upper pasture".into(), scheduled_on: date(2025, 5, 10), completed: false, notes: None },
    ];

    let expenses = vec![
        Expense { id: 1, tenant_id: 1, farm_id: 1, category: E::Feed, description: "Winter hay".into(), amount_cents: 125_000, date: date(2025, 1, 15), animal_id: None },
        Expense { id: 2, tenant_id: 1, farm_id: 1, category: E::Veterinary, description: "Lameness treatment".into(), amount_cents: 18_000, date: date(2025, 2, 3), animal_id: Some(5) },
        Expense { id: 3, tenant_id: 1, farm_id: 2, category: E::Breeding, description: "Straws, Bar Seven Legend".into(), amount_cents: 9_500, date: date(2025, 2, 10), animal_id: None },
        Expense { id: 4, tenant_id: 1, farm_id: 1, category: E::Labor, description: "Seasonal hand, March".into(), amount_cents: 240_000, date: date(2025, 3, 1), animal_id: None },
        Expense { id: 5, tenant_id: 1, farm_id: 2, category: E::Equipment, description: "Water trough".into(), amount_cents: 56_000, date: date(2025, 3, 12), animal_id: None },
        Expense { id: 6, tenant_id: 2, farm_id: 3, category: E::Feed, description: "Sheep nuts".into(), amount_cents: 43_000, date: date(2025, 1, 20), animal_id: None },
    ];

    let sales = vec![
        Sale { id: 1, tenant_id: 1, farm_id: 1, animal_id: Some(9), buyer: "Valley Meats".into(), description: "Cull cow".into(), quantity: 1, amount_cents: 180_000, date: date(2025, 2, 20) },
        Sale { id: 2, tenant_id: 1, farm_id: 2, animal_id: None, buyer: "R. Dunmore".into(), description: "Surplus hay".into(), quantity: 40, amount_cents: 32_000, date: date(2025, 3, 5) },
        Sale { id: 3, tenant_id: 2, farm_id: 3, animal_id: None, buyer: "Glen Wool Co-op".into(), description: "Fleece".into(), quantity: 55, amount_cents: 27_500, date: date(2025, 2, 11) },
    ];

    let inventory = vec![
        InventoryItem { id: 1, tenant_id: 1, farm_id: 1, name: "Hay bales".into(), category: InventoryCategory::Feed, quantity: 120.0, unit: "bale".into(), reorder_level: 150.0, unit_cost_cents: 850 },
        InventoryItem { id: 2, tenant_id: 1, farm_id: 1, name: "Mineral lick".into(), category: InventoryCategory::Supplies, quantity: 14.0, unit: "block".into(), reorder_level: 10.0, unit_cost_cents: 2_200 },
        InventoryItem { id: 3, tenant_id: 1, farm_id: 1, name: "Clostridial vaccine".into(), category: InventoryCategory::Medicine, quantity: 8.0, unit: "dose".into(), reorder_level: 20.0, unit_cost_cents: 450 },
        InventoryItem { id: 4, tenant_id: 1, farm_id: 2, name: "Ear tags".into(), category: InventoryCategory::Supplies, quantity: 200.0, unit: "tag".into(), reorder_level: 50.0, unit_cost_cents: 120 },
        InventoryItem { id: 5, tenant_id: 2, farm_id: 3, name: "Sheep nuts".into(), category: InventoryCategory::Feed, quantity: 300.0, unit: "kg".into(), reorder_level: 500.0, unit_cost_cents: 60 },
    ];

    let delegations = vec![
        Delegation { id: 1, tenant_id: 1, farm_id: Some(1), from_user_id: 2, to_user_id: 5, role: Role::Manager, starts_on: date(2025, 1, 1), ends_on: None, revoked: false },
        Delegation { id: 2, tenant_id: 1, farm_id: None, from_user_id: 3, to_user_id: 4, role: Role::Manager, starts_on: date(2024, 6, 1), ends_on: Some(date(2024, 8, 31)), revoked: true },
    ];

    let audit_logs = vec![
        AuditLog { id: 1, tenant_id: Some(1), user_id: 2, action: AuditAction::Create, entity_type: "animal".into(), entity_id: Some(8), details: "Registered Willow".into(), timestamp: at(2025, 2, 22, 9, 15) },
        AuditLog { id: 2, tenant_id: Some(1), user_id: 3, action: AuditAction::Create, entity_type: "breeding_record".into(), entity_id: Some(5), details: "Willow x Ranger".into(), timestamp: at(2025, 2, 10, 16, 40) },
        AuditLog { id: 3, tenant_id: Some(1), user_id: 2, action: AuditAction::Delegate, entity_type: "delegation".into(), entity_id: Some(1), details: "Manager role to Walt Worker".into(), timestamp: at(2025, 1, 1, 8, 0) },
        AuditLog { id: 4, tenant_id: Some(1), user_id: 2, action: AuditAction::Update, entity_type: "animal".into(), entity_id: Some(9), details: "Old Bess marked sold".into(), timestamp: at(2025, 2, 20, 11, 5) },
        AuditLog { id: 5, tenant_id: None, user_id: 1, action: AuditAction::Create, entity_type: "tenant".into(), entity_id: Some(2), details: "Onboarded Highland Sheep Collective".into(), timestamp: at(2025, 5, 1, 10, 0) },
        AuditLog { id: 6, tenant_id: Some(2), user_id: 6, action: AuditAction::Export, entity_type: "pedigree".into(), entity_id: None, details: "Flock export".into(), timestamp: at(2025, 5, 3, 14, 30) },
    ];

    HerdStore {
        tenants,
        subscriptions,
        farms,
        users,
        animals,
        external_animals,
        breeding_records,
        activities,
        expenses,
        sales,
        inventory,
        delegations,
        audit_logs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::herd::Herd;
    use crate::lineage::{calculate_inbreeding_coefficient, find_common_ancestors, AnimalRef};

    #[test]
    fn test_demo_store_passes_herd_validation() {
        let store = demo_store();
        let mut herd = Herd::from_store(HerdStore {
            animals: Vec::new(),
            ..store.clone()
        });
        for animal in store.animals {
            herd.add_animal(animal).unwrap();
        }
        assert_eq!(herd.store.animals.len(), 12);
    }

    #[test]
    fn test_demo_inbred_calf() {
        let store = demo_store();
        let common = find_common_ancestors(5, &store.animals, &store.external_animals);
        assert_eq!(common, vec![AnimalRef::Internal(1), AnimalRef::External(1)]);
        let coefficient = calculate_inbreeding_coefficient(5, &store.animals, &store.external_animals);
        assert!((coefficient - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_demo_due_dates_consistent() {
        for record in demo_store().breeding_records {
            let due = record.expected_due_date.unwrap();
            assert!(due > record.breeding_date);
        }
    }
}
