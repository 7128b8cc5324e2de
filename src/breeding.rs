// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Breeding and pregnancy tracking

use crate::error::HerdError;
use crate::herd::Herd;
use crate::lineage::{assess_inbreeding_risk, projected_coefficient, AnimalRef, RiskAssessment};
use crate::types::{
    next_id, Animal, AnimalStatus, BreedingMethod, BreedingRecord, PregnancyStatus, Sex, Species,
};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Expected birth date for a mating
#[must_use]
pub fn expected_due_date(species: Species, breeding_date: NaiveDate) -> NaiveDate {
    breeding_date + Duration::days(species.gestation_days())
}

/// A mating to record
#[derive(Debug, Clone)]
pub struct BreedingRequest {
    /// Tenant the mating belongs to
    pub tenant_id: u64,
    /// Farm where it happened
    pub farm_id: u64,
    /// Dam
    pub female_animal_id: u64,
    /// Sire from the herd
    pub male_animal_id: Option<u64>,
    /// External sire
    pub external_male_id: Option<u64>,
    /// Method
    pub method: BreedingMethod,
    /// Date of service
    pub breeding_date: NaiveDate,
    /// Notes
    pub notes: Option<String>,
}

/// Result of [`register_breeding`]
#[derive(Debug, Clone, Serialize)]
pub struct BreedingOutcome {
    /// Id of the new record
    pub record_id: u64,
    /// Expected birth date
    pub expected_due_date: NaiveDate,
    /// Inbreeding risk of the pairing
    pub risk: RiskAssessment,
}

/// An offspring to create when recording a birth
#[derive(Debug, Clone)]
pub struct NewOffspring {
    /// Ear tag
    pub tag_number: String,
    /// Optional name
    pub name: Option<String>,
    /// Sex
    pub sex: Sex,
    /// Birth weight
    pub weight_kg: Option<f64>,
}

/// An open pregnancy with its due date
#[derive(Debug, Clone, Serialize)]
pub struct DueBirth<'a> {
    /// The breeding record
    pub record: &'a BreedingRecord,
    /// Expected birth date
    pub due: NaiveDate,
    /// Days from today; negative when overdue
    pub days_until: i64,
}

/// Validate a mating and append it to the herd
pub fn register_breeding(herd: &mut Herd, request: BreedingRequest) -> Result<BreedingOutcome, HerdError> {
    let farm = herd
        .farm(request.farm_id)
        .ok_or(HerdError::NotFound { entity: "farm", id: request.farm_id })?;
    if farm.tenant_id != request.tenant_id {
        return Err(HerdError::invalid("breeding record", "farm belongs to another tenant"));
    }

    let female = herd
        .animal(request.female_animal_id)
        .ok_or(HerdError::NotFound { entity: "animal", id: request.female_animal_id })?;
    if female.tenant_id != request.tenant_id {
        return Err(HerdError::invalid("breeding record", "dam belongs to another tenant"));
    }
    if female.sex != Sex::Female {
        return Err(HerdError::invalid(
            "breeding record",
            format!("{} is not female", female.display_name()),
        ));
    }
    if female.status != AnimalStatus::Active {
        return Err(HerdError::invalid(
            "breeding record",
            format!("{} is not active ({:?})", female.display_name(), female.status),
        ));
    }
    if herd
        .store
        .breeding_records
        .iter()
        .any(|r| r.female_animal_id == female.id && r.status.is_open())
    {
        return Err(HerdError::invalid(
            "breeding record",
            format!("{} already has an open breeding record", female.display_name()),
        ));
    }
    let species = female.species;

    let sire = match (request.male_animal_id, request.external_male_id) {
        (Some(_), Some(_)) => {
            return Err(HerdError::invalid(
                "breeding record",
                "give either a herd sire or an external sire, not both",
            ))
        }
        (Some(id), None) => {
            let male = herd.animal(id).ok_or(HerdError::NotFound { entity: "animal", id })?;
            if male.tenant_id != request.tenant_id {
                return Err(HerdError::invalid("breeding record", "sire belongs to another tenant"));
            }
            check_sire(male.sex, male.species, species)?;
            Some(AnimalRef::Internal(id))
        }
        (None, Some(id)) => {
            let male = herd
                .external_animal(id)
                .ok_or(HerdError::NotFound { entity: "external animal", id })?;
            if male.tenant_id != request.tenant_id {
                return Err(HerdError::invalid("breeding record", "sire belongs to another tenant"));
            }
            check_sire(male.sex, male.species, species)?;
            Some(AnimalRef::External(id))
        }
        (None, None) => None,
    };

    let dam = AnimalRef::Internal(request.female_animal_id);
    let coefficient = sire.map_or(0.0, |sire| {
        projected_coefficient(dam, sire, &herd.store.animals, &herd.store.external_animals)
    });
    let risk = assess_inbreeding_risk(coefficient);

    let due = expected_due_date(species, request.breeding_date);
    let record_id = next_id(&herd.store.breeding_records, |r| r.id);
    herd.push_breeding_record(BreedingRecord {
        id: record_id,
        tenant_id: request.tenant_id,
        farm_id: request.farm_id,
        female_animal_id: request.female_animal_id,
        male_animal_id: request.male_animal_id,
        external_male_id: request.external_male_id,
        method: request.method,
        breeding_date: request.breeding_date,
        status: PregnancyStatus::Bred,
        expected_due_date: Some(due),
        actual_birth_date: None,
        offspring_ids: Vec::new(),
        notes: request.notes,
    });

    tracing::info!(
        "Recorded breeding {} for dam {} (risk {})",
        record_id,
        request.female_animal_id,
        risk.level
    );

    Ok(BreedingOutcome {
        record_id,
        expected_due_date: due,
        risk,
    })
}

fn check_sire(sex: Sex, sire_species: Species, dam_species: Species) -> Result<(), HerdError> {
    if sex != Sex::Male {
        return Err(HerdError::invalid("breeding record", "sire is not male"));
    }
    if sire_species != dam_species {
        return Err(HerdError::invalid(
            "breeding record",
            format!("sire is {sire_species:?}, dam is {dam_species:?}"),
        ));
    }
    Ok(())
}

fn open_record(herd: &mut Herd, record_id: u64) -> Result<&mut BreedingRecord, HerdError> {
    let record = herd
        .store
        .breeding_records
        .iter_mut()
        .find(|r| r.id == record_id)
        .ok_or(HerdError::NotFound { entity: "breeding record", id: record_id })?;
    if !record.status.is_open() {
        return Err(HerdError::invalid(
            "breeding record",
            format!("record {record_id} is already {:?}", record.status),
        ));
    }
    Ok(record)
}

/// Mark a bred record as a confirmed pregnancy
pub fn confirm_pregnancy(herd: &mut Herd, record_id: u64) -> Result<(), HerdError> {
    let record = open_record(herd, record_id)?;
    if record.status == PregnancyStatus::Confirmed {
        return Err(HerdError::invalid(
            "breeding record",
            format!("record {record_id} is already confirmed"),
        ));
    }
    record.status = PregnancyStatus::Confirmed;
    Ok(())
}

/// Close an open record as failed
pub fn mark_failed(herd: &mut Herd, record_id: u64) -> Result<(), HerdError> {
    open_record(herd, record_id)?.status = PregnancyStatus::Failed;
    Ok(())
}

/// Record a birth: create the offspring with parent links and close the record
///
/// Either every offspring is added or none is.
pub fn record_birth(
    herd: &mut Herd,
    record_id: u64,
    birth_date: NaiveDate,
    offspring: Vec<NewOffspring>,
) -> Result<Vec<u64>, HerdError> {
    let record = open_record(herd, record_id)?.clone();
    if birth_date < record.breeding_date {
        return Err(HerdError::invalid(
            "birth",
            format!("birth date {birth_date} is before breeding date {}", record.breeding_date),
        ));
    }
    if offspring.is_empty() {
        return Err(HerdError::invalid("birth", "at least one offspring is required"));
    }

    let dam = herd
        .animal(record.female_animal_id)
        .ok_or(HerdError::NotFound { entity: "animal", id: record.female_animal_id })?
        .clone();
    let sire_breed = match (record.male_animal_id, record.external_male_id) {
        (Some(id), _) => herd.animal(id).map(|a| a.breed.clone()),
        (None, Some(id)) => herd.external_animal(id).map(|e| e.breed.clone()),
        (None, None) => None,
    };
    let breed = match sire_breed {
        Some(sire) if !sire.eq_ignore_ascii_case(&dam.breed) => format!("{} x {}", dam.breed, sire),
        _ => dam.breed.clone(),
    };

    let snapshot = herd.store.clone();
    let mut ids = Vec::with_capacity(offspring.len());
    for calf in offspring {
        let id = next_id(&herd.store.animals, |a| a.id);
        let animal = Animal {
            id,
            tenant_id: record.tenant_id,
            farm_id: record.farm_id,
            tag_number: calf.tag_number,
            name: calf.name,
            species: dam.species,
            breed: breed.clone(),
            sex: calf.sex,
            birth_date: Some(birth_date),
            status: AnimalStatus::Active,
            mother_animal_id: Some(dam.id),
            father_animal_id: record.male_animal_id,
            external_mother_id: None,
            external_father_id: record.external_male_id,
            weight_kg: calf.weight_kg,
            notes: None,
        };
        if let Err(err) = herd.add_animal(animal) {
            *herd = Herd::from_store(snapshot);
            return Err(err);
        }
        ids.push(id);
    }

    let record = herd
        .store
        .breeding_records
        .iter_mut()
        .find(|r| r.id == record_id)
        .ok_or(HerdError::NotFound { entity: "breeding record", id: record_id })?;
    record.status = PregnancyStatus::Delivered;
    record.actual_birth_date = Some(birth_date);
    record.offspring_ids.extend(&ids);

    tracing::info!("Recorded birth of {} offspring on record {}", ids.len(), record_id);
    Ok(ids)
}

/// Open pregnancies due within `within_days` of `today`, overdue ones
/// included, soonest first
#[must_use]
pub fn upcoming_births(records: &[BreedingRecord], today: NaiveDate, within_days: i64) -> Vec<DueBirth<'_>> {
    let horizon = today + Duration::days(within_days);
    let mut due: Vec<DueBirth<'_>> = records
        .iter()
        .filter(|r| r.status.is_open())
        .filter_map(|r| {
            let due = r.expected_due_date?;
            (due <= horizon).then(|| DueBirth {
                record: r,
                due,
                days_until: (due - today).num_days(),
            })
        })
        .collect();
    due.sort_by_key(|d| (d.due, d.record.id));
    due
}

/// Percentage of gestation elapsed
#[must_use]
pub fn pregnancy_progress(record: &BreedingRecord, species: Species, today: NaiveDate) -> f64 {
    match record.status {
        PregnancyStatus::Delivered => 100.0,
        PregnancyStatus::Failed => 0.0,
        PregnancyStatus::Bred | PregnancyStatus::Confirmed => {
            #[allow(clippy::cast_precision_loss)]
            let elapsed = (today - record.breeding_date).num_days() as f64;
            #[allow(clippy::cast_precision_loss)]
            let total = species.gestation_days() as f64;
            (elapsed / total * 100.0).clamp(0.0, 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_store;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(female: u64, male: Option<u64>) -> BreedingRequest {
        BreedingRequest {
            tenant_id: 1,
            farm_id: 1,
            female_animal_id: female,
            male_animal_id: male,
            external_male_id: None,
            method: BreedingMethod::Natural,
            breeding_date: date(2025, 3, 1),
            notes: None,
        }
    }

    #[test]
    fn test_expected_due_date() {
        assert_eq!(expected_due_date(Species::Cattle, date(2025, 1, 1)), date(2025, 10, 11));
        assert_eq!(expected_due_date(Species::Pig, date(2025, 1, 1)), date(2025, 4, 25));
    }

    #[test]
    fn test_register_breeding_rejects_male_dam() {
        let mut herd = Herd::from_store(demo_store());
        let err = register_breeding(&mut herd, request(2, None)).unwrap_err();
        assert!(matches!(err, HerdError::Invalid { .. }));
    }

    #[test]
    fn test_register_breeding_rejects_two_sires() {
        let mut herd = Herd::from_store(demo_store());
        let mut req = request(1, Some(2));
        req.external_male_id = Some(1);
        assert!(register_breeding(&mut herd, req).is_err());
    }

    #[test]
    fn test_register_then_birth() {
        let mut herd = Herd::from_store(demo_store());
        // Daisy (1) with the unrelated herd bull Titan (2)
        let outcome = register_breeding(&mut herd, request(1, Some(2))).unwrap();
        assert_eq!(outcome.expected_due_date, date(2025, 12, 9));

        // a second open record for the same dam is refused
        assert!(register_breeding(&mut herd, request(1, Some(2))).is_err());

        confirm_pregnancy(&mut herd, outcome.record_id).unwrap();
        let ids = record_birth(
            &mut herd,
            outcome.record_id,
            date(2025, 12, 7),
            vec![NewOffspring {
                tag_number: "GA-900".into(),
                name: Some("Clover".into()),
                sex: Sex::Female,
                weight_kg: Some(36.0),
            }],
        )
        .unwrap();

        let calf = herd.animal(ids[0]).unwrap();
        assert_eq!(calf.mother_animal_id, Some(1));
        assert_eq!(calf.father_animal_id, Some(2));
        let record = herd.breeding_record(outcome.record_id).unwrap();
        assert_eq!(record.status, PregnancyStatus::Delivered);
        assert_eq!(record.offspring_ids, ids);

        // closed records cannot be reopened
        assert!(mark_failed(&mut herd, outcome.record_id).is_err());
    }

    #[test]
    fn test_birth_is_all_or_nothing() {
        let mut herd = Herd::from_store(demo_store());
        let outcome = register_breeding(&mut herd, request(1, Some(2))).unwrap();
        let before = herd.store.animals.len();
        let dup = NewOffspring {
            tag_number: "GA-901".into(),
            name: None,
            sex: Sex::Male,
            weight_kg: None,
        };
        let err = record_birth(&mut herd, outcome.record_id, date(2025, 12, 9), vec![dup.clone(), dup]);
        assert!(err.is_err());
        assert_eq!(herd.store.animals.len(), before);
        assert!(herd.breeding_record(outcome.record_id).unwrap().status.is_open());
    }

    #[test]
    fn test_upcoming_births_sorted_and_bounded() {
        let mk = |id, due: NaiveDate, status| BreedingRecord {
            id,
            tenant_id: 1,
            farm_id: 1,
            female_animal_id: id,
            male_animal_id: None,
            external_male_id: None,
            method: BreedingMethod::ArtificialInsemination,
            breeding_date: date(2025, 1, 1),
            status,
            expected_due_date: Some(due),
            actual_birth_date: None,
            offspring_ids: vec![],
            notes: None,
        };
        let records = vec![
            mk(1, date(2025, 6, 20), PregnancyStatus::Confirmed),
            mk(2, date(2025, 6, 5), PregnancyStatus::Bred),
            mk(3, date(2025, 9, 1), PregnancyStatus::Confirmed),
            mk(4, date(2025, 6, 2), PregnancyStatus::Delivered),
        ];
        let due = upcoming_births(&records, date(2025, 6, 10), 30);
        let ids: Vec<u64> = due.iter().map(|d| d.record.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(due[0].days_until, -5);
    }

    #[test]
    fn test_pregnancy_progress() {
        let record = BreedingRecord {
            id: 1,
            tenant_id: 1,
            farm_id: 1,
            female_animal_id: 1,
            male_animal_id: None,
            external_male_id: None,
            method: BreedingMethod::Natural,
            breeding_date: date(2025, 1, 1),
            status: PregnancyStatus::Confirmed,
            expected_due_date: None,
            actual_birth_date: None,
            offspring_ids: vec![],
            notes: None,
        };
        let half = pregnancy_progress(&record, Species::Pig, date(2025, 2, 27));
        assert!((half - 50.0).abs() < 1e-9);
        assert!((pregnancy_progress(&record, Species::Pig, date(2026, 1, 1)) - 100.0).abs() < 1e-9);
    }
}
