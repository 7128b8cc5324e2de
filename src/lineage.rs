// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Pedigree traversal and inbreeding heuristics
//!
//! Everything here is a pure function over slices of records. The
//! coefficient is a flat per-common-ancestor estimate, not Wright's
//! path-coefficient method, and the scores are heuristics on a 0-100 scale.

use crate::types::{Animal, AnimalStatus, BreedingRecord, ExternalAnimal, PregnancyStatus, Sex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// How many generations above an animal are searched for shared ancestors
pub const COMMON_ANCESTOR_DEPTH: u32 = 5;

/// Coefficient contribution of each common ancestor
pub const COMMON_ANCESTOR_CONTRIBUTION: f64 = 0.125;

/// Recursion bound for generation numbering
const MAX_GENERATION_DEPTH: u32 = 64;

/// Reference to an animal in the herd or to an external animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AnimalRef {
    /// Animal recorded in the herd
    Internal(u64),
    /// External animal
    External(u64),
}

impl fmt::Display for AnimalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(id) => write!(f, "#{id}"),
            Self::External(id) => write!(f, "ext#{id}"),
        }
    }
}

/// One animal in a pedigree tree
#[derive(Debug, Clone, Serialize)]
pub struct LineageNode {
    /// Which animal this is
    pub subject: AnimalRef,
    /// Display name
    pub name: String,
    /// Tag number or registration number
    pub identifier: String,
    /// Breed
    pub breed: String,
    /// Sex
    pub sex: Sex,
    /// Distance from the root (root is 0)
    pub generation: u32,
    /// Dam
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother: Option<Box<LineageNode>>,
    /// Sire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father: Option<Box<LineageNode>>,
}

impl LineageNode {
    /// Number of ancestors below this node in the tree
    #[must_use]
    pub fn ancestor_count(&self) -> usize {
        [&self.mother, &self.father]
            .into_iter()
            .flatten()
            .map(|parent| 1 + parent.ancestor_count())
            .sum()
    }

    /// Deepest generation present in the tree
    #[must_use]
    pub fn depth(&self) -> u32 {
        [&self.mother, &self.father]
            .into_iter()
            .flatten()
            .map(|parent| parent.depth())
            .max()
            .unwrap_or(self.generation)
    }
}

/// One offspring found while walking breeding records forward
#[derive(Debug, Clone, Serialize)]
pub struct DescendantNode {
    /// Offspring animal id
    pub animal_id: u64,
    /// 1 for children, 2 for grandchildren, ...
    pub generation: u32,
    /// Breeding record the offspring was found through
    pub record_id: u64,
    /// Offspring of this offspring
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offspring: Vec<DescendantNode>,
}

/// Count every node in a descendant forest
#[must_use]
pub fn count_descendants(nodes: &[DescendantNode]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + count_descendants(&n.offspring))
        .sum()
}

/// Coarse inbreeding risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Below 6.25%
    Low,
    /// Below 12.5%
    Moderate,
    /// Below 25%
    High,
    /// 25% or more
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Result of [`assess_inbreeding_risk`]
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Risk level
    pub level: RiskLevel,
    /// Coefficient that was assessed
    pub coefficient: f64,
    /// Safety score, 100 is unrelated parents
    pub score: f64,
    /// One-line summary
    pub message: String,
    /// Suggested actions
    pub recommendations: Vec<String>,
}

/// Aggregated pedigree report for one animal
#[derive(Debug, Clone, Serialize)]
pub struct PedigreeReport {
    /// Animal the report is for
    pub animal_id: u64,
    /// Generations requested
    pub generations: u32,
    /// Ancestor tree
    pub tree: LineageNode,
    /// Ancestors present in the tree
    pub ancestors_tracked: usize,
    /// Ancestors a complete tree of this depth would hold
    pub possible_ancestors: u64,
    /// `ancestors_tracked / possible_ancestors` as a percentage
    pub completeness_percent: f64,
    /// Ancestors shared by the maternal and paternal lines
    pub common_ancestors: Vec<AnimalRef>,
    /// Simplified inbreeding coefficient
    pub inbreeding_coefficient: f64,
    /// Generation number within recorded history
    pub generation_number: u32,
    /// Recorded descendants
    pub descendant_count: usize,
    /// 0-100, higher is more diverse
    pub genetic_diversity_score: f64,
    /// Risk assessment of the coefficient
    pub risk: RiskAssessment,
}

/// A scored potential sire
#[derive(Debug, Clone, Serialize)]
pub struct MateCandidate {
    /// Candidate sire
    pub sire: AnimalRef,
    /// Display name
    pub name: String,
    /// Breed
    pub breed: String,
    /// 0-100, higher is better
    pub compatibility_score: f64,
    /// Coefficient an offspring of this pairing would get
    pub projected_coefficient: f64,
    /// Ancestors the pair share
    pub shared_ancestors: usize,
    /// Risk level of the projected coefficient
    pub risk_level: RiskLevel,
    /// Reasons behind the score
    pub notes: Vec<String>,
}

/// Id-indexed view over animals and external animals
struct Pedigree<'a> {
    animals: HashMap<u64, &'a Animal>,
    external: HashMap<u64, &'a ExternalAnimal>,
}

impl<'a> Pedigree<'a> {
    fn new(animals: &'a [Animal], external: &'a [ExternalAnimal]) -> Self {
        Self {
            animals: animals.iter().map(|a| (a.id, a)).collect(),
            external: external.iter().map(|e| (e.id, e)).collect(),
        }
    }

    fn exists(&self, subject: AnimalRef) -> bool {
        match subject {
            AnimalRef::Internal(id) => self.animals.contains_key(&id),
            AnimalRef::External(id) => self.external.contains_key(&id),
        }
    }

    /// Dam and sire of a subject; links to missing records are dropped
    fn parents(&self, subject: AnimalRef) -> (Option<AnimalRef>, Option<AnimalRef>) {
        let (mother, father) = match subject {
            AnimalRef::Internal(id) => match self.animals.get(&id) {
                Some(a) => (
                    a.mother_animal_id
                        .map(AnimalRef::Internal)
                        .or(a.external_mother_id.map(AnimalRef::External)),
                    a.father_animal_id
                        .map(AnimalRef::Internal)
                        .or(a.external_father_id.map(AnimalRef::External)),
                ),
                None => (None, None),
            },
            AnimalRef::External(id) => match self.external.get(&id) {
                Some(e) => (
                    e.mother_id.map(AnimalRef::External),
                    e.father_id.map(AnimalRef::External),
                ),
                None => (None, None),
            },
        };
        (
            mother.filter(|m| self.exists(*m)),
            father.filter(|f| self.exists(*f)),
        )
    }

    fn node(&self, subject: AnimalRef, generation: u32, remaining: u32) -> Option<LineageNode> {
        let (name, identifier, breed, sex) = match subject {
            AnimalRef::Internal(id) => {
                let a = self.animals.get(&id)?;
                (
                    a.display_name().to_string(),
                    a.tag_number.clone(),
                    a.breed.clone(),
                    a.sex,
                )
            }
            AnimalRef::External(id) => {
                let e = self.external.get(&id)?;
                (
                    e.name.clone(),
                    e.registration_number.clone().unwrap_or_default(),
                    e.breed.clone(),
                    e.sex,
                )
            }
        };

        let (mother, father) = if remaining == 0 {
            (None, None)
        } else {
            let (m, f) = self.parents(subject);
            (
                m.and_then(|m| self.node(m, generation + 1, remaining - 1)),
                f.and_then(|f| self.node(f, generation + 1, remaining - 1)),
            )
        };

        Some(LineageNode {
            subject,
            name,
            identifier,
            breed,
            sex,
            generation,
            mother: mother.map(Box::new),
            father: father.map(Box::new),
        })
    }

    /// `start` and its ancestors up to `depth` levels (start is level 1),
    /// deduplicated, in depth-first dam-before-sire order
    fn line(&self, start: AnimalRef, depth: u32) -> Vec<AnimalRef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_line(start, depth, &mut seen, &mut out);
        out
    }

    fn collect_line(
        &self,
        subject: AnimalRef,
        depth: u32,
        seen: &mut HashSet<AnimalRef>,
        out: &mut Vec<AnimalRef>,
    ) {
        if depth == 0 || !self.exists(subject) || !seen.insert(subject) {
            return;
        }
        out.push(subject);
        let (mother, father) = self.parents(subject);
        for parent in [mother, father].into_iter().flatten() {
            self.collect_line(parent, depth - 1, seen, out);
        }
    }

    fn generation(&self, subject: AnimalRef, depth: u32, memo: &mut HashMap<AnimalRef, u32>) -> u32 {
        if let Some(&g) = memo.get(&subject) {
            return g;
        }
        if depth >= MAX_GENERATION_DEPTH {
            return 1;
        }
        // placeholder so a cycle back to this node ends the walk
        memo.insert(subject, 1);
        let (mother, father) = self.parents(subject);
        let generation = [mother, father]
            .into_iter()
            .flatten()
            .map(|parent| self.generation(parent, depth + 1, memo))
            .max()
            .map_or(1, |g| g + 1);
        memo.insert(subject, generation);
        generation
    }

    fn common_ancestors(&self, subject: AnimalRef) -> Vec<AnimalRef> {
        let (Some(mother), Some(father)) = self.parents(subject) else {
            return Vec::new();
        };
        let paternal: HashSet<AnimalRef> = self
            .line(father, COMMON_ANCESTOR_DEPTH)
            .into_iter()
            .collect();
        self.line(mother, COMMON_ANCESTOR_DEPTH)
            .into_iter()
            .filter(|a| paternal.contains(a))
            .collect()
    }
}

fn coefficient_for(common: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let raw = COMMON_ANCESTOR_CONTRIBUTION * common as f64;
    raw.min(1.0)
}

/// Ancestor tree of a herd animal up to `generations` levels
///
/// Returns `None` when the animal is unknown. A budget of 0 yields the
/// animal alone.
#[must_use]
pub fn get_ancestors(
    id: u64,
    generations: u32,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
) -> Option<LineageNode> {
    ancestors_of(AnimalRef::Internal(id), generations, animals, external_animals)
}

/// Ancestor tree of any animal reference
#[must_use]
pub fn ancestors_of(
    subject: AnimalRef,
    generations: u32,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
) -> Option<LineageNode> {
    Pedigree::new(animals, external_animals).node(subject, 0, generations)
}

/// Offspring of an animal found through breeding records, recursively
///
/// Records are visited in slice order and offspring in the order they are
/// listed. An animal reachable by more than one path appears once.
#[must_use]
pub fn get_descendants(
    id: u64,
    generations: u32,
    breeding_records: &[BreedingRecord],
) -> Vec<DescendantNode> {
    let mut visited = HashSet::from([id]);
    walk_descendants(id, 1, generations, breeding_records, &mut visited)
}

fn walk_descendants(
    parent: u64,
    generation: u32,
    max_generations: u32,
    records: &[BreedingRecord],
    visited: &mut HashSet<u64>,
) -> Vec<DescendantNode> {
    if generation > max_generations {
        return Vec::new();
    }
    let mut out = Vec::new();
    for record in records
        .iter()
        .filter(|r| r.female_animal_id == parent || r.male_animal_id == Some(parent))
    {
        for &child in &record.offspring_ids {
            if !visited.insert(child) {
                continue;
            }
            let offspring = walk_descendants(child, generation + 1, max_generations, records, visited);
            out.push(DescendantNode {
                animal_id: child,
                generation,
                record_id: record.id,
                offspring,
            });
        }
    }
    out
}

/// Ancestors shared by an animal's maternal and paternal lines
///
/// Both parents are included in their own line and each line reaches
/// [`COMMON_ANCESTOR_DEPTH`] generations above the animal. Results come in
/// maternal discovery order.
#[must_use]
pub fn find_common_ancestors(
    id: u64,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
) -> Vec<AnimalRef> {
    Pedigree::new(animals, external_animals).common_ancestors(AnimalRef::Internal(id))
}

/// Simplified inbreeding coefficient: a flat contribution per common
/// ancestor, capped at 1
#[must_use]
pub fn calculate_inbreeding_coefficient(
    id: u64,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
) -> f64 {
    coefficient_for(find_common_ancestors(id, animals, external_animals).len())
}

/// 1 for an animal with no recorded parents, otherwise one more than its
/// deepest parent
#[must_use]
pub fn calculate_generation_number(
    id: u64,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
) -> u32 {
    let mut memo = HashMap::new();
    Pedigree::new(animals, external_animals).generation(AnimalRef::Internal(id), 0, &mut memo)
}

/// Build the full pedigree report for a herd animal
#[must_use]
pub fn build_pedigree_data(
    id: u64,
    generations: u32,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
    breeding_records: &[BreedingRecord],
) -> Option<PedigreeReport> {
    let pedigree = Pedigree::new(animals, external_animals);
    let subject = AnimalRef::Internal(id);
    let tree = pedigree.node(subject, 0, generations)?;

    let ancestors_tracked = tree.ancestor_count();
    let possible_ancestors = (1u64 << (generations.min(62) + 1)) - 2;
    #[allow(clippy::cast_precision_loss)]
    let completeness_percent = if possible_ancestors == 0 {
        0.0
    } else {
        ancestors_tracked as f64 / possible_ancestors as f64 * 100.0
    };

    let common_ancestors = pedigree.common_ancestors(subject);
    let inbreeding_coefficient = coefficient_for(common_ancestors.len());
    let generation_number = pedigree.generation(subject, 0, &mut HashMap::new());
    let descendant_count = count_descendants(&get_descendants(id, u32::MAX, breeding_records));

    let genetic_diversity_score = (100.0
        - inbreeding_coefficient * 200.0
        - (100.0 - completeness_percent) * 0.2)
        .clamp(0.0, 100.0);

    Some(PedigreeReport {
        animal_id: id,
        generations,
        tree,
        ancestors_tracked,
        possible_ancestors,
        completeness_percent,
        common_ancestors,
        inbreeding_coefficient,
        generation_number,
        descendant_count,
        genetic_diversity_score,
        risk: assess_inbreeding_risk(inbreeding_coefficient),
    })
}

/// Projected coefficient of an offspring of `dam` and `sire`
#[must_use]
pub fn projected_coefficient(
    dam: AnimalRef,
    sire: AnimalRef,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
) -> f64 {
    let pedigree = Pedigree::new(animals, external_animals);
    coefficient_for(shared_ancestors(&pedigree, dam, sire).len())
}

fn shared_ancestors(pedigree: &Pedigree<'_>, dam: AnimalRef, sire: AnimalRef) -> Vec<AnimalRef> {
    let sire_line: HashSet<AnimalRef> = pedigree.line(sire, COMMON_ANCESTOR_DEPTH).into_iter().collect();
    pedigree
        .line(dam, COMMON_ANCESTOR_DEPTH)
        .into_iter()
        .filter(|a| sire_line.contains(a))
        .collect()
}

/// Rank potential sires for a female, best first
///
/// Candidates are active males of the same species and tenant, plus
/// external males of the same species recorded by the tenant. Direct
/// ancestors and descendants of the female are excluded. Unknown ids and
/// males yield an empty list.
#[must_use]
pub fn find_optimal_mates(
    female_id: u64,
    limit: usize,
    animals: &[Animal],
    external_animals: &[ExternalAnimal],
    breeding_records: &[BreedingRecord],
) -> Vec<MateCandidate> {
    let pedigree = Pedigree::new(animals, external_animals);
    let Some(female) = pedigree.animals.get(&female_id).copied() else {
        return Vec::new();
    };
    if female.sex != Sex::Female {
        return Vec::new();
    }
    let dam = AnimalRef::Internal(female_id);
    let dam_ancestors: HashSet<AnimalRef> = pedigree.line(dam, u32::MAX).into_iter().collect();

    let internal = animals
        .iter()
        .filter(|a| {
            a.tenant_id == female.tenant_id
                && a.species == female.species
                && a.sex == Sex::Male
                && a.status == AnimalStatus::Active
        })
        .map(|a| (AnimalRef::Internal(a.id), a.display_name().to_string(), a.breed.clone()));
    let external = external_animals
        .iter()
        .filter(|e| e.tenant_id == female.tenant_id && e.species == female.species && e.sex == Sex::Male)
        .map(|e| (AnimalRef::External(e.id), e.name.clone(), e.breed.clone()));

    let mut candidates: Vec<MateCandidate> = internal
        .chain(external)
        .filter(|(sire, _, _)| {
            !dam_ancestors.contains(sire) && !pedigree.line(*sire, u32::MAX).contains(&dam)
        })
        .map(|(sire, name, breed)| {
            let shared = shared_ancestors(&pedigree, dam, sire).len();
            let coefficient = coefficient_for(shared);
            let mut score = 100.0 - coefficient * 200.0;
            let mut notes = Vec::new();

            if shared > 0 {
                notes.push(format!("shares {shared} ancestor(s)"));
            }
            if breed.eq_ignore_ascii_case(&female.breed) {
                score += 10.0;
                notes.push("same breed".to_string());
            }
            if is_proven_sire(sire, breeding_records) {
                score += 5.0;
                notes.push("proven sire".to_string());
            }

            MateCandidate {
                sire,
                name,
                breed,
                compatibility_score: score.clamp(0.0, 100.0),
                projected_coefficient: coefficient,
                shared_ancestors: shared,
                risk_level: risk_level(coefficient),
                notes,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.compatibility_score
            .total_cmp(&a.compatibility_score)
            .then(a.sire.cmp(&b.sire))
    });
    candidates.truncate(limit);
    candidates
}

fn is_proven_sire(sire: AnimalRef, records: &[BreedingRecord]) -> bool {
    records.iter().any(|r| {
        r.status == PregnancyStatus::Delivered
            && match sire {
                AnimalRef::Internal(id) => r.male_animal_id == Some(id),
                AnimalRef::External(id) => r.external_male_id == Some(id),
            }
    })
}

fn risk_level(coefficient: f64) -> RiskLevel {
    if coefficient < 0.0625 {
        RiskLevel::Low
    } else if coefficient < 0.125 {
        RiskLevel::Moderate
    } else if coefficient < 0.25 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Classify a coefficient and suggest what to do about it
#[must_use]
pub fn assess_inbreeding_risk(coefficient: f64) -> RiskAssessment {
    let level = risk_level(coefficient);
    let score = (100.0 - coefficient * 400.0).clamp(0.0, 100.0);
    let (message, recommendations): (&str, &[&str]) = match level {
        RiskLevel::Low => (
            "No significant relatedness between the parents",
            &["Continue current breeding plan"],
        ),
        RiskLevel::Moderate => (
            "Parents share some ancestry",
            &[
                "Prefer unrelated sires for the next mating",
                "Monitor offspring for reduced vigour",
            ],
        ),
        RiskLevel::High => (
            "Parents are closely related",
            &[
                "Avoid repeating this pairing",
                "Introduce outside genetics",
                "Track fertility and growth of offspring",
            ],
        ),
        RiskLevel::Critical => (
            "Parents are very closely related",
            &[
                "Do not use offspring for breeding",
                "Bring in an unrelated sire",
                "Review the pedigree for recording errors",
            ],
        ),
    };

    RiskAssessment {
        level,
        coefficient,
        score,
        message: message.to_string(),
        recommendations: recommendations.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BreedingMethod, Species};
    use chrono::NaiveDate;

    fn animal(id: u64, sex: Sex, mother: Option<u64>, father: Option<u64>) -> Animal {
        Animal {
            id,
            tenant_id: 1,
            farm_id: 1,
            tag_number: format!("T{id:03}"),
            name: None,
            species: Species::Cattle,
            breed: "Angus".into(),
            sex,
            birth_date: None,
            status: AnimalStatus::Active,
            mother_animal_id: mother,
            father_animal_id: father,
            external_mother_id: None,
            external_father_id: None,
            weight_kg: None,
            notes: None,
        }
    }

    fn record(id: u64, female: u64, male: Option<u64>, offspring: Vec<u64>) -> BreedingRecord {
        BreedingRecord {
            id,
            tenant_id: 1,
            farm_id: 1,
            female_animal_id: female,
            male_animal_id: male,
            external_male_id: None,
            method: BreedingMethod::Natural,
            breeding_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: PregnancyStatus::Delivered,
            expected_due_date: None,
            actual_birth_date: None,
            offspring_ids: offspring,
            notes: None,
        }
    }

    /// 1 x 2 -> 3 (f), 4 (m); 3 x 4 -> 5
    fn sibling_mating() -> Vec<Animal> {
        vec![
            animal(1, Sex::Female, None, None),
            animal(2, Sex::Male, None, None),
            animal(3, Sex::Female, Some(1), Some(2)),
            animal(4, Sex::Male, Some(1), Some(2)),
            animal(5, Sex::Female, Some(3), Some(4)),
        ]
    }

    #[test]
    fn test_ancestors_zero_generations() {
        let animals = sibling_mating();
        let node = get_ancestors(5, 0, &animals, &[]).unwrap();
        assert!(node.mother.is_none());
        assert!(node.father.is_none());
        assert_eq!(node.ancestor_count(), 0);
    }

    #[test]
    fn test_ancestors_tree_shape() {
        let animals = sibling_mating();
        let node = get_ancestors(5, 2, &animals, &[]).unwrap();
        assert_eq!(node.ancestor_count(), 6);
        assert_eq!(node.depth(), 2);
        let mother = node.mother.as_ref().unwrap();
        assert_eq!(mother.subject, AnimalRef::Internal(3));
        assert_eq!(mother.mother.as_ref().unwrap().subject, AnimalRef::Internal(1));
    }

    #[test]
    fn test_ancestors_unknown_animal() {
        assert!(get_ancestors(99, 3, &sibling_mating(), &[]).is_none());
    }

    #[test]
    fn test_ancestors_follow_external_parents() {
        let mut animals = vec![animal(1, Sex::Female, None, None)];
        animals[0].external_father_id = Some(7);
        let external = vec![ExternalAnimal {
            id: 7,
            tenant_id: 1,
            name: "Stud Bull".into(),
            registration_number: Some("REG-7".into()),
            species: Species::Cattle,
            breed: "Angus".into(),
            sex: Sex::Male,
            source: None,
            mother_id: None,
            father_id: None,
        }];
        let node = get_ancestors(1, 3, &animals, &external).unwrap();
        let father = node.father.unwrap();
        assert_eq!(father.subject, AnimalRef::External(7));
        assert_eq!(father.identifier, "REG-7");
    }

    #[test]
    fn test_self_parent_bounded_by_generations() {
        let animals = vec![animal(1, Sex::Female, Some(1), None)];
        let node = get_ancestors(1, 4, &animals, &[]).unwrap();
        assert_eq!(node.depth(), 4);
        // the animal is visited once, so its own parent link counts one step
        assert_eq!(calculate_generation_number(1, &animals, &[]), 2);
    }

    #[test]
    fn test_two_node_cycle_generation_terminates() {
        let animals = vec![
            animal(1, Sex::Female, Some(2), None),
            animal(2, Sex::Female, Some(1), None),
        ];
        // 1 -> 2 -> back to 1, which already holds the placeholder 1
        assert_eq!(calculate_generation_number(1, &animals, &[]), 3);
        assert_eq!(calculate_generation_number(2, &animals, &[]), 3);
    }

    #[test]
    fn test_common_ancestors_full_siblings() {
        let animals = sibling_mating();
        let common = find_common_ancestors(5, &animals, &[]);
        assert_eq!(common, vec![AnimalRef::Internal(1), AnimalRef::Internal(2)]);
        assert!((calculate_inbreeding_coefficient(5, &animals, &[]) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_common_ancestors_means_zero_coefficient() {
        let animals = sibling_mating();
        assert!(find_common_ancestors(3, &animals, &[]).is_empty());
        assert!(calculate_inbreeding_coefficient(3, &animals, &[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_generation_numbers() {
        let animals = sibling_mating();
        assert_eq!(calculate_generation_number(1, &animals, &[]), 1);
        assert_eq!(calculate_generation_number(3, &animals, &[]), 2);
        assert_eq!(calculate_generation_number(5, &animals, &[]), 3);
    }

    #[test]
    fn test_descendants_deduplicated() {
        let records = vec![
            record(1, 1, Some(2), vec![3, 4]),
            record(2, 3, Some(4), vec![5]),
        ];
        let descendants = get_descendants(1, 5, &records);
        // 5 is reachable through both 3 and 4 but listed once
        assert_eq!(count_descendants(&descendants), 3);
        assert_eq!(descendants[0].animal_id, 3);
        assert_eq!(descendants[0].offspring[0].animal_id, 5);
        assert_eq!(descendants[0].offspring[0].generation, 2);
        assert!(descendants[1].offspring.is_empty());
    }

    #[test]
    fn test_descendants_generation_bound() {
        let records = vec![
            record(1, 1, Some(2), vec![3, 4]),
            record(2, 3, Some(4), vec![5]),
        ];
        assert_eq!(count_descendants(&get_descendants(1, 1, &records)), 2);
        assert!(get_descendants(1, 0, &records).is_empty());
    }

    #[test]
    fn test_pedigree_report() {
        let animals = sibling_mating();
        let report = build_pedigree_data(5, 2, &animals, &[], &[]).unwrap();
        assert_eq!(report.possible_ancestors, 6);
        assert_eq!(report.ancestors_tracked, 6);
        assert!((report.completeness_percent - 100.0).abs() < 1e-9);
        assert_eq!(report.generation_number, 3);
        assert!((report.genetic_diversity_score - 50.0).abs() < 1e-9);
        assert_eq!(report.risk.level, RiskLevel::Critical);
    }

    #[test]
    fn test_pedigree_report_zero_generations() {
        let report = build_pedigree_data(1, 0, &sibling_mating(), &[], &[]).unwrap();
        assert_eq!(report.possible_ancestors, 0);
        assert!(report.completeness_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_optimal_mates_excludes_relatives_and_ranks() {
        let mut animals = sibling_mating();
        // unrelated bull and a half-brother of 3 via 2
        animals.push(animal(6, Sex::Male, None, None));
        animals.push(animal(7, Sex::Male, None, Some(2)));
        let records = vec![record(1, 1, Some(6), vec![])];

        let mates = find_optimal_mates(3, 10, &animals, &[], &records);
        let sires: Vec<_> = mates.iter().map(|m| m.sire).collect();

        // 2 is her sire and is excluded; 4 is a full brother
        assert!(!sires.contains(&AnimalRef::Internal(2)));
        assert_eq!(sires[0], AnimalRef::Internal(6));
        assert!((mates[0].compatibility_score - 100.0).abs() < 1e-9);
        let half_brother = mates.iter().find(|m| m.sire == AnimalRef::Internal(7)).unwrap();
        assert_eq!(half_brother.shared_ancestors, 1);
        assert_eq!(half_brother.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_optimal_mates_for_male_is_empty() {
        assert!(find_optimal_mates(2, 10, &sibling_mating(), &[], &[]).is_empty());
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(assess_inbreeding_risk(0.0).level, RiskLevel::Low);
        assert_eq!(assess_inbreeding_risk(0.0625).level, RiskLevel::Moderate);
        assert_eq!(assess_inbreeding_risk(0.125).level, RiskLevel::High);
        assert_eq!(assess_inbreeding_risk(0.25).level, RiskLevel::Critical);
        assert!((assess_inbreeding_risk(0.0).score - 100.0).abs() < f64::EPSILON);
        assert!(assess_inbreeding_risk(1.0).score.abs() < f64::EPSILON);
    }
}
