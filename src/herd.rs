// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! The in-memory herd dataset with a petgraph parentage graph

use crate::error::HerdError;
use crate::lineage::AnimalRef;
use crate::types::{
    Animal, BreedingRecord, ExternalAnimal, Farm, HerdStore, Sex, Species, Tenant, User,
};
use anyhow::{Context, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// File name of the dataset inside a data directory
pub const HERD_FILE: &str = "herd.json";

/// Parent role on a parentage edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRole {
    /// Mother
    Dam,
    /// Father
    Sire,
}

/// The herd dataset with petgraph backing for parentage checks
pub struct Herd {
    /// Parent -> child edges over herd and external animals
    graph: DiGraph<AnimalRef, ParentRole>,
    /// Map from animal reference to node index
    node_indices: HashMap<AnimalRef, NodeIndex>,
    /// The dataset
    pub store: HerdStore,
}

impl Default for Herd {
    fn default() -> Self {
        Self::new()
    }
}

impl Herd {
    /// Create an empty herd
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(HerdStore::default())
    }

    /// Wrap an existing dataset
    #[must_use]
    pub fn from_store(store: HerdStore) -> Self {
        let mut herd = Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            store,
        };
        herd.rebuild_graph();
        herd
    }

    /// Load the dataset from a directory containing herd.json
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(HERD_FILE);

        let store: HerdStore = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            tracing::debug!("No dataset at {}, starting empty", path.display());
            HerdStore::default()
        };

        Ok(Self::from_store(store))
    }

    /// Save the dataset to a directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let path = dir.join(HERD_FILE);
        let json = serde_json::to_string_pretty(&self.store).context("Failed to serialize herd")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Rebuild the parentage graph from the store
    fn rebuild_graph(&mut self) {
        self.graph.clear();
        self.node_indices.clear();

        let subjects: Vec<AnimalRef> = self
            .store
            .animals
            .iter()
            .map(|a| AnimalRef::Internal(a.id))
            .chain(self.store.external_animals.iter().map(|e| AnimalRef::External(e.id)))
            .collect();
        for subject in subjects {
            self.node(subject);
        }

        let mut links = Vec::new();
        for animal in &self.store.animals {
            links.extend(Self::parent_links(animal));
        }
        for external in &self.store.external_animals {
            links.extend(Self::external_parent_links(external));
        }
        for (parent, child, role) in links {
            if let (Some(&from), Some(&to)) =
                (self.node_indices.get(&parent), self.node_indices.get(&child))
            {
                self.graph.add_edge(from, to, role);
            }
        }
    }

    fn node(&mut self, subject: AnimalRef) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&subject) {
            return idx;
        }
        let idx = self.graph.add_node(subject);
        self.node_indices.insert(subject, idx);
        idx
    }

    fn parent_links(animal: &Animal) -> Vec<(AnimalRef, AnimalRef, ParentRole)> {
        let child = AnimalRef::Internal(animal.id);
        let mother = animal
            .mother_animal_id
            .map(AnimalRef::Internal)
            .or(animal.external_mother_id.map(AnimalRef::External));
        let father = animal
            .father_animal_id
            .map(AnimalRef::Internal)
            .or(animal.external_father_id.map(AnimalRef::External));
        [(mother, ParentRole::Dam), (father, ParentRole::Sire)]
            .into_iter()
            .filter_map(|(parent, role)| parent.map(|p| (p, child, role)))
            .collect()
    }

    fn external_parent_links(external: &ExternalAnimal) -> Vec<(AnimalRef, AnimalRef, ParentRole)> {
        let child = AnimalRef::External(external.id);
        [
            (external.mother_id, ParentRole::Dam),
            (external.father_id, ParentRole::Sire),
        ]
        .into_iter()
        .filter_map(|(parent, role)| parent.map(|p| (AnimalRef::External(p), child, role)))
        .collect()
    }

    /// Species, sex and tenant of any animal reference
    fn profile(&self, subject: AnimalRef) -> Option<(Species, Sex, u64)> {
        match subject {
            AnimalRef::Internal(id) => self.animal(id).map(|a| (a.species, a.sex, a.tenant_id)),
            AnimalRef::External(id) => self
                .external_animal(id)
                .map(|e| (e.species, e.sex, e.tenant_id)),
        }
    }

    fn check_parent(
        &self,
        parent: Option<AnimalRef>,
        expected: Sex,
        species: Species,
        tenant_id: u64,
        child: AnimalRef,
    ) -> Result<(), HerdError> {
        let Some(parent) = parent else {
            return Ok(());
        };
        if parent == child {
            return Err(HerdError::invalid("animal", format!("{child} cannot be its own parent")));
        }
        let (parent_species, parent_sex, parent_tenant) = self.profile(parent).ok_or(match parent {
            AnimalRef::Internal(id) => HerdError::NotFound { entity: "animal", id },
            AnimalRef::External(id) => HerdError::NotFound { entity: "external animal", id },
        })?;
        if parent_tenant != tenant_id {
            return Err(HerdError::invalid(
                "animal",
                format!("parent {parent} belongs to another tenant"),
            ));
        }
        if parent_sex != expected {
            return Err(HerdError::invalid(
                "animal",
                format!("parent {parent} is {parent_sex:?}, expected {expected:?}"),
            ));
        }
        if parent_species != species {
            return Err(HerdError::invalid(
                "animal",
                format!("parent {parent} is {parent_species:?}, child is {species:?}"),
            ));
        }
        Ok(())
    }

    /// Check that `links` added to the graph keep it acyclic
    fn check_acyclic(
        &self,
        subject: AnimalRef,
        links: &[(AnimalRef, AnimalRef, ParentRole)],
    ) -> Result<(), HerdError> {
        let mut trial = self.graph.clone();
        let mut indices = self.node_indices.clone();
        let mut index_of = |r: AnimalRef, g: &mut DiGraph<AnimalRef, ParentRole>| {
            *indices.entry(r).or_insert_with(|| g.add_node(r))
        };

        // Drop the subject's current parent edges; they are being replaced
        if let Some(&idx) = self.node_indices.get(&subject) {
            trial.retain_edges(|g, e| g.edge_endpoints(e).map_or(true, |(_, to)| to != idx));
        }

        for &(parent, child, role) in links {
            let from = index_of(parent, &mut trial);
            let to = index_of(child, &mut trial);
            trial.add_edge(from, to, role);
        }

        if is_cyclic_directed(&trial) {
            let id = match subject {
                AnimalRef::Internal(id) | AnimalRef::External(id) => id,
            };
            return Err(HerdError::ParentageCycle(id));
        }
        Ok(())
    }

    /// Add or replace an animal after validating its tenant, farm and parents
    pub fn add_animal(&mut self, animal: Animal) -> Result<(), HerdError> {
        if self.tenant(animal.tenant_id).is_none() {
            return Err(HerdError::NotFound { entity: "tenant", id: animal.tenant_id });
        }
        let farm = self
            .farm(animal.farm_id)
            .ok_or(HerdError::NotFound { entity: "farm", id: animal.farm_id })?;
        if farm.tenant_id != animal.tenant_id {
            return Err(HerdError::invalid(
                "animal",
                format!("farm {} belongs to another tenant", farm.id),
            ));
        }
        if self
            .store
            .animals
            .iter()
            .any(|a| a.id != animal.id && a.tenant_id == animal.tenant_id && a.tag_number == animal.tag_number)
        {
            return Err(HerdError::invalid(
                "animal",
                format!("tag {} is already in use", animal.tag_number),
            ));
        }

        let subject = AnimalRef::Internal(animal.id);
        let links = Self::parent_links(&animal);
        for &(parent, _, role) in &links {
            let expected = match role {
                ParentRole::Dam => Sex::Female,
                ParentRole::Sire => Sex::Male,
            };
            self.check_parent(Some(parent), expected, animal.species, animal.tenant_id, subject)?;
        }
        self.check_acyclic(subject, &links)?;

        tracing::debug!("Adding animal {} ({})", animal.id, animal.tag_number);
        if let Some(existing) = self.store.animals.iter_mut().find(|a| a.id == animal.id) {
            *existing = animal;
        } else {
            self.store.animals.push(animal);
        }
        self.rebuild_graph();
        Ok(())
    }

    /// Add or replace an external animal
    pub fn add_external_animal(&mut self, external: ExternalAnimal) -> Result<(), HerdError> {
        if self.tenant(external.tenant_id).is_none() {
            return Err(HerdError::NotFound { entity: "tenant", id: external.tenant_id });
        }
        let subject = AnimalRef::External(external.id);
        let links = Self::external_parent_links(&external);
        for &(parent, _, role) in &links {
            let expected = match role {
                ParentRole::Dam => Sex::Female,
                ParentRole::Sire => Sex::Male,
            };
            self.check_parent(Some(parent), expected, external.species, external.tenant_id, subject)?;
        }
        self.check_acyclic(subject, &links)?;

        if let Some(existing) = self
            .store
            .external_animals
            .iter_mut()
            .find(|e| e.id == external.id)
        {
            *existing = external;
        } else {
            self.store.external_animals.push(external);
        }
        self.rebuild_graph();
        Ok(())
    }

    /// Remove an animal; children keep a dangling parent id
    pub fn remove_animal(&mut self, id: u64) -> Result<Animal, HerdError> {
        let pos = self
            .store
            .animals
            .iter()
            .position(|a| a.id == id)
            .ok_or(HerdError::NotFound { entity: "animal", id })?;
        let removed = self.store.animals.remove(pos);
        self.rebuild_graph();
        Ok(removed)
    }

    /// Append a breeding record without validation; see
    /// [`crate::breeding::register_breeding`] for the checked path
    pub fn push_breeding_record(&mut self, record: BreedingRecord) {
        self.store.breeding_records.push(record);
    }

    /// Get an animal by id
    #[must_use]
    pub fn animal(&self, id: u64) -> Option<&Animal> {
        self.store.animals.iter().find(|a| a.id == id)
    }

    /// Get an external animal by id
    #[must_use]
    pub fn external_animal(&self, id: u64) -> Option<&ExternalAnimal> {
        self.store.external_animals.iter().find(|e| e.id == id)
    }

    /// Get a farm by id
    #[must_use]
    pub fn farm(&self, id: u64) -> Option<&Farm> {
        self.store.farms.iter().find(|f| f.id == id)
    }

    /// Get a tenant by id
    #[must_use]
    pub fn tenant(&self, id: u64) -> Option<&Tenant> {
        self.store.tenants.iter().find(|t| t.id == id)
    }

    /// Get a user by email, case-insensitively
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.store
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Get a breeding record by id
    #[must_use]
    pub fn breeding_record(&self, id: u64) -> Option<&BreedingRecord> {
        self.store.breeding_records.iter().find(|r| r.id == id)
    }

    /// Find an animal of a tenant by tag number or id
    #[must_use]
    pub fn find_animal(&self, tenant_id: u64, tag_or_id: &str) -> Option<&Animal> {
        self.animals_for(tenant_id)
            .into_iter()
            .find(|a| a.tag_number.eq_ignore_ascii_case(tag_or_id))
            .or_else(|| {
                tag_or_id
                    .trim_start_matches('#')
                    .parse::<u64>()
                    .ok()
                    .and_then(|id| self.animal(id))
                    .filter(|a| a.tenant_id == tenant_id)
            })
    }

    /// Animals belonging to a tenant
    #[must_use]
    pub fn animals_for(&self, tenant_id: u64) -> Vec<&Animal> {
        self.store
            .animals
            .iter()
            .filter(|a| a.tenant_id == tenant_id)
            .collect()
    }

    /// Farms belonging to a tenant
    #[must_use]
    pub fn farms_for(&self, tenant_id: u64) -> Vec<&Farm> {
        self.store
            .farms
            .iter()
            .filter(|f| f.tenant_id == tenant_id)
            .collect()
    }

    /// Number of recorded parent links
    #[must_use]
    pub fn parentage_link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the herd has no animals
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.animals.is_empty()
    }

    /// Export the parentage graph to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self, tenant_id: Option<u64>) -> String {
        let in_scope = |t: u64| tenant_id.map_or(true, |id| id == t);
        let mut dot = String::from("digraph pedigree {\n");
        dot.push_str("  rankdir=BT;\n\n");

        for animal in self.store.animals.iter().filter(|a| in_scope(a.tenant_id)) {
            let shape = match animal.sex {
                Sex::Female => "ellipse",
                Sex::Male => "box",
            };
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"{}\\n{}\", shape={}];",
                AnimalRef::Internal(animal.id),
                dot_escape(animal.display_name()),
                dot_escape(&animal.breed),
                shape
            );
        }
        for external in self.store.external_animals.iter().filter(|e| in_scope(e.tenant_id)) {
            let shape = match external.sex {
                Sex::Female => "ellipse",
                Sex::Male => "box",
            };
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"{}\\n{}\", shape={}, style=dashed];",
                AnimalRef::External(external.id),
                dot_escape(&external.name),
                dot_escape(&external.breed),
                shape
            );
        }

        dot.push('\n');

        for edge in self.graph.edge_indices() {
            let Some((from, to)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let (parent, child) = (self.graph[from], self.graph[to]);
            let child_tenant = match child {
                AnimalRef::Internal(id) => self.animal(id).map(|a| a.tenant_id),
                AnimalRef::External(id) => self.external_animal(id).map(|e| e.tenant_id),
            };
            if !child_tenant.is_some_and(in_scope) {
                continue;
            }
            let label = match self.graph[edge] {
                ParentRole::Dam => "dam",
                ParentRole::Sire => "sire",
            };
            let _ = writeln!(dot, "  \"{child}\" -> \"{parent}\" [label=\"{label}\"];");
        }

        dot.push_str("}\n");
        dot
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.store).context("Failed to serialize herd to JSON")
    }

    /// Copy of the dataset holding only one tenant's records
    #[must_use]
    pub fn tenant_store(&self, tenant_id: u64) -> HerdStore {
        fn keep<T: Clone>(items: &[T], pred: impl Fn(&T) -> bool) -> Vec<T> {
            items.iter().filter(|i| pred(i)).cloned().collect()
        }
        let s = &self.store;
        HerdStore {
            tenants: keep(&s.tenants, |t| t.id == tenant_id),
            subscriptions: keep(&s.subscriptions, |x| x.tenant_id == tenant_id),
            farms: keep(&s.farms, |f| f.tenant_id == tenant_id),
            users: keep(&s.users, |u| u.tenant_id == Some(tenant_id)),
            animals: keep(&s.animals, |a| a.tenant_id == tenant_id),
            external_animals: keep(&s.external_animals, |e| e.tenant_id == tenant_id),
            breeding_records: keep(&s.breeding_records, |r| r.tenant_id == tenant_id),
            activities: keep(&s.activities, |a| a.tenant_id == tenant_id),
            expenses: keep(&s.expenses, |e| e.tenant_id == tenant_id),
            sales: keep(&s.sales, |x| x.tenant_id == tenant_id),
            inventory: keep(&s.inventory, |i| i.tenant_id == tenant_id),
            delegations: keep(&s.delegations, |d| d.tenant_id == tenant_id),
            audit_logs: keep(&s.audit_logs, |l| l.tenant_id == Some(tenant_id)),
        }
    }
}

/// Escape text for a quoted DOT string
fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
