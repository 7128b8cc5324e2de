// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Herdbook library - multi-tenant livestock herd book
//!
//! This crate provides the core functionality for managing livestock
//! records across tenants and farms: pedigree and inbreeding analysis,
//! breeding and pregnancy tracking, finance, inventory, role delegation
//! and subscription administration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod access;
pub mod audit;
pub mod breeding;
pub mod commands;
pub mod config;
pub mod error;
pub mod finance;
pub mod herd;
pub mod inventory;
pub mod lineage;
pub mod seed;
pub mod subscription;

/// Core data types for the herd book dataset
pub mod types {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Serialize};

    // =========================================================================
    // Tenancy
    // =========================================================================

    /// Tenant account status
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TenantStatus {
        /// Tenant can use the platform
        Active,
        /// Tenant has been suspended by a super admin
        Suspended,
    }

    /// An organization/account boundary
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Tenant {
        /// Unique identifier
        pub id: u64,
        /// Display name
        pub name: String,
        /// URL-safe short name
        pub slug: String,
        /// Contact address for billing and notices
        pub contact_email: String,
        /// Account status
        pub status: TenantStatus,
        /// When the tenant was created
        pub created_on: NaiveDate,
    }

    /// Subscription plan tiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PlanTier {
        /// Single farm, small herd
        Basic,
        /// Several farms
        Professional,
        /// No limits
        Enterprise,
    }

    /// Subscription lifecycle status
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SubscriptionStatus {
        /// Free trial period
        Trial,
        /// Paid and current
        Active,
        /// Payment overdue
        PastDue,
        /// Cancelled by the tenant
        Cancelled,
        /// Lapsed
        Expired,
    }

    /// Billing cycle
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BillingCycle {
        /// Billed every month
        Monthly,
        /// Billed every year
        Yearly,
    }

    /// A tenant's subscription
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Subscription {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Plan tier
        pub plan: PlanTier,
        /// Lifecycle status
        pub status: SubscriptionStatus,
        /// Billing cycle
        pub billing_cycle: BillingCycle,
        /// Start of the subscription
        pub started_on: NaiveDate,
        /// Next renewal date
        pub renews_on: NaiveDate,
    }

    /// A farm belonging to a tenant
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Farm {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Display name
        pub name: String,
        /// Free-form location
        pub location: String,
        /// Area in hectares
        pub size_hectares: f64,
    }

    // =========================================================================
    // Animals
    // =========================================================================

    /// Supported livestock species
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Species {
        /// Cattle
        Cattle,
        /// Sheep
        Sheep,
        /// Goats
        Goat,
        /// Pigs
        Pig,
        /// Horses
        Horse,
    }

    impl Species {
        /// Average gestation length in days
        #[must_use]
        pub fn gestation_days(self) -> i64 {
            match self {
                Self::Cattle => 283,
                Self::Sheep => 147,
                Self::Goat => 150,
                Self::Pig => 114,
                Self::Horse => 340,
            }
        }

        /// Parse a species name
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "cattle" | "cow" | "bovine" => Some(Self::Cattle),
                "sheep" | "ovine" => Some(Self::Sheep),
                "goat" | "caprine" => Some(Self::Goat),
                "pig" | "swine" | "porcine" => Some(Self::Pig),
                "horse" | "equine" => Some(Self::Horse),
                _ => None,
            }
        }
    }

    /// Animal sex
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Sex {
        /// Female (dam)
        Female,
        /// Male (sire)
        Male,
    }

    impl Sex {
        /// Parse a sex name
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "f" | "female" | "dam" => Some(Self::Female),
                "m" | "male" | "sire" => Some(Self::Male),
                _ => None,
            }
        }
    }

    /// Herd membership status
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AnimalStatus {
        /// Currently in the herd
        Active,
        /// Sold off the farm
        Sold,
        /// Died
        Deceased,
        /// Removed from the breeding herd
        Culled,
    }

    impl AnimalStatus {
        /// Parse a status name
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "active" => Some(Self::Active),
                "sold" => Some(Self::Sold),
                "deceased" | "dead" => Some(Self::Deceased),
                "culled" => Some(Self::Culled),
                _ => None,
            }
        }
    }

    /// An animal recorded in a tenant's herd
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Animal {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Farm the animal is kept on
        pub farm_id: u64,
        /// Ear tag or herd number
        pub tag_number: String,
        /// Optional call name
        #[serde(default)]
        pub name: Option<String>,
        /// Species
        pub species: Species,
        /// Breed
        pub breed: String,
        /// Sex
        pub sex: Sex,
        /// Date of birth
        #[serde(default)]
        pub birth_date: Option<NaiveDate>,
        /// Herd status
        pub status: AnimalStatus,
        /// Dam recorded in this herd
        #[serde(default)]
        pub mother_animal_id: Option<u64>,
        /// Sire recorded in this herd
        #[serde(default)]
        pub father_animal_id: Option<u64>,
        /// Dam recorded as an external animal
        #[serde(default)]
        pub external_mother_id: Option<u64>,
        /// Sire recorded as an external animal
        #[serde(default)]
        pub external_father_id: Option<u64>,
        /// Last recorded weight
        #[serde(default)]
        pub weight_kg: Option<f64>,
        /// Free-form notes
        #[serde(default)]
        pub notes: Option<String>,
    }

    impl Animal {
        /// Name if set, otherwise the tag number
        #[must_use]
        pub fn display_name(&self) -> &str {
            self.name.as_deref().unwrap_or(&self.tag_number)
        }
    }

    /// An animal outside the herd, e.g. an AI bull or a purchased animal's
    /// registered parents
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExternalAnimal {
        /// Unique identifier
        pub id: u64,
        /// Tenant that recorded it
        pub tenant_id: u64,
        /// Name
        pub name: String,
        /// Breed society registration number
        #[serde(default)]
        pub registration_number: Option<String>,
        /// Species
        pub species: Species,
        /// Breed
        pub breed: String,
        /// Sex
        pub sex: Sex,
        /// Stud, AI centre or seller
        #[serde(default)]
        pub source: Option<String>,
        /// External dam
        #[serde(default)]
        pub mother_id: Option<u64>,
        /// External sire
        #[serde(default)]
        pub father_id: Option<u64>,
    }

    // =========================================================================
    // Breeding
    // =========================================================================

    /// How a mating was performed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BreedingMethod {
        /// Natural service
        Natural,
        /// Artificial insemination
        ArtificialInsemination,
        /// Embryo transfer
        EmbryoTransfer,
    }

    impl BreedingMethod {
        /// Parse a method name
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "natural" => Some(Self::Natural),
                "ai" | "artificial_insemination" => Some(Self::ArtificialInsemination),
                "et" | "embryo_transfer" => Some(Self::EmbryoTransfer),
                _ => None,
            }
        }
    }

    /// Pregnancy state of a breeding record
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PregnancyStatus {
        /// Mated, not yet checked
        Bred,
        /// Pregnancy confirmed
        Confirmed,
        /// Birth recorded
        Delivered,
        /// Did not take or was lost
        Failed,
    }

    impl PregnancyStatus {
        /// Whether the record is still awaiting an outcome
        #[must_use]
        pub fn is_open(self) -> bool {
            matches!(self, Self::Bred | Self::Confirmed)
        }
    }

    /// A mating event
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BreedingRecord {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Farm where the mating happened
        pub farm_id: u64,
        /// Dam
        pub female_animal_id: u64,
        /// Sire from the herd
        #[serde(default)]
        pub male_animal_id: Option<u64>,
        /// Sire recorded as an external animal
        #[serde(default)]
        pub external_male_id: Option<u64>,
        /// Mating method
        pub method: BreedingMethod,
        /// Date of service
        pub breeding_date: NaiveDate,
        /// Pregnancy status
        pub status: PregnancyStatus,
        /// Expected birth date
        #[serde(default)]
        pub expected_due_date: Option<NaiveDate>,
        /// Actual birth date
        #[serde(default)]
        pub actual_birth_date: Option<NaiveDate>,
        /// Animals born from this mating
        #[serde(default)]
        pub offspring_ids: Vec<u64>,
        /// Free-form notes
        #[serde(default)]
        pub notes: Option<String>,
    }

    // =========================================================================
    // Husbandry, Finance, Inventory
    // =========================================================================

    /// Kind of husbandry activity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ActivityKind {
        /// Vaccination
        Vaccination,
        /// Medical treatment
        Treatment,
        /// Weighing
        Weighing,
        /// Routine health check
        HealthCheck,
        /// Feeding change
        Feeding,
        /// Movement between paddocks or farms
        Movement,
        /// Anything else
        Other,
    }

    /// A scheduled or completed husbandry activity
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Activity {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Farm
        pub farm_id: u64,
        /// Animal, when the activity concerns one animal
        #[serde(default)]
        pub animal_id: Option<u64>,
        /// Kind
        pub kind: ActivityKind,
        /// Short title
        pub title: String,
        /// Scheduled date
        pub scheduled_on: NaiveDate,
        /// Whether it has been done
        #[serde(default)]
        pub completed: bool,
        /// Free-form notes
        #[serde(default)]
        pub notes: Option<String>,
    }

    /// Expense categories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseCategory {
        /// Feed and forage
        Feed,
        /// Vet fees and medicine
        Veterinary,
        /// Wages
        Labor,
        /// Machinery and tools
        Equipment,
        /// Power, water, fuel
        Utilities,
        /// Semen, stud fees
        Breeding,
        /// Anything else
        Other,
    }

    /// A farm expense
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Expense {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Farm
        pub farm_id: u64,
        /// Category
        pub category: ExpenseCategory,
        /// Description
        pub description: String,
        /// Amount in minor currency units
        pub amount_cents: i64,
        /// Date incurred
        pub date: NaiveDate,
        /// Animal, when the expense concerns one animal
        #[serde(default)]
        pub animal_id: Option<u64>,
    }

    /// A sale of animals or produce
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Sale {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Farm
        pub farm_id: u64,
        /// Animal sold, if any
        #[serde(default)]
        pub animal_id: Option<u64>,
        /// Buyer
        pub buyer: String,
        /// Description
        pub description: String,
        /// Number of units
        pub quantity: u32,
        /// Total amount in minor currency units
        pub amount_cents: i64,
        /// Sale date
        pub date: NaiveDate,
    }

    /// Inventory categories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InventoryCategory {
        /// Feed stock
        Feed,
        /// Medicines and vaccines
        Medicine,
        /// Equipment
        Equipment,
        /// Consumables
        Supplies,
    }

    /// A stock item held on a farm
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct InventoryItem {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Farm
        pub farm_id: u64,
        /// Item name
        pub name: String,
        /// Category
        pub category: InventoryCategory,
        /// Quantity on hand
        pub quantity: f64,
        /// Unit of measure
        pub unit: String,
        /// Quantity at which to reorder
        pub reorder_level: f64,
        /// Cost per unit in minor currency units
        pub unit_cost_cents: i64,
    }

    // =========================================================================
    // Users, Roles, Delegation, Audit
    // =========================================================================

    /// User roles, most powerful first
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        /// Platform administrator across all tenants
        SuperAdmin,
        /// Tenant owner
        Owner,
        /// Farm manager
        Manager,
        /// Veterinarian
        Veterinarian,
        /// Farm worker
        Worker,
        /// Read-only access
        Viewer,
    }

    /// Individual capabilities granted by roles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Permission {
        /// Read animal records and pedigrees
        ViewAnimals,
        /// Create, edit and remove animals
        ManageAnimals,
        /// Record matings and births
        ManageBreeding,
        /// Read expenses and sales
        ViewFinance,
        /// Record expenses and sales
        ManageFinance,
        /// Adjust stock
        ManageInventory,
        /// Manage users and delegations
        ManageUsers,
        /// Read audit logs
        ViewAuditLogs,
        /// Administer tenants
        ManageTenants,
        /// Administer subscriptions
        ManageSubscriptions,
    }

    /// A user account
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct User {
        /// Unique identifier
        pub id: u64,
        /// Tenant, absent for platform super admins
        #[serde(default)]
        pub tenant_id: Option<u64>,
        /// Display name
        pub name: String,
        /// Login email
        pub email: String,
        /// Assigned role
        pub role: Role,
    }

    /// Temporary grant of a role from one user to another
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Delegation {
        /// Unique identifier
        pub id: u64,
        /// Owning tenant
        pub tenant_id: u64,
        /// Farm the grant is limited to, if any
        #[serde(default)]
        pub farm_id: Option<u64>,
        /// Delegating user
        pub from_user_id: u64,
        /// Receiving user
        pub to_user_id: u64,
        /// Role granted
        pub role: Role,
        /// First day the grant applies
        pub starts_on: NaiveDate,
        /// Last day the grant applies, open-ended if absent
        #[serde(default)]
        pub ends_on: Option<NaiveDate>,
        /// Revoked before its end date
        #[serde(default)]
        pub revoked: bool,
    }

    /// Kind of audited action
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AuditAction {
        /// Record created
        Create,
        /// Record changed
        Update,
        /// Record removed
        Delete,
        /// Data exported
        Export,
        /// Role delegated
        Delegate,
        /// Delegation revoked
        Revoke,
    }

    impl AuditAction {
        /// Parse an action name
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.to_lowercase().as_str() {
                "create" => Some(Self::Create),
                "update" => Some(Self::Update),
                "delete" => Some(Self::Delete),
                "export" => Some(Self::Export),
                "delegate" => Some(Self::Delegate),
                "revoke" => Some(Self::Revoke),
                _ => None,
            }
        }
    }

    /// Audit trail entry
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AuditLog {
        /// Unique identifier
        pub id: u64,
        /// Tenant, absent for platform-level actions
        #[serde(default)]
        pub tenant_id: Option<u64>,
        /// Acting user
        pub user_id: u64,
        /// Action
        pub action: AuditAction,
        /// Entity kind, e.g. "animal"
        pub entity_type: String,
        /// Entity id
        #[serde(default)]
        pub entity_id: Option<u64>,
        /// Human-readable details
        pub details: String,
        /// When it happened
        pub timestamp: DateTime<Utc>,
    }

    // =========================================================================
    // Herd Store
    // =========================================================================

    /// The complete dataset
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct HerdStore {
        /// All tenants
        #[serde(default)]
        pub tenants: Vec<Tenant>,
        /// All subscriptions
        #[serde(default)]
        pub subscriptions: Vec<Subscription>,
        /// All farms
        #[serde(default)]
        pub farms: Vec<Farm>,
        /// All users
        #[serde(default)]
        pub users: Vec<User>,
        /// All animals
        #[serde(default)]
        pub animals: Vec<Animal>,
        /// All external animals
        #[serde(default)]
        pub external_animals: Vec<ExternalAnimal>,
        /// All breeding records
        #[serde(default)]
        pub breeding_records: Vec<BreedingRecord>,
        /// All activities
        #[serde(default)]
        pub activities: Vec<Activity>,
        /// All expenses
        #[serde(default)]
        pub expenses: Vec<Expense>,
        /// All sales
        #[serde(default)]
        pub sales: Vec<Sale>,
        /// All inventory items
        #[serde(default)]
        pub inventory: Vec<InventoryItem>,
        /// All delegations
        #[serde(default)]
        pub delegations: Vec<Delegation>,
        /// All audit log entries
        #[serde(default)]
        pub audit_logs: Vec<AuditLog>,
    }

    /// Next free id in a collection: one past the largest id, 1 when empty
    pub fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> u64) -> u64 {
        items.iter().map(id_of).max().map_or(1, |max| max + 1)
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::HerdError;
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
