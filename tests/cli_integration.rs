// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the herdbook CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const OWNER: &str = "owner@greenacres.test";
const MANAGER: &str = "manager@greenacres.test";
const VET: &str = "vet@greenacres.test";
const WORKER: &str = "worker@greenacres.test";
const ADMIN: &str = "admin@herdbook.test";
const HIGHLAND: &str = "owner@highland.test";

/// A herdbook command isolated to a temporary data directory and config
fn herdbook(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("herdbook").unwrap();
    cmd.env("HERDBOOK_DATA_DIR", data_dir.path())
        .env("HERDBOOK_CONFIG", data_dir.path().join("config.toml"))
        .env("HERDBOOK_TODAY", "2025-06-01")
        .env_remove("HERDBOOK_USER")
        .env_remove("HERDBOOK_TENANT")
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

/// Same as [`herdbook`] acting as `user`
fn herdbook_as(data_dir: &TempDir, user: &str) -> Command {
    let mut cmd = herdbook(data_dir);
    cmd.args(["--as", user]);
    cmd
}

/// Seed the demo herd into the data directory
fn make_seeded() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    herdbook(&data_dir).arg("seed").assert().success();
    data_dir
}

#[test]
fn test_seed_writes_dataset_once() {
    let data_dir = TempDir::new().unwrap();

    herdbook(&data_dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 2 tenants, 12 animals"));
    assert!(data_dir.path().join("herd.json").exists());

    herdbook(&data_dir)
        .arg("seed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    herdbook(&data_dir).args(["seed", "--force"]).assert().success();
}

#[test]
fn test_requires_acting_user() {
    let data_dir = make_seeded();
    herdbook(&data_dir)
        .args(["animal", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No acting user"));
}

#[test]
fn test_animal_list_is_tenant_scoped() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args(["animal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GA-001"))
        .stdout(predicate::str::contains("HS-010").not());

    herdbook_as(&data_dir, HIGHLAND)
        .args(["animal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HS-010"))
        .stdout(predicate::str::contains("GA-001").not());
}

#[test]
fn test_cross_tenant_access_denied() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, HIGHLAND)
        .args(["animal", "show", "GA-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No animal matching"));

    herdbook_as(&data_dir, HIGHLAND)
        .args(["--tenant", "1", "animal", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot act on tenant 1"));
}

#[test]
fn test_super_admin_can_view_any_tenant() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, ADMIN)
        .args(["animal", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tenant is required"));

    herdbook_as(&data_dir, ADMIN)
        .args(["--tenant", "2", "animal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HS-012"));
}

#[test]
fn test_animal_add_show_remove_with_audit() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args([
            "animal", "add", "--tag", "GA-050", "--name", "Clover", "--species", "cattle",
            "--breed", "Angus", "--sex", "female", "--farm", "1", "--mother", "GA-003",
            "--father", "GA-002",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added animal #13"));

    herdbook_as(&data_dir, OWNER)
        .args(["animal", "show", "GA-050"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bella (GA-003)"))
        .stdout(predicate::str::contains("Titan (GA-002)"));

    herdbook_as(&data_dir, OWNER)
        .args(["audit", "list", "--kind", "create", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered Clover (GA-050)"));

    herdbook_as(&data_dir, OWNER)
        .args(["animal", "remove", "GA-050"])
        .assert()
        .success();

    herdbook_as(&data_dir, OWNER)
        .args(["animal", "show", "GA-050"])
        .assert()
        .failure();
}

#[test]
fn test_animal_add_rejects_bad_parents() {
    let data_dir = make_seeded();

    // GA-002 is male
    herdbook_as(&data_dir, OWNER)
        .args([
            "animal", "add", "--tag", "GA-051", "--species", "cattle", "--sex", "m",
            "--farm", "1", "--mother", "GA-002",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected Female"));

    // farm 3 belongs to the other tenant
    herdbook_as(&data_dir, OWNER)
        .args(["animal", "add", "--tag", "GA-052", "--species", "cattle", "--sex", "f", "--farm", "3"])
        .assert()
        .failure();
}

#[test]
fn test_external_sire_can_be_registered_and_used() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args([
            "animal", "add-external", "--name", "Rito 707", "--species", "cattle",
            "--breed", "Angus", "--sex", "male", "--registration", "AAA-1688213",
            "--source", "Sitz Angus",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added external animal ext#4: Rito 707"));

    herdbook_as(&data_dir, OWNER)
        .args([
            "animal", "add", "--tag", "GA-070", "--name", "Posy", "--species", "cattle",
            "--sex", "female", "--farm", "1", "--ext-father", "4",
        ])
        .assert()
        .success();

    herdbook_as(&data_dir, OWNER)
        .args(["animal", "show", "GA-070"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rito 707 [external]"));

    // ext#3 is a ewe kept by the other tenant
    herdbook_as(&data_dir, OWNER)
        .args([
            "animal", "add", "--tag", "GA-071", "--species", "cattle", "--sex", "f",
            "--farm", "1", "--ext-father", "3",
        ])
        .assert()
        .failure();
}

#[test]
fn test_external_animals_stay_within_their_tenant() {
    let data_dir = make_seeded();

    // ext#1 is Green Acres' AI bull
    herdbook_as(&data_dir, HIGHLAND)
        .args([
            "animal", "add", "--tag", "HS-050", "--species", "cattle", "--sex", "female",
            "--farm", "3", "--ext-father", "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("belongs to another tenant"));

    herdbook_as(&data_dir, HIGHLAND)
        .args([
            "animal", "add-external", "--name", "Borrowed Ram", "--species", "sheep",
            "--sex", "male", "--ext-father", "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("belongs to another tenant"));

    herdbook_as(&data_dir, HIGHLAND)
        .args(["breeding", "add", "--dam", "HS-010", "--ext-sire", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sire belongs to another tenant"));

    herdbook_as(&data_dir, HIGHLAND)
        .args(["lineage", "ancestors", "HS-010"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Highfield Resolute").not());
}

#[test]
fn test_permissions_follow_roles_and_delegation() {
    let data_dir = make_seeded();
    let add = [
        "animal", "add", "--tag", "GA-060", "--species", "cattle", "--sex", "f", "--farm", "1",
    ];

    herdbook_as(&data_dir, VET)
        .args(add)
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));

    // the worker holds a delegated manager role
    herdbook_as(&data_dir, WORKER).args(add).assert().success();
}

#[test]
fn test_lineage_inbreeding_of_sibling_mating() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args(["lineage", "inbreeding", "GA-005"])
        .assert()
        .success()
        .stdout(predicate::str::contains("coefficient: 0.2500"))
        .stdout(predicate::str::contains("critical"))
        .stdout(predicate::str::contains("Daisy (GA-001)"))
        .stdout(predicate::str::contains("Highfield Resolute [external]"));

    herdbook_as(&data_dir, OWNER)
        .args(["lineage", "generation", "GA-005"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is generation 3"));
}

#[test]
fn test_lineage_pedigree_json() {
    let data_dir = make_seeded();

    let output = herdbook_as(&data_dir, OWNER)
        .args(["--json", "lineage", "pedigree", "GA-005", "--generations", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["animal_id"], 5);
    assert_eq!(report["generations"], 2);
    assert_eq!(report["possible_ancestors"], 6);
    assert_eq!(report["ancestors_tracked"], 6);
    assert_eq!(report["risk"]["level"], "critical");
}

#[test]
fn test_lineage_descendants_and_unknown_action() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args(["lineage", "descendants", "GA-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bella (GA-003)"))
        .stdout(predicate::str::contains("Rosie (GA-005)"));

    herdbook_as(&data_dir, OWNER)
        .args(["lineage", "cousins", "GA-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown action: cousins"));
}

#[test]
fn test_breeding_add_and_due() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, MANAGER)
        .args(["breeding", "add", "--dam", "GA-006", "--ext-sire", "2", "--method", "ai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded breeding #8"))
        .stdout(predicate::str::contains("expected due: 2026-03-11"));

    // an open record blocks a second mating
    herdbook_as(&data_dir, MANAGER)
        .args(["breeding", "add", "--dam", "GA-006", "--sire", "GA-002"])
        .assert()
        .failure();

    herdbook_as(&data_dir, MANAGER)
        .args(["breeding", "due", "--within", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-11-20"))
        .stdout(predicate::str::contains("2025-12-09"))
        .stdout(predicate::str::contains("2026-03-11").not());
}

#[test]
fn test_breeding_birth_creates_offspring() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, MANAGER)
        .args([
            "breeding", "birth", "5", "--date", "2025-11-18", "--offspring", "GA-070:f:Hazel",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GA-070"));

    herdbook_as(&data_dir, MANAGER)
        .args(["animal", "show", "GA-070"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Willow (GA-008)"))
        .stdout(predicate::str::contains("Ranger (GA-007)"));

    // the record is closed now
    herdbook_as(&data_dir, MANAGER)
        .args(["breeding", "birth", "5", "--offspring", "GA-071:m"])
        .assert()
        .failure();
}

#[test]
fn test_finance_summary_json() {
    let data_dir = make_seeded();

    let output = herdbook_as(&data_dir, OWNER)
        .args(["--json", "finance", "summary"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total_expenses_cents"], 448_500);
    assert_eq!(summary["total_sales_cents"], 212_000);
    assert_eq!(summary["net_profit_cents"], -236_500);

    herdbook_as(&data_dir, WORKER)
        .args(["finance", "summary"])
        .assert()
        .success();
    herdbook_as(&data_dir, VET)
        .args(["finance", "summary"])
        .assert()
        .failure();
}

#[test]
fn test_inventory_low_and_adjust() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, WORKER)
        .args(["inventory", "low"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hay bales"))
        .stdout(predicate::str::contains("Mineral lick").not());

    herdbook_as(&data_dir, WORKER)
        .args(["inventory", "adjust", "3", "--delta", "-20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient stock"));

    herdbook_as(&data_dir, WORKER)
        .args(["inventory", "adjust", "3", "--delta", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("to 20 dose"));
}

#[test]
fn test_delegation_grant_and_revoke() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, MANAGER)
        .args(["delegation", "grant", "--to", VET, "--role", "owner"])
        .assert()
        .failure();

    herdbook_as(&data_dir, MANAGER)
        .args(["delegation", "grant", "--to", VET, "--role", "manager", "--until", "2025-06-30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Delegation #3"));

    // the vet can now manage animals
    herdbook_as(&data_dir, VET)
        .args(["animal", "add", "--tag", "GA-080", "--species", "cattle", "--sex", "f", "--farm", "1"])
        .assert()
        .success();

    herdbook_as(&data_dir, MANAGER)
        .args(["delegation", "revoke", "3"])
        .assert()
        .success();

    herdbook_as(&data_dir, VET)
        .args(["animal", "add", "--tag", "GA-081", "--species", "cattle", "--sex", "f", "--farm", "1"])
        .assert()
        .failure();
}

#[test]
fn test_tenant_admin_only() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args(["tenant", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));

    herdbook_as(&data_dir, ADMIN)
        .args(["tenant", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Highland Sheep Collective"));

    herdbook_as(&data_dir, ADMIN)
        .args(["tenant", "show", "green-acres"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8 animals, 2 farms, 4 users"));
}

#[test]
fn test_subscription_invoice_and_usage() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args(["subscription", "invoice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total:    99.00 USD"));

    herdbook_as(&data_dir, OWNER)
        .args(["subscription", "usage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Within Professional plan limits"));

    herdbook_as(&data_dir, MANAGER)
        .args(["subscription", "show"])
        .assert()
        .failure();
}

#[test]
fn test_export_dot_and_json() {
    let data_dir = make_seeded();

    herdbook_as(&data_dir, OWNER)
        .args(["export", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph pedigree"))
        .stdout(predicate::str::contains("\"#5\" -> \"#3\" [label=\"dam\"]"))
        .stdout(predicate::str::contains("Fern").not());

    let out = data_dir.path().join("export.json");
    herdbook_as(&data_dir, HIGHLAND)
        .args(["export", "--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success();
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported["animals"].as_array().unwrap().len(), 3);

    herdbook_as(&data_dir, OWNER)
        .args(["export", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export format"));
}

#[test]
fn test_config_set_and_get() {
    let data_dir = TempDir::new().unwrap();

    herdbook(&data_dir)
        .args(["config", "currency", "EUR"])
        .assert()
        .success();
    herdbook(&data_dir)
        .args(["config", "currency"])
        .assert()
        .success()
        .stdout(predicate::str::diff("EUR\n"));
    herdbook(&data_dir)
        .args(["config", "colour", "blue"])
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    let data_dir = TempDir::new().unwrap();
    herdbook(&data_dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("herdbook"));
}
