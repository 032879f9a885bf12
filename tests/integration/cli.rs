//! Binary-level CLI tests.
//!
//! These run the `ipub` binary itself. Everything here works without an
//! IPFS daemon: publishing paths are covered by `--dry-run` and `validate`.

use assert_cmd::Command;
use ipub::constants::MANIFEST_NAME;
use predicates::prelude::*;
use tempfile::TempDir;

fn ipub() -> Command {
    Command::cargo_bin("ipub").expect("ipub binary should build")
}

#[test]
fn help_lists_commands() {
    ipub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn init_then_validate_round_trips() {
    let dir = TempDir::new().unwrap();

    ipub()
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(MANIFEST_NAME));

    ipub()
        .arg("validate")
        .arg("--manifest-path")
        .arg(dir.path().join(MANIFEST_NAME))
        .assert()
        .success()
        .stdout(predicate::str::contains("acyclic"));
}

#[test]
fn init_refuses_existing_manifest() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(MANIFEST_NAME), "{}").unwrap();

    ipub()
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn build_dry_run_prints_identifier_mapping() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("page"), "id=<<P>>").unwrap();
    std::fs::write(
        dir.path().join(MANIFEST_NAME),
        r#"{
            "sources": {
                "pinned": { "type": "static", "product_id": "QmPinned" },
                "page": { "type": "replace", "replace": { "<<P>>": "pinned" } }
            },
            "targets": ["page", "pinned"]
        }"#,
    )
    .unwrap();

    let assert = ipub()
        .args(["build", "--dry-run", "--manifest-path"])
        .arg(dir.path().join(MANIFEST_NAME))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pinned\": \"QmPinned\""));

    // Output is a JSON object keyed by target name
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["page"].is_string());
}

#[test]
fn build_without_manifest_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    ipub()
        .args(["build", "--dry-run"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ipub init"));
}

#[test]
fn validate_reports_reference_cycles() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(MANIFEST_NAME),
        r#"{
            "sources": {
                "a": { "type": "replace", "replace": { "@b@": "b" } },
                "b": { "type": "replace", "replace": { "@a@": "a" } }
            }
        }"#,
    )
    .unwrap();

    ipub()
        .arg("validate")
        .arg("--manifest-path")
        .arg(dir.path().join(MANIFEST_NAME))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn validate_resolve_dry_runs_the_build() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index"), "x<<A>>y").unwrap();
    std::fs::write(
        dir.path().join(MANIFEST_NAME),
        r#"{
            "sources": {
                "A": { "type": "static", "product_id": "42" },
                "index": { "type": "replace", "replace": { "<<A>>": "A" } }
            },
            "targets": ["index"]
        }"#,
    )
    .unwrap();

    ipub()
        .args(["validate", "--resolve", "--manifest-path"])
        .arg(dir.path().join(MANIFEST_NAME))
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run resolved 1 targets"));
}

#[test]
fn invalid_manifest_fails_validation() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(MANIFEST_NAME),
        r#"{ "sources": { "a": { "type": "static" } } }"#,
    )
    .unwrap();

    ipub()
        .arg("validate")
        .arg("--manifest-path")
        .arg(dir.path().join(MANIFEST_NAME))
        .assert()
        .failure()
        .stderr(predicate::str::contains("product_id"));
}
