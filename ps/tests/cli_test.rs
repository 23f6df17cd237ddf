//! End-to-end tests for the `ps` binary

use assert_cmd::Command;
use predicates::prelude::*;
use profilestore::{JsonProfileStore, Profile, ProfileStore};
use tempfile::TempDir;

fn ps() -> Command {
    Command::cargo_bin("ps").expect("ps binary should build")
}

#[test]
fn test_list_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");

    ps().arg("--path")
        .arg(&path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No users found"));
}

#[test]
fn test_show_and_delete() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    {
        let store = JsonProfileStore::open(&path).unwrap();
        store.set("42", &Profile::new("Ada", "student").with_hours_per_day(2.0)).unwrap();
        store.set_last_goal("42", "thesis; guitar").unwrap();
    }

    ps().arg("--path")
        .arg(&path)
        .args(["show", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("thesis; guitar"));

    ps().arg("--path").arg(&path).args(["delete", "42"]).assert().success();

    ps().arg("--path")
        .arg(&path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No users found"));
}
