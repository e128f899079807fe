#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd(temp: &TempDir) -> Command {
    let mut c = Command::cargo_bin("notepad").unwrap();
    c.env("NOTEPAD_DIR", temp.path())
        .env_remove("NOTEPAD_BACKEND")
        .env("NOTEPAD_LOG", "info");
    c
}

fn add_note(temp: &TempDir, args: &[&str]) -> String {
    let output = cmd(temp)
        .arg("add")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output)
        .trim()
        .strip_prefix("Created ")
        .expect("add should print the new id")
        .to_string()
}

#[test]
fn first_run_lists_welcome_notes_and_writes_snapshot() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Personal] Welcome!"));

    let raw = fs::read_to_string(temp.path().join("notes_app_v1.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.as_array().is_some_and(|notes| !notes.is_empty()));
}

#[test]
fn add_then_filter_by_tag_and_search() {
    let temp = TempDir::new().unwrap();
    add_note(&temp, &["Groceries", "milk, eggs", "-t", "shopping list"]);

    cmd(&temp)
        .args(["list", "-t", "Shopping List"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Shopping List] Groceries"))
        .stdout(predicate::str::contains("Welcome!").not());

    cmd(&temp)
        .args(["list", "-t", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing here yet. Create a note!"));

    cmd(&temp)
        .args(["list", "-s", "MIL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"));
}

#[test]
fn add_with_blank_title_fails_without_writing() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["add", "   ", "body"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("note title cannot be empty"));

    cmd(&temp)
        .args(["list", "-s", "body"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing here yet"));
}

#[test]
fn edit_changes_only_given_fields() {
    let temp = TempDir::new().unwrap();
    let id = add_note(&temp, &["Plan", "line one\nline two", "-t", "work"]);

    cmd(&temp)
        .args(["edit", &id, "--title", "Plan v2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Updated {id}")));

    cmd(&temp)
        .args(["list", "-t", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Work] Plan v2"))
        .stdout(predicate::str::contains("    line one\n    line two\n"));
}

#[test]
fn edit_unknown_id_fails() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["edit", "missing-id", "--title", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("note not found: missing-id"));
}

#[test]
fn delete_reports_removed_and_missing_ids() {
    let temp = TempDir::new().unwrap();
    let id = add_note(&temp, &["Temp", "gone soon"]);

    cmd(&temp)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted {id}")));
    cmd(&temp)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("No note with id {id}")));
}

#[test]
fn corrupt_snapshot_is_replaced_by_seed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes_app_v1.json"), "{oops").unwrap();

    cmd(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome!"));
}

#[test]
fn unsaved_seed_is_still_listed() {
    let temp = TempDir::new().unwrap();
    // A directory in place of the snapshot file makes both read and write fail.
    let blocked = temp.path().join("notes_app_v1.json");
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep"), "").unwrap();

    cmd(&temp)
        .arg("list")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[Personal] Welcome!"))
        .stderr(predicate::str::contains("could not be saved"));
    assert!(blocked.is_dir());
}

#[test]
fn sqlite_backend_persists_between_runs() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .env("NOTEPAD_BACKEND", "sqlite")
        .args(["add", "Standup", "10am", "-t", "work"])
        .assert()
        .success();

    cmd(&temp)
        .env("NOTEPAD_BACKEND", "sqlite")
        .arg("tags")
        .assert()
        .success()
        .stdout(predicate::str::contains("Work           1"));
    assert!(temp.path().join("notepad.sqlite3").exists());
}

#[test]
fn unknown_command_fails() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command: frobnicate"));
}
