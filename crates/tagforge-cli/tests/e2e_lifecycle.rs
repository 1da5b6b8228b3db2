//! End-to-end CLI lifecycle: init → reference data → generate → registry.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn tg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tg").expect("binary builds");
    cmd.current_dir(dir)
        .env("TAGFORGE_USER", "e2e")
        .env("FORMAT", "text");
    cmd
}

fn write_standard_template(dir: &Path) {
    let template = serde_json::json!({
        "name": "Standard",
        "description": "Equipment-Project-Number",
        "blocks": [
            {"id": "b1", "type": "dictionary", "category": "Тип Оборудования"},
            {"id": "b2", "type": "separator", "text": "-"},
            {"id": "b3", "type": "dictionary", "category": "Проект"},
            {"id": "b4", "type": "auto_number", "padding": 2}
        ]
    });
    std::fs::write(
        dir.join("standard.json"),
        serde_json::to_string_pretty(&template).expect("serializes"),
    )
    .expect("writes");
}

fn seed(dir: &Path) {
    tg(dir).args(["init", "--name", "Alpha"]).assert().success();
    tg(dir)
        .args(["dict", "add", "Тип Оборудования", "P", "Насос"])
        .assert()
        .success();
    tg(dir)
        .args(["dict", "add", "Проект", "210", "Блок 210"])
        .assert()
        .success();
    write_standard_template(dir);
    tg(dir)
        .args(["template", "add", "standard.json"])
        .assert()
        .success();
}

#[test]
fn init_refuses_to_run_twice() {
    let dir = tempfile::tempdir().expect("tempdir");
    tg(dir.path()).arg("init").assert().success();
    tg(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn generate_then_inspect_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed(dir.path());

    tg(dir.path())
        .args([
            "generate", "--template", "Standard", "--set", "b1=P", "--set", "b3=210",
            "--quantity", "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("P-21001").and(predicate::str::contains("P-21002")));

    tg(dir.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("P-21001"));

    tg(dir.path())
        .args(["next", "--prefix", "P-210"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));

    tg(dir.path())
        .args(["status", "P-21001", "active"])
        .assert()
        .success();
    tg(dir.path())
        .args(["show", "P-21001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active"));
}

#[test]
fn reserved_range_diverts_numbering() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed(dir.path());

    tg(dir.path())
        .args([
            "range", "add", "--scope", "P-210", "--start", "2", "--end", "4", "--reason", "held",
        ])
        .assert()
        .success();

    tg(dir.path())
        .args([
            "generate", "--template", "Standard", "--set", "b1=P", "--set", "b3=210",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("P-21001"));

    tg(dir.path())
        .args([
            "generate", "--template", "Standard", "--set", "b1=P", "--set", "b3=210",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("P-21005"));
}

#[test]
fn duplicate_dictionary_code_is_refused() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed(dir.path());

    tg(dir.path())
        .args(["dict", "add", "Проект", "210", "Повтор"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn assembly_expansion_imports_drafts() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed(dir.path());

    let tree = serde_json::json!({
        "name": "Air Handling Unit",
        "prefix": "AHU",
        "children": [
            {"name": "Supply Fan Motor", "prefix": "M", "children": []}
        ]
    });
    std::fs::write(
        dir.path().join("ahu.json"),
        serde_json::to_string_pretty(&tree).expect("serializes"),
    )
    .expect("writes");

    tg(dir.path())
        .args(["assembly", "--file", "ahu.json", "--root", "AHU-101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M-101"));

    tg(dir.path())
        .args(["assembly", "--file", "ahu.json", "--root", "AHU-101", "--commit"])
        .assert()
        .success();

    tg(dir.path())
        .args(["list", "--search", "AHU"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AHU-101"));
}

#[test]
fn parallel_mode_needs_a_suffix_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed(dir.path());

    tg(dir.path())
        .args([
            "generate", "--template", "Standard", "--set", "b1=P", "--set", "b3=210",
            "--quantity", "2", "--parallel",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("suffix"));
}
