//! Integration tests for the commands that work on local sample files.

mod common;

use common::{source_sample, target_sample, tower_cmd, write_json};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_fields_table_lists_flattened_paths() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());

    tower_cmd()
        .args(["fields"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("ID\tPath\tType\tRequired\tSample"))
        .stdout(predicate::str::contains("\tvariants[].sku\tstring\tno\tOAK-1"))
        .stdout(predicate::str::contains("\tvariants[].weight\tnumber\tno\t12"));
}

#[test]
fn test_fields_target_side_marks_required() {
    let dir = TempDir::new().unwrap();
    let target = write_json(&dir, "target.json", &target_sample());

    let output = tower_cmd()
        .args(["-o", "json", "fields", "--side", "target"])
        .arg(&target)
        .output()
        .unwrap();

    assert!(output.status.success());
    let fields: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(fields.len(), 4);
    assert!(fields.iter().all(|f| f["required"] == true));
    assert!(fields.iter().all(|f| f["id"].as_str().unwrap().starts_with('t')));
}

#[test]
fn test_fields_depth_limit_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    let deep = write_json(&dir, "deep.json", &serde_json::json!({"a": {"b": {"c": {"d": 1}}}}));

    tower_cmd()
        .args(["--max-depth", "1", "fields"])
        .arg(&deep)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("maximum depth"));
}

#[test]
fn test_fields_invalid_json_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();

    tower_cmd()
        .arg("fields")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn test_automap_proposes_and_warns() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());
    let target = write_json(&dir, "target.json", &target_sample());

    tower_cmd()
        .arg("automap")
        .arg(&source)
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("price\tprice\tparseFloat"))
        .stdout(predicate::str::contains("variants[].sku\tsku\tN/A"))
        .stderr(predicate::str::contains(
            "Warning: Required field 'name' is not mapped",
        ))
        .stderr(predicate::str::contains(
            "Warning: Required field 'description' is not mapped",
        ));
}

#[test]
fn test_warnings_print_once_with_logging_enabled() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());
    let target = write_json(&dir, "target.json", &target_sample());

    tower_cmd()
        .env("RUST_LOG", "warn")
        .arg("automap")
        .arg(&source)
        .arg(&target)
        .assert()
        .success()
        .stderr(predicate::str::contains("Required field 'name' is not mapped").count(1))
        .stderr(predicate::str::contains("Validation warning").not());
}

#[test]
fn test_automap_export_round_trips_through_preview() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());
    let target = write_json(&dir, "target.json", &target_sample());
    let export = dir.path().join("out").join("mappings.json");

    tower_cmd()
        .arg("automap")
        .arg(&source)
        .arg(&target)
        .arg("--export")
        .arg(&export)
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported 2 mapping(s)"));

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(
        exported[0],
        serde_json::json!({"sourcePath": "price", "targetPath": "price", "transform": "parseFloat"})
    );

    let output = tower_cmd()
        .args(["-o", "json", "preview"])
        .arg(&source)
        .arg(&target)
        .arg("--mappings")
        .arg(&export)
        .output()
        .unwrap();

    assert!(output.status.success());
    let preview: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        preview["target"],
        serde_json::json!({"price": 19.99, "sku": "OAK-1"})
    );
    assert_eq!(preview["notes"], serde_json::json!([]));
}

#[test]
fn test_preview_notes_server_only_transforms() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());
    let target = write_json(&dir, "target.json", &target_sample());
    let mappings = write_json(
        &dir,
        "mappings.json",
        &serde_json::json!([
            {"sourcePath": "title", "targetPath": "name", "transform": "trim"},
            {"sourcePath": "variants[].weight", "targetPath": "description", "transform": "concat"},
            {"sourcePath": "colour", "targetPath": "sku", "transform": null}
        ]),
    );

    tower_cmd()
        .arg("preview")
        .arg(&source)
        .arg(&target)
        .arg("--mappings")
        .arg(&mappings)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Oak desk\""))
        .stdout(predicate::str::contains("\"description\": 12"))
        .stdout(predicate::str::contains("concat is applied on the server"))
        .stderr(predicate::str::contains(
            "skipping mapping colour -> sku: field not found",
        ));
}

#[test]
fn test_offline_commands_need_no_server() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());

    tower_cmd()
        .env_remove("TOWER_API_TOKEN")
        .arg("fields")
        .arg(&source)
        .assert()
        .success();
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());
    let out = dir.path().join("fields.json");

    tower_cmd()
        .args(["-o", "json", "--output-file"])
        .arg(&out)
        .arg("fields")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Results written to"));

    let fields: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(fields.len(), 5);
}

#[test]
fn test_invalid_output_format() {
    let dir = TempDir::new().unwrap();
    let source = write_json(&dir, "source.json", &source_sample());

    tower_cmd()
        .args(["-o", "xml", "fields"])
        .arg(&source)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid output format"));
}
