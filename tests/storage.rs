// tests/storage.rs

mod common;
use crate::common::init_tracing;

use std::path::Path;
use std::time::Duration;

use scriptjob::errors::ScriptJobError;
use scriptjob::exec::ProcessResult;
use scriptjob::fs::mock::MockFileSystem;
use scriptjob::job::JobResult;
use scriptjob::storage::GlobalStorage;
use serde_json::{Value, json};

#[test]
fn clones_share_one_store() {
    let storage = GlobalStorage::new();
    let other = storage.clone();

    storage.insert("a", json!(1));
    other.insert("b", json!("two"));

    assert_eq!(storage.count(), 2);
    assert_eq!(other.keys(), vec!["a", "b"]);
    assert_eq!(other.remove("a"), 1);
    assert_eq!(storage.remove("a"), 0);
    assert!(!storage.contains("a"));
    assert_eq!(storage.value("b"), Some(json!("two")));
}

#[test]
fn load_yaml_merges_mapping() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(
        "/seed.yaml",
        "rootMountPoint: /mnt/target\nlocaleConf:\n  LANG: de_DE.UTF-8\n",
    );
    let storage = GlobalStorage::new();
    storage.insert("rootMountPoint", json!("/old"));
    storage.insert("kept", json!(true));

    let loaded = storage.load_yaml(&fs, Path::new("/seed.yaml")).unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(storage.value("rootMountPoint"), Some(json!("/mnt/target")));
    assert_eq!(
        storage.value("localeConf"),
        Some(json!({ "LANG": "de_DE.UTF-8" }))
    );
    assert_eq!(storage.value("kept"), Some(json!(true)));
}

#[test]
fn load_yaml_rejects_non_mapping() {
    let fs = MockFileSystem::new();
    fs.add_file("/seed.yaml", "- just\n- a list\n");

    let err = GlobalStorage::new()
        .load_yaml(&fs, Path::new("/seed.yaml"))
        .unwrap_err();

    assert!(matches!(err, ScriptJobError::ConfigError(_)));
}

#[test]
fn save_json_writes_whole_store() {
    let fs = MockFileSystem::new();
    let storage = GlobalStorage::new();
    storage.insert("answer", json!(42));
    storage.insert("list", json!(["x", "y"]));

    storage.save_json(&fs, Path::new("/out/storage.json")).unwrap();

    let written = fs.contents("/out/storage.json").unwrap();
    let parsed: Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(parsed, json!({ "answer": 42, "list": ["x", "y"] }));
}

#[test]
fn process_results_explain_themselves() {
    let timeout = Duration::from_secs(30);
    let explain = |code, output: &str| ProcessResult::new(code, output).explain("mkinitcpio -P", timeout);

    assert_eq!(explain(0, "ignored"), JobResult::Success);
    assert_eq!(explain(-1, "").summary(), Some("external command crashed"));
    assert_eq!(explain(-2, "").summary(), Some("external command failed to start"));
    assert_eq!(
        explain(-3, "").summary(),
        Some("internal error when starting command")
    );

    let timed_out = explain(-4, "");
    assert_eq!(timed_out.summary(), Some("external command failed to finish"));
    assert!(timed_out.details().unwrap().contains("30 seconds"));

    let failed = explain(2, "  missing preset\n");
    assert_eq!(failed.summary(), Some("external command finished with errors"));
    assert_eq!(
        failed.details(),
        Some("Command mkinitcpio -P finished with exit code 2.\nOutput:\nmissing preset")
    );
}
