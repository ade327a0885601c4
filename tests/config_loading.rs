// tests/config_loading.rs

mod common;
use crate::common::init_tracing;

use std::fs;
use std::path::PathBuf;

use scriptjob::config::{load_and_validate, load_from_path, load_module_configuration};
use scriptjob::errors::ScriptJobError;
use scriptjob::fs::mock::MockFileSystem;
use serde_json::json;
use tempfile::tempdir;

fn write_settings(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scriptjob.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn empty_file_gives_defaults() {
    init_tracing();
    let (_dir, path) = write_settings("");

    let settings = load_and_validate(&path).unwrap();

    assert_eq!(settings.branding.organization_name, "Scriptjob");
    assert_eq!(settings.branding.application_name, "scriptjob");
    assert!(settings.branding.version.starts_with(&settings.branding.version_short));
    assert_eq!(settings.target.root, PathBuf::from("/"));
    assert!(!settings.target.needs_chroot());
    assert_eq!(settings.locale.language, None);
    assert_eq!(settings.locale.search_paths.len(), 3);
    assert_eq!(settings.job.script, "main.lua");
    assert_eq!(settings.job.pre_script, None);
    assert_eq!(settings.job.memory_limit, None);
}

#[test]
fn full_file_is_parsed() {
    init_tracing();
    let (_dir, path) = write_settings(
        r#"
        [branding]
        organization_name = "Example Linux"
        organization_domain = "example.org"
        application_name = "example-installer"
        version = "24.10.1"
        version_short = "24.10"

        [target]
        root = "/mnt/target"

        [locale]
        language = "de_DE.UTF-8"
        search_paths = ["/opt/lang"]

        [job]
        script = "job.lua"
        pre_script = "testing/pre.lua"
        memory_limit = 33554432
        "#,
    );

    let settings = load_and_validate(&path).unwrap();

    assert_eq!(settings.branding.organization_domain, "example.org");
    assert_eq!(settings.branding.version_short, "24.10");
    assert!(settings.target.needs_chroot());
    assert_eq!(settings.locale.language.as_deref(), Some("de_DE.UTF-8"));
    assert_eq!(settings.locale.search_paths, vec![PathBuf::from("/opt/lang")]);
    assert_eq!(settings.job.script, "job.lua");
    assert_eq!(settings.job.pre_script, Some(PathBuf::from("testing/pre.lua")));
    assert_eq!(settings.job.memory_limit, Some(32 * 1024 * 1024));
}

#[test]
fn invalid_settings_are_rejected() {
    init_tracing();
    for (contents, needle) in [
        ("[branding]\norganization_name = \" \"\n", "organization_name"),
        (
            "[branding]\nversion = \"1.2.3\"\nversion_short = \"2.0\"\n",
            "version_short",
        ),
        ("[target]\nroot = \"relative/root\"\n", "[target].root"),
        ("[locale]\nsearch_paths = []\n", "search_paths"),
        ("[job]\nscript = \"\"\n", "[job].script"),
        ("[job]\nscript = \"/abs/main.lua\"\n", "relative"),
        ("[job]\nmemory_limit = 0\n", "memory_limit"),
    ] {
        let (_dir, path) = write_settings(contents);
        let err = load_and_validate(&path).unwrap_err();
        assert!(
            matches!(err, ScriptJobError::ConfigError(_)),
            "expected ConfigError for {contents:?}, got {err:?}"
        );
        assert!(
            err.to_string().contains(needle),
            "error {err} should mention {needle}"
        );
    }
}

#[test]
fn malformed_toml_is_a_toml_error() {
    init_tracing();
    let (_dir, path) = write_settings("[branding\n");

    let err = load_from_path(&path).unwrap_err();

    assert!(matches!(err, ScriptJobError::TomlError(_)));
}

#[test]
fn missing_settings_file_is_an_io_error() {
    let err = load_from_path("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ScriptJobError::IoError(_)));
}

#[test]
fn module_configuration_from_yaml() {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/etc/modules/mount.conf",
        "device: /dev/sda1\nextraMounts:\n  - proc\n  - sys\nbtrfs: true\n",
    );
    fs.add_file("/etc/modules/empty.conf", "");
    fs.add_file("/etc/modules/list.conf", "- a\n- b\n");

    let config = load_module_configuration(&fs, "/etc/modules/mount.conf").unwrap();
    assert_eq!(config.get("device"), Some(&json!("/dev/sda1")));
    assert_eq!(config.get("extraMounts"), Some(&json!(["proc", "sys"])));
    assert_eq!(config.get("btrfs"), Some(&json!(true)));

    let empty = load_module_configuration(&fs, "/etc/modules/empty.conf").unwrap();
    assert!(empty.is_empty());

    let err = load_module_configuration(&fs, "/etc/modules/list.conf").unwrap_err();
    assert!(matches!(err, ScriptJobError::ConfigError(_)));
}
