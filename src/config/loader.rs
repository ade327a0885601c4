// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawSettings, Settings};
use crate::errors::{Result, ScriptJobError};
use crate::fs::FileSystem;
use crate::job::Configuration;

/// Load a settings file from a given path and return the raw `RawSettings`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let settings: RawSettings = toml::from_str(&contents)?;

    Ok(settings)
}

/// Load a settings file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks branding, target root, locale search paths and the job script.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw = load_from_path(&path)?;
    let settings = Settings::try_from(raw)?;
    Ok(settings)
}

/// `scriptjob.toml` in the current working directory.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("scriptjob.toml")
}

/// Load the module configuration handed to a job from a YAML file.
///
/// An empty document gives an empty configuration; anything other than a
/// mapping is a configuration error.
pub fn load_module_configuration(
    fs: &dyn FileSystem,
    path: impl AsRef<Path>,
) -> Result<Configuration> {
    let path = path.as_ref();
    let text = fs.read_to_string(path)?;
    let doc: serde_json::Value = serde_yaml::from_str(&text)?;
    match doc {
        serde_json::Value::Null => Ok(Configuration::new()),
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(ScriptJobError::ConfigError(format!(
            "module configuration {:?} is not a YAML mapping",
            path
        ))),
    }
}
