// src/config/validate.rs

use std::path::Path;

use crate::config::model::{RawSettings, Settings};
use crate::errors::{Result, ScriptJobError};

impl TryFrom<RawSettings> for Settings {
    type Error = ScriptJobError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_raw_settings(&raw)?;
        Ok(Settings::new_unchecked(
            raw.branding,
            raw.target,
            raw.locale,
            raw.job,
        ))
    }
}

fn validate_raw_settings(raw: &RawSettings) -> Result<()> {
    validate_branding(raw)?;
    validate_target(raw)?;
    validate_locale(raw)?;
    validate_job(raw)?;
    Ok(())
}

fn validate_branding(raw: &RawSettings) -> Result<()> {
    let b = &raw.branding;
    for (key, value) in [
        ("organization_name", &b.organization_name),
        ("organization_domain", &b.organization_domain),
        ("application_name", &b.application_name),
        ("version", &b.version),
    ] {
        if value.trim().is_empty() {
            return Err(ScriptJobError::ConfigError(format!(
                "[branding].{key} must not be empty"
            )));
        }
    }

    if !b.version.starts_with(&b.version_short) {
        return Err(ScriptJobError::ConfigError(format!(
            "[branding].version_short '{}' is not a prefix of version '{}'",
            b.version_short, b.version
        )));
    }
    Ok(())
}

fn validate_target(raw: &RawSettings) -> Result<()> {
    if !raw.target.root.is_absolute() {
        return Err(ScriptJobError::ConfigError(format!(
            "[target].root must be an absolute path (got {:?})",
            raw.target.root
        )));
    }
    Ok(())
}

fn validate_locale(raw: &RawSettings) -> Result<()> {
    if raw.locale.search_paths.is_empty() {
        return Err(ScriptJobError::ConfigError(
            "[locale].search_paths must contain at least one directory".to_string(),
        ));
    }
    Ok(())
}

fn validate_job(raw: &RawSettings) -> Result<()> {
    let script = raw.job.script.trim();
    if script.is_empty() {
        return Err(ScriptJobError::ConfigError(
            "[job].script must not be empty".to_string(),
        ));
    }
    if Path::new(script).is_absolute() {
        return Err(ScriptJobError::ConfigError(format!(
            "[job].script must be relative to the working directory (got '{script}')"
        )));
    }
    if raw.job.memory_limit == Some(0) {
        return Err(ScriptJobError::ConfigError(
            "[job].memory_limit must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
