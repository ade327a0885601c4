// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only host-side failures are errors here. Anything a guest script does
//! wrong ends up as a [`crate::job::JobResult`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptJobError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The interpreter could not be configured (for example its memory
    /// limit).
    #[error("Failed to set up interpreter: {0}")]
    InterpreterSetup(String),

    /// Building the host API inside a fresh interpreter failed. This is a
    /// host bug and is never turned into a job result.
    #[error("Failed to install host API: {0}")]
    HostApiInstall(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ScriptJobError>;
