// src/config/mod.rs

//! Adapter settings for scriptjob.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a settings file and module configurations from disk (`loader.rs`).
//! - Validate basic invariants like branding and target paths (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_settings_path, load_and_validate, load_from_path, load_module_configuration,
};
pub use model::{
    BrandingSection, JobSection, LocaleSection, RawSettings, Settings, TargetSection,
};
