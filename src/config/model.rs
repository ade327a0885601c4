// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings as read from a TOML file.
///
/// ```toml
/// [branding]
/// organization_name = "Example Linux"
/// application_name = "example-installer"
///
/// [target]
/// root = "/mnt/target"
///
/// [locale]
/// language = "de_DE.UTF-8"
/// search_paths = ["lang", "/usr/share/locale"]
///
/// [job]
/// script = "main.lua"
/// pre_script = "testing/pre.lua"
/// memory_limit = 67108864
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSettings {
    #[serde(default)]
    pub branding: BrandingSection,

    #[serde(default)]
    pub target: TargetSection,

    #[serde(default)]
    pub locale: LocaleSection,

    #[serde(default)]
    pub job: JobSection,
}

/// `[branding]` section. Exposed to scripts as module constants.
#[derive(Debug, Clone, Deserialize)]
pub struct BrandingSection {
    #[serde(default = "default_organization_name")]
    pub organization_name: String,

    #[serde(default = "default_organization_domain")]
    pub organization_domain: String,

    #[serde(default = "default_application_name")]
    pub application_name: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Must be a prefix of `version`.
    #[serde(default = "default_version_short")]
    pub version_short: String,
}

fn default_organization_name() -> String {
    "Scriptjob".to_string()
}

fn default_organization_domain() -> String {
    "scriptjob.invalid".to_string()
}

fn default_application_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_version_short() -> String {
    format!(
        "{}.{}",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    )
}

impl Default for BrandingSection {
    fn default() -> Self {
        Self {
            organization_name: default_organization_name(),
            organization_domain: default_organization_domain(),
            application_name: default_application_name(),
            version: default_version(),
            version_short: default_version_short(),
        }
    }
}

/// `[target]` section: where the system being installed lives.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSection {
    /// Root of the target system. Commands run "in the target" are wrapped
    /// in `chroot <root>` unless this is `/`.
    #[serde(default = "default_target_root")]
    pub root: PathBuf,
}

fn default_target_root() -> PathBuf {
    PathBuf::from("/")
}

impl Default for TargetSection {
    fn default() -> Self {
        Self {
            root: default_target_root(),
        }
    }
}

impl TargetSection {
    pub fn needs_chroot(&self) -> bool {
        self.root != Path::new("/")
    }
}

/// `[locale]` section, used by the gettext helpers.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleSection {
    /// Explicit language (e.g. `de_DE.UTF-8`). When unset, the shared store
    /// (`localeConf.LANG`) and then the `LANG` environment variable are used.
    #[serde(default)]
    pub language: Option<String>,

    /// Directories searched for message catalogues, in order.
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<PathBuf>,
}

fn default_search_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("lang"),
        PathBuf::from("/usr/local/share/locale"),
        PathBuf::from("/usr/share/locale"),
    ]
}

impl Default for LocaleSection {
    fn default() -> Self {
        Self {
            language: None,
            search_paths: default_search_paths(),
        }
    }
}

/// `[job]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSection {
    /// Script file name, relative to the working directory.
    #[serde(default = "default_script")]
    pub script: String,

    /// Lua source run before every job's own script, in the same globals.
    /// Mostly useful for tests.
    #[serde(default)]
    pub pre_script: Option<PathBuf>,

    /// Upper bound, in bytes, on memory used by one job's interpreter.
    #[serde(default)]
    pub memory_limit: Option<usize>,
}

fn default_script() -> String {
    "main.lua".to_string()
}

impl Default for JobSection {
    fn default() -> Self {
        Self {
            script: default_script(),
            pre_script: None,
            memory_limit: None,
        }
    }
}

/// Validated settings.
///
/// Only constructed through `TryFrom<RawSettings>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub branding: BrandingSection,
    pub target: TargetSection,
    pub locale: LocaleSection,
    pub job: JobSection,
}

impl Settings {
    pub(crate) fn new_unchecked(
        branding: BrandingSection,
        target: TargetSection,
        locale: LocaleSection,
        job: JobSection,
    ) -> Self {
        Self {
            branding,
            target,
            locale,
            job,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let raw = RawSettings::default();
        Self::new_unchecked(raw.branding, raw.target, raw.locale, raw.job)
    }
}
