// src/locale.rs

//! Language fallback list and catalogue directory for gettext.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::config::LocaleSection;
use crate::fs::FileSystem;
use crate::storage::GlobalStorage;

/// Store key holding the locale chosen earlier in the installer.
pub const LOCALE_CONF_KEY: &str = "localeConf";

// language[_TERRITORY][.codeset][@modifier]
static LOCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{2,3})(?:_([A-Za-z]{2}|[0-9]{3}))?(?:\.([^@]+))?(?:@(.+))?$")
        .expect("locale regex is valid")
});

/// Resolves which message catalogues a guest script should use.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    settings: LocaleSection,
    storage: GlobalStorage,
    fs: Arc<dyn FileSystem>,
}

impl LocaleResolver {
    pub fn new(settings: LocaleSection, storage: GlobalStorage, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings,
            storage,
            fs,
        }
    }

    /// The configured language, then `localeConf.LANG` from the store, then
    /// `$LANG`.
    pub fn language(&self) -> Option<String> {
        if let Some(lang) = self.settings.language.as_ref().filter(|l| !l.is_empty()) {
            return Some(lang.clone());
        }
        if let Some(Value::Object(conf)) = self.storage.value(LOCALE_CONF_KEY) {
            if let Some(Value::String(lang)) = conf.get("LANG") {
                if !lang.is_empty() {
                    return Some(lang.clone());
                }
            }
        }
        std::env::var("LANG").ok().filter(|l| !l.is_empty())
    }

    /// Languages to try, most specific first.
    pub fn languages(&self) -> Vec<String> {
        self.language()
            .map(|lang| language_fallbacks(&lang))
            .unwrap_or_default()
    }

    /// First search directory holding a catalogue for one of
    /// [`Self::languages`]; the last search directory if none does.
    pub fn gettext_path(&self) -> PathBuf {
        let languages = self.languages();
        for dir in &self.settings.search_paths {
            if languages
                .iter()
                .any(|lang| self.fs.is_dir(&dir.join(lang)))
            {
                return dir.clone();
            }
        }
        self.settings
            .search_paths
            .last()
            .cloned()
            .unwrap_or_else(|| Path::new("/usr/share/locale").to_path_buf())
    }
}

/// Expand a POSIX locale name into gettext's fallback order.
///
/// `sr_RS.UTF-8@latin` gives `sr_RS@latin`, `sr_RS`, `sr@latin`, `sr`.
/// The codeset is dropped. `C` and `POSIX` give nothing.
pub fn language_fallbacks(locale: &str) -> Vec<String> {
    let Some(caps) = LOCALE_RE.captures(locale.trim()) else {
        return Vec::new();
    };
    let language = &caps[1];
    let territory = caps.get(2).map(|m| m.as_str());
    let modifier = caps.get(4).map(|m| m.as_str());

    let mut out = Vec::with_capacity(4);
    if let Some(territory) = territory {
        if let Some(modifier) = modifier {
            out.push(format!("{language}_{territory}@{modifier}"));
        }
        out.push(format!("{language}_{territory}"));
    }
    if let Some(modifier) = modifier {
        out.push(format!("{language}@{modifier}"));
    }
    out.push(language.to_string());
    out
}
