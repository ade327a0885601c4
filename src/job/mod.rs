// src/job/mod.rs

//! Script jobs: one guest Lua script run as one installer job.
//!
//! - [`bridge`] drives the lifecycle of a single execution.
//! - [`translate`] maps guest outcomes to [`JobResult`]s.
//! - [`description`] derives the human-readable description.
//! - [`progress`] carries progress updates to the host.
//! - [`result`] defines the result type itself.

pub mod bridge;
pub mod description;
pub mod progress;
pub mod result;
pub mod translate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{BrandingSection, LocaleSection, Settings};
use crate::exec::ProcessRunner;
use crate::fs::FileSystem;
use crate::storage::GlobalStorage;

pub use description::{derive_description, first_doc_line};
pub use progress::{ChannelObserver, JobEvent, JobObserver, LogObserver};
pub use result::{InternalErrorCode, JobResult};
pub use translate::{EntryOutcome, Translator, classify_return};

/// Module configuration handed to a job, keyed by option name.
pub type Configuration = Map<String, Value>;

/// What to run: immutable for the lifetime of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    /// Relative to `working_path`.
    pub script: PathBuf,
    pub working_path: PathBuf,
    pub configuration: Configuration,
}

impl JobDescriptor {
    pub fn new(script: impl Into<PathBuf>, working_path: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            working_path: working_path.into(),
            configuration: Configuration::new(),
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Absolute (or working-directory based) path of the script.
    pub fn script_path(&self) -> PathBuf {
        self.working_path.join(&self.script)
    }
}

/// Host services a job borrows while it runs.
///
/// Cloning is cheap; every clone refers to the same store, runner,
/// filesystem and observer. The pre-script is shared, never copied.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub storage: GlobalStorage,
    pub runner: Arc<dyn ProcessRunner>,
    pub fs: Arc<dyn FileSystem>,
    pub observer: Arc<dyn JobObserver>,
    pub branding: BrandingSection,
    pub locale: LocaleSection,
    /// Lua source run before every job's own script, in the same globals.
    pub pre_script: Option<Arc<str>>,
    /// Memory cap for each interpreter, in bytes. Unlimited when `None`.
    pub memory_limit: Option<usize>,
}

impl HostContext {
    pub fn new(
        storage: GlobalStorage,
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            storage,
            runner,
            fs,
            observer: Arc::new(LogObserver),
            branding: BrandingSection::default(),
            locale: LocaleSection::default(),
            pre_script: None,
            memory_limit: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_pre_script(mut self, source: impl Into<Arc<str>>) -> Self {
        self.pre_script = Some(source.into());
        self
    }

    /// Take branding, locale and interpreter limits over from `settings`.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.branding = settings.branding.clone();
        self.locale = settings.locale.clone();
        self.memory_limit = settings.job.memory_limit;
        self
    }
}

/// A guest script job. Run it with [`ScriptJob::exec`].
#[derive(Debug)]
pub struct ScriptJob {
    descriptor: JobDescriptor,
    context: HostContext,
    description: String,
}

impl ScriptJob {
    pub fn new(descriptor: JobDescriptor, context: HostContext) -> Self {
        Self {
            descriptor,
            context,
            description: String::new(),
        }
    }

    pub fn descriptor(&self) -> &JobDescriptor {
        &self.descriptor
    }

    pub fn working_path(&self) -> &Path {
        &self.descriptor.working_path
    }

    pub fn configuration(&self) -> &Configuration {
        &self.descriptor.configuration
    }

    /// Leaf name of the working directory.
    pub fn pretty_name(&self) -> String {
        let path = &self.descriptor.working_path;
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Description derived from the script during the last execution;
    /// empty if there was none.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pretty_status_message(&self) -> String {
        if self.description.is_empty() {
            format!("Running {} operation.", self.pretty_name())
        } else {
            self.description.clone()
        }
    }
}
