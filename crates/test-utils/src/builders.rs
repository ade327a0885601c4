#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use scriptjob::config::{BrandingSection, LocaleSection};
use scriptjob::fs::mock::MockFileSystem;
use scriptjob::job::{Configuration, HostContext, JobDescriptor, ScriptJob};
use scriptjob::storage::GlobalStorage;

use crate::fake_runner::FakeRunner;
use crate::observer::RecordingObserver;

/// Working directory used by [`ScriptJobBuilder`] unless overridden.
pub const MODULE_DIR: &str = "/modules/testmodule";

/// Builder for a `ScriptJob` running from an in-memory filesystem.
///
/// Keeps handles to the fake collaborators so tests can inspect them after
/// the job ran.
pub struct ScriptJobBuilder {
    pub fs: MockFileSystem,
    pub storage: GlobalStorage,
    pub runner: FakeRunner,
    pub observer: RecordingObserver,
    working_path: PathBuf,
    script: String,
    configuration: Configuration,
    pre_script: Option<Arc<str>>,
    memory_limit: Option<usize>,
    branding: BrandingSection,
    locale: LocaleSection,
}

impl ScriptJobBuilder {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
            storage: GlobalStorage::new(),
            runner: FakeRunner::new(),
            observer: RecordingObserver::new(),
            working_path: PathBuf::from(MODULE_DIR),
            script: "main.lua".to_string(),
            configuration: Configuration::new(),
            pre_script: None,
            memory_limit: None,
            branding: BrandingSection::default(),
            locale: LocaleSection::default(),
        }
    }

    /// Put `source` at `<working dir>/main.lua`.
    pub fn with_script(self, source: &str) -> Self {
        let path = self.working_path.join(&self.script);
        self.fs.add_file(path, source);
        self
    }

    pub fn with_working_path(mut self, path: &str) -> Self {
        self.working_path = PathBuf::from(path);
        self
    }

    pub fn with_script_name(mut self, name: &str) -> Self {
        self.script = name.to_string();
        self
    }

    pub fn with_config(mut self, key: &str, value: Value) -> Self {
        self.configuration.insert(key.to_string(), value);
        self
    }

    pub fn with_pre_script(mut self, source: &str) -> Self {
        self.pre_script = Some(Arc::from(source));
        self
    }

    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    pub fn with_storage(mut self, storage: GlobalStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_branding(mut self, branding: BrandingSection) -> Self {
        self.branding = branding;
        self
    }

    pub fn with_locale(mut self, locale: LocaleSection) -> Self {
        self.locale = locale;
        self
    }

    pub fn context(&self) -> HostContext {
        let mut context = HostContext::new(
            self.storage.clone(),
            Arc::new(self.runner.clone()),
            Arc::new(self.fs.clone()),
        )
        .with_observer(Arc::new(self.observer.clone()));
        context.branding = self.branding.clone();
        context.locale = self.locale.clone();
        context.pre_script = self.pre_script.clone();
        context.memory_limit = self.memory_limit;
        context
    }

    pub fn build(&self) -> ScriptJob {
        let descriptor = JobDescriptor::new(&self.script, &self.working_path)
            .with_configuration(self.configuration.clone());
        ScriptJob::new(descriptor, self.context())
    }
}

impl Default for ScriptJobBuilder {
    fn default() -> Self {
        Self::new()
    }
}
