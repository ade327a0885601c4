// src/api/job_proxy.rs

use std::sync::Arc;

use mlua::{UserData, UserDataFields, UserDataMethods};

use crate::job::{Configuration, JobObserver};

use super::convert::json_to_lua;

/// Read-only view of the running job, taken when the API is installed.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub module_name: String,
    pub pretty_name: String,
    pub working_path: String,
    pub configuration: Configuration,
}

/// `installer.job` in the guest.
#[derive(Debug)]
pub struct JobProxy {
    snapshot: JobSnapshot,
    observer: Arc<dyn JobObserver>,
}

impl JobProxy {
    pub fn new(snapshot: JobSnapshot, observer: Arc<dyn JobObserver>) -> Self {
        Self { snapshot, observer }
    }
}

impl UserData for JobProxy {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("module_name", |_, this| {
            Ok(this.snapshot.module_name.clone())
        });
        fields.add_field_method_get("pretty_name", |_, this| {
            Ok(this.snapshot.pretty_name.clone())
        });
        fields.add_field_method_get("working_path", |_, this| {
            Ok(this.snapshot.working_path.clone())
        });
        fields.add_field_method_get("configuration", |lua, this| {
            json_to_lua(lua, &serde_json::Value::Object(this.snapshot.configuration.clone()))
        });
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("setprogress", |_, this, value: f64| {
            this.observer.progress(&this.snapshot.pretty_name, value);
            Ok(())
        });
    }
}
