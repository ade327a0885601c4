// src/job/bridge.rs

//! Lifecycle of a single script job execution.
//!
//! ```text
//! Unvalidated -> Validated -> RuntimeAcquired -> ApiInstalled
//!   -> PreScriptRun -> ScriptLoaded -> EntryInvoked -> Finalized
//! ```
//!
//! Any stage may bail out straight to `Finalized`. The Lua state lives in an
//! [`Interpreter`] guard that is dropped on every exit path; validation
//! failures return before one is ever created.

use std::path::PathBuf;

use mlua::{Lua, MultiValue, Value};
use tracing::{debug, error, info, info_span, warn};

use crate::api::{self, JobSnapshot};
use crate::errors::{Result, ScriptJobError};
use crate::types::Stage;

use super::description::derive_description;
use super::translate::{EntryOutcome, Translator, classify_return};
use super::{JobResult, ScriptJob};

/// Global the entry point must be bound to.
pub const ENTRY_POINT_KEY: &str = "run";

/// One Lua state, owned by exactly one execution.
pub(crate) struct Interpreter {
    lua: Lua,
    job: String,
}

impl Interpreter {
    fn acquire(job: &str, memory_limit: Option<usize>) -> mlua::Result<Self> {
        debug!(job, ?memory_limit, "acquiring interpreter");
        let lua = Lua::new();
        if let Some(limit) = memory_limit {
            lua.set_memory_limit(limit)?;
        }
        Ok(Self {
            lua,
            job: job.to_string(),
        })
    }

    fn lua(&self) -> &Lua {
        &self.lua
    }

    fn exec_chunk(&self, source: &str, name: &str) -> mlua::Result<()> {
        self.lua.load(source).set_name(name).exec()
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        debug!(job = %self.job, "interpreter released");
    }
}

impl ScriptJob {
    /// Run the job once.
    ///
    /// Every script failure becomes a [`JobResult`]. `Err` is only returned
    /// when the host API could not be installed into the interpreter.
    pub fn exec(&mut self) -> Result<JobResult> {
        let pretty_name = self.pretty_name();
        let span = info_span!("script_job", job = %pretty_name);
        let _entered = span.enter();

        self.description.clear();
        let outcome = self.exec_stages(&pretty_name);
        self.enter(&pretty_name, Stage::Finalized);

        match &outcome {
            Ok(result) if result.is_success() => info!("job finished successfully"),
            Ok(result) => warn!(result = %result, "job failed"),
            Err(e) => error!(error = %e, "job aborted by host failure"),
        }
        outcome
    }

    fn exec_stages(&mut self, pretty_name: &str) -> Result<JobResult> {
        self.enter(pretty_name, Stage::Unvalidated);
        let script_path = match self.validate(pretty_name) {
            Ok(path) => path,
            Err(result) => return Ok(result),
        };
        let translator = Translator::new(pretty_name, &script_path);
        self.enter(pretty_name, Stage::Validated);

        let interpreter = Interpreter::acquire(pretty_name, self.context.memory_limit)
            .map_err(|e| {
                error!(error = %e, "error setting up interpreter");
                ScriptJobError::InterpreterSetup(e.to_string())
            })?;
        self.enter(pretty_name, Stage::RuntimeAcquired);

        let snapshot = JobSnapshot {
            module_name: pretty_name.to_string(),
            pretty_name: pretty_name.to_string(),
            working_path: self.descriptor.working_path.display().to_string(),
            configuration: self.descriptor.configuration.clone(),
        };
        api::install(interpreter.lua(), snapshot, &self.context).map_err(|e| {
            error!(error = %e, "error installing host API");
            ScriptJobError::HostApiInstall(e.to_string())
        })?;
        self.enter(pretty_name, Stage::ApiInstalled);

        if let Some(pre_script) = self.context.pre_script.clone() {
            if let Err(e) = interpreter.exec_chunk(&pre_script, "=pre-script") {
                error!(error = %e, "error in pre-script");
                return Ok(translator.pre_script_raised(&e.to_string()));
            }
        }
        self.enter(pretty_name, Stage::PreScriptRun);

        let source = match self.context.fs.read_to_string(&script_path) {
            Ok(source) => source,
            Err(e) => {
                error!(script = ?script_path, error = %e, "script became unreadable");
                return Ok(translator.bad_script_file());
            }
        };
        let chunk_name = format!("@{}", script_path.display());
        if let Err(e) = interpreter.exec_chunk(&source, &chunk_name) {
            error!(error = %e, "error while loading script");
            return Ok(translator.load_raised(&e.to_string()));
        }
        self.enter(pretty_name, Stage::ScriptLoaded);

        self.description = derive_description(interpreter.lua());
        debug!(description = %self.description, "derived job description");
        self.context.observer.progress(pretty_name, 0.0);

        let entry = match interpreter.lua().globals().get::<Value>(ENTRY_POINT_KEY) {
            Ok(Value::Nil) | Err(_) => {
                warn!("script does not define run()");
                return Ok(translator.missing_entry_point());
            }
            Ok(entry) => entry,
        };
        self.enter(pretty_name, Stage::EntryInvoked);

        let outcome = invoke_entry_point(interpreter.lua(), entry);
        if let EntryOutcome::Raised(e) = &outcome {
            error!(error = %e, "error while running script");
        }
        Ok(translator.entry_outcome(outcome))
    }

    /// Check the working directory and script before touching Lua.
    fn validate(&self, pretty_name: &str) -> std::result::Result<PathBuf, JobResult> {
        let fs = &self.context.fs;
        let working_path = &self.descriptor.working_path;
        let script_path = self.descriptor.script_path();
        let translator = Translator::new(pretty_name, &script_path);

        if !fs.is_dir(working_path) || !fs.is_readable(working_path) {
            warn!(path = ?working_path, "working directory is not readable");
            return Err(translator.bad_working_directory(working_path));
        }

        if !fs.is_file(&script_path) || !fs.is_readable(&script_path) {
            warn!(path = ?script_path, "script file is not readable");
            return Err(translator.bad_script_file());
        }

        Ok(script_path)
    }

    fn enter(&self, pretty_name: &str, stage: Stage) {
        debug!(%stage, "entering stage");
        self.context.observer.stage(pretty_name, stage);
    }
}

/// Call `run()` with no arguments and classify what happened.
///
/// Values that are not plain functions go through Lua's own call semantics
/// (`__call` metamethods), so anything not callable raises.
fn invoke_entry_point(lua: &Lua, entry: Value) -> EntryOutcome {
    let called = match entry {
        Value::Function(f) => f.call::<MultiValue>(()),
        other => lua
            .load("local entry = ...; return entry()")
            .set_name("=run")
            .call::<MultiValue>(other),
    };
    match called {
        Ok(values) => classify_return(values),
        Err(e) => EntryOutcome::Raised(e.to_string()),
    }
}
