// src/job/translate.rs

//! Turns everything a guest script can do into a [`JobResult`].
//!
//! Lua gives no guarantees about what `run()` hands back, so return values
//! are shape-checked into an [`EntryOutcome`] first and only then mapped.

use std::path::Path;

use mlua::{MultiValue, Table, Value};

use super::result::{InternalErrorCode, JobResult};

pub const SUMMARY_BAD_WORKING_DIRECTORY: &str = "bad working directory";
pub const SUMMARY_BAD_SCRIPT_FILE: &str = "bad main script file";
pub const SUMMARY_BAD_INTERNAL_SCRIPT: &str = "bad internal script";
pub const SUMMARY_MISSING_ENTRY_POINT: &str = "missing entry point";
pub const SUMMARY_INVALID_RESULTS: &str = "invalid results";

/// What calling the entry point produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Returned nothing, or a single `nil`.
    NoReturn,
    /// Returned `{summary, details}` or `summary, details`.
    ErrorPair { summary: String, details: String },
    /// Returned something else.
    MalformedReturn,
    /// Raised; carries the rendered Lua error, which is appended to the
    /// result details.
    Raised(String),
}

/// Classify the values returned by `run()`.
pub fn classify_return(values: MultiValue) -> EntryOutcome {
    let values: Vec<Value> = values.into_iter().collect();
    let pair = match values.as_slice() {
        [] | [Value::Nil] => return EntryOutcome::NoReturn,
        [Value::Table(table)] => pair_from_table(table),
        [summary, details] => text_of(summary).zip(text_of(details)),
        _ => None,
    };

    match pair {
        Some((summary, details)) => EntryOutcome::ErrorPair { summary, details },
        None => EntryOutcome::MalformedReturn,
    }
}

fn pair_from_table(table: &Table) -> Option<(String, String)> {
    if table.raw_len() != 2 {
        return None;
    }
    let summary = table.raw_get::<Value>(1).ok()?;
    let details = table.raw_get::<Value>(2).ok()?;
    text_of(&summary).zip(text_of(&details))
}

/// Strict text check: only real (UTF-8) Lua strings, no number coercion.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => s.to_str().ok().map(|s| String::from(&*s)),
        _ => None,
    }
}

/// Builds job results that name the job and its script.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    pretty_name: &'a str,
    script: &'a Path,
}

impl<'a> Translator<'a> {
    pub fn new(pretty_name: &'a str, script: &'a Path) -> Self {
        Self {
            pretty_name,
            script,
        }
    }

    pub fn bad_working_directory(&self, working_path: &Path) -> JobResult {
        JobResult::error(
            SUMMARY_BAD_WORKING_DIRECTORY,
            format!(
                "Working directory {} for script job {} is not readable.",
                working_path.display(),
                self.pretty_name
            ),
        )
    }

    pub fn bad_script_file(&self) -> JobResult {
        JobResult::error(
            SUMMARY_BAD_SCRIPT_FILE,
            format!(
                "Main script file {} for script job {} is not readable.",
                self.script.display(),
                self.pretty_name
            ),
        )
    }

    pub fn pre_script_raised(&self, error: &str) -> JobResult {
        JobResult::internal_error(
            SUMMARY_BAD_INTERNAL_SCRIPT,
            format!(
                "Internal script for script job {} raised an exception.\n{error}",
                self.pretty_name
            ),
            InternalErrorCode::UncaughtGuestException,
        )
    }

    pub fn load_raised(&self, error: &str) -> JobResult {
        JobResult::internal_error(
            SUMMARY_BAD_SCRIPT_FILE,
            format!(
                "Main script file {} for script job {} could not be loaded because it raised an exception.\n{error}",
                self.script.display(),
                self.pretty_name
            ),
            InternalErrorCode::UncaughtGuestException,
        )
    }

    pub fn missing_entry_point(&self) -> JobResult {
        JobResult::error(
            SUMMARY_MISSING_ENTRY_POINT,
            format!(
                "Main script file {} for script job {} does not contain a run() function.",
                self.script.display(),
                self.pretty_name
            ),
        )
    }

    pub fn entry_outcome(&self, outcome: EntryOutcome) -> JobResult {
        match outcome {
            EntryOutcome::NoReturn => JobResult::Success,
            EntryOutcome::ErrorPair { summary, details } => JobResult::error(summary, details),
            EntryOutcome::MalformedReturn => JobResult::error(
                SUMMARY_INVALID_RESULTS,
                format!(
                    "Main script file {} for script job {} returned invalid results.",
                    self.script.display(),
                    self.pretty_name
                ),
            ),
            EntryOutcome::Raised(error) => JobResult::internal_error(
                SUMMARY_BAD_SCRIPT_FILE,
                format!(
                    "Main script file {} for script job {} raised an exception.\n{error}",
                    self.script.display(),
                    self.pretty_name
                ),
                InternalErrorCode::UncaughtGuestException,
            ),
        }
    }
}
