// src/exec/backend.rs

//! Pluggable process runner abstraction.
//!
//! The host API talks to a `ProcessRunner` instead of spawning processes
//! directly. This makes it easy to swap in a fake runner in tests while
//! keeping the production implementation in [`super::tokio_runner`].

use std::fmt::Debug;
use std::time::Duration;

use crate::types::RunLocation;

use super::ProcessResult;

/// A single command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub location: RunLocation,
    /// Program followed by its arguments.
    pub argv: Vec<String>,
    /// Written to the child's standard input, then stdin is closed.
    pub input: String,
    /// `None` means wait forever.
    pub timeout: Option<Duration>,
}

impl CommandRequest {
    pub fn new(location: RunLocation, argv: Vec<String>) -> Self {
        Self {
            location,
            argv,
            input: String::new(),
            timeout: None,
        }
    }

    pub fn target(argv: Vec<String>) -> Self {
        Self::new(RunLocation::Target, argv)
    }

    pub fn host(argv: Vec<String>) -> Self {
        Self::new(RunLocation::Host, argv)
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Scripts pass timeouts in whole seconds, `0` meaning "no timeout".
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Human-readable command line, for logs and error messages.
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

/// Trait abstracting how commands are executed.
///
/// Production code uses [`super::TokioProcessRunner`]; tests can provide
/// their own implementation that doesn't spawn real processes.
///
/// Runners never fail: every problem is reported through the exit code of
/// the returned [`ProcessResult`].
pub trait ProcessRunner: Send + Sync + Debug {
    /// Run `request` to completion.
    ///
    /// When `on_line` is given it is called with every line of standard
    /// output, in order, as soon as the line is available.
    fn run(
        &self,
        request: &CommandRequest,
        on_line: Option<&mut dyn FnMut(&str)>,
    ) -> ProcessResult;
}
