// src/exec/process.rs

use std::time::Duration;

use crate::job::JobResult;

/// Exit code plus captured standard output of a finished command.
///
/// Negative codes never come from the program itself; they describe why it
/// did not produce an exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub code: i32,
    pub output: String,
}

impl ProcessResult {
    /// Killed by a signal, or lost while waiting.
    pub const CRASHED: i32 = -1;
    pub const FAILED_TO_START: i32 = -2;
    /// Bad arguments, including a missing working directory or mount point.
    pub const INVALID_ARGUMENTS: i32 = -3;
    pub const TIMED_OUT: i32 = -4;

    pub fn new(code: i32, output: impl Into<String>) -> Self {
        Self {
            code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Translate the result of running `command` into a job result.
    ///
    /// Meant for native jobs that consist of a single command. `timeout` is
    /// only used to phrase the timed-out message.
    pub fn explain(&self, command: &str, timeout: Duration) -> JobResult {
        match self.code {
            0 => JobResult::Success,
            Self::CRASHED => JobResult::error(
                "external command crashed",
                format!("Command {command} crashed."),
            ),
            Self::FAILED_TO_START => JobResult::error(
                "external command failed to start",
                format!("Command {command} failed to start."),
            ),
            Self::INVALID_ARGUMENTS => JobResult::error(
                "internal error when starting command",
                format!("Bad parameters for process call of {command}."),
            ),
            Self::TIMED_OUT => JobResult::error(
                "external command failed to finish",
                format!(
                    "Command {command} failed to finish in {} seconds.",
                    timeout.as_secs()
                ),
            ),
            code => {
                let mut details = format!("Command {command} finished with exit code {code}.");
                let output = self.output.trim();
                if !output.is_empty() {
                    details.push_str("\nOutput:\n");
                    details.push_str(output);
                }
                JobResult::error("external command finished with errors", details)
            }
        }
    }
}
