// src/job/result.rs

use std::fmt;

/// Why a job ended in an internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalErrorCode {
    /// The guest script (or the injected pre-script) raised an error that
    /// nothing caught.
    UncaughtGuestException,
}

impl InternalErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternalErrorCode::UncaughtGuestException => "uncaught-guest-exception",
        }
    }
}

impl fmt::Display for InternalErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of one job execution.
///
/// - `Success`: the job did what it was supposed to do.
/// - `Error`: a reported failure; configuration mistakes and failures the
///   script itself chose to report end up here.
/// - `InternalError`: the script blew up; `code` says how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Success,
    Error {
        summary: String,
        details: String,
    },
    InternalError {
        summary: String,
        details: String,
        code: InternalErrorCode,
    },
}

impl JobResult {
    pub fn error(summary: impl Into<String>, details: impl Into<String>) -> Self {
        JobResult::Error {
            summary: summary.into(),
            details: details.into(),
        }
    }

    pub fn internal_error(
        summary: impl Into<String>,
        details: impl Into<String>,
        code: InternalErrorCode,
    ) -> Self {
        JobResult::InternalError {
            summary: summary.into(),
            details: details.into(),
            code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success)
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            JobResult::Success => None,
            JobResult::Error { summary, .. } | JobResult::InternalError { summary, .. } => {
                Some(summary)
            }
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            JobResult::Success => None,
            JobResult::Error { details, .. } | JobResult::InternalError { details, .. } => {
                Some(details)
            }
        }
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobResult::Success => f.write_str("success"),
            JobResult::Error { summary, details } => write!(f, "error: {summary}: {details}"),
            JobResult::InternalError {
                summary,
                details,
                code,
            } => write!(f, "internal error ({code}): {summary}: {details}"),
        }
    }
}
