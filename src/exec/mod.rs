// src/exec/mod.rs

//! Process execution layer.
//!
//! Guest scripts never spawn processes themselves; they go through the
//! utility functions of the host API, which build a [`CommandRequest`] and
//! hand it to a [`ProcessRunner`].
//!
//! - [`backend`] provides the `ProcessRunner` trait and the request type.
//!   Tests can replace the runner with a fake implementation.
//! - [`process`] holds [`ProcessResult`] and its well-known exit codes.
//! - [`mount`] wraps the `mount` utility with its argument checks.
//! - [`tokio_runner`] is the real runner used in production, built on
//!   `tokio::process`.

pub mod backend;
pub mod mount;
pub mod process;
pub mod tokio_runner;

pub use backend::{CommandRequest, ProcessRunner};
pub use mount::mount;
pub use process::ProcessResult;
pub use tokio_runner::TokioProcessRunner;
