// src/exec/tokio_runner.rs

//! Real process runner built on `tokio::process`.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::TargetSection;
use crate::types::RunLocation;

use super::{CommandRequest, ProcessResult, ProcessRunner};

/// Runs commands as child processes on a tokio runtime.
///
/// `run` is synchronous. The child is driven by a task spawned on the
/// runtime, and the calling thread waits for its stdout lines and result on
/// a channel. Line callbacks therefore run on the calling thread, outside
/// the runtime, and may start further commands through the same runner.
/// `run` must be called from a thread that is not itself executing async
/// code (for example inside `tokio::task::spawn_blocking`).
#[derive(Debug, Clone)]
pub struct TokioProcessRunner {
    handle: Handle,
    target: TargetSection,
}

impl TokioProcessRunner {
    pub fn new(handle: Handle, target: TargetSection) -> Self {
        Self { handle, target }
    }

    /// Use the runtime the caller is currently running in.
    pub fn from_current(target: TargetSection) -> Result<Self> {
        let handle = Handle::try_current().context("no tokio runtime for process runner")?;
        Ok(Self::new(handle, target))
    }

    /// Final argv, with target commands wrapped in `chroot` when needed.
    pub fn resolve_argv(&self, request: &CommandRequest) -> Vec<String> {
        match request.location {
            RunLocation::Target if self.target.needs_chroot() => {
                let mut argv = Vec::with_capacity(request.argv.len() + 2);
                argv.push("chroot".to_string());
                argv.push(self.target.root.to_string_lossy().into_owned());
                argv.extend(request.argv.iter().cloned());
                argv
            }
            _ => request.argv.clone(),
        }
    }

    async fn run_async(
        &self,
        request: &CommandRequest,
        events: Option<&mpsc::UnboundedSender<RunEvent>>,
    ) -> ProcessResult {
        let argv = self.resolve_argv(request);
        let Some((program, args)) = argv.split_first() else {
            warn!(location = %request.location, "refusing to run an empty command");
            return ProcessResult::new(ProcessResult::INVALID_ARGUMENTS, "");
        };

        info!(
            location = %request.location,
            cmd = %argv.join(" "),
            timeout = ?request.timeout,
            "starting process"
        );

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(cmd = %program, error = %e, "process failed to start");
                return ProcessResult::new(ProcessResult::FAILED_TO_START, "");
            }
        };

        // Feed stdin from a separate task so a chatty child cannot deadlock
        // against us while we read its stdout.
        if let Some(mut stdin) = child.stdin.take() {
            let input = request.input.clone();
            tokio::spawn(async move {
                if !input.is_empty() {
                    if let Err(e) = stdin.write_all(input.as_bytes()).await {
                        debug!(error = %e, "failed to write process input");
                    }
                }
            });
        }

        // Always consume stderr so buffers don't fill; log at debug.
        if let Some(stderr) = child.stderr.take() {
            let name = program.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(cmd = %name, "stderr: {}", line);
                }
            });
        }

        let stdout = child.stdout.take();
        let collect = async {
            let mut output = String::new();
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if let Some(events) = events {
                        let _ = events.send(RunEvent::Line(line.clone()));
                    }
                    output.push_str(&line);
                    output.push('\n');
                }
            }
            (output, child.wait().await)
        };

        let finished = match request.timeout {
            Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
            None => Some(collect.await),
        };

        let Some((output, status)) = finished else {
            warn!(cmd = %program, timeout = ?request.timeout, "process timed out; killing it");
            if let Err(e) = child.kill().await {
                warn!(cmd = %program, error = %e, "failed to kill timed-out process");
            }
            return ProcessResult::new(ProcessResult::TIMED_OUT, "");
        };

        let code = match status {
            Ok(status) => status.code().unwrap_or(ProcessResult::CRASHED),
            Err(e) => {
                warn!(cmd = %program, error = %e, "waiting for process failed");
                ProcessResult::CRASHED
            }
        };

        info!(cmd = %program, exit_code = code, "process exited");
        ProcessResult::new(code, output)
    }
}

/// Messages from the task driving a child to the thread waiting on it.
#[derive(Debug)]
enum RunEvent {
    Line(String),
    Finished(ProcessResult),
}

impl ProcessRunner for TokioProcessRunner {
    fn run(
        &self,
        request: &CommandRequest,
        mut on_line: Option<&mut dyn FnMut(&str)>,
    ) -> ProcessResult {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = self.clone();
        let owned = request.clone();
        let stream_lines = on_line.is_some();
        self.handle.spawn(async move {
            let result = runner
                .run_async(&owned, stream_lines.then_some(&tx))
                .await;
            let _ = tx.send(RunEvent::Finished(result));
        });

        while let Some(event) = rx.blocking_recv() {
            match event {
                RunEvent::Line(line) => {
                    if let Some(callback) = on_line.as_mut() {
                        callback(&line);
                    }
                }
                RunEvent::Finished(result) => return result,
            }
        }

        warn!(cmd = %request.display(), "process task ended without a result");
        ProcessResult::new(ProcessResult::CRASHED, "")
    }
}
