// src/job/progress.rs

//! Progress channel between a running job and whoever is watching it.

use std::fmt::Debug;

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::Stage;

/// Receives progress and lifecycle notifications from a job.
pub trait JobObserver: Send + Sync + Debug {
    /// `value` is expected in `0.0..=1.0` but not clamped.
    fn progress(&self, job: &str, value: f64);

    /// Called every time the job enters a new lifecycle stage.
    fn stage(&self, _job: &str, _stage: Stage) {}
}

/// Observer that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl JobObserver for LogObserver {
    fn progress(&self, job: &str, value: f64) {
        debug!(job, value, "job progress");
    }
}

/// Events forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Progress { job: String, value: f64 },
    StageEntered { job: String, stage: Stage },
}

/// Observer forwarding everything over an unbounded tokio channel.
///
/// Sending never blocks, so the job thread is never held up by a slow
/// consumer. Events sent after the receiver is gone are dropped.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<JobEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl JobObserver for ChannelObserver {
    fn progress(&self, job: &str, value: f64) {
        let _ = self.tx.send(JobEvent::Progress {
            job: job.to_string(),
            value,
        });
    }

    fn stage(&self, job: &str, stage: Stage) {
        let _ = self.tx.send(JobEvent::StageEntered {
            job: job.to_string(),
            stage,
        });
    }
}
