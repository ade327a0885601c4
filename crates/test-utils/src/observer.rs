use std::sync::{Arc, Mutex};

use scriptjob::job::JobObserver;
use scriptjob::types::Stage;

/// Observer that remembers everything it was told.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    progress: Arc<Mutex<Vec<f64>>>,
    stages: Arc<Mutex<Vec<Stage>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress_values(&self) -> Vec<f64> {
        self.progress.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.stages.lock().unwrap().clone()
    }

    pub fn reached(&self, stage: Stage) -> bool {
        self.stages().contains(&stage)
    }
}

impl JobObserver for RecordingObserver {
    fn progress(&self, _job: &str, value: f64) {
        self.progress.lock().unwrap().push(value);
    }

    fn stage(&self, _job: &str, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }
}
