use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use scriptjob::exec::{CommandRequest, ProcessResult, ProcessRunner};

/// A fake process runner that:
/// - records every request it receives
/// - answers with queued results, or exit code 0 and no output once the
///   queue is empty
/// - feeds each output line to the streaming callback, if any.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    requests: Arc<Mutex<Vec<CommandRequest>>>,
    results: Arc<Mutex<VecDeque<ProcessResult>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result for the next unanswered request.
    pub fn push_result(&self, code: i32, output: &str) -> &Self {
        self.results
            .lock()
            .unwrap()
            .push_back(ProcessResult::new(code, output));
        self
    }

    pub fn requests(&self) -> Vec<CommandRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.requests().into_iter().map(|r| r.argv).collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(
        &self,
        request: &CommandRequest,
        on_line: Option<&mut dyn FnMut(&str)>,
    ) -> ProcessResult {
        self.requests.lock().unwrap().push(request.clone());
        let result = self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ProcessResult::new(0, ""));

        if let Some(on_line) = on_line {
            for line in result.output.lines() {
                on_line(line);
            }
        }
        result
    }
}
