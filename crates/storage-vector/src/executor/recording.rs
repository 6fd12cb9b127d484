use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{StatementExecutor, StatementOutcome, StatementRequest};
use crate::error::ExecutorError;

/// In-memory executor for integration testing: records every request and
/// replays scripted outcomes in order.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<StatementRequest>>,
    scripted_responses: Mutex<Vec<Result<StatementOutcome, ExecutorError>>>,
}

impl RecordingExecutor {
    /// Queue the outcome returned by the next execute call.
    pub async fn script_response(&self, response: Result<StatementOutcome, ExecutorError>) {
        self.scripted_responses.lock().await.push(response);
    }

    /// Retrieve the requests recorded so far.
    pub async fn calls(&self) -> Vec<StatementRequest> {
        self.calls.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.calls.lock().await.clear();
        self.scripted_responses.lock().await.clear();
    }
}

#[async_trait]
impl StatementExecutor for RecordingExecutor {
    async fn execute(&self, request: StatementRequest) -> Result<StatementOutcome, ExecutorError> {
        self.calls.lock().await.push(request);

        let mut scripted = self.scripted_responses.lock().await;
        if scripted.is_empty() {
            return Ok(StatementOutcome::updated(1));
        }

        scripted.remove(0)
    }
}
