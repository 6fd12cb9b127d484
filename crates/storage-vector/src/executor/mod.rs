use std::sync::Arc;

use async_trait::async_trait;
use ingestion_parameters::ParameterSet;

use crate::error::ExecutorError;

mod rds;
mod recording;

pub use rds::{to_sql_parameters, ArrayBinding, DataApiTarget, RdsDataExecutor};
pub use recording::RecordingExecutor;

/// Shape of result rows requested from the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordsFormat {
    #[default]
    None,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementRequest {
    pub sql: String,
    pub parameters: ParameterSet,
    pub records_format: RecordsFormat,
}

impl StatementRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: ParameterSet::new(),
            records_format: RecordsFormat::None,
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: ParameterSet) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_records_format(mut self, format: RecordsFormat) -> Self {
        self.records_format = format;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementOutcome {
    pub records_updated: i64,
    /// JSON array of row objects when [`RecordsFormat::Json`] was requested.
    pub formatted_records: Option<String>,
}

impl StatementOutcome {
    #[must_use]
    pub const fn updated(records_updated: i64) -> Self {
        Self {
            records_updated,
            formatted_records: None,
        }
    }

    pub fn records(json: impl Into<String>) -> Self {
        Self {
            records_updated: 0,
            formatted_records: Some(json.into()),
        }
    }
}

/// Runs one parameterized SQL statement against the remote database.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, request: StatementRequest) -> Result<StatementOutcome, ExecutorError>;
}

impl std::fmt::Debug for dyn StatementExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn StatementExecutor")
    }
}

pub type SharedExecutor = Arc<dyn StatementExecutor>;
