use ingestion_dataset::{read_csv, DatasetError};
use ingestion_parameters::{parameterize_all, parameterize_all_parallel, DatasetShapeError};
use storage_objects::SharedObjectStore;
use storage_vector::schema::{create_table_sql, insert_sql, table_columns, CREATE_EXTENSION_SQL};
use storage_vector::{SharedExecutor, StatementRequest};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{ImportConfig, RetryPolicy};
use crate::error::ImportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub rows_inserted: usize,
    pub statements_issued: usize,
    /// Throttled attempts that were retried.
    pub retries: u32,
}

pub struct ProductImporter {
    store: SharedObjectStore,
    executor: SharedExecutor,
}

impl ProductImporter {
    #[must_use]
    pub fn new(store: SharedObjectStore, executor: SharedExecutor) -> Self {
        Self { store, executor }
    }

    #[instrument(skip_all, fields(run_id = tracing::field::Empty, input = %config.input))]
    pub async fn run(&self, config: &ImportConfig) -> Result<ImportReport, ImportError> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let bytes = self.store.get(&config.input).await?;
        let dataset = read_csv(&bytes, &config.csv)?;
        let projected = dataset
            .select(&table_columns())
            .map_err(|err| match err {
                DatasetShapeError::MissingColumn(column) => ImportError::MissingColumn(column),
                other => ImportError::Dataset(DatasetError::from(other)),
            })?;
        let parameter_sets = if config.parameter_workers > 1 {
            parameterize_all_parallel(&projected, config.parameter_workers)?
        } else {
            parameterize_all(&projected)?
        };
        info!(rows = parameter_sets.len(), "parameterized rows");

        let mut report = ImportReport {
            run_id,
            rows_inserted: 0,
            statements_issued: 0,
            retries: 0,
        };

        if config.create_extension {
            report.retries += self
                .execute_with_retry(StatementRequest::new(CREATE_EXTENSION_SQL), &config.retry)
                .await?;
            report.statements_issued += 1;
        }
        report.retries += self
            .execute_with_retry(StatementRequest::new(create_table_sql()), &config.retry)
            .await?;
        report.statements_issued += 1;
        info!("product table ready");

        let insert = insert_sql();
        let mut pacer = (!config.pace.is_zero()).then(|| {
            let mut interval = time::interval(config.pace);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        for (row, parameters) in parameter_sets.into_iter().enumerate() {
            if let Some(pacer) = pacer.as_mut() {
                pacer.tick().await;
            }
            report.retries += self
                .execute_with_retry(
                    StatementRequest::new(insert.clone()).with_parameters(parameters),
                    &config.retry,
                )
                .await?;
            report.statements_issued += 1;
            report.rows_inserted += 1;
            debug!(row, "inserted row");
        }

        info!(
            rows = report.rows_inserted,
            statements = report.statements_issued,
            retries = report.retries,
            "import complete"
        );
        Ok(report)
    }

    /// Execute, retrying throttled attempts with backoff. Returns the number
    /// of retries used.
    async fn execute_with_retry(
        &self,
        request: StatementRequest,
        policy: &RetryPolicy,
    ) -> Result<u32, ImportError> {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.executor.execute(request.clone()).await {
                Ok(_) => return Ok(attempt - 1),
                Err(err) if err.is_throttled() => {
                    if attempt >= max_attempts {
                        return Err(ImportError::RetriesExhausted {
                            attempts: max_attempts,
                            source: err,
                        });
                    }
                    let delay = policy.backoff(attempt);
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "statement throttled, retrying"
                    );
                    time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
