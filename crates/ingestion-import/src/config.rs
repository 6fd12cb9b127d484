use std::time::Duration;

use ingestion_dataset::CsvOptions;
use serde::{Deserialize, Serialize};
use storage_objects::ObjectLocation;

/// Gap between consecutive inserts.
pub const DEFAULT_PACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after failed attempt `attempt` (1-based); doubles
    /// each time.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub input: ObjectLocation,
    pub csv: CsvOptions,
    /// Zero disables pacing.
    pub pace: Duration,
    /// Issue `CREATE EXTENSION IF NOT EXISTS vector` before creating the table.
    pub create_extension: bool,
    pub retry: RetryPolicy,
    /// Threads used to parameterize rows; 1 keeps it on the calling task.
    pub parameter_workers: usize,
}

impl ImportConfig {
    pub fn new(input: ObjectLocation) -> Self {
        Self {
            input,
            csv: CsvOptions::default(),
            pace: DEFAULT_PACE,
            create_extension: false,
            retry: RetryPolicy::default(),
            parameter_workers: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 4,
            backoff_ms: 250,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(250));
        assert_eq!(policy.backoff(2), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1_000));
    }
}
