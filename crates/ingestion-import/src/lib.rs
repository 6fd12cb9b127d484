//! Loads an embeddings CSV into the `product_info` table.
//!
//! Every row is parameterized before the first statement is sent, so a bad
//! value aborts the import without touching the database. Inserts are issued
//! one row at a time at a fixed pace and retried while the service throttles.

mod config;
mod error;
mod importer;

pub use config::{ImportConfig, RetryPolicy, DEFAULT_PACE};
pub use error::ImportError;
pub use importer::{ImportReport, ProductImporter};
