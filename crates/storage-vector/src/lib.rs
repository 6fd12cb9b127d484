//! Product vectors in PostgreSQL/pgvector behind the RDS Data API.
//!
//! [`StatementExecutor`] is the seam to the database. [`RdsDataExecutor`]
//! talks to the Data API; [`RecordingExecutor`] records statements for tests.
//! [`ProductQueries`] answers similarity searches over the `product_info`
//! table described in [`schema`].

pub mod error;
pub mod executor;
pub mod queries;
pub mod schema;

pub use error::{ExecutorError, QueryError};
pub use executor::{
    to_sql_parameters, ArrayBinding, DataApiTarget, RdsDataExecutor, RecordingExecutor,
    RecordsFormat, SharedExecutor, StatementExecutor, StatementOutcome, StatementRequest,
};
pub use queries::{
    decode_records, Product, ProductDetail, ProductQueries, RelatedProduct, DEFAULT_SEARCH_LIMIT,
    MAX_SEARCH_LIMIT,
};
