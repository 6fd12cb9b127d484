//! Parameter marshalling for remote parameterized statement execution.
//!
//! Scalars from a loaded [`Dataset`] are encoded into the tagged wire values
//! accepted by the RDS Data API (`isNull`, `longValue`, `stringValue`, ...),
//! with a type hint for the textual encodings of timestamps, dates, times and
//! decimals. Everything here is pure and synchronous.

mod dataset;
mod encode;
mod error;
mod params;
mod value;

pub use dataset::{Dataset, DatasetShapeError};
pub use encode::{encode, EncodedValue, TypeHint};
pub use error::ParameterError;
pub use params::{
    parameterize, parameterize_all, parameterize_all_parallel, ParameterDescriptor, ParameterSet,
};
pub use value::ScalarValue;
