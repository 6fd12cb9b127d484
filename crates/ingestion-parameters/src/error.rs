use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// The value is not one of the kinds the statement protocol can carry.
    #[error("value {value} not supported")]
    UnsupportedValueType { value: String },
    #[error("row has {values} values for {columns} columns")]
    SchemaMismatch { columns: usize, values: usize },
    #[error("row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<ParameterError>,
    },
}

impl ParameterError {
    pub(crate) fn unsupported(value: impl std::fmt::Display) -> Self {
        Self::UnsupportedValueType {
            value: value.to_string(),
        }
    }

    /// True when the root cause is an unsupported value, looking through row wrappers.
    #[must_use]
    pub fn is_unsupported_value(&self) -> bool {
        match self {
            Self::UnsupportedValueType { .. } => true,
            Self::SchemaMismatch { .. } => false,
            Self::Row { source, .. } => source.is_unsupported_value(),
        }
    }

    /// Index of the failing row for batch failures.
    #[must_use]
    pub fn row_index(&self) -> Option<usize> {
        match self {
            Self::Row { index, .. } => Some(*index),
            _ => None,
        }
    }
}
