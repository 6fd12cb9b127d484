//! CSV codec for product catalogs.
//!
//! Every field loads as text, except the configured vector columns, which
//! hold JSON-style number lists (`[0.1, 0.2]`) and load as
//! [`ScalarValue::Vector`]. Empty fields load as null.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ingestion_parameters::{Dataset, DatasetShapeError, ParameterError, ScalarValue};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_VECTOR_COLUMN: &str = "embedding";

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub vector_columns: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            vector_columns: vec![DEFAULT_VECTOR_COLUMN.into()],
        }
    }
}

impl CsvOptions {
    fn is_vector_column(&self, name: &str) -> bool {
        self.vector_columns.iter().any(|column| column == name)
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Shape(#[from] DatasetShapeError),
    #[error("row {row}: column `{column}` is not a numeric vector: {detail}")]
    InvalidVector {
        row: usize,
        column: String,
        detail: String,
    },
    #[error("failed to flush csv output: {0}")]
    Flush(String),
}

/// Decode a CSV document with a header row.
pub fn read_csv(bytes: &[u8], options: &CsvOptions) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    let vector_slots: Vec<bool> = columns
        .iter()
        .map(|column| options.is_vector_column(column))
        .collect();

    let mut dataset = Dataset::new(columns.clone());
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let values = record
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                if vector_slots.get(idx).copied().unwrap_or(false) {
                    parse_vector(field).map_err(|err| DatasetError::InvalidVector {
                        row,
                        column: columns[idx].clone(),
                        detail: err.to_string(),
                    })
                } else if field.is_empty() {
                    Ok(ScalarValue::Null)
                } else {
                    Ok(ScalarValue::Text(field.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        dataset.push_row(values)?;
    }
    debug!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "decoded csv dataset"
    );
    Ok(dataset)
}

/// Encode a dataset as CSV with a header row.
pub fn write_csv(dataset: &Dataset, options: &CsvOptions) -> Result<Vec<u8>, DatasetError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(render_field))?;
    }
    writer
        .into_inner()
        .map_err(|err| DatasetError::Flush(err.error().to_string()))
}

/// Parse one vector field; an empty field is null.
pub fn parse_vector(field: &str) -> Result<ScalarValue, ParameterError> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(ScalarValue::Null);
    }
    let json: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|_| ParameterError::UnsupportedValueType {
            value: trimmed.to_string(),
        })?;
    match ScalarValue::from_json(&json)? {
        vector @ (ScalarValue::Vector(_) | ScalarValue::Null) => Ok(vector),
        _ => Err(ParameterError::UnsupportedValueType {
            value: trimmed.to_string(),
        }),
    }
}

/// Text form of one value inside a CSV cell.
#[must_use]
pub fn render_field(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Null => String::new(),
        ScalarValue::Text(text) => text.clone(),
        ScalarValue::Blob(bytes) => STANDARD.encode(bytes),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_fields_parse_numbers_and_nulls() {
        assert_eq!(
            parse_vector("[0.5, -1, 0.25]").unwrap(),
            ScalarValue::vector([0.5, -1.0, 0.25])
        );
        assert_eq!(parse_vector("  ").unwrap(), ScalarValue::Null);
        assert_eq!(
            parse_vector("[null, null]").unwrap(),
            ScalarValue::Vector(vec![None, None])
        );
    }

    #[test]
    fn non_vector_fields_are_rejected() {
        assert!(parse_vector("[\"a\"]").unwrap_err().is_unsupported_value());
        assert!(parse_vector("0.5").is_err());
        assert!(parse_vector("[0.1, 0.2").is_err());
    }

    #[test]
    fn vectors_render_as_bracketed_lists() {
        assert_eq!(render_field(&ScalarValue::vector([0.125, -0.5])), "[0.125, -0.5]");
        assert_eq!(render_field(&ScalarValue::Null), "");
        assert_eq!(render_field(&ScalarValue::Text("a,b".into())), "a,b");
        assert_eq!(render_field(&ScalarValue::Boolean(true)), "true");
    }
}
