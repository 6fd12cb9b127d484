//! Row and batch parameterization.

use std::thread;

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::encode::{encode, EncodedValue, TypeHint};
use crate::error::ParameterError;
use crate::value::ScalarValue;

/// A named, optionally hinted value bound to one statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    pub value: EncodedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<TypeHint>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, value: EncodedValue) -> Self {
        Self {
            name: name.into(),
            value,
            type_hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: TypeHint) -> Self {
        self.type_hint = Some(hint);
        self
    }
}

/// Parameters for one statement execution, in column order.
pub type ParameterSet = Vec<ParameterDescriptor>;

/// Encode one row against its column names.
///
/// Every column, `embedding` included, goes through the same encoder. The
/// row either yields one descriptor per column or fails as a whole.
pub fn parameterize<S>(columns: &[S], values: &[ScalarValue]) -> Result<ParameterSet, ParameterError>
where
    S: AsRef<str>,
{
    if columns.len() != values.len() {
        return Err(ParameterError::SchemaMismatch {
            columns: columns.len(),
            values: values.len(),
        });
    }
    columns
        .iter()
        .zip(values)
        .map(|(column, value)| {
            let (encoded, type_hint) = encode(value)?;
            Ok(ParameterDescriptor {
                name: column.as_ref().to_string(),
                value: encoded,
                type_hint,
            })
        })
        .collect()
}

/// Parameterize every row of `dataset` in load order.
///
/// The first failing row aborts the batch; the error records its index.
pub fn parameterize_all(dataset: &Dataset) -> Result<Vec<ParameterSet>, ParameterError> {
    parameterize_rows(dataset.columns(), dataset.rows(), 0)
}

/// Same result as [`parameterize_all`], with rows split across `workers` threads.
pub fn parameterize_all_parallel(
    dataset: &Dataset,
    workers: usize,
) -> Result<Vec<ParameterSet>, ParameterError> {
    let workers = workers.max(1);
    if workers == 1 || dataset.len() < 2 {
        return parameterize_all(dataset);
    }
    let chunk_len = dataset.len().div_ceil(workers);
    let columns = dataset.columns();
    let results: Vec<Result<Vec<ParameterSet>, ParameterError>> = thread::scope(|scope| {
        let handles: Vec<_> = dataset
            .rows()
            .chunks(chunk_len)
            .enumerate()
            .map(|(chunk, rows)| {
                scope.spawn(move || parameterize_rows(columns, rows, chunk * chunk_len))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });
    let mut sets = Vec::with_capacity(dataset.len());
    for result in results {
        sets.extend(result?);
    }
    Ok(sets)
}

fn parameterize_rows(
    columns: &[String],
    rows: &[Vec<ScalarValue>],
    offset: usize,
) -> Result<Vec<ParameterSet>, ParameterError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            parameterize(columns, row).map_err(|source| {
                let index = offset + idx;
                debug!(row = index, error = %source, "row parameterization failed");
                ParameterError::Row {
                    index,
                    source: Box::new(source),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_count_matches_columns_and_keeps_order() {
        let columns = ["c", "a", "b"];
        let set = parameterize(&columns, &[1_i64.into(), true.into(), "x".into()]).unwrap();
        let names: Vec<_> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, columns);
        assert_eq!(set[1].value, EncodedValue::Boolean(true));
    }

    #[test]
    fn length_mismatch_is_reported() {
        let err = parameterize(&["a", "b"], &[ScalarValue::Null]).unwrap_err();
        assert_eq!(err, ParameterError::SchemaMismatch { columns: 2, values: 1 });
    }

    #[test]
    fn parallel_matches_sequential_order() {
        let rows = (0..23_i64)
            .map(|i| vec![ScalarValue::Integer(i), ScalarValue::Text(format!("row-{i}"))])
            .collect();
        let dataset = Dataset::from_rows(vec!["id".into(), "label".into()], rows).unwrap();
        let sequential = parameterize_all(&dataset).unwrap();
        let parallel = parameterize_all_parallel(&dataset, 4).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn parallel_reports_first_failing_row() {
        let mut rows: Vec<Vec<ScalarValue>> =
            (0..10_i64).map(|i| vec![ScalarValue::Integer(i)]).collect();
        rows[3] = vec![ScalarValue::Vector(vec![None, Some(1.0)])];
        rows[8] = vec![ScalarValue::Vector(vec![Some(1.0), None])];
        let dataset = Dataset::from_rows(vec!["v".into()], rows).unwrap();
        let err = parameterize_all_parallel(&dataset, 3).unwrap_err();
        assert_eq!(err.row_index(), Some(3));
        assert!(err.is_unsupported_value());
    }
}
