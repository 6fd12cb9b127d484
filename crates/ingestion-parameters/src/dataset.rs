//! In-memory tabular data with a fixed column schema.

use thiserror::Error;

use crate::value::ScalarValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetShapeError {
    #[error("row {index} has {actual} values, expected {expected}")]
    RowWidth {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("column `{0}` already exists")]
    DuplicateColumn(String),
    #[error("column `{0}` not found")]
    MissingColumn(String),
    #[error("column has {actual} values for {expected} rows")]
    ColumnLength { expected: usize, actual: usize },
}

/// Rows of scalars aligned positionally with an ordered header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<ScalarValue>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset, rejecting rows whose width differs from the header.
    pub fn from_rows(
        columns: Vec<String>,
        rows: Vec<Vec<ScalarValue>>,
    ) -> Result<Self, DatasetShapeError> {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    pub fn push_row(&mut self, row: Vec<ScalarValue>) -> Result<(), DatasetShapeError> {
        if row.len() != self.columns.len() {
            return Err(DatasetShapeError::RowWidth {
                index: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a column; `values` must hold exactly one entry per row.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<ScalarValue>,
    ) -> Result<(), DatasetShapeError> {
        let name = name.into();
        if self.column_index(&name).is_some() {
            return Err(DatasetShapeError::DuplicateColumn(name));
        }
        if values.len() != self.rows.len() {
            return Err(DatasetShapeError::ColumnLength {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Replace an existing column in place, or append it when absent.
    pub fn set_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<ScalarValue>,
    ) -> Result<(), DatasetShapeError> {
        let name = name.into();
        let Some(idx) = self.column_index(&name) else {
            return self.push_column(name, values);
        };
        if values.len() != self.rows.len() {
            return Err(DatasetShapeError::ColumnLength {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
        Ok(())
    }

    /// Keep only `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Self, DatasetShapeError> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| DatasetShapeError::MissingColumn((*name).to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Ok(Self {
            columns: names.iter().map(|name| (*name).to_string()).collect(),
            rows,
        })
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Iterate one column's values in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &ScalarValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<ScalarValue>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
