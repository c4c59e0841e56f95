//! In-memory relation: ordered column schema plus ordered rows

use super::value::Value;
use crate::error::ShapeError;

/// A row in a dataset, cell values in column order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Value>,
}

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }
}

/// An ordered, fully materialized table of nullable scalars.
///
/// Every row holds exactly one value per declared column; `push_row`
/// rejects rows that would break that invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a new empty dataset with the given column schema
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; its arity must match the schema
    pub fn push_row(&mut self, cells: Vec<Value>) -> Result<(), ShapeError> {
        if cells.len() != self.columns.len() {
            return Err(ShapeError {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                got: cells.len(),
            });
        }
        self.rows.push(Row::new(cells));
        Ok(())
    }

    /// Build a dataset from a column schema and row data, validating arity
    pub fn from_rows(
        columns: Vec<String>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Result<Self, ShapeError> {
        let mut dataset = Self::new(columns);
        for cells in rows {
            dataset.push_row(cells)?;
        }
        Ok(dataset)
    }

    /// Construction path for callers that preserve arity themselves
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Clone out the rows at the given indices, keeping the full schema
    pub(crate) fn subset(&self, indices: &[usize]) -> Dataset {
        let rows = indices.iter().map(|&i| self.rows[i].clone()).collect();
        Dataset::from_parts(self.columns.clone(), rows)
    }
}
