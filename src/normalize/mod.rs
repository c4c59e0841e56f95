//! Dataset normalization ahead of comparison
//!
//! Maps a raw dataset to canonical form: generalized column names, explicit
//! renames, and per-column value rules. Normalization never mutates its
//! input; it either returns a complete canonical copy or fails.

pub mod rules;

use indexmap::IndexMap;

use crate::error::{NormalizeError, RuleError};
use crate::model::{Dataset, Value};

/// Column-name canonicalization function
pub type ColumnGeneralizer = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Per-column value transform with a declared failure kind
pub type ValueRule = Box<dyn Fn(&Value) -> Result<Value, RuleError> + Send + Sync>;

/// Default column-name generalizer: trim, lowercase, spaces and hyphens
/// become underscores
pub fn default_column_generalizer(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Maps raw datasets to canonical form.
///
/// Each instance owns its configuration; there is no process-wide state.
/// If two distinct columns collapse to one name after generalization the
/// result is undefined — avoiding collisions is the caller's job.
pub struct Normalizer {
    col_generalizer: ColumnGeneralizer,
    col_mapping: IndexMap<String, String>,
    custom_rules: IndexMap<String, ValueRule>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a normalizer with the default column generalizer and no rules
    pub fn new() -> Self {
        Self {
            col_generalizer: Box::new(default_column_generalizer),
            col_mapping: IndexMap::new(),
            custom_rules: IndexMap::new(),
        }
    }

    /// Replace the column-name generalizer
    pub fn with_column_generalizer(
        mut self,
        generalizer: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.col_generalizer = Box::new(generalizer);
        self
    }

    /// Rename a column after generalization (generalized name → final name)
    pub fn with_column_mapping(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.col_mapping.insert(from.into(), to.into());
        self
    }

    /// Attach a value rule to a column; rules on absent columns are skipped
    pub fn with_rule(
        mut self,
        column: impl Into<String>,
        rule: impl Fn(&Value) -> Result<Value, RuleError> + Send + Sync + 'static,
    ) -> Self {
        self.custom_rules.insert(column.into(), Box::new(rule));
        self
    }

    /// Produce a canonical copy of `dataset`.
    ///
    /// Column names are generalized, then renamed through the mapping, then
    /// every custom rule is applied element-wise to its column. A rule
    /// failure aborts the whole normalization; no partial dataset escapes.
    pub fn normalize(&self, dataset: &Dataset) -> Result<Dataset, NormalizeError> {
        let columns: Vec<String> = dataset
            .columns()
            .iter()
            .map(|c| {
                let generalized = (self.col_generalizer)(c);
                self.col_mapping
                    .get(&generalized)
                    .cloned()
                    .unwrap_or(generalized)
            })
            .collect();

        let mut rows: Vec<Vec<Value>> = dataset
            .rows()
            .iter()
            .map(|r| r.cells().to_vec())
            .collect();

        for (column, rule) in &self.custom_rules {
            let Some(idx) = columns.iter().position(|c| c == column) else {
                continue;
            };
            for (row_no, cells) in rows.iter_mut().enumerate() {
                cells[idx] = rule(&cells[idx]).map_err(|source| NormalizeError {
                    column: column.clone(),
                    row: row_no + 1,
                    source,
                })?;
            }
        }

        // Row arity is untouched above, so this cannot fail
        Ok(Dataset::from_parts(
            columns,
            rows.into_iter().map(crate::model::Row::new).collect(),
        ))
    }
}
