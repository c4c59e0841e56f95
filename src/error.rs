//! Error types for configuration, normalization, and dataset shape

use thiserror::Error;

/// Which dataset a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// Invalid comparison configuration, detected before any row is processed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("match key must name at least one column")]
    EmptyKey,
    #[error("key column(s) {columns:?} not found in {side} dataset")]
    MissingKeyColumns { side: Side, columns: Vec<String> },
    #[error("ignored column(s) {columns:?} not found in {side} dataset")]
    MissingIgnoreColumns { side: Side, columns: Vec<String> },
}

/// A value rule rejected its input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("unrecognized date token {0:?}")]
    UnrecognizedDate(String),
    #[error("{0}")]
    Custom(String),
}

/// Normalization failure, carrying the column and row that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule for column {column:?} failed at row {row}: {source}")]
pub struct NormalizeError {
    pub column: String,
    /// 1-based row number within the dataset
    pub row: usize,
    #[source]
    pub source: RuleError,
}

/// A row whose arity does not match the declared schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row} has {got} values, schema declares {expected} columns")]
pub struct ShapeError {
    /// 1-based row number within the dataset
    pub row: usize,
    pub expected: usize,
    pub got: usize,
}
