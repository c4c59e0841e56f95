//! Reconciliation engine for comparing canonical datasets

mod partition;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::ReconConfig;
use crate::error::{ConfigError, Side};
use crate::model::{Dataset, Key, Value};

use partition::KeyIndex;

/// One differing column for a matched key
#[derive(Debug, Clone, Serialize)]
pub struct FieldDiff {
    pub column: String,
    pub source: Value,
    pub target: Value,
}

/// All differing columns for one matched key
#[derive(Debug, Clone, Serialize)]
pub struct DiffRecord {
    pub key: Key,
    /// Differing columns only, in lexicographic column order
    pub fields: Vec<FieldDiff>,
}

/// Result of a single `compare()` call.
///
/// Every key appearing on a side belongs to exactly one of
/// {duplicate, missing, matched} for that side. Missing and duplicate
/// collections carry full original rows under the side's own schema.
#[derive(Debug)]
pub struct ReconResult {
    pub source_count: usize,
    pub target_count: usize,
    /// Number of matched keys with at least one differing compared column
    pub diff_count: usize,
    pub diffs: Vec<DiffRecord>,
    /// Source rows whose key occurs more than once in the source
    pub duplicates_in_source: Dataset,
    /// Target rows whose key occurs more than once in the target
    pub duplicates_in_target: Dataset,
    /// Source rows whose key is absent from the target
    pub missing_in_target: Dataset,
    /// Target rows whose key is absent from the source
    pub missing_in_source: Dataset,
}

impl ReconResult {
    /// True when the comparison surfaced no diffs, duplicates, or missing rows
    pub fn is_clean(&self) -> bool {
        self.diff_count == 0
            && self.duplicates_in_source.is_empty()
            && self.duplicates_in_target.is_empty()
            && self.missing_in_target.is_empty()
            && self.missing_in_source.is_empty()
    }
}

/// Executes the compare algorithm over two canonical datasets.
///
/// Configuration is fixed at construction; `compare` is deterministic and
/// side-effect-free, so one engine may serve many comparisons, including
/// concurrent ones.
#[derive(Debug)]
pub struct ReconEngine {
    key: Vec<String>,
    ignore_cols: Vec<String>,
}

impl ReconEngine {
    /// Create an engine; the key must name at least one column
    pub fn new(config: ReconConfig) -> Result<Self, ConfigError> {
        if config.key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        Ok(Self {
            key: config.key,
            ignore_cols: config.ignore_cols,
        })
    }

    /// Compare source against target.
    ///
    /// Key and ignored columns are validated on both sides before any row
    /// is touched. A key duplicated on either side is withdrawn from
    /// matched/missing processing on both sides; its rows surface in the
    /// duplicate bucket of each side where the multiplicity occurs.
    pub fn compare(
        &self,
        source: &Dataset,
        target: &Dataset,
    ) -> Result<ReconResult, ConfigError> {
        let src_key = resolve_key_columns(source, Side::Source, &self.key)?;
        let tgt_key = resolve_key_columns(target, Side::Target, &self.key)?;
        check_ignore_columns(source, Side::Source, &self.ignore_cols)?;
        check_ignore_columns(target, Side::Target, &self.ignore_cols)?;

        let comparable = self.comparable_columns(source, target);

        let src_index = KeyIndex::build(source, &src_key);
        let tgt_index = KeyIndex::build(target, &tgt_key);

        let dup_keys: FxHashSet<Key> = src_index
            .duplicated_keys()
            .chain(tgt_index.duplicated_keys())
            .cloned()
            .collect();

        let duplicates_in_source = source.subset(&src_index.duplicate_rows());
        let duplicates_in_target = target.subset(&tgt_index.duplicate_rows());

        let mut missing_in_target_rows = Vec::new();
        let mut diffs = Vec::new();
        for (key, src_row) in src_index.unique_entries() {
            if dup_keys.contains(key) {
                continue;
            }
            match tgt_index.unique_row(key) {
                None => missing_in_target_rows.push(src_row),
                Some(tgt_row) => {
                    let fields = diff_fields(source, target, src_row, tgt_row, &comparable);
                    if !fields.is_empty() {
                        diffs.push(DiffRecord {
                            key: key.clone(),
                            fields,
                        });
                    }
                }
            }
        }

        let mut missing_in_source_rows = Vec::new();
        for (key, tgt_row) in tgt_index.unique_entries() {
            if dup_keys.contains(key) || src_index.contains(key) {
                continue;
            }
            missing_in_source_rows.push(tgt_row);
        }

        Ok(ReconResult {
            source_count: source.row_count(),
            target_count: target.row_count(),
            diff_count: diffs.len(),
            diffs,
            duplicates_in_source,
            duplicates_in_target,
            missing_in_target: source.subset(&missing_in_target_rows),
            missing_in_source: target.subset(&missing_in_source_rows),
        })
    }

    /// Columns present on both sides, minus key and ignored columns,
    /// ordered lexicographically so diff records come out deterministic
    fn comparable_columns(
        &self,
        source: &Dataset,
        target: &Dataset,
    ) -> Vec<(String, usize, usize)> {
        let mut columns: Vec<(String, usize, usize)> = source
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                !self.key.contains(name) && !self.ignore_cols.contains(name)
            })
            .filter_map(|(src_idx, name)| {
                target
                    .column_index(name)
                    .map(|tgt_idx| (name.clone(), src_idx, tgt_idx))
            })
            .collect();
        columns.sort_by(|a, b| a.0.cmp(&b.0));
        columns
    }
}

fn resolve_key_columns(
    dataset: &Dataset,
    side: Side,
    key: &[String],
) -> Result<Vec<usize>, ConfigError> {
    let missing: Vec<String> = key
        .iter()
        .filter(|name| !dataset.has_column(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingKeyColumns {
            side,
            columns: missing,
        });
    }
    Ok(key
        .iter()
        .filter_map(|name| dataset.column_index(name))
        .collect())
}

fn check_ignore_columns(
    dataset: &Dataset,
    side: Side,
    ignore_cols: &[String],
) -> Result<(), ConfigError> {
    let missing: Vec<String> = ignore_cols
        .iter()
        .filter(|name| !dataset.has_column(name))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingIgnoreColumns {
            side,
            columns: missing,
        })
    }
}

fn diff_fields(
    source: &Dataset,
    target: &Dataset,
    src_row: usize,
    tgt_row: usize,
    comparable: &[(String, usize, usize)],
) -> Vec<FieldDiff> {
    comparable
        .iter()
        .filter_map(|(name, src_idx, tgt_idx)| {
            let src_value = &source.rows()[src_row].cells()[*src_idx];
            let tgt_value = &target.rows()[tgt_row].cells()[*tgt_idx];
            if src_value == tgt_value {
                None
            } else {
                Some(FieldDiff {
                    column: name.clone(),
                    source: src_value.clone(),
                    target: tgt_value.clone(),
                })
            }
        })
        .collect()
}
