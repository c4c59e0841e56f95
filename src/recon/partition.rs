//! Key indexing: rows grouped by composite key

use indexmap::IndexMap;

use crate::model::{Dataset, Key};

/// One side's rows grouped by key, in first-occurrence order
pub(crate) struct KeyIndex {
    groups: IndexMap<Key, Vec<usize>>,
}

impl KeyIndex {
    /// Index every row of `dataset` by its composite key
    pub fn build(dataset: &Dataset, key_indices: &[usize]) -> Self {
        let mut groups: IndexMap<Key, Vec<usize>> = IndexMap::new();
        for (idx, row) in dataset.rows().iter().enumerate() {
            groups
                .entry(Key::extract(row, key_indices))
                .or_default()
                .push(idx);
        }
        Self { groups }
    }

    /// Keys shared by two or more rows on this side
    pub fn duplicated_keys(&self) -> impl Iterator<Item = &Key> {
        self.groups
            .iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(key, _)| key)
    }

    /// Row indices of every row whose key is duplicated, in original order
    pub fn duplicate_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .groups
            .values()
            .filter(|rows| rows.len() > 1)
            .flatten()
            .copied()
            .collect();
        rows.sort_unstable();
        rows
    }

    /// (key, row index) for keys held by exactly one row, in first-occurrence order
    pub fn unique_entries(&self) -> impl Iterator<Item = (&Key, usize)> {
        self.groups
            .iter()
            .filter(|(_, rows)| rows.len() == 1)
            .map(|(key, rows)| (key, rows[0]))
    }

    /// The single row index for `key`, if it is unique on this side
    pub fn unique_row(&self, key: &Key) -> Option<usize> {
        self.groups
            .get(key)
            .and_then(|rows| (rows.len() == 1).then(|| rows[0]))
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.groups.contains_key(key)
    }
}
