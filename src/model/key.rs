//! Composite match keys

use serde::Serialize;

use super::dataset::Row;
use super::value::Value;

/// Ordered tuple of values drawn from a row's key columns.
///
/// Keys compare by typed value, so `Int(1)` and `Str("1")` are distinct
/// keys even though both render as `1`. A null component matches null.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Key(Vec<Value>);

impl Key {
    /// Extract a key from a row; `indices` must be valid for the row
    pub fn extract(row: &Row, indices: &[usize]) -> Self {
        Key(indices
            .iter()
            .filter_map(|&i| row.get(i))
            .cloned()
            .collect())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("|");
        write!(f, "{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_and_display() {
        let row = Row::new(vec![Value::Int(1), Value::from("us"), Value::Float(9.5)]);
        let key = Key::extract(&row, &[0, 1]);
        assert_eq!(key.values(), &[Value::Int(1), Value::from("us")]);
        assert_eq!(key.to_string(), "1|us");
    }

    #[test]
    fn test_null_components_match() {
        let a = Row::new(vec![Value::Null, Value::Int(7)]);
        let b = Row::new(vec![Value::Null, Value::Int(7)]);
        assert_eq!(Key::extract(&a, &[0, 1]), Key::extract(&b, &[0, 1]));
    }

    #[test]
    fn test_typed_components_stay_distinct() {
        let a = Row::new(vec![Value::Int(1)]);
        let b = Row::new(vec![Value::from("1")]);
        assert_ne!(Key::extract(&a, &[0]), Key::extract(&b, &[0]));
    }
}
