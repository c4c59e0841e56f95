//! JSON file provider

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;

use crate::model::{Dataset, Value};

use super::DataProvider;

/// Provider for JSON files holding an array of objects.
///
/// Columns are the union of member names across all objects, in first-seen
/// order; objects missing a member get null there. A single top-level object
/// loads as a one-row table.
pub struct JsonProvider {
    path: PathBuf,
}

impl JsonProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataProvider for JsonProvider {
    fn load(&self) -> Result<Dataset> {
        load_json(&self.path)
    }
}

fn load_json(path: &Path) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let parsed: serde_json::Value =
        serde_json::from_reader(reader).context("Failed to parse JSON file")?;

    let array = match parsed {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(_) => vec![parsed],
        _ => bail!("JSON input must be an array of objects or a single object"),
    };
    if array.is_empty() {
        bail!("JSON array is empty");
    }

    let mut column_names: IndexSet<String> = IndexSet::new();
    for item in &array {
        match item {
            serde_json::Value::Object(obj) => {
                for key in obj.keys() {
                    column_names.insert(key.clone());
                }
            }
            other => bail!("JSON array items must be objects, got: {}", other),
        }
    }

    let mut dataset = Dataset::new(column_names.iter().cloned().collect());

    for item in &array {
        if let serde_json::Value::Object(obj) = item {
            let cells: Vec<Value> = column_names
                .iter()
                .map(|key| json_to_value(obj.get(key)))
                .collect();
            dataset.push_row(cells)?;
        }
    }

    Ok(dataset)
}

fn json_to_value(value: Option<&serde_json::Value>) -> Value {
    match value {
        None | Some(serde_json::Value::Null) => Value::Null,
        Some(serde_json::Value::Bool(b)) => Value::Bool(*b),
        Some(serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Str(n.to_string())
            }
        }
        Some(serde_json::Value::String(s)) => {
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Value::Date(date)
            } else {
                Value::Str(s.clone())
            }
        }
        // Nested structures flatten to their JSON text
        Some(other) => Value::Str(other.to_string()),
    }
}
