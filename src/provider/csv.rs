//! CSV file provider

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{Dataset, Value};

use super::{parse_scalar, DataProvider};

/// Provider for CSV files; the header row is the schema
pub struct CsvProvider {
    path: PathBuf,
    delimiter: u8,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Use a non-comma delimiter (e.g. `b'\t'` for TSV)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl DataProvider for CsvProvider {
    fn load(&self) -> Result<Dataset> {
        load_csv(&self.path, self.delimiter)
    }
}

fn load_csv(path: &Path, delimiter: u8) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let columns: Vec<String> = headers.iter().map(|name| name.to_string()).collect();

    let mut dataset = Dataset::new(columns);

    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result
            .with_context(|| format!("Failed to read CSV row {}", line_num + 2))?; // +2 for 1-indexing and header

        let mut cells: Vec<Value> = record.iter().map(parse_scalar).collect();

        // Pad short rows with nulls, drop trailing overflow
        cells.resize(dataset.column_count(), Value::Null);

        dataset.push_row(cells)?;
    }

    Ok(dataset)
}
