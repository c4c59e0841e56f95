//! Excel file provider (xlsx, xls, ods)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::{Dataset, Value};

use super::{parse_scalar, DataProvider};

/// Provider for Excel workbooks; the first row of the sheet is the schema
pub struct ExcelProvider {
    path: PathBuf,
    sheet: Option<String>,
}

impl ExcelProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    /// Load a named sheet instead of the first one
    pub fn with_sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet = Some(name.into());
        self
    }
}

impl DataProvider for ExcelProvider {
    fn load(&self) -> Result<Dataset> {
        load_workbook(&self.path, self.sheet.as_deref())
    }
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => {
            let sheets = workbook.sheet_names();
            if sheets.is_empty() {
                bail!("No sheets found in workbook");
            }
            sheets[0].clone()
        }
    };

    let range: Range<Data> = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    parse_range(range)
}

fn parse_range(range: Range<Data>) -> Result<Dataset> {
    let header_row = range.rows().next().context("Empty sheet")?;
    let columns: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_to_string(cell);
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name
            }
        })
        .collect();

    let mut dataset = Dataset::new(columns);

    for row in range.rows().skip(1) {
        let mut cells: Vec<Value> = row.iter().map(convert_cell).collect();

        // Pad short rows with nulls, like the CSV reader
        cells.resize(dataset.column_count(), Value::Null);

        dataset.push_row(cells)?;
    }

    Ok(dataset)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        // Text cells go through the same inference as CSV so mixed-format
        // comparisons see one typing scheme
        Data::String(s) => parse_scalar(s),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Value::Int(*f as i64)
            } else {
                Value::Float(*f)
            }
        }
        Data::Int(i) => Value::Int(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => datetime_value(format!("{}", dt)),
        Data::DateTimeIso(s) => datetime_value(s.clone()),
        Data::DurationIso(s) => Value::Str(s.clone()),
        Data::Error(e) => Value::Str(format!("#{:?}", e)),
    }
}

/// Excel date cells arrive as datetimes; midnight timestamps load as dates
fn datetime_value(s: String) -> Value {
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(&s, format) {
            return if ts.time() == NaiveTime::MIN {
                Value::Date(ts.date())
            } else {
                Value::Str(ts.to_string())
            };
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Value::Date(date);
    }
    Value::Str(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(ExcelProvider::new("/no/such/file.xlsx").load().is_err());
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Empty), Value::Null);
        assert_eq!(convert_cell(&Data::Float(3.0)), Value::Int(3));
        assert_eq!(convert_cell(&Data::Float(3.5)), Value::Float(3.5));
        assert_eq!(convert_cell(&Data::Bool(true)), Value::Bool(true));
        assert_eq!(convert_cell(&Data::String("  ".to_string())), Value::Null);
        assert_eq!(
            convert_cell(&Data::String("42".to_string())),
            Value::Int(42)
        );
    }

    #[test]
    fn test_datetime_value() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            datetime_value("2025-01-02 00:00:00".to_string()),
            Value::Date(date)
        );
        assert_eq!(datetime_value("2025-01-02".to_string()), Value::Date(date));
        assert_eq!(
            datetime_value("2025-01-02 10:30:00".to_string()),
            Value::Str("2025-01-02 10:30:00".to_string())
        );
        assert_eq!(
            datetime_value("not a date".to_string()),
            Value::Str("not a date".to_string())
        );
    }
}
