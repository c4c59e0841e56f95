//! Data providers: fully materialized tabular inputs

mod csv;
mod excel;
mod json;

use std::path::Path;

use anyhow::{bail, Result};

use crate::model::{Dataset, Value};

pub use self::csv::CsvProvider;
pub use self::excel::ExcelProvider;
pub use self::json::JsonProvider;

/// A source of one fully materialized dataset.
///
/// `load` either returns the complete table or fails; I/O errors surface
/// unchanged and are never retried downstream.
pub trait DataProvider: Send + Sync {
    fn load(&self) -> Result<Dataset>;
}

/// Pick a provider from a file extension
pub fn provider_for(path: &Path, sheet: Option<&str>) -> Result<Box<dyn DataProvider>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" | "txt" => Ok(Box::new(CsvProvider::new(path))),
        "tsv" => Ok(Box::new(CsvProvider::new(path).with_delimiter(b'\t'))),
        "json" => Ok(Box::new(JsonProvider::new(path))),
        "xlsx" | "xls" | "ods" | "xlsm" => {
            let mut provider = ExcelProvider::new(path);
            if let Some(name) = sheet {
                provider = provider.with_sheet(name);
            }
            Ok(Box::new(provider))
        }
        other => bail!("Unsupported input format: {:?}", other),
    }
}

/// Parse a raw text token into a typed scalar
pub(crate) fn parse_scalar(s: &str) -> Value {
    let trimmed = s.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed == "NA" {
        return Value::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("yes") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("no") {
        return Value::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float(f);
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Value::Date(date);
    }

    Value::Str(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar(""), Value::Null);
        assert_eq!(parse_scalar("null"), Value::Null);
        assert_eq!(parse_scalar("NA"), Value::Null);
        assert_eq!(parse_scalar("true"), Value::Bool(true));
        assert_eq!(parse_scalar("no"), Value::Bool(false));
        assert_eq!(parse_scalar("42"), Value::Int(42));
        assert_eq!(parse_scalar("3.14"), Value::Float(3.14));
        assert_eq!(
            parse_scalar("2025-01-02"),
            Value::Date(chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
        );
        assert_eq!(parse_scalar(" hello "), Value::from("hello"));
    }

    #[test]
    fn test_provider_for_unsupported_extension() {
        assert!(provider_for(Path::new("data.parquet"), None).is_err());
        assert!(provider_for(Path::new("data.csv"), None).is_ok());
        assert!(provider_for(Path::new("data.xlsx"), Some("Sheet2")).is_ok());
    }
}
