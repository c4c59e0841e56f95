//! JSON report format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::{Row, Value};
use crate::recon::FieldDiff;

use super::{consolidate, summarize, Issue, Renderer, SummaryRow, TestReport};

/// JSON renderer
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    summary: Vec<SummaryRow>,
    tests: Vec<JsonTest<'a>>,
    issues: Vec<JsonIssue>,
}

#[derive(Serialize)]
struct JsonTest<'a> {
    test: &'a str,
    diffs: Vec<JsonDiff<'a>>,
}

#[derive(Serialize)]
struct JsonDiff<'a> {
    key: String,
    changes: &'a [FieldDiff],
}

#[derive(Serialize)]
struct JsonIssue {
    test: String,
    issue: Issue,
    row: serde_json::Map<String, serde_json::Value>,
}

fn value_to_json(value: &Value) -> serde_json::Value {
    // Non-finite floats have no JSON number form and land as null
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

fn row_object(columns: &[String], row: &Row) -> serde_json::Map<String, serde_json::Value> {
    columns
        .iter()
        .zip(row.cells())
        .map(|(column, value)| (column.clone(), value_to_json(value)))
        .collect()
}

impl Renderer for JsonRenderer {
    fn render(&self, reports: &[TestReport], writer: &mut dyn Write) -> Result<()> {
        let tests: Vec<JsonTest> = reports
            .iter()
            .map(|report| JsonTest {
                test: &report.name,
                diffs: report
                    .result
                    .diffs
                    .iter()
                    .map(|record| JsonDiff {
                        key: record.key.to_string(),
                        changes: &record.fields,
                    })
                    .collect(),
            })
            .collect();

        let issues: Vec<JsonIssue> = consolidate(reports)
            .into_iter()
            .map(|issue| JsonIssue {
                test: issue.test.to_string(),
                issue: issue.issue,
                row: row_object(issue.columns, issue.row),
            })
            .collect();

        let document = JsonDocument {
            summary: summarize(reports),
            tests,
            issues,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &document)?;
        } else {
            serde_json::to_writer(&mut *writer, &document)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
