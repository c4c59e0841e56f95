//! Reporting over reconciliation results
//!
//! Consumes named `(test, ReconResult)` pairs and produces three views: one
//! summary record per test, a per-test diff detail, and a consolidated issue
//! view unioning missing and duplicate rows across tests. Renderers write
//! any of the views to a writer; a factory maps a [`ReportFormat`] to its
//! renderer.

mod html;
mod json;
mod terminal;

use std::io::{IsTerminal, Write};

use anyhow::Result;
use serde::Serialize;
use termcolor::ColorChoice;

use crate::config::ReportFormat;
use crate::model::{Dataset, Row};
use crate::recon::ReconResult;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use terminal::TerminalRenderer;

/// One named reconciliation outcome
#[derive(Debug)]
pub struct TestReport {
    pub name: String,
    pub result: ReconResult,
}

impl TestReport {
    pub fn new(name: impl Into<String>, result: ReconResult) -> Self {
        Self {
            name: name.into(),
            result,
        }
    }
}

/// One summary record per test: the three counts plus the sizes of the four
/// row collections
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub test: String,
    pub source_count: usize,
    pub target_count: usize,
    pub diff_count: usize,
    pub missing_in_target: usize,
    pub missing_in_source: usize,
    pub duplicates_in_source: usize,
    pub duplicates_in_target: usize,
}

/// Build the summary view, one record per test in report order
pub fn summarize(reports: &[TestReport]) -> Vec<SummaryRow> {
    reports
        .iter()
        .map(|report| {
            let result = &report.result;
            SummaryRow {
                test: report.name.clone(),
                source_count: result.source_count,
                target_count: result.target_count,
                diff_count: result.diff_count,
                missing_in_target: result.missing_in_target.row_count(),
                missing_in_source: result.missing_in_source.row_count(),
                duplicates_in_source: result.duplicates_in_source.row_count(),
                duplicates_in_target: result.duplicates_in_target.row_count(),
            }
        })
        .collect()
}

/// Issue label attached to a consolidated row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Issue {
    MissingInTarget,
    MissingInSource,
    DuplicateInSource,
    DuplicateInTarget,
}

impl Issue {
    pub fn label(self) -> &'static str {
        match self {
            Issue::MissingInTarget => "missing-in-target",
            Issue::MissingInSource => "missing-in-source",
            Issue::DuplicateInSource => "duplicate-in-source",
            Issue::DuplicateInTarget => "duplicate-in-target",
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the consolidated issue view, tagged with its originating test
/// and issue label. Rows keep the schema of the side they came from.
#[derive(Debug)]
pub struct IssueRow<'a> {
    pub test: &'a str,
    pub issue: Issue,
    pub columns: &'a [String],
    pub row: &'a Row,
}

/// Union the missing and duplicate rows of every test, in report order.
/// Within a test the collation order is missing-in-target, missing-in-source,
/// duplicate-in-source, duplicate-in-target.
pub fn consolidate(reports: &[TestReport]) -> Vec<IssueRow<'_>> {
    let mut issues = Vec::new();
    for report in reports {
        let sections: [(&Dataset, Issue); 4] = [
            (&report.result.missing_in_target, Issue::MissingInTarget),
            (&report.result.missing_in_source, Issue::MissingInSource),
            (&report.result.duplicates_in_source, Issue::DuplicateInSource),
            (&report.result.duplicates_in_target, Issue::DuplicateInTarget),
        ];
        for (dataset, issue) in sections {
            for row in dataset.rows() {
                issues.push(IssueRow {
                    test: &report.name,
                    issue,
                    columns: dataset.columns(),
                    row,
                });
            }
        }
    }
    issues
}

/// Trait for report renderers
pub trait Renderer {
    /// Render all three views of `reports` to a writer
    fn render(&self, reports: &[TestReport], writer: &mut dyn Write) -> Result<()>;
}

/// Create a renderer for the given format
pub fn renderer_for(format: ReportFormat) -> Box<dyn Renderer> {
    match format {
        ReportFormat::Terminal => Box::new(TerminalRenderer::new()),
        ReportFormat::Json => Box::new(JsonRenderer::new()),
        ReportFormat::Html => Box::new(HtmlRenderer::new()),
    }
}

/// Render reports to stdout, coloring only when stdout is a terminal
pub fn render_to_stdout(reports: &[TestReport], format: ReportFormat) -> Result<()> {
    let renderer: Box<dyn Renderer> = match format {
        ReportFormat::Terminal if !std::io::stdout().is_terminal() => {
            Box::new(TerminalRenderer::with_color_choice(ColorChoice::Never))
        }
        other => renderer_for(other),
    };
    renderer.render(reports, &mut std::io::stdout())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::ReconConfig;
    use crate::model::{Dataset, Value};
    use crate::recon::ReconEngine;

    use super::TestReport;

    /// One test with a cell diff, a duplicate pair in source, and a missing
    /// row on each side
    pub fn mixed_report(name: &str) -> TestReport {
        let columns = vec!["id".to_string(), "name".to_string(), "age".to_string()];
        let source = Dataset::from_rows(
            columns.clone(),
            vec![
                vec![Value::Int(1), Value::from("Alice"), Value::Int(25)],
                vec![Value::Int(2), Value::from("Bob"), Value::Int(30)],
                vec![Value::Int(2), Value::from("Bobby"), Value::Int(31)],
                vec![Value::Int(3), Value::from("Cara"), Value::Int(40)],
            ],
        )
        .unwrap();
        let target = Dataset::from_rows(
            columns,
            vec![
                vec![Value::Int(1), Value::from("Alice"), Value::Int(26)],
                vec![Value::Int(4), Value::from("Dan"), Value::Int(50)],
            ],
        )
        .unwrap();

        let engine = ReconEngine::new(ReconConfig::new(vec!["id".to_string()])).unwrap();
        TestReport::new(name, engine.compare(&source, &target).unwrap())
    }
}
