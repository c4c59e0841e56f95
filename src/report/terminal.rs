//! Terminal report with aligned tables and colored issue labels

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Ansi, Color, ColorChoice, ColorSpec, WriteColor};

use super::{consolidate, summarize, Issue, Renderer, TestReport};

/// Terminal renderer
pub struct TerminalRenderer {
    color_choice: ColorChoice,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            color_choice: ColorChoice::Auto,
        }
    }

    pub fn with_color_choice(color_choice: ColorChoice) -> Self {
        Self { color_choice }
    }

    fn write_header(&self, reports: &[TestReport], writer: &mut dyn Write) -> Result<()> {
        let rule = "━".repeat(64);
        writeln!(writer, "{}", rule)?;
        writeln!(writer, " datarecon: {} test(s)", reports.len())?;
        writeln!(writer, "{}", rule)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_summary(&self, reports: &[TestReport], writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record([
            "Test",
            "Source Count",
            "Target Count",
            "Diff Count",
            "Missing in Target",
            "Missing in Source",
            "Dupes in Source",
            "Dupes in Target",
        ]);
        for row in summarize(reports) {
            builder.push_record([
                row.test,
                row.source_count.to_string(),
                row.target_count.to_string(),
                row.diff_count.to_string(),
                row.missing_in_target.to_string(),
                row.missing_in_source.to_string(),
                row.duplicates_in_source.to_string(),
                row.duplicates_in_target.to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::sharp());

        writeln!(writer, "Summary:")?;
        writeln!(writer, "{}", table)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_diffs(&self, report: &TestReport, writer: &mut dyn Write) -> Result<()> {
        if report.result.diffs.is_empty() {
            return Ok(());
        }

        writeln!(writer, "Diffs: {}", report.name)?;
        for record in &report.result.diffs {
            writeln!(writer, "  {}:", record.key)?;
            for field in &record.fields {
                writeln!(
                    writer,
                    "    {}: {} → {}",
                    field.column, field.source, field.target
                )?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_issues(&self, reports: &[TestReport], writer: &mut dyn Write) -> Result<()> {
        let issues = consolidate(reports);
        if issues.is_empty() {
            return Ok(());
        }

        writeln!(writer, "Missing & Duplicates:")?;

        // Consecutive rows with the same test and label share one table
        let mut start = 0;
        while start < issues.len() {
            let head = &issues[start];
            let mut end = start + 1;
            while end < issues.len()
                && issues[end].test == head.test
                && issues[end].issue == head.issue
            {
                end += 1;
            }

            self.write_issue_heading(writer, head.test, head.issue)?;

            let mut builder = Builder::default();
            builder.push_record(head.columns.iter().map(String::as_str));
            for issue in &issues[start..end] {
                builder.push_record(issue.row.cells().iter().map(|cell| cell.to_string()));
            }
            let mut table = builder.build();
            table.with(Style::sharp());
            writeln!(writer, "{}", table)?;

            start = end;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_issue_heading(
        &self,
        writer: &mut dyn Write,
        test: &str,
        issue: Issue,
    ) -> Result<()> {
        write!(writer, "  ")?;
        if matches!(self.color_choice, ColorChoice::Never) {
            write!(writer, "{}", issue)?;
        } else {
            let mut ansi = Ansi::new(&mut *writer);
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(issue_color(issue))).set_bold(true);
            ansi.set_color(&spec)?;
            write!(ansi, "{}", issue)?;
            ansi.reset()?;
        }
        writeln!(writer, "  [{}]", test)?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, reports: &[TestReport], writer: &mut dyn Write) -> Result<()> {
        self.write_header(reports, writer)?;
        self.write_summary(reports, writer)?;
        for report in reports {
            self.write_diffs(report, writer)?;
        }
        self.write_issues(reports, writer)?;

        if reports.iter().all(|r| r.result.is_clean()) {
            writeln!(writer, "No findings.")?;
        }
        Ok(())
    }
}

fn issue_color(issue: Issue) -> Color {
    match issue {
        Issue::MissingInTarget | Issue::MissingInSource => Color::Red,
        Issue::DuplicateInSource | Issue::DuplicateInTarget => Color::Yellow,
    }
}
