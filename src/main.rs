//! datarecon - dataset reconciliation CLI

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use datarecon::config::{ReconConfig, ReportFormat};
use datarecon::error::RuleError;
use datarecon::model::Value;
use datarecon::normalize::{rules, Normalizer};
use datarecon::provider::provider_for;
use datarecon::recon::ReconEngine;
use datarecon::report::render_to_stdout;
use datarecon::session::TestCase;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    Terminal,
    Json,
    Html,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(f: CliReportFormat) -> Self {
        match f {
            CliReportFormat::Terminal => ReportFormat::Terminal,
            CliReportFormat::Json => ReportFormat::Json,
            CliReportFormat::Html => ReportFormat::Html,
        }
    }
}

/// Reconcile two tabular datasets keyed by a primary key
#[derive(Parser, Debug)]
#[command(name = "datarecon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source dataset (csv, tsv, txt, json, xlsx, xls, ods)
    source: PathBuf,

    /// Target dataset
    target: PathBuf,

    /// Column(s) forming the match key, after normalization (comma-separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    key: Vec<String>,

    /// Column(s) to exclude from value comparison (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore_column: Vec<String>,

    /// Rename a column after generalization (repeatable)
    #[arg(long, value_name = "FROM=TO")]
    rename: Vec<String>,

    /// Apply a value rule to a column: upper, lower, whitespace, date,
    /// or numeric (repeatable)
    #[arg(long, value_name = "COL=RULE")]
    rule: Vec<String>,

    /// For Excel files: which sheet to load
    #[arg(long)]
    sheet: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliReportFormat,

    /// Label for this comparison in the report
    #[arg(long, default_value = "reconciliation")]
    name: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS // No findings
            } else {
                ExitCode::from(1) // Diffs, duplicates, or missing rows
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

type Rule = fn(&Value) -> Result<Value, RuleError>;

fn named_rule(name: &str) -> Result<Rule> {
    Ok(match name {
        "upper" => rules::upper_case,
        "lower" => rules::lower_case,
        "whitespace" => rules::collapse_whitespace,
        "date" => rules::canonical_date,
        "numeric" => rules::parse_numeric,
        other => bail!(
            "Unknown rule {:?} (expected upper|lower|whitespace|date|numeric)",
            other
        ),
    })
}

fn build_normalizer(cli: &Cli) -> Result<Normalizer> {
    let mut normalizer = Normalizer::new();

    for entry in &cli.rename {
        let Some((from, to)) = entry.split_once('=') else {
            bail!("Invalid --rename {:?}, expected FROM=TO", entry);
        };
        normalizer = normalizer.with_column_mapping(from, to);
    }

    for entry in &cli.rule {
        let Some((column, rule_name)) = entry.split_once('=') else {
            bail!("Invalid --rule {:?}, expected COL=RULE", entry);
        };
        normalizer = normalizer.with_rule(column, named_rule(rule_name)?);
    }

    Ok(normalizer)
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let source = provider_for(&cli.source, cli.sheet.as_deref())
        .with_context(|| format!("Unsupported source: {}", cli.source.display()))?;
    let target = provider_for(&cli.target, cli.sheet.as_deref())
        .with_context(|| format!("Unsupported target: {}", cli.target.display()))?;

    let normalizer = build_normalizer(&cli)?;

    let config = ReconConfig::new(cli.key.clone()).with_ignore_cols(cli.ignore_column.clone());
    let engine = ReconEngine::new(config)?;

    let test = TestCase::new(cli.name.clone(), source, target, engine)
        .with_normalizer(normalizer);
    let report = test.run()?;
    let clean = report.result.is_clean();

    render_to_stdout(&[report], cli.format.into())?;

    Ok(clean)
}
