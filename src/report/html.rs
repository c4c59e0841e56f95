//! HTML report output

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use super::{consolidate, summarize, Renderer, TestReport};

/// Self-contained single-page HTML renderer
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct HtmlTest {
    test: String,
    diffs: Vec<HtmlDiff>,
}

#[derive(Serialize)]
struct HtmlDiff {
    key: String,
    changes: Vec<HtmlChange>,
}

#[derive(Serialize)]
struct HtmlChange {
    column: String,
    source: String,
    target: String,
}

#[derive(Serialize)]
struct HtmlIssue {
    test: String,
    label: String,
    row: String,
}

impl Renderer for HtmlRenderer {
    fn render(&self, reports: &[TestReport], writer: &mut dyn Write) -> Result<()> {
        let tests: Vec<HtmlTest> = reports
            .iter()
            .map(|report| HtmlTest {
                test: report.name.clone(),
                diffs: report
                    .result
                    .diffs
                    .iter()
                    .map(|record| HtmlDiff {
                        key: record.key.to_string(),
                        changes: record
                            .fields
                            .iter()
                            .map(|field| HtmlChange {
                                column: field.column.clone(),
                                source: field.source.to_string(),
                                target: field.target.to_string(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let issues: Vec<HtmlIssue> = consolidate(reports)
            .into_iter()
            .map(|issue| HtmlIssue {
                test: issue.test.to_string(),
                label: issue.issue.label().to_string(),
                row: issue
                    .columns
                    .iter()
                    .zip(issue.row.cells())
                    .map(|(column, value)| format!("{}={}", column, value))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        let clean = reports.iter().all(|r| r.result.is_clean());

        let mut context = Context::new();
        context.insert("summary", &summarize(reports));
        context.insert("tests", &tests);
        context.insert("issues", &issues);
        context.insert("clean", &clean);

        let page = Tera::one_off(TEMPLATE, &context, true)?;
        writer.write_all(page.as_bytes())?;
        Ok(())
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>datarecon report</title>
  <style>
    :root {
      --bg: #1a1b26;
      --fg: #a9b1d6;
      --accent: #7aa2f7;
      --green: #9ece6a;
      --red: #f7768e;
      --yellow: #e0af68;
      --border: #414868;
    }
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: 'JetBrains Mono', 'Fira Code', monospace;
      background: var(--bg);
      color: var(--fg);
      padding: 2rem;
      line-height: 1.6;
    }
    .header {
      border-bottom: 2px solid var(--border);
      padding-bottom: 1rem;
      margin-bottom: 2rem;
    }
    .header h1 { color: var(--accent); font-size: 2rem; font-weight: 600; }
    .section { margin-bottom: 2rem; }
    .section h2 {
      color: var(--accent);
      font-size: 1.25rem;
      margin-bottom: 1rem;
      padding-bottom: 0.5rem;
      border-bottom: 1px solid var(--border);
    }
    table { width: 100%; border-collapse: collapse; margin-bottom: 1rem; }
    th, td { text-align: left; padding: 0.75rem; border: 1px solid var(--border); }
    th { background: rgba(255,255,255,0.05); font-weight: 600; }
    .diff {
      margin-bottom: 1.5rem;
      padding: 1rem;
      background: rgba(255,255,255,0.02);
      border-radius: 8px;
    }
    .diff h3 { color: var(--yellow); margin-bottom: 0.5rem; }
    .changes td.source { background: rgba(247, 118, 142, 0.15); color: var(--red); }
    .changes td.target { background: rgba(158, 206, 106, 0.15); color: var(--green); }
    td.issue { font-weight: 600; }
    td.missing-in-target, td.missing-in-source { color: var(--red); }
    td.duplicate-in-source, td.duplicate-in-target { color: var(--yellow); }
    .clean { color: var(--green); font-size: 1.1rem; }
  </style>
</head>
<body>
  <div class="header">
    <h1>datarecon</h1>
  </div>

  <div class="section">
    <h2>Summary</h2>
    <table>
      <tr>
        <th>Test</th>
        <th>Source Count</th>
        <th>Target Count</th>
        <th>Diff Count</th>
        <th>Missing in Target</th>
        <th>Missing in Source</th>
        <th>Dupes in Source</th>
        <th>Dupes in Target</th>
      </tr>
      {% for row in summary %}
      <tr>
        <td>{{ row.test }}</td>
        <td>{{ row.source_count }}</td>
        <td>{{ row.target_count }}</td>
        <td>{{ row.diff_count }}</td>
        <td>{{ row.missing_in_target }}</td>
        <td>{{ row.missing_in_source }}</td>
        <td>{{ row.duplicates_in_source }}</td>
        <td>{{ row.duplicates_in_target }}</td>
      </tr>
      {% endfor %}
    </table>
  </div>

  {% for test in tests %}{% if test.diffs %}
  <div class="section">
    <h2>Diffs: {{ test.test }}</h2>
    {% for diff in test.diffs %}
    <div class="diff">
      <h3>{{ diff.key }}</h3>
      <table class="changes">
        <tr><th>Column</th><th>Source</th><th>Target</th></tr>
        {% for change in diff.changes %}
        <tr>
          <td>{{ change.column }}</td>
          <td class="source">{{ change.source }}</td>
          <td class="target">{{ change.target }}</td>
        </tr>
        {% endfor %}
      </table>
    </div>
    {% endfor %}
  </div>
  {% endif %}{% endfor %}

  {% if issues %}
  <div class="section">
    <h2>Missing and Duplicates</h2>
    <table>
      <tr><th>Test</th><th>Issue</th><th>Row</th></tr>
      {% for issue in issues %}
      <tr>
        <td>{{ issue.test }}</td>
        <td class="issue {{ issue.label }}">{{ issue.label }}</td>
        <td>{{ issue.row }}</td>
      </tr>
      {% endfor %}
    </table>
  </div>
  {% endif %}

  {% if clean %}
  <p class="clean">No findings.</p>
  {% endif %}
</body>
</html>
"#;
