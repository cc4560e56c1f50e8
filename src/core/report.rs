//! Console and JSON rendering of a [`Report`].

use crate::domain::model::{format_count, Report, ReportEntry, ReportRow};
use crate::utils::error::Result;

const RULE_WIDTH: usize = 83;

pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn render_header(model: &str) -> String {
    format!(
        "Target Model: {}\n{:<40} | {:>10} | {:>10} | {:<15}\n{}",
        model,
        "File Name",
        "Tokens",
        "Chars",
        "Note",
        rule()
    )
}

pub fn render_row(row: &ReportRow) -> String {
    format!(
        "{:<40} | {:>10} | {:>10} | {:<15}",
        row.file_name,
        row.token_display(),
        format_count(row.chars),
        row.note()
    )
}

pub fn render_entry(entry: &ReportEntry) -> String {
    match entry {
        ReportEntry::Counted(row) => render_row(row),
        ReportEntry::Failed { file_name, error } => {
            format!("Error reading {}: {}", file_name, error)
        }
    }
}

pub fn render_footer(report: &Report) -> String {
    format!(
        "{}\nTotal Files: {}\nTotal Tokens: {}",
        rule(),
        report.entries.len(),
        format_count(report.total_tokens())
    )
}

pub fn render_legend() -> &'static str {
    "[Legend]\n\
     \x20 (Empty) : Exact calculation with the tokenizer for the specified model.\n\
     \x20 * : Estimated value.\n\
     \x20 Fallback: Model not recognised. Counted with 'cl100k_base' (GPT-4 standard) as reference.\n\
     \x20 Approx  : No tokenizer available. Counted as characters / 3."
}

/// Header and rows; with `summary`, also totals and the legend.
pub fn render_table(report: &Report, summary: bool) -> String {
    let mut lines = vec![render_header(&report.model)];
    lines.extend(report.entries.iter().map(render_entry));

    if summary {
        lines.push(render_footer(report));
        lines.push(String::new());
        lines.push(render_legend().to_string());
    }

    lines.join("\n")
}

pub fn render_json(report: &Report) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonReport<'a> {
        #[serde(flatten)]
        report: &'a Report,
        total_files: usize,
        total_tokens: usize,
    }

    let json = serde_json::to_string_pretty(&JsonReport {
        report,
        total_files: report.entries.len(),
        total_tokens: report.total_tokens(),
    })?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CountMethod;

    fn sample_report() -> Report {
        let mut report = Report::new("gpt-4o");
        report.entries.push(ReportEntry::Counted(ReportRow {
            file_name: "backend.md".to_string(),
            tokens: 1500,
            chars: 4500,
            method: CountMethod::Approx,
        }));
        report.entries.push(ReportEntry::Failed {
            file_name: "broken.md".to_string(),
            error: "stream did not contain valid UTF-8".to_string(),
        });
        report
    }

    #[test]
    fn test_header_names_model() {
        let header = render_header("gpt-4");
        assert!(header.starts_with("Target Model: gpt-4\n"));
        assert!(header.ends_with(&"-".repeat(83)));
    }

    #[test]
    fn test_row_layout() {
        let row = ReportRow {
            file_name: "a.md".to_string(),
            tokens: 42,
            chars: 1234,
            method: CountMethod::Exact,
        };
        let line = render_row(&row);
        assert_eq!(
            line,
            format!("{:<40} | {:>10} | {:>10} | {:<15}", "a.md", "42", "1,234", "")
        );
    }

    #[test]
    fn test_table_with_summary() {
        let table = render_table(&sample_report(), true);

        assert!(table.contains("1,500*"));
        assert!(table.contains("Error reading broken.md"));
        assert!(table.contains("Total Files: 2"));
        assert!(table.contains("Total Tokens: 1,500"));
        assert!(table.contains("[Legend]"));
    }

    #[test]
    fn test_table_without_summary_has_no_footer() {
        let table = render_table(&sample_report(), false);
        assert!(!table.contains("Total Files"));
        assert!(!table.contains("[Legend]"));
    }

    #[test]
    fn test_json_carries_method_marker() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["total_tokens"], 1500);
        assert_eq!(value["entries"][0]["status"], "counted");
        assert_eq!(value["entries"][0]["method"], "approx");
        assert_eq!(value["entries"][1]["status"], "failed");
    }
}
