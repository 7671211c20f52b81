//! Report generation.
//!
//! This module renders a computed demographic report as plain text,
//! Markdown or JSON.

use crate::cli::OutputFormat;
use crate::models::{DemographicReport, ReportMetadata};
use anyhow::Result;

/// Render the report in the requested format.
pub fn render_report(
    format: OutputFormat,
    report: &DemographicReport,
    metadata: &ReportMetadata,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_text_report(report)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report, metadata)),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Generate one `key: value` line per statistic, in report order.
pub fn generate_text_report(report: &DemographicReport) -> String {
    report.to_string()
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &DemographicReport, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# Demographic Report\n\n");
    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_race_section(report));
    output.push_str(&generate_statistics_section(report));

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.records));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_race_section(report: &DemographicReport) -> String {
    let mut section = String::new();

    section.push_str("## Records by Race\n\n");
    section.push_str("| Race | Count |\n");
    section.push_str("|:---|---:|\n");
    for (race, count) in report.race_count.iter() {
        section.push_str(&format!("| {} | {} |\n", race, count));
    }
    section.push('\n');

    section
}

fn generate_statistics_section(report: &DemographicReport) -> String {
    let mut section = String::new();

    section.push_str("## Statistics\n\n");
    section.push_str("| Statistic | Value |\n");
    section.push_str("|:---|---:|\n");

    // race_count already has its own table
    for (key, value) in report.entries().into_iter().skip(1) {
        section.push_str(&format!("| `{}` | {} |\n", key, value));
    }
    section.push('\n');

    section
}

/// Generate a JSON report with exactly the ten statistic keys.
pub fn generate_json_report(report: &DemographicReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValueCounts;
    use chrono::Utc;

    fn create_test_report() -> DemographicReport {
        DemographicReport {
            race_count: ValueCounts::from_values(["White", "Black", "White"]),
            average_age_men: 39.4,
            percentage_bachelors: 16.4,
            higher_education_rich: 46.5,
            lower_education_rich: 17.4,
            min_work_hours: 1,
            rich_percentage: 10.0,
            highest_earning_country: "Iran".to_string(),
            highest_earning_country_percentage: 41.9,
            top_in_occupation: "Prof-specialty".to_string(),
        }
    }

    fn create_test_metadata() -> ReportMetadata {
        ReportMetadata {
            source: "adult.data.csv".to_string(),
            analysis_date: Utc::now(),
            records: 3,
            duration_seconds: 0.25,
        }
    }

    #[test]
    fn test_generate_text_report() {
        let text = generate_text_report(&create_test_report());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "race_count: {White: 2, Black: 1}",
                "average_age_men: 39.4",
                "percentage_bachelors: 16.4",
                "higher_education_rich: 46.5",
                "lower_education_rich: 17.4",
                "min_work_hours: 1",
                "rich_percentage: 10.0",
                "highest_earning_country: Iran",
                "highest_earning_country_percentage: 41.9",
                "top_IN_occupation: Prof-specialty",
            ]
        );
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report(), &create_test_metadata());

        assert!(markdown.contains("# Demographic Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("`adult.data.csv`"));
        assert!(markdown.contains("| White | 2 |"));
        assert!(markdown.contains("| `rich_percentage` | 10.0 |"));
        assert!(!markdown.contains("| `race_count` |"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 10);
        assert_eq!(value["race_count"]["White"], 2);
        assert_eq!(value["min_work_hours"], 1);
        assert_eq!(value["top_IN_occupation"], "Prof-specialty");
        assert_eq!(value["highest_earning_country_percentage"], 41.9);
    }

    #[test]
    fn test_render_report_dispatch() {
        let report = create_test_report();
        let metadata = create_test_metadata();

        let text = render_report(OutputFormat::Text, &report, &metadata).unwrap();
        assert!(text.starts_with("race_count:"));
        assert_eq!(text, report.to_string());

        let json = render_report(OutputFormat::Json, &report, &metadata).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }
}
