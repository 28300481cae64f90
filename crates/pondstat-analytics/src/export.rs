//! CSV export of a compiled report.
//!
//! Only the executive summary and the recommendations are flattened; the
//! nested analysis sections are available through the JSON rendering.

use crate::report::Report;
use pondstat_common::{format_optional, format_timestamp};
use std::fmt::Write as _;

/// Minimal CSV writer with quote-on-demand escaping.
#[derive(Debug, Default)]
pub struct CsvWriter {
    buffer: String,
}

impl CsvWriter {
    /// Empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row.
    pub fn write_row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            self.buffer.push_str(&escape_field(field.as_ref()));
        }
        self.buffer.push('\n');
    }

    /// Append an empty separator row.
    pub fn blank_row(&mut self) {
        self.buffer.push('\n');
    }

    /// Written text.
    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Quote a field when it contains a comma, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        let mut quoted = String::with_capacity(field.len() + 2);
        quoted.push('"');
        for c in field.chars() {
            if c == '"' {
                quoted.push('"');
            }
            quoted.push(c);
        }
        quoted.push('"');
        quoted
    } else {
        field.to_string()
    }
}

fn fixed(value: f64, places: usize) -> String {
    let mut out = String::new();
    let _ = write!(out, "{value:.places$}");
    out
}

/// Flatten the executive summary and recommendations into CSV text.
pub fn report_to_csv(report: &Report, decimal_places: u32) -> String {
    let places = usize::try_from(decimal_places).unwrap_or(2);
    let summary = &report.executive_summary;
    let mut csv = CsvWriter::new();

    csv.write_row(["Farm Analytics Report"]);
    csv.write_row(["Season", report.metadata.season.name.as_str()]);
    csv.write_row([
        "Generated At".to_string(),
        format_timestamp(report.metadata.generated_at),
    ]);
    csv.blank_row();

    csv.write_row(["Executive Summary"]);
    let rows = [
        ("Total Ponds", summary.total_ponds.to_string()),
        ("Active Ponds", summary.active_ponds.to_string()),
        ("Total Feed Consumed", fixed(summary.total_feed_consumed, places)),
        ("Average FCR", format_optional(summary.average_fcr, places)),
        ("Average Shrimp Weight", format_optional(summary.avg_shrimp_weight, places)),
        ("Pond Utilization (%)", format_optional(summary.pond_utilization, places)),
        ("Survival Rate (%)", format_optional(summary.survival_rate, places)),
        ("Total Harvest Weight", fixed(summary.total_harvest_weight, places)),
    ];
    for (label, value) in rows {
        csv.write_row([label.to_string(), value]);
    }
    csv.blank_row();

    csv.write_row(["Recommendations"]);
    csv.write_row([
        "Category",
        "Priority",
        "Issue",
        "Recommendation",
        "Current Value",
        "Target Range",
    ]);
    for rec in &report.recommendations {
        csv.write_row([
            rec.category.clone(),
            rec.priority.to_string(),
            rec.issue.clone(),
            rec.recommendation.clone(),
            fixed(rec.current_value, places),
            rec.target_range.clone(),
        ]);
    }

    csv.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_writer_rows() {
        let mut csv = CsvWriter::new();
        csv.write_row(["Pond A, north", "7.80"]);
        csv.blank_row();
        csv.write_row(["x"]);

        assert_eq!(csv.finish(), "\"Pond A, north\",7.80\n\nx\n");
    }
}
