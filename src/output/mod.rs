//! Report formatters
//!
//! Renders the comparison report as JSON (pretty-printed by default)
//! or as a console table. Reports go to stdout; logs stay on stderr.

use crate::benchmark::{ComparisonReport, Improvement, StatSummary, StrategyResult};
use crate::error::BenchError;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonPretty,
    Table,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "table" => Some(OutputFormat::Table),
            _ => None,
        }
    }
}

/// Report formatter
pub struct ReportFormatter {
    format: OutputFormat,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Build a formatter from a format name
    pub fn from_name(name: &str) -> Result<Self, BenchError> {
        OutputFormat::from_str(name)
            .map(Self::new)
            .ok_or_else(|| BenchError::Configuration(format!("unknown output format: {name}")))
    }

    /// Format a full comparison report
    pub fn format_comparison(&self, report: &ComparisonReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Table => format_comparison_table(report),
        }
    }

    /// Format a single strategy result
    pub fn format_strategy(&self, result: &StrategyResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Table => format_strategy_table(result),
        }
    }
}

fn stats_row(label: &str, stats: &StatSummary) -> String {
    format!(
        "│ {:29} │ {:>8.3} │ {:>8.3} │ {:>8.3} │ {:>8.3} │ {:>8.3} │\n",
        label, stats.min, stats.max, stats.mean, stats.median, stats.stddev
    )
}

fn strategy_rows(output: &mut String, result: &StrategyResult) {
    output.push_str(&format!(
        "│ {:29} │          │          │          │          │          │\n",
        result.strategy
    ));
    output.push_str(&stats_row("  connection", &result.connection));
    output.push_str(&stats_row("  query", &result.query_execution));
    output.push_str(&stats_row("  total", &result.total));
}

const TABLE_TOP: &str =
    "┌───────────────────────────────┬──────────┬──────────┬──────────┬──────────┬──────────┐\n";
const TABLE_HEAD: &str =
    "│ Phase                         │  min(ms) │  max(ms) │ mean(ms) │  med(ms) │  std(ms) │\n";
const TABLE_MID: &str =
    "├───────────────────────────────┼──────────┼──────────┼──────────┼──────────┼──────────┤\n";
const TABLE_BOTTOM: &str =
    "└───────────────────────────────┴──────────┴──────────┴──────────┴──────────┴──────────┘\n";

fn format_strategy_table(result: &StrategyResult) -> String {
    let mut output = String::new();
    output.push('\n');
    output.push_str(TABLE_TOP);
    output.push_str(TABLE_HEAD);
    output.push_str(TABLE_MID);
    strategy_rows(&mut output, result);
    output.push_str(TABLE_BOTTOM);
    output.push_str(&format!(
        "Query: {} ({} iterations)\n",
        result.query, result.iterations
    ));
    output
}

fn format_comparison_table(report: &ComparisonReport) -> String {
    let mut output = String::new();
    output.push('\n');
    output.push_str(TABLE_TOP);
    output.push_str(TABLE_HEAD);
    output.push_str(TABLE_MID);
    strategy_rows(&mut output, &report.new_connections);
    output.push_str(TABLE_MID);
    strategy_rows(&mut output, &report.connection_pool);
    output.push_str(TABLE_BOTTOM);

    output.push_str("Improvement (pool vs new connections):\n");
    output.push_str(&format!(
        "  connection time: mean {}  median {}\n",
        improvement_cell(&report.improvement.connection_time.mean),
        improvement_cell(&report.improvement.connection_time.median)
    ));
    output.push_str(&format!(
        "  total time:      mean {}  median {}\n",
        improvement_cell(&report.improvement.total_time.mean),
        improvement_cell(&report.improvement.total_time.median)
    ));
    output.push_str(&format!(
        "Query: {} ({} iterations)\n",
        report.new_connections.query, report.iterations
    ));
    output
}

fn improvement_cell(value: &Improvement) -> String {
    match value {
        Improvement::Percent(v) => format!("{v:+.1}%"),
        Improvement::Undefined(reason) => reason.as_str().to_string(),
    }
}
