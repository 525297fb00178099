//! Output formatting module for skyusage
//!
//! This module provides formatters for displaying usage data in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use skyusage_terminal::output::get_formatter;
//! use skyusage_core::UsageReport;
//!
//! let report = UsageReport::new();
//!
//! let formatter = get_formatter(false, false, false);
//! assert!(formatter.format_usage(&report).contains("No usage data"));
//!
//! let json_formatter = get_formatter(true, true, false);
//! assert_eq!(json_formatter.format_usage(&report), "{}");
//! ```

use colored::*;
use prettytable::{Table, format, row};
use serde_json::Value;
use skyusage_core::types::{DailyDate, ServiceLineId};
use skyusage_core::usage_types::{DailyTotals, ServiceLineUsageResult, UsageReport};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a reconciled usage report
    fn format_usage(&self, report: &UsageReport) -> String;

    /// Format raw API records (accounts, service lines, raw query responses)
    fn format_value(&self, value: &Value) -> String;
}

/// Table formatter for human-readable output
pub struct TableFormatter {
    /// Whether to colorize headers and usage levels
    pub colored_output: bool,
}

/// Consumption ratio above which the usage line is highlighted
const HIGH_USAGE_RATIO: f64 = 0.9;

impl TableFormatter {
    pub fn new(colored_output: bool) -> Self {
        Self { colored_output }
    }

    fn format_gb(amount: f64) -> String {
        format!("{amount:.2}")
    }

    fn format_window(start: Option<DailyDate>, end: Option<DailyDate>) -> String {
        let show = |d: Option<DailyDate>| d.map_or_else(|| "?".to_string(), |d| d.to_string());
        format!("{} to {}", show(start), show(end))
    }

    fn format_header(
        &self,
        service_line: &ServiceLineId,
        usage: &ServiceLineUsageResult,
    ) -> String {
        let title = format!("Service line {service_line}");
        let window = format!(
            "billing cycle {}",
            Self::format_window(usage.billing_cycle_start_date, usage.billing_cycle_end_date)
        );

        let ratio = if usage.total_cap_gb > 0.0 {
            Some(usage.total_consumed_gb / usage.total_cap_gb)
        } else {
            None
        };
        let mut consumption = format!(
            "Cap: {} GB  Consumed: {} GB",
            Self::format_gb(usage.total_cap_gb),
            Self::format_gb(usage.total_consumed_gb)
        );
        if let Some(ratio) = ratio {
            consumption.push_str(&format!(" ({:.1}%)", ratio * 100.0));
        }

        if !self.colored_output {
            return format!("{title}  ({window})\n{consumption}\n");
        }

        let consumption = match ratio {
            Some(r) if r >= 1.0 => consumption.red().to_string(),
            Some(r) if r >= HIGH_USAGE_RATIO => consumption.yellow().to_string(),
            _ => consumption.green().to_string(),
        };
        format!("{}  ({})\n{}\n", title.bold(), window.dimmed(), consumption)
    }

    fn format_daily_table(usage: &ServiceLineUsageResult) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Date",
            b -> "Priority GB",
            b -> "Standard GB",
            b -> "Total GB"
        ]);

        for day in &usage.daily_usage {
            table.add_row(row![
                day.date.to_string(),
                r -> Self::format_gb(day.priority_gb),
                r -> Self::format_gb(day.standard_gb),
                r -> Self::format_gb(day.total_gb)
            ]);
        }

        let totals = usage.daily_totals();
        table.add_row(Self::format_totals_row(&totals));
        table.to_string()
    }

    fn format_totals_row(totals: &DailyTotals) -> prettytable::Row {
        row![
            b -> format!("TOTAL ({} days)", totals.days),
            rb -> Self::format_gb(totals.priority_gb),
            rb -> Self::format_gb(totals.standard_gb),
            rb -> Self::format_gb(totals.total_gb)
        ]
    }
}

impl OutputFormatter for TableFormatter {
    fn format_usage(&self, report: &UsageReport) -> String {
        if report.is_empty() {
            return "No usage data found\n".to_string();
        }

        let mut output = String::new();
        for (service_line, usage) in report {
            output.push('\n');
            output.push_str(&self.format_header(service_line, usage));
            if usage.daily_usage.is_empty() {
                output.push_str("No daily usage recorded\n");
            } else {
                output.push_str(&Self::format_daily_table(usage));
            }
        }
        output
    }

    fn format_value(&self, value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Emit compact single-line JSON
    pub compact: bool,
}

impl JsonFormatter {
    fn render(&self, value: &Value) -> String {
        if self.compact {
            value.to_string()
        } else {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_usage(&self, report: &UsageReport) -> String {
        match serde_json::to_value(report) {
            Ok(value) => self.render(&value),
            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
        }
    }

    fn format_value(&self, value: &Value) -> String {
        self.render(value)
    }
}

/// Pick a formatter for the requested output mode
pub fn get_formatter(json: bool, compact: bool, colored_output: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter { compact })
    } else {
        Box::new(TableFormatter::new(colored_output))
    }
}
