//! Output formatters for benchmark results
//!
//! Provides table, JSON, CSV and summary output formats.

use crate::benchmark::{BenchmarkReport, ProbeOutcome};
use crate::models::{BenchmarkState, ExecutionStatus, Strategy};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a finished benchmark run
    pub fn format_report(&self, report: &BenchmarkReport) -> String {
        match self.format {
            OutputFormat::Table => self.format_report_table(report),
            OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Csv => self.format_report_csv(report),
            OutputFormat::Summary => self.format_report_summary(report),
        }
    }

    fn status_cell(&self, status: &ExecutionStatus) -> String {
        let plain = format!("{} {:7}", status.symbol(), status.to_string());
        if !self.colorize {
            return plain;
        }
        match status {
            ExecutionStatus::Completed { .. } => format!("\x1b[32m{plain}\x1b[0m"),
            ExecutionStatus::Failed { .. } => format!("\x1b[31m{plain}\x1b[0m"),
            ExecutionStatus::Running => format!("\x1b[33m{plain}\x1b[0m"),
            ExecutionStatus::Idle => plain,
        }
    }

    fn format_report_table(&self, report: &BenchmarkReport) -> String {
        let mut output = String::new();

        // Header
        output.push_str("\n┌──────────────────────────────────────────────────────────────┐\n");
        output.push_str(&format!(
            "│  Strategy comparison: {:5} invocations x {:7}ms          │\n",
            report.invocations, report.delay_ms
        ));
        output.push_str("├────────────────────┬───────────┬──────────────┬──────────────┤\n");
        output.push_str("│ Strategy           │ Status    │ Time         │ vs default   │\n");
        output.push_str("├────────────────────┼───────────┼──────────────┼──────────────┤\n");

        for (strategy, status) in report.state.iter() {
            let time = status
                .execution_time_ms()
                .map(|t| format!("{t}ms"))
                .unwrap_or_else(|| "-".to_string());
            let speedup = report
                .speedup(Strategy::Default, strategy)
                .map(|s| format!("{s:.2}x"))
                .unwrap_or_else(|| "-".to_string());

            output.push_str(&format!(
                "│ {:18} │ {} │ {:>12} │ {:>12} │\n",
                strategy.name(),
                self.status_cell(status),
                time,
                speedup
            ));
        }

        output.push_str("└────────────────────┴───────────┴──────────────┴──────────────┘\n");

        for (strategy, reason) in report.failures() {
            output.push_str(&format!(" {} failed: {}\n", strategy.name(), reason));
        }

        output
    }

    fn format_report_csv(&self, report: &BenchmarkReport) -> String {
        let mut buf = Vec::new();
        if report.write_csv(&mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }

    fn format_report_summary(&self, report: &BenchmarkReport) -> String {
        let mut output = format!(
            "{} invocations x {}ms (serial {}ms)\n",
            report.invocations,
            report.delay_ms,
            report.serial_time_ms()
        );

        for (strategy, status) in report.state.iter() {
            match status.execution_time_ms() {
                Some(ms) => {
                    let note = match report.ran_concurrently(strategy) {
                        Some(false) => " (serialized)",
                        _ => "",
                    };
                    output.push_str(&format!(
                        "{} {}: {}ms{}\n",
                        status.symbol(),
                        strategy.name(),
                        ms,
                        note
                    ));
                }
                None => output.push_str(&format!(
                    "{} {}: {}\n",
                    status.symbol(),
                    strategy.name(),
                    status
                )),
            }
        }

        if let Some((strategy, ms)) = report.fastest() {
            output.push_str(&format!("Fastest: {} ({}ms)", strategy.name(), ms));
        }
        if let Some(speedup) = report.speedup(Strategy::Default, Strategy::Parallel) {
            output.push_str(&format!("\nParallel speedup over default: {speedup:.2}x"));
        }

        output
    }

    /// Format output of the test entry point
    pub fn format_probe(&self, probe: &ProbeOutcome) -> String {
        format!(
            "results: {}\nexecution time: {}",
            probe.results, probe.execution_time_ms
        )
    }

    /// One-line view of a state snapshot
    pub fn format_state(&self, state: &BenchmarkState) -> String {
        state
            .iter()
            .map(|(strategy, status)| match status.execution_time_ms() {
                Some(ms) => format!("{}={}({}ms)", strategy.id(), status, ms),
                None => format!("{}={}", strategy.id(), status),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BenchmarkReport {
        BenchmarkReport::new(
            3,
            500,
            BenchmarkState {
                http: ExecutionStatus::failed("connection refused"),
                parallel: ExecutionStatus::completed(503, r#"[{"n":1},{"n":2},{"n":3}]"#),
                default: ExecutionStatus::completed(1509, r#"[{"n":1},{"n":2},{"n":3}]"#),
            },
        )
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(
            OutputFormat::from_str("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::from_str("unknown"), None);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ResultFormatter::new(OutputFormat::Json).no_color();
        assert_eq!(formatter.format, OutputFormat::Json);
        assert!(!formatter.colorize);
    }

    #[test]
    fn test_format_probe() {
        let probe = ProbeOutcome {
            results: r#"[{"n":1},{"n":2},{"n":3}]"#.to_string(),
            execution_time_ms: 502,
        };
        let output = ResultFormatter::default().format_probe(&probe);
        assert_eq!(
            output,
            "results: [{\"n\":1},{\"n\":2},{\"n\":3}]\nexecution time: 502"
        );
    }

    #[test]
    fn test_format_table() {
        let output = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_report(&report());
        assert!(output.contains("Parallel actions"));
        assert!(output.contains("503ms"));
        assert!(output.contains("3.00x"));
        assert!(output.contains("HTTP endpoint failed: connection refused"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_format_json() {
        let output = ResultFormatter::new(OutputFormat::Json).format_report(&report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["invocations"], 3);
        assert_eq!(value["state"]["parallel"]["execution_time_ms"], 503);
        assert_eq!(value["state"]["http"]["state"], "failed");
    }

    #[test]
    fn test_format_csv() {
        let output = ResultFormatter::new(OutputFormat::Csv).format_report(&report());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("http,FAILED"));
        assert!(lines[1].ends_with("connection refused"));
    }

    #[test]
    fn test_format_summary() {
        let output = ResultFormatter::new(OutputFormat::Summary).format_report(&report());
        assert!(output.contains("Fastest: Parallel actions (503ms)"));
        assert!(output.contains("Parallel speedup over default: 3.00x"));
        assert!(output.contains("HTTP endpoint: FAILED"));
        assert!(output.contains("Default actions: 1509ms (serialized)"));
        assert!(output.contains("Parallel actions: 503ms\n"));
    }

    #[test]
    fn test_format_state() {
        let state = BenchmarkState {
            http: ExecutionStatus::completed(12, "[]"),
            parallel: ExecutionStatus::Running,
            default: ExecutionStatus::Idle,
        };
        assert_eq!(
            ResultFormatter::default().format_state(&state),
            "http=DONE(12ms) parallel=RUNNING default=IDLE"
        );
    }
}
