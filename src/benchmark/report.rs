//! Benchmark report
//!
//! Final state of a run plus comparisons between strategies.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::{BenchmarkState, ExecutionStatus, Strategy};

/// File format for saved reports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
    Csv,
}

impl ReportFormat {
    /// Pick a format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ReportFormat::Yaml,
            Some("csv") => ReportFormat::Csv,
            _ => ReportFormat::Json,
        }
    }
}

/// Outcome of a complete benchmark run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub invocations: u32,
    pub delay_ms: u64,
    pub generated_at: DateTime<Utc>,
    pub state: BenchmarkState,
}

impl BenchmarkReport {
    pub fn new(invocations: u32, delay_ms: u64, state: BenchmarkState) -> Self {
        Self {
            invocations,
            delay_ms,
            generated_at: Utc::now(),
            state,
        }
    }

    /// Time a fully serialized batch would take
    pub fn serial_time_ms(&self) -> u64 {
        u64::from(self.invocations).saturating_mul(self.delay_ms)
    }

    /// Completed strategies sorted by execution time (fastest first)
    pub fn by_time(&self) -> Vec<(Strategy, u64)> {
        let mut timed: Vec<_> = self
            .state
            .iter()
            .filter_map(|(s, status)| status.execution_time_ms().map(|t| (s, t)))
            .collect();
        timed.sort_by_key(|(_, t)| *t);
        timed
    }

    pub fn fastest(&self) -> Option<(Strategy, u64)> {
        self.by_time().into_iter().next()
    }

    /// How many times faster `candidate` ran than `baseline`
    pub fn speedup(&self, baseline: Strategy, candidate: Strategy) -> Option<f64> {
        let base = self.state.status(baseline).execution_time_ms()?;
        let cand = self.state.status(candidate).execution_time_ms()?;
        Some(base as f64 / cand.max(1) as f64)
    }

    /// Whether a strategy finished faster than a serialized batch would
    pub fn ran_concurrently(&self, strategy: Strategy) -> Option<bool> {
        let elapsed = self.state.status(strategy).execution_time_ms()?;
        Some(self.invocations <= 1 || elapsed < self.serial_time_ms())
    }

    pub fn all_succeeded(&self) -> bool {
        self.state.iter().all(|(_, s)| s.is_success())
    }

    pub fn failures(&self) -> Vec<(Strategy, &str)> {
        self.state
            .iter()
            .filter_map(|(s, status)| match status {
                ExecutionStatus::Failed { reason } => Some((s, reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Save report, format chosen by extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match ReportFormat::from_path(path) {
            ReportFormat::Json => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, self)
                    .context("Failed to write JSON report")?;
                writer.flush()?;
            }
            ReportFormat::Yaml => {
                let content = serde_yaml::to_string(self).context("Failed to serialize report")?;
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            ReportFormat::Csv => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                self.write_csv(BufWriter::new(file))?;
            }
        }
        Ok(())
    }

    /// One CSV row per strategy, with header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record([
            "strategy",
            "status",
            "invocations",
            "delay_ms",
            "execution_time_ms",
            "results",
            "error",
        ])?;
        for (strategy, status) in self.state.iter() {
            let error = match status {
                ExecutionStatus::Failed { reason } => reason.clone(),
                _ => String::new(),
            };
            writer.write_record([
                strategy.id().to_string(),
                status.to_string(),
                self.invocations.to_string(),
                self.delay_ms.to_string(),
                status
                    .execution_time_ms()
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                status.results().unwrap_or_default().to_string(),
                error,
            ])?;
        }
        writer.flush().context("Failed to write CSV report")?;
        Ok(())
    }
}
