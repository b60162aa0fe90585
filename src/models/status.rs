//! Strategy and execution status models
//!
//! Defines the three invocation strategies and the per-strategy state
//! machine the orchestrator drives: Idle -> Running -> Completed | Failed.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Invocation strategy being benchmarked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Plain request/response against the HTTP echo endpoint
    Http,
    /// Two-phase dispatch/collect remote calls
    Parallel,
    /// Ordinary remote calls through the serializing channel
    Default,
}

impl Strategy {
    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Http => "HTTP endpoint",
            Strategy::Parallel => "Parallel actions",
            Strategy::Default => "Default actions",
        }
    }

    /// Short identifier used in CSV and logs
    pub fn id(&self) -> &'static str {
        match self {
            Strategy::Http => "http",
            Strategy::Parallel => "parallel",
            Strategy::Default => "default",
        }
    }

    /// All strategies, in the order a benchmark run executes them
    pub fn all() -> [Strategy; 3] {
        [Strategy::Http, Strategy::Parallel, Strategy::Default]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Status of one strategy within a benchmark run
///
/// Completed is the only state carrying a time and results, so an observer
/// can never see a settled status with a partial measurement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Idle,
    Running,
    Completed {
        execution_time_ms: u64,
        results: String,
    },
    Failed {
        reason: String,
    },
}

impl ExecutionStatus {
    pub fn completed(execution_time_ms: u64, results: impl Into<String>) -> Self {
        ExecutionStatus::Completed {
            execution_time_ms,
            results: results.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        ExecutionStatus::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ExecutionStatus::Running)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Completed { .. })
    }

    pub fn execution_time_ms(&self) -> Option<u64> {
        match self {
            ExecutionStatus::Completed {
                execution_time_ms, ..
            } => Some(*execution_time_ms),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&str> {
        match self {
            ExecutionStatus::Completed { results, .. } => Some(results),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ExecutionStatus::Idle => "○",
            ExecutionStatus::Running => "…",
            ExecutionStatus::Completed { .. } => "✓",
            ExecutionStatus::Failed { .. } => "✗",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Idle => write!(f, "IDLE"),
            ExecutionStatus::Running => write!(f, "RUNNING"),
            ExecutionStatus::Completed { .. } => write!(f, "DONE"),
            ExecutionStatus::Failed { .. } => write!(f, "FAILED"),
        }
    }
}

/// Status of every strategy, published to observers as one snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkState {
    pub http: ExecutionStatus,
    pub parallel: ExecutionStatus,
    pub default: ExecutionStatus,
}

impl BenchmarkState {
    pub fn status(&self, strategy: Strategy) -> &ExecutionStatus {
        match strategy {
            Strategy::Http => &self.http,
            Strategy::Parallel => &self.parallel,
            Strategy::Default => &self.default,
        }
    }

    pub fn status_mut(&mut self, strategy: Strategy) -> &mut ExecutionStatus {
        match strategy {
            Strategy::Http => &mut self.http,
            Strategy::Parallel => &mut self.parallel,
            Strategy::Default => &mut self.default,
        }
    }

    /// Iterate statuses in execution order
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, &ExecutionStatus)> {
        Strategy::all().into_iter().map(|s| (s, self.status(s)))
    }
}
