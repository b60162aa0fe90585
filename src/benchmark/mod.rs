//! Benchmark orchestration and reporting
//!
//! Runs one batch through each invocation strategy and compares the
//! measured execution times.

#![allow(dead_code)]

mod orchestrator;
mod report;

pub use orchestrator::{BenchError, BenchmarkOrchestrator, ProbeOutcome};
pub use report::BenchmarkReport;
