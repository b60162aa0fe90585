//! Timer utilities
//!
//! Wall-clock measurement for strategies and whole runs.

#![allow(dead_code)]

use std::time::{Duration, Instant};

/// Measures one strategy's batch from dispatch to fan-in
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: &'static str,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            label,
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and return elapsed whole milliseconds
    pub fn stop_ms(self) -> u64 {
        let elapsed = self.elapsed();
        tracing::debug!("{}: {}ms", self.label, elapsed.as_millis());
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Stopwatch recording one lap per strategy of a run
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    last: Instant,
    laps: Vec<(&'static str, Duration)>,
}

impl Stopwatch {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            laps: Vec::new(),
        }
    }

    /// Close the current lap
    pub fn lap(&mut self, label: &'static str) {
        let now = Instant::now();
        self.laps.push((label, now - self.last));
        self.last = now;
    }

    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn laps(&self) -> &[(&'static str, Duration)] {
        &self.laps
    }

    /// Format laps as `label=Nms` pairs followed by the total
    pub fn format(&self) -> String {
        let mut parts: Vec<String> = self
            .laps
            .iter()
            .map(|(label, d)| format!("{}={}ms", label, d.as_millis()))
            .collect();
        parts.push(format!("total={}ms", self.total().as_millis()));
        parts.join(" ")
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
