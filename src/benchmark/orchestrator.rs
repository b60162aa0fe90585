//! Benchmark orchestration
//!
//! Runs the same batch through every strategy, one strategy at a time, and
//! publishes each status transition to subscribers.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::report::BenchmarkReport;
use crate::config::AppConfig;
use crate::http::HttpClient;
use crate::invoker::{DefaultInvoker, HttpInvoker, InvokeError, Invoker, ParallelInvoker};
use crate::models::{Batch, BenchmarkState, ExecutionStatus, Strategy};
use crate::rpc::{ActionChannel, EchoProcedure, ParallelClient, Procedure};
use crate::utils::{Stopwatch, Timer};

/// Orchestration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    #[error("Invocation count must be at least 1, got {0}")]
    InvalidInvocationCount(u32),

    #[error("A benchmark run is already in progress")]
    AlreadyRunning,

    #[error("No invoker registered for {0}")]
    MissingStrategy(Strategy),

    #[error("Probe failed: {0}")]
    ProbeFailed(String),
}

/// Raw outcome of the test entry point
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub results: String,
    pub execution_time_ms: u64,
}

/// Drives batches through the registered invokers
pub struct BenchmarkOrchestrator {
    invokers: Vec<Arc<dyn Invoker>>,
    state: watch::Sender<BenchmarkState>,
    running: AtomicBool,
}

/// Clears the running flag when a run ends, even on early return
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BenchmarkOrchestrator {
    /// Create an orchestrator with no invokers
    pub fn new() -> Self {
        let (state, _) = watch::channel(BenchmarkState::default());
        Self {
            invokers: Vec::new(),
            state,
            running: AtomicBool::new(false),
        }
    }

    /// Register an invoker, replacing any previous one for the same strategy
    pub fn with_invoker(mut self, invoker: impl Invoker + 'static) -> Self {
        let strategy = invoker.strategy();
        self.invokers.retain(|i| i.strategy() != strategy);
        self.invokers.push(Arc::new(invoker));
        self
    }

    /// Standard setup: HTTP echo endpoint plus in-process echo procedure
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http_client = HttpClient::build(&config.endpoint, config.timeout_secs)
            .context("Failed to create HTTP client")?;
        let echo: Arc<dyn Procedure> = Arc::new(EchoProcedure);

        let mut parallel_client = ParallelClient::new();
        if let Some(max) = config.max_in_flight {
            parallel_client = parallel_client.with_max_in_flight(max);
        }

        Ok(Self::new()
            .with_invoker(HttpInvoker::new(http_client, &config.api_path))
            .with_invoker(ParallelInvoker::new(parallel_client, echo.clone()))
            .with_invoker(DefaultInvoker::new(ActionChannel::new(), echo)))
    }

    /// Observe status transitions
    pub fn subscribe(&self) -> watch::Receiver<BenchmarkState> {
        self.state.subscribe()
    }

    /// Current status of every strategy
    pub fn state(&self) -> BenchmarkState {
        self.state.borrow().clone()
    }

    /// Check if a run or probe is in progress
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn invoker(&self, strategy: Strategy) -> Option<&Arc<dyn Invoker>> {
        self.invokers.iter().find(|i| i.strategy() == strategy)
    }

    fn begin(&self, invocation_count: u32) -> Result<RunGuard<'_>, BenchError> {
        if invocation_count == 0 {
            return Err(BenchError::InvalidInvocationCount(invocation_count));
        }
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| BenchError::AlreadyRunning)?;
        Ok(RunGuard(&self.running))
    }

    fn transition(&self, strategy: Strategy, status: ExecutionStatus) {
        debug!("{} -> {}", strategy.id(), status);
        self.state
            .send_modify(|state| *state.status_mut(strategy) = status);
    }

    /// Benchmark every registered strategy with the same batch
    pub async fn run(
        &self,
        invocation_count: u32,
        delay_ms: u64,
    ) -> Result<BenchmarkReport, BenchError> {
        let _guard = self.begin(invocation_count)?;
        self.state.send_replace(BenchmarkState::default());

        info!(
            "Starting benchmark: {} invocations of {}ms per strategy",
            invocation_count, delay_ms
        );

        let mut stopwatch = Stopwatch::new();
        for strategy in Strategy::all() {
            let Some(invoker) = self.invoker(strategy) else {
                warn!("No invoker registered for {}, skipping", strategy);
                continue;
            };
            self.measure(invoker.as_ref(), invocation_count, delay_ms)
                .await;
            stopwatch.lap(strategy.id());
        }
        debug!("Benchmark laps: {}", stopwatch.format());

        Ok(BenchmarkReport::new(invocation_count, delay_ms, self.state()))
    }

    /// Test entry point: run only the parallel strategy and return raw output
    pub async fn probe(
        &self,
        invocation_count: u32,
        delay_ms: u64,
    ) -> Result<ProbeOutcome, BenchError> {
        let _guard = self.begin(invocation_count)?;
        let invoker = self
            .invoker(Strategy::Parallel)
            .ok_or(BenchError::MissingStrategy(Strategy::Parallel))?;

        match self
            .measure(invoker.as_ref(), invocation_count, delay_ms)
            .await
        {
            ExecutionStatus::Completed {
                execution_time_ms,
                results,
            } => Ok(ProbeOutcome {
                results,
                execution_time_ms,
            }),
            ExecutionStatus::Failed { reason } => Err(BenchError::ProbeFailed(reason)),
            other => Err(BenchError::ProbeFailed(format!("unexpected status {other}"))),
        }
    }

    /// Time one batch through one invoker and record the settled status
    async fn measure(
        &self,
        invoker: &dyn Invoker,
        invocation_count: u32,
        delay_ms: u64,
    ) -> ExecutionStatus {
        let strategy = invoker.strategy();
        let batch = Batch::new(invocation_count, delay_ms);

        self.transition(strategy, ExecutionStatus::Running);
        info!("Benchmarking {}", strategy);
        let timer = Timer::start(strategy.id());

        let status = match invoker.invoke(&batch).await {
            Ok(result) if !result.matches(&batch) => {
                let err = InvokeError::MalformedResponse(format!(
                    "expected {} replies in request order, got {}",
                    batch.len(),
                    result.serialize()
                ));
                warn!("{} batch failed: {}", strategy, err);
                ExecutionStatus::failed(err.to_string())
            }
            Ok(result) => {
                let elapsed_ms = timer.stop_ms();
                info!("{} finished in {}ms", strategy, elapsed_ms);
                ExecutionStatus::completed(elapsed_ms, result.serialize())
            }
            Err(e) => {
                warn!("{} batch failed: {}", strategy, e);
                ExecutionStatus::failed(e.to_string())
            }
        };

        self.transition(strategy, status.clone());
        status
    }
}

impl Default for BenchmarkOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
