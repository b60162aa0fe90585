//! Parallel dispatch client
//!
//! Separates sending a call from awaiting its outcome. Every dispatched call
//! runs as its own task and bypasses the serializing action channel, so a
//! batch dispatched up front is fully in flight before the first collect.

#![allow(dead_code)]

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use super::procedure::{Procedure, RpcError};

/// Receipt for a dispatched call
///
/// Not a future: the outcome is only reachable through
/// [`ParallelClient::collect`]. Dropping an uncollected handle cancels the
/// call and releases its in-flight slot.
#[must_use = "dispatched calls must be collected"]
#[derive(Debug)]
pub struct CallHandle {
    id: u64,
    procedure: String,
    dispatched_at: Instant,
    task: JoinHandle<Result<Value, RpcError>>,
}

impl CallHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Whether the remote outcome is already available
    pub fn is_settled(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CallHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Two-phase dispatch/collect client
#[derive(Clone, Default)]
pub struct ParallelClient {
    limiter: Option<Arc<Semaphore>>,
    next_id: Arc<AtomicU64>,
}

impl ParallelClient {
    /// Client without a bound on calls in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of calls executing at once
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(max.max(1))));
        self
    }

    /// Send a call and return immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, procedure: Arc<dyn Procedure>, args: Value) -> CallHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let name = procedure.name().to_string();
        let limiter = self.limiter.clone();

        let task = tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => {
                    Some(
                        semaphore
                            .acquire_owned()
                            .await
                            .map_err(|e| RpcError::Aborted {
                                procedure: procedure.name().to_string(),
                                message: e.to_string(),
                            })?,
                    )
                }
                None => None,
            };
            procedure.call(args).await
        });

        debug!(id, procedure = %name, "Dispatched call");

        CallHandle {
            id,
            procedure: name,
            dispatched_at: Instant::now(),
            task,
        }
    }

    /// Await the outcome of a dispatched call
    pub async fn collect(&self, mut handle: CallHandle) -> Result<Value, RpcError> {
        let outcome = (&mut handle.task).await.map_err(|e| RpcError::Aborted {
            procedure: handle.procedure.clone(),
            message: e.to_string(),
        })?;

        debug!(
            id = handle.id,
            procedure = %handle.procedure,
            "Collected call after {}ms",
            handle.dispatched_at.elapsed().as_millis()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::{ConcurrencyProbe, CountingEcho};
    use crate::rpc::EchoProcedure;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dispatch_then_collect() {
        let client = ParallelClient::new();
        let echo: Arc<dyn Procedure> = Arc::new(EchoProcedure);

        let handle = client.dispatch(echo, json!({"n": 9, "duration": 0}));
        assert_eq!(handle.procedure(), "echo");

        let reply = client.collect(handle).await.unwrap();
        assert_eq!(reply, json!({"n": 9}));
    }

    #[tokio::test]
    async fn test_dispatched_calls_overlap() {
        let client = ParallelClient::new();
        let probe = Arc::new(ConcurrencyProbe::new());

        let handles: Vec<_> = (1..=5)
            .map(|n| client.dispatch(probe.clone(), json!({"n": n, "duration": 50})))
            .collect();
        for handle in handles {
            client.collect(handle).await.unwrap();
        }

        assert_eq!(probe.max_in_flight(), 5);
    }

    #[tokio::test]
    async fn test_max_in_flight_bounds_calls() {
        let client = ParallelClient::new().with_max_in_flight(2);
        let probe = Arc::new(ConcurrencyProbe::new());

        let handles: Vec<_> = (1..=6)
            .map(|n| client.dispatch(probe.clone(), json!({"n": n, "duration": 20})))
            .collect();
        for handle in handles {
            client.collect(handle).await.unwrap();
        }

        assert_eq!(probe.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_handle_ids_are_unique() {
        let client = ParallelClient::new();
        let echo: Arc<dyn Procedure> = Arc::new(EchoProcedure);

        let first = client.dispatch(echo.clone(), json!({"n": 1, "duration": 0}));
        let second = client.dispatch(echo, json!({"n": 2, "duration": 0}));
        assert_ne!(first.id(), second.id());

        client.collect(first).await.unwrap();
        client.collect(second).await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_handle_cancels_call() {
        let client = ParallelClient::new().with_max_in_flight(1);
        let slow = CountingEcho::new(0);

        let handle = client.dispatch(slow.clone(), json!({"n": 1, "duration": 100}));
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        // the slot is free again, so this call does not wait behind the first
        let start = Instant::now();
        let echo: Arc<dyn Procedure> = Arc::new(EchoProcedure);
        let next = client.dispatch(echo, json!({"n": 2, "duration": 0}));
        client.collect(next).await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(80));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(slow.finished(), 0);
    }

    #[tokio::test]
    async fn test_call_settles_without_collect() {
        let client = ParallelClient::new();
        let echo: Arc<dyn Procedure> = Arc::new(EchoProcedure);

        let handle = client.dispatch(echo, json!({"n": 1, "duration": 0}));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.is_settled());

        client.collect(handle).await.unwrap();
    }
}
