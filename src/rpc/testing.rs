//! Procedures used by unit tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use tokio::time::sleep;

use super::procedure::{EchoProcedure, Procedure, RpcError};
use crate::models::InvocationRequest;

fn parse(args: Value) -> InvocationRequest {
    serde_json::from_value(args).expect("test arguments are a valid request")
}

/// Echo that records the highest number of overlapping calls
#[derive(Default)]
pub struct ConcurrencyProbe {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Procedure for ConcurrencyProbe {
    fn name(&self) -> &str {
        "probe"
    }

    async fn call(&self, args: Value) -> Result<Value, RpcError> {
        let request = parse(args);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
        sleep(Duration::from_millis(request.delay_ms)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(json!({ "n": request.sequence_number }))
    }
}

/// Echo that fails for one sequence number
pub struct FailingEcho {
    pub fail_on: u32,
}

#[async_trait]
impl Procedure for FailingEcho {
    fn name(&self) -> &str {
        "failing-echo"
    }

    async fn call(&self, args: Value) -> Result<Value, RpcError> {
        let request = parse(args.clone());
        if request.sequence_number == self.fail_on {
            return Err(RpcError::Failed {
                procedure: self.name().to_string(),
                message: format!("refused n={}", request.sequence_number),
            });
        }
        EchoProcedure.call(args).await
    }
}

/// Echo that fails one sequence number at once and counts calls that ran
/// to completion
pub struct CountingEcho {
    fail_on: u32,
    finished: AtomicUsize,
}

impl CountingEcho {
    /// `fail_on == 0` never fails
    pub fn new(fail_on: u32) -> Arc<Self> {
        Arc::new(Self {
            fail_on,
            finished: AtomicUsize::new(0),
        })
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Procedure for CountingEcho {
    fn name(&self) -> &str {
        "counting-echo"
    }

    async fn call(&self, args: Value) -> Result<Value, RpcError> {
        let request = parse(args);
        if request.sequence_number == self.fail_on {
            return Err(RpcError::Failed {
                procedure: self.name().to_string(),
                message: format!("refused n={}", request.sequence_number),
            });
        }
        sleep(Duration::from_millis(request.delay_ms)).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "n": request.sequence_number }))
    }
}

/// Echo whose calls only complete once `n` of them are in flight together
pub struct BarrierEcho {
    barrier: Barrier,
}

impl BarrierEcho {
    pub fn new(n: usize) -> Self {
        Self {
            barrier: Barrier::new(n),
        }
    }
}

#[async_trait]
impl Procedure for BarrierEcho {
    fn name(&self) -> &str {
        "barrier-echo"
    }

    async fn call(&self, args: Value) -> Result<Value, RpcError> {
        let request = parse(args);
        self.barrier.wait().await;
        Ok(json!({ "n": request.sequence_number }))
    }
}

/// Procedure whose reply is not an echo reply
pub struct GarbledEcho;

#[async_trait]
impl Procedure for GarbledEcho {
    fn name(&self) -> &str {
        "garbled-echo"
    }

    async fn call(&self, _args: Value) -> Result<Value, RpcError> {
        Ok(json!({ "value": "not a reply" }))
    }
}
