//! Default action transport
//!
//! Accepts calls concurrently but lets only one reach the procedure at a
//! time, the way a host runtime queues ordinary remote actions.

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::procedure::{Procedure, RpcError};

/// Serializing transport for ordinary remote calls
#[derive(Clone, Default)]
pub struct ActionChannel {
    // tokio's Mutex is fair, so queued calls run in arrival order
    slot: Arc<Mutex<()>>,
    processed: Arc<AtomicU64>,
}

impl ActionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call a procedure, waiting for every earlier call to finish first
    pub async fn call(&self, procedure: &dyn Procedure, args: Value) -> Result<Value, RpcError> {
        let _slot = self.slot.lock().await;
        let seq = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(procedure = procedure.name(), seq, "Processing queued action");
        procedure.call(args).await
    }

    /// Number of calls that have reached a procedure
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }
}
