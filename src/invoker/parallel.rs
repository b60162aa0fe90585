//! Parallel strategy: dispatch every call, then collect
//!
//! All requests are dispatched before the first collect. Collecting a call
//! before the rest are dispatched would put the batch back in series.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{decode_reply, encode_request, InvokeError, Invoker};
use crate::models::{Batch, BatchResult, Strategy};
use crate::rpc::{CallHandle, ParallelClient, Procedure};

pub struct ParallelInvoker {
    client: ParallelClient,
    procedure: Arc<dyn Procedure>,
}

impl ParallelInvoker {
    pub fn new(client: ParallelClient, procedure: Arc<dyn Procedure>) -> Self {
        Self { client, procedure }
    }
}

#[async_trait]
impl Invoker for ParallelInvoker {
    fn strategy(&self) -> Strategy {
        Strategy::Parallel
    }

    async fn invoke(&self, batch: &Batch) -> Result<BatchResult, InvokeError> {
        let mut handles: Vec<CallHandle> = Vec::with_capacity(batch.len());
        for request in batch.iter() {
            let args = encode_request(self.procedure.name(), request)?;
            handles.push(self.client.dispatch(self.procedure.clone(), args));
        }
        debug!("Dispatched {} calls to {}", handles.len(), self.procedure.name());

        let mut replies = Vec::with_capacity(handles.len());
        for handle in handles {
            let reply = self.client.collect(handle).await?;
            replies.push(decode_reply(reply)?);
        }

        Ok(BatchResult::new(replies))
    }
}
