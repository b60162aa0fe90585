//! Baseline strategy: ordinary remote calls
//!
//! Every call is started together, but they travel through the action
//! channel, which is free to serialize them.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::debug;

use super::{decode_reply, encode_request, InvokeError, Invoker};
use crate::models::{Batch, BatchResult, EchoReply, InvocationRequest, Strategy};
use crate::rpc::{ActionChannel, Procedure};

pub struct DefaultInvoker {
    channel: ActionChannel,
    procedure: Arc<dyn Procedure>,
}

impl DefaultInvoker {
    pub fn new(channel: ActionChannel, procedure: Arc<dyn Procedure>) -> Self {
        Self { channel, procedure }
    }

    async fn call(&self, request: &InvocationRequest) -> Result<EchoReply, InvokeError> {
        let args = encode_request(self.procedure.name(), request)?;
        let reply = self.channel.call(self.procedure.as_ref(), args).await?;
        decode_reply(reply)
    }
}

#[async_trait]
impl Invoker for DefaultInvoker {
    fn strategy(&self) -> Strategy {
        Strategy::Default
    }

    async fn invoke(&self, batch: &Batch) -> Result<BatchResult, InvokeError> {
        debug!(
            "Calling {} x{} through the action channel",
            self.procedure.name(),
            batch.len()
        );

        let replies = try_join_all(batch.iter().map(|request| self.call(request))).await?;
        debug!("Action channel has processed {} calls", self.channel.processed());
        Ok(BatchResult::new(replies))
    }
}
