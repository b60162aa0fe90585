//! Invocation strategies
//!
//! Each invoker turns a batch into concrete remote calls, issues them
//! concurrently and returns the replies in request order. A single failed
//! member fails the whole batch.

mod default;
mod http;
mod parallel;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::http::HttpError;
use crate::models::{Batch, BatchResult, EchoReply, InvocationRequest, Strategy};
use crate::rpc::RpcError;

pub use default::DefaultInvoker;
pub use http::HttpInvoker;
pub use parallel::ParallelInvoker;

/// Batch invocation errors
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Remote invocation failed: {0}")]
    RemoteInvocation(#[from] RpcError),

    #[error("Transport failure: {0}")]
    Transport(HttpError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<HttpError> for InvokeError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::MalformedBody { .. } => InvokeError::MalformedResponse(err.to_string()),
            other => InvokeError::Transport(other),
        }
    }
}

/// Strategy-specific batch adapter
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Strategy this invoker measures
    fn strategy(&self) -> Strategy;

    /// Issue every request of the batch concurrently and collect replies in order
    async fn invoke(&self, batch: &Batch) -> Result<BatchResult, InvokeError>;
}

/// Encode a request as RPC arguments
fn encode_request(procedure: &str, request: &InvocationRequest) -> Result<Value, InvokeError> {
    serde_json::to_value(request).map_err(|e| {
        InvokeError::RemoteInvocation(RpcError::InvalidArguments {
            procedure: procedure.to_string(),
            message: e.to_string(),
        })
    })
}

/// Decode an RPC reply
fn decode_reply(value: Value) -> Result<EchoReply, InvokeError> {
    serde_json::from_value(value).map_err(|e| InvokeError::MalformedResponse(e.to_string()))
}
