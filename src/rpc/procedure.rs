//! Remote procedure abstraction
//!
//! A procedure is a named function reference taking and returning JSON
//! values. Transports decide how calls reach it.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;

use crate::models::InvocationRequest;

/// Remote call errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("Invalid arguments for {procedure}: {message}")]
    InvalidArguments { procedure: String, message: String },

    #[error("Procedure {procedure} failed: {message}")]
    Failed { procedure: String, message: String },

    #[error("Call to {procedure} aborted: {message}")]
    Aborted { procedure: String, message: String },
}

/// A remotely callable function
#[async_trait]
pub trait Procedure: Send + Sync {
    /// Procedure name used in logs and errors
    fn name(&self) -> &str;

    /// Execute the procedure with JSON arguments
    async fn call(&self, args: Value) -> Result<Value, RpcError>;
}

/// Echo with artificial latency
///
/// Takes `{"n": <int>, "duration": <ms>}`, sleeps `duration` and returns
/// `{"n": <int>}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoProcedure;

impl EchoProcedure {
    pub const NAME: &'static str = "echo";

    fn parse(args: Value) -> Result<InvocationRequest, RpcError> {
        serde_json::from_value(args).map_err(|e| RpcError::InvalidArguments {
            procedure: Self::NAME.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Procedure for EchoProcedure {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn call(&self, args: Value) -> Result<Value, RpcError> {
        let request = Self::parse(args)?;
        debug!("Running echo {}...", request.sequence_number);
        sleep(Duration::from_millis(request.delay_ms)).await;
        Ok(json!({ "n": request.sequence_number }))
    }
}
