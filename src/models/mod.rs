//! Data models for benchmark runs
//!
//! Contains invocation requests, replies and per-strategy status types.

mod invocation;
mod status;

pub use invocation::{Batch, BatchResult, EchoReply, InvocationRequest};
pub use status::{BenchmarkState, ExecutionStatus, Strategy};
