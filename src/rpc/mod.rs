//! Remote procedure call layer
//!
//! Procedures plus the two transports that reach them: the serializing
//! action channel and the dispatch/collect parallel client.

mod channel;
mod parallel;
mod procedure;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::ActionChannel;
pub use parallel::{CallHandle, ParallelClient};
pub use procedure::{EchoProcedure, Procedure, RpcError};
