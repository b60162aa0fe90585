//! HTTP client module
//!
//! Provides the client used to reach the HTTP echo endpoint.

mod client;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpClient, HttpError};
