//! HTTP client for the echo endpoint
//!
//! Thin wrapper over reqwest that classifies failures into transport and
//! body errors.

#![allow(dead_code)]

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed body from {url}: {message}")]
    MalformedBody { url: String, message: String },
}

/// HTTP client bound to a base URL
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    timeout_secs: Option<u64>,
}

impl HttpClient {
    /// Create a client, optionally bounding each request
    pub fn build(base_url: impl Into<String>, timeout_secs: Option<u64>) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    /// Create client with custom timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, HttpError> {
        Self::build(base_url, Some(timeout_secs))
    }

    /// Create a client without a request timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpError> {
        Self::build(base_url, None)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }

    fn classify(&self, error: reqwest::Error, url: &str) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout(self.timeout_secs.unwrap_or_default())
        } else if error.is_connect() {
            HttpError::ConnectionRefused(url.to_string())
        } else {
            HttpError::RequestFailed(error.to_string())
        }
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, HttpError> {
        let url = self.build_url(path);
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify(e, &url))?;

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            url,
            start.elapsed().as_millis()
        );

        serde_json::from_str(&body).map_err(|e| HttpError::MalformedBody {
            url,
            message: e.to_string(),
        })
    }
}
