//! HTTP strategy: one GET per request against the echo endpoint

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::debug;

use super::{InvokeError, Invoker};
use crate::http::HttpClient;
use crate::models::{Batch, BatchResult, EchoReply, InvocationRequest, Strategy};

pub struct HttpInvoker {
    client: HttpClient,
    path: String,
}

impl HttpInvoker {
    pub fn new(client: HttpClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    async fn fetch(&self, request: &InvocationRequest) -> Result<EchoReply, InvokeError> {
        let reply = self
            .client
            .get_json::<EchoReply>(&self.path, &request.query())
            .await?;
        Ok(reply)
    }
}

#[async_trait]
impl Invoker for HttpInvoker {
    fn strategy(&self) -> Strategy {
        Strategy::Http
    }

    async fn invoke(&self, batch: &Batch) -> Result<BatchResult, InvokeError> {
        debug!(
            "Fetching {}{} x{}",
            self.client.base_url(),
            self.path,
            batch.len()
        );

        let replies = try_join_all(batch.iter().map(|request| self.fetch(request))).await?;
        Ok(BatchResult::new(replies))
    }
}
