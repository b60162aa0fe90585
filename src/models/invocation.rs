//! Invocation models
//!
//! Defines the requests that make up a benchmark batch and the replies
//! collected from the echo procedure.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// A single member of a benchmark batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Position in the batch, starting at 1
    #[serde(rename = "n")]
    pub sequence_number: u32,
    /// Artificial delay the echo applies before replying
    #[serde(rename = "duration")]
    pub delay_ms: u64,
}

impl InvocationRequest {
    pub fn new(sequence_number: u32, delay_ms: u64) -> Self {
        Self {
            sequence_number,
            delay_ms,
        }
    }

    /// Query parameters for the HTTP echo endpoint
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("n", self.sequence_number.to_string()),
            ("duration", self.delay_ms.to_string()),
        ]
    }
}

/// Ordered set of requests benchmarked together under one strategy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    requests: Vec<InvocationRequest>,
}

impl Batch {
    /// Build a batch with sequence numbers `1..=count`
    pub fn new(count: u32, delay_ms: u64) -> Self {
        let requests = (1..=count)
            .map(|n| InvocationRequest::new(n, delay_ms))
            .collect();
        Self { requests }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InvocationRequest> {
        self.requests.iter()
    }
}

/// Reply returned by the echo for one request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoReply {
    pub n: u32,
}

/// Replies of a batch, in request order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResult {
    replies: Vec<EchoReply>,
}

impl BatchResult {
    pub fn new(replies: Vec<EchoReply>) -> Self {
        Self { replies }
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    pub fn replies(&self) -> &[EchoReply] {
        &self.replies
    }

    /// Compact JSON text, e.g. `[{"n":1},{"n":2}]`
    pub fn serialize(&self) -> String {
        serde_json::to_string(&self.replies).unwrap_or_default()
    }

    /// Whether reply `i` answers request `i` for every member of `batch`
    pub fn matches(&self, batch: &Batch) -> bool {
        self.len() == batch.len()
            && self
                .replies
                .iter()
                .zip(batch.iter())
                .all(|(reply, request)| reply.n == request.sequence_number)
    }
}

impl FromIterator<EchoReply> for BatchResult {
    fn from_iter<I: IntoIterator<Item = EchoReply>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_sequence_numbers() {
        let batch = Batch::new(4, 250);
        let numbers: Vec<u32> = batch.iter().map(|r| r.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(batch.iter().all(|r| r.delay_ms == 250));
    }

    #[test]
    fn test_empty_batch() {
        let batch = Batch::new(0, 100);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_request_wire_format() {
        let value = serde_json::to_value(InvocationRequest::new(3, 500)).unwrap();
        assert_eq!(value, serde_json::json!({"n": 3, "duration": 500}));
    }

    #[test]
    fn test_request_query() {
        let query = InvocationRequest::new(7, 0).query();
        assert_eq!(query[0], ("n", "7".to_string()));
        assert_eq!(query[1], ("duration", "0".to_string()));
    }

    #[test]
    fn test_batch_result_serialize() {
        let result: BatchResult = (1..=3).map(|n| EchoReply { n }).collect();
        assert_eq!(result.serialize(), r#"[{"n":1},{"n":2},{"n":3}]"#);
    }

    #[test]
    fn test_batch_result_matches() {
        let batch = Batch::new(2, 0);
        let ordered = BatchResult::new(vec![EchoReply { n: 1 }, EchoReply { n: 2 }]);
        let swapped = BatchResult::new(vec![EchoReply { n: 2 }, EchoReply { n: 1 }]);
        let short = BatchResult::new(vec![EchoReply { n: 1 }]);

        assert!(ordered.matches(&batch));
        assert!(!swapped.matches(&batch));
        assert!(!short.matches(&batch));
    }
}
