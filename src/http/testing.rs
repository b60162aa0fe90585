//! Echo endpoint used by unit tests

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Echo endpoint: `GET /api?n=..&duration=..` replies `{"n": n}` after
/// `duration` milliseconds
pub async fn start_echo_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(|req: &Request| {
            let param = |name: &str| {
                req.url
                    .query_pairs()
                    .find(|(k, _)| k == name)
                    .and_then(|(_, v)| v.parse::<u64>().ok())
            };
            let n = param("n").unwrap_or_default();
            let duration = param("duration").unwrap_or_default();

            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "n": n }))
                .set_delay(Duration::from_millis(duration))
        })
        .mount(&server)
        .await;

    server
}
