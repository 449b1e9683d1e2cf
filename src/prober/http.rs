use anyhow::Result;
use reqwest::Client;
use tokio::time::Instant;

use super::ProbeOutcome;

/// Sends GET requests to one fixed URL and times them.
///
/// The client is built once and reused for every probe.
pub struct HttpProber {
    client: Client,
    url: String,
}

impl HttpProber {
    /// No request timeout: a hung endpoint stalls the probe indefinitely.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[cfg(test)]
    pub fn with_timeout(url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Runs one probe. Errors never escape; they become `ProbeOutcome::Failure`.
    pub async fn probe(&self) -> ProbeOutcome {
        let start = Instant::now();
        match self.fetch().await {
            Ok(code) => ProbeOutcome::Status {
                code,
                elapsed: start.elapsed(),
            },
            Err(e) => ProbeOutcome::Failure(format!("{:#}", e)),
        }
    }

    async fn fetch(&self) -> Result<u16> {
        tracing::trace!("GET {}", self.url);
        let resp = self.client.get(&self.url).send().await?;
        let code = resp.status().as_u16();
        // elapsed covers the full body, not just the headers
        let _ = resp.bytes().await?;
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HEALTH_PATH: &str = "/actuator/health";

    async fn health_server(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(HEALTH_PATH))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn reports_ok_status() {
        let server = health_server(
            ResponseTemplate::new(200).set_body_string(r#"{"status":"UP"}"#),
        )
        .await;
        let prober = HttpProber::new(format!("{}{}", server.uri(), HEALTH_PATH)).unwrap();

        match prober.probe().await {
            ProbeOutcome::Status { code, .. } => assert_eq!(code, 200),
            other => panic!("expected status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_status_is_not_a_failure() {
        let server = health_server(ResponseTemplate::new(503)).await;
        let prober = HttpProber::new(format!("{}{}", server.uri(), HEALTH_PATH)).unwrap();

        let outcome = prober.probe().await;
        assert!(!outcome.is_failure());
        assert!(outcome.to_string().starts_with("503 "));
    }

    #[tokio::test]
    async fn elapsed_tracks_response_delay() {
        let server =
            health_server(ResponseTemplate::new(200).set_delay(Duration::from_millis(50))).await;
        let prober = HttpProber::new(format!("{}{}", server.uri(), HEALTH_PATH)).unwrap();

        let wall = Instant::now();
        let outcome = prober.probe().await;
        let wall = wall.elapsed();

        match outcome {
            ProbeOutcome::Status { code, elapsed } => {
                assert_eq!(code, 200);
                assert!(elapsed >= Duration::from_millis(50));
                assert!(elapsed <= wall);
            }
            other => panic!("expected status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_failure() {
        // grab a free port, then release it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let prober = HttpProber::new(format!("http://127.0.0.1:{}{}", port, HEALTH_PATH)).unwrap();
        let outcome = prober.probe().await;

        assert!(outcome.is_failure());
        assert!(!outcome.to_string().is_empty());
    }

    #[tokio::test]
    async fn failure_keeps_the_cause_chain() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let prober = HttpProber::new(format!("http://127.0.0.1:{}{}", port, HEALTH_PATH)).unwrap();
        let ProbeOutcome::Failure(msg) = prober.probe().await else {
            panic!("expected failure");
        };

        assert!(msg.contains("error sending request"));
        assert!(msg.contains(": "));
    }

    #[tokio::test]
    async fn bounded_prober_fails_on_hung_endpoint() {
        let server =
            health_server(ResponseTemplate::new(200).set_delay(Duration::from_secs(5))).await;
        let prober = HttpProber::with_timeout(
            format!("{}{}", server.uri(), HEALTH_PATH),
            Duration::from_millis(100),
        )
        .unwrap();

        assert!(prober.probe().await.is_failure());
    }
}
