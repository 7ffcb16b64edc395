use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::AdvisorConfig;

pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't generate a response.";

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor API key is not configured")]
    NotConfigured,
    #[error("advisor request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("advisor answered with status {0}")]
    Status(u16),
}

impl AdvisorError {
    fn is_retryable(&self) -> bool {
        match self {
            AdvisorError::Transport(e) => !e.is_decode() && !e.is_builder(),
            AdvisorError::Status(code) => *code >= 500,
            AdvisorError::NotConfigured => false,
        }
    }
}

/// Free-text fitness Q&A backend.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn recommend(&self, prompt: &str) -> Result<String, AdvisorError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if the model produced one.
    pub(crate) fn answer(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// Google Generative Language `generateContent` client.
pub struct GeminiAdvisor {
    client: Client,
    config: AdvisorConfig,
}

impl GeminiAdvisor {
    pub fn new(config: AdvisorConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_once(&self, key: &str, prompt: &str) -> Result<String, AdvisorError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        let res = self
            .client
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }

        let parsed: GenerateResponse = res.json().await?;
        Ok(parsed.answer().unwrap_or_else(|| FALLBACK_ANSWER.to_string()))
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn recommend(&self, prompt: &str) -> Result<String, AdvisorError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AdvisorError::NotConfigured)?;

        let mut attempt = 0;
        loop {
            match self.send_once(key, prompt).await {
                Ok(answer) => {
                    debug!(attempt, "advisor answered");
                    return Ok(answer);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "advisor call failed; retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    fn parse(raw: &str) -> GenerateResponse {
        serde_json::from_str(raw).expect("valid response json")
    }

    #[test]
    fn picks_first_candidate_text() {
        let res = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Eat more protein."},{"text":"ignored"}]}},
                              {"content":{"parts":[{"text":"second"}]}}]}"#,
        );
        assert_eq!(res.answer().as_deref(), Some("Eat more protein."));
    }

    #[test]
    fn missing_text_yields_none() {
        assert_eq!(parse(r#"{}"#).answer(), None);
        assert_eq!(parse(r#"{"candidates":[]}"#).answer(), None);
        assert_eq!(parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#).answer(), None);
        assert_eq!(parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).answer(), None);
    }

    #[test]
    fn only_server_errors_are_retried() {
        assert!(AdvisorError::Status(503).is_retryable());
        assert!(!AdvisorError::Status(400).is_retryable());
        assert!(!AdvisorError::NotConfigured.is_retryable());
    }

    #[tokio::test]
    async fn unconfigured_key_fails_without_network() {
        let advisor = GeminiAdvisor::new(crate::config::AppConfig::for_tests().advisor)
            .expect("client builds");
        let err = advisor.recommend("hi").await.unwrap_err();
        assert!(matches!(err, AdvisorError::NotConfigured));
    }

    /// Serves every request with `status` and counts how many arrived.
    async fn stub_endpoint(status: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                        let body_len = head
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        if buf.len() >= end + 4 + body_len {
                            break;
                        }
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{addr}"), hits)
    }

    fn advisor_for(base_url: String, max_retries: u32) -> GeminiAdvisor {
        let mut config = crate::config::AppConfig::for_tests().advisor;
        config.api_key = Some("k".into());
        config.base_url = base_url;
        config.max_retries = max_retries;
        GeminiAdvisor::new(config).expect("client builds")
    }

    #[tokio::test]
    async fn server_errors_are_retried_up_to_the_limit() {
        let (base_url, hits) = stub_endpoint("503 Service Unavailable").await;
        let err = advisor_for(base_url, 1).recommend("hi").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Status(503)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn no_retries_when_limit_is_zero() {
        let (base_url, hits) = stub_endpoint("502 Bad Gateway").await;
        let err = advisor_for(base_url, 0).recommend("hi").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Status(502)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (base_url, hits) = stub_endpoint("400 Bad Request").await;
        let err = advisor_for(base_url, 1).recommend("hi").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Status(400)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_retried_then_reported() {
        let mut config = crate::config::AppConfig::for_tests().advisor;
        config.api_key = Some("k".into());
        let advisor = GeminiAdvisor::new(config).expect("client builds");
        let err = advisor.recommend("hi").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Transport(_)));
    }
}
