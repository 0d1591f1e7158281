//! Provider-agnostic HTTP client.
//!
//! [`ProviderClient`] owns everything one conversation needs: the provider
//! wire format, credentials and endpoint, the active model, and the ordered
//! conversation history. It dispatches one blocking request per turn and
//! never retries.

use std::time::{Duration, Instant};

use reqwest::Client as ReqwestClient;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::providers::{Exchange, Provider, ProviderKind};
use crate::types::{TokenUsage, Turn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default token cap per response.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// A client bound to one provider's authentication, endpoint, and wire
/// format.
///
/// Credential validity is only checked at request time; construction cannot
/// reach the network.
pub struct ProviderClient {
    provider: Box<dyn Provider>,
    api_key: String,
    endpoint: String,
    /// The active model identifier. Mutable between requests; changing it
    /// affects only subsequent requests.
    pub model: String,
    max_tokens: u32,
    timeout: Duration,
    client: ReqwestClient,
    history: Vec<Turn>,
}

impl ProviderClient {
    /// Creates a new client for the given wire format and configuration.
    ///
    /// The active model starts as the configuration's default model.
    pub fn new(kind: ProviderKind, config: &ProviderConfig) -> Result<Self> {
        let timeout = DEFAULT_TIMEOUT;
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::connection(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            provider: kind.provider(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.default_model().to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout,
            client,
            history: Vec::new(),
        })
    }

    /// Sets the per-response token cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The wire format this client speaks.
    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The accumulated conversation history, in dialogue order.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Sends one prompt and returns the normalized response text and usage.
    ///
    /// The request body replays the full conversation history followed by the
    /// new user turn. On success, exactly two turns (user, assistant) are
    /// appended to the history, in that order. On any failure the history is
    /// left untouched and the error is returned without retrying.
    pub async fn send_request(&mut self, prompt: &str) -> Result<(String, TokenUsage)> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let outcome = self.dispatch(prompt).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match outcome {
            Ok(Exchange { text, usage }) => {
                self.history.push(Turn::user(prompt));
                self.history.push(Turn::assistant(text.clone()));
                Ok((text, usage))
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                Err(err)
            }
        }
    }

    async fn dispatch(&self, prompt: &str) -> Result<Exchange> {
        let headers = self.provider.headers(&self.api_key)?;
        let body = self
            .provider
            .build_request(&self.model, self.max_tokens, &self.history, prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {e}"),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else {
                    Error::connection(format!("Request failed: {e}"), Some(Box::new(e)))
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            Error::connection(
                format!("Failed to read response body: {e}"),
                Some(Box::new(e)),
            )
        })?;

        if !status.is_success() {
            return Err(Error::api(status.as_u16(), text));
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response body: {e}"),
                Some(Box::new(e)),
            )
        })?;

        Ok(self.provider.parse_response(&json))
    }
}
