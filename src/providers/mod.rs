//! Provider wire formats.
//!
//! Each hosted LLM vendor speaks its own request and response shape. A
//! [`Provider`] bundles the three capabilities that differ between vendors:
//! auth headers, request-body construction, and response parsing. Everything
//! else (HTTP dispatch, history ownership, accounting) is shared and lives in
//! [`crate::client::ProviderClient`].

mod anthropic;
mod openai;

use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{TokenUsage, Turn};

pub use anthropic::AnthropicMessages;
pub use openai::{OpenAiChat, OpenAiCompletions};

/// Fallback text substituted when no usable content can be extracted from a
/// well-formed provider response. This is a soft policy, not an error.
pub const NO_RESPONSE: &str = "No response received.";

/// A normalized provider response: plain text plus token usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// The extracted response text, or [`NO_RESPONSE`].
    pub text: String,

    /// Token counts for the exchange; zero when the provider omitted them.
    pub usage: TokenUsage,
}

/// The capability set a provider backend must implement.
///
/// Implementations are stateless: request building and response parsing are
/// pure functions over their inputs, so a single instance can serve any
/// number of clients.
pub trait Provider: Send + Sync {
    /// The wire format this provider implements.
    fn kind(&self) -> ProviderKind;

    /// Auth and content headers for one request.
    fn headers(&self, api_key: &str) -> Result<HeaderMap>;

    /// Builds the provider-specific JSON request body.
    ///
    /// History turns are replayed in their original order; the new user
    /// prompt is appended last. No turn is ever dropped.
    fn build_request(&self, model: &str, max_tokens: u32, history: &[Turn], prompt: &str) -> Value;

    /// Parses a well-formed (JSON-decoded) success body.
    ///
    /// An unexpected shape degrades to [`NO_RESPONSE`] with zero usage rather
    /// than failing the turn.
    fn parse_response(&self, body: &Value) -> Exchange;
}

/// Identifier for the supported wire formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Anthropic messages API.
    Anthropic,

    /// OpenAI chat-completions API (history-replaying, the canonical path).
    OpenAi,

    /// OpenAI legacy completions API (single-prompt body, no history replay).
    OpenAiLegacy,
}

impl ProviderKind {
    /// Returns the provider variant implementing this wire format.
    pub fn provider(self) -> Box<dyn Provider> {
        match self {
            ProviderKind::Anthropic => Box::new(AnthropicMessages),
            ProviderKind::OpenAi => Box::new(OpenAiChat),
            ProviderKind::OpenAiLegacy => Box::new(OpenAiCompletions),
        }
    }

    /// The default endpoint URL for this wire format.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "https://api.anthropic.com/v1/messages",
            ProviderKind::OpenAi => "https://api.openai.com/v1/chat/completions",
            ProviderKind::OpenAiLegacy => "https://api.openai.com/v1/completions",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::OpenAiLegacy => write!(f, "openai-legacy"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAi),
            "openai-legacy" => Ok(ProviderKind::OpenAiLegacy),
            _ => Err(Error::configuration(format!("unknown provider: {s}"))),
        }
    }
}

/// Reads a `u64` token counter from `usage[field]`, defaulting absent or
/// non-numeric values to 0.
pub(crate) fn usage_field(body: &Value, field: &str) -> u64 {
    body.get("usage")
        .and_then(|usage| usage.get(field))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}
