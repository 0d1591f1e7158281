//! Anthropic messages wire format.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::providers::{Exchange, NO_RESPONSE, Provider, ProviderKind, usage_field};
use crate::types::{TokenUsage, Turn};

const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// The Anthropic messages API: `x-api-key` auth, versioned, typed content
/// blocks in responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnthropicMessages;

impl Provider for AnthropicMessages {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|_| Error::configuration("API key contains invalid header characters"))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_API_VERSION),
        );
        Ok(headers)
    }

    fn build_request(&self, model: &str, max_tokens: u32, history: &[Turn], prompt: &str) -> Value {
        let mut messages: Vec<Value> = history
            .iter()
            .map(|turn| json!({"role": turn.role, "content": turn.content}))
            .collect();
        messages.push(json!({"role": "user", "content": prompt}));

        json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": messages,
        })
    }

    fn parse_response(&self, body: &Value) -> Exchange {
        let mut text = String::new();
        if let Some(blocks) = body.get("content").and_then(Value::as_array) {
            for block in blocks {
                match block.get("type").and_then(Value::as_str) {
                    Some("text") => {
                        if let Some(chunk) = block.get("text").and_then(Value::as_str) {
                            text.push_str(chunk);
                        }
                    }
                    Some("code") => {
                        if let Some(code) = block.get("code").and_then(Value::as_str) {
                            text.push_str(&format!("```\n{code}\n```"));
                        }
                    }
                    // Unrecognized block types are skipped, not errors.
                    _ => {}
                }
            }
        }

        if text.is_empty() {
            text = NO_RESPONSE.to_string();
        }

        let usage = TokenUsage::new(
            usage_field(body, "input_tokens"),
            usage_field(body, "output_tokens"),
        );

        Exchange { text, usage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn headers_include_key_and_version() {
        let headers = AnthropicMessages.headers("test-api-key").unwrap();
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["x-api-key"], "test-api-key");
        assert_eq!(headers["anthropic-version"], "2023-06-01");
    }

    #[test]
    fn invalid_key_rejected() {
        let err = AnthropicMessages.headers("bad\nkey").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn request_replays_history_in_order() {
        let history = vec![
            Turn::user("first question"),
            Turn::assistant("first answer"),
        ];
        let body = AnthropicMessages.build_request("claude-3-opus-20240229", 1000, &history, "second question");

        assert_eq!(
            body,
            json!({
                "model": "claude-3-opus-20240229",
                "max_tokens": 1000,
                "messages": [
                    {"role": "user", "content": "first question"},
                    {"role": "assistant", "content": "first answer"},
                    {"role": "user", "content": "second question"},
                ],
            })
        );
    }

    #[test]
    fn request_with_empty_history() {
        let body = AnthropicMessages.build_request("claude-3-haiku-20240307", 1000, &[], "Hello, world!");
        assert_eq!(
            body["messages"],
            json!([{"role": "user", "content": "Hello, world!"}])
        );
    }

    #[test]
    fn parse_concatenates_text_blocks_in_order() {
        let body = json!({
            "content": [
                {"type": "text", "text": "Hello, "},
                {"type": "text", "text": "world!"},
            ],
            "usage": {"input_tokens": 5, "output_tokens": 30},
        });
        let exchange = AnthropicMessages.parse_response(&body);
        assert_eq!(exchange.text, "Hello, world!");
        assert_eq!(exchange.usage, TokenUsage::new(5, 30));
    }

    #[test]
    fn parse_wraps_code_blocks_in_fences() {
        let body = json!({
            "content": [{"type": "code", "code": "print(1)"}],
        });
        let exchange = AnthropicMessages.parse_response(&body);
        assert_eq!(exchange.text, "```\nprint(1)\n```");
    }

    #[test]
    fn parse_missing_usage_defaults_to_zero() {
        let body = json!({
            "content": [{"type": "text", "text": "hi"}],
        });
        let exchange = AnthropicMessages.parse_response(&body);
        assert_eq!(exchange.usage, TokenUsage::zero());
    }

    #[test]
    fn parse_empty_content_yields_sentinel() {
        for body in [json!({}), json!({"content": []}), json!({"content": "bogus"})] {
            let exchange = AnthropicMessages.parse_response(&body);
            assert_eq!(exchange.text, NO_RESPONSE);
            assert_eq!(exchange.usage, TokenUsage::zero());
        }
    }
}
