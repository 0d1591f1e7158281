//! OpenAI wire formats: chat-completions and the legacy completions shape.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::providers::{Exchange, NO_RESPONSE, Provider, ProviderKind, usage_field};
use crate::types::{TokenUsage, Turn};

fn bearer_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::configuration("API key contains invalid header characters"))?,
    );
    Ok(headers)
}

fn openai_usage(body: &Value) -> TokenUsage {
    TokenUsage::new(
        usage_field(body, "prompt_tokens"),
        usage_field(body, "completion_tokens"),
    )
}

/// The OpenAI chat-completions API: bearer auth, role/content message list,
/// response text in the first choice's message.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiChat;

impl Provider for OpenAiChat {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        bearer_headers(api_key)
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
        let text = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .filter(|content| !content.is_empty())
            .map(String::from)
            .unwrap_or_else(|| NO_RESPONSE.to_string());

        Exchange {
            text,
            usage: openai_usage(body),
        }
    }
}

/// The legacy OpenAI completions API.
///
/// This shape carries only the new prompt, never the conversation history;
/// it exists for compatibility with the completions endpoint and is not the
/// canonical chat path.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiCompletions;

impl Provider for OpenAiCompletions {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiLegacy
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        bearer_headers(api_key)
    }

    fn build_request(&self, model: &str, max_tokens: u32, _history: &[Turn], prompt: &str) -> Value {
        json!({
            "prompt": prompt,
            "model": model,
            "max_tokens": max_tokens,
        })
    }

    fn parse_response(&self, body: &Value) -> Exchange {
        let text = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("text"))
            .and_then(Value::as_str)
            .filter(|content| !content.is_empty())
            .map(String::from)
            .unwrap_or_else(|| NO_RESPONSE.to_string());

        Exchange {
            text,
            usage: openai_usage(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bearer_auth_headers() {
        let headers = OpenAiChat.headers("test-api-key").unwrap();
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["authorization"], "Bearer test-api-key");
    }

    #[test]
    fn chat_request_replays_history_before_prompt() {
        let history = vec![Turn::user("one"), Turn::assistant("two")];
        let body = OpenAiChat.build_request("gpt-4", 1000, &history, "three");

        assert_eq!(
            body,
            json!({
                "model": "gpt-4",
                "max_tokens": 1000,
                "messages": [
                    {"role": "user", "content": "one"},
                    {"role": "assistant", "content": "two"},
                    {"role": "user", "content": "three"},
                ],
            })
        );
    }

    #[test]
    fn chat_parse_takes_first_choice_verbatim() {
        let body = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Hello, world!"}},
                {"message": {"role": "assistant", "content": "ignored"}},
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34},
        });
        let exchange = OpenAiChat.parse_response(&body);
        assert_eq!(exchange.text, "Hello, world!");
        assert_eq!(exchange.usage, TokenUsage::new(12, 34));
    }

    #[test]
    fn chat_parse_empty_choices_yields_sentinel() {
        for body in [json!({}), json!({"choices": []})] {
            let exchange = OpenAiChat.parse_response(&body);
            assert_eq!(exchange.text, NO_RESPONSE);
            assert_eq!(exchange.usage, TokenUsage::zero());
        }
    }

    #[test]
    fn chat_parse_missing_usage_defaults_to_zero() {
        let body = json!({
            "choices": [{"message": {"content": "hi"}}],
        });
        let exchange = OpenAiChat.parse_response(&body);
        assert_eq!(exchange.usage, TokenUsage::zero());
    }

    #[test]
    fn legacy_request_is_single_prompt() {
        let history = vec![Turn::user("earlier")];
        let body = OpenAiCompletions.build_request("gpt-3.5-turbo", 1000, &history, "now");

        assert_eq!(
            body,
            json!({
                "prompt": "now",
                "model": "gpt-3.5-turbo",
                "max_tokens": 1000,
            })
        );
    }

    #[test]
    fn legacy_parse_takes_choice_text() {
        let body = json!({
            "choices": [{"text": "Hello, world!"}],
        });
        let exchange = OpenAiCompletions.parse_response(&body);
        assert_eq!(exchange.text, "Hello, world!");
    }
}
