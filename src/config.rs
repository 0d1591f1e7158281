//! Startup configuration.
//!
//! Credentials and model lists come from the environment, but the rest of the
//! crate only ever sees an explicit [`ProviderConfig`] value, so tests can
//! construct configurations without touching process state.

use std::env;

use crate::error::{Error, Result};
use crate::providers::ProviderKind;

/// Immutable configuration for one provider backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// The API key used for authentication.
    pub api_key: String,

    /// The endpoint URL requests are POSTed to.
    pub endpoint: String,

    /// The ordered list of available model identifiers; the first entry is
    /// the default model.
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Creates a configuration from explicit values.
    ///
    /// Fails when the API key is empty or no models are listed.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        models: Vec<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::configuration("API key is empty"));
        }
        if models.is_empty() {
            return Err(Error::configuration("model list is empty"));
        }
        Ok(Self {
            api_key,
            endpoint: endpoint.into(),
            models,
        })
    }

    /// Loads the configuration for a provider from the environment.
    ///
    /// Reads `ANTHROPIC_API_KEY` / `AVAILABLE_ANTHROPIC_MODELS` or
    /// `OPENAI_API_KEY` / `AVAILABLE_OPENAI_MODELS` (a comma-separated list).
    /// Both OpenAI wire formats share the OpenAI credentials.
    pub fn from_env(kind: ProviderKind) -> Result<Self> {
        let (key_var, models_var) = match kind {
            ProviderKind::Anthropic => ("ANTHROPIC_API_KEY", "AVAILABLE_ANTHROPIC_MODELS"),
            ProviderKind::OpenAi | ProviderKind::OpenAiLegacy => {
                ("OPENAI_API_KEY", "AVAILABLE_OPENAI_MODELS")
            }
        };

        let api_key = env::var(key_var)
            .map_err(|_| Error::configuration(format!("{key_var} environment variable is not set")))?;
        let models = env::var(models_var).map_err(|_| {
            Error::configuration(format!("{models_var} environment variable is not set"))
        })?;
        let models: Vec<String> = models
            .split(',')
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .collect();
        if models.is_empty() {
            return Err(Error::configuration(format!("{models_var} lists no models")));
        }

        Self::new(api_key, kind.default_endpoint(), models)
    }

    /// The default model for this provider (first of the available list).
    pub fn default_model(&self) -> &str {
        &self.models[0]
    }

    /// Overrides the endpoint, consuming and returning the configuration.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}
