//! Configuration types for the chat application.
//!
//! CLI argument parsing via `arrrg`, resolved into a [`ChatConfig`] with
//! defaults applied.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_MAX_TOKENS;
use crate::error::{Error, Result};
use crate::providers::ProviderKind;

/// Default directory for saved transcripts.
const DEFAULT_HISTORY_DIR: &str = "chat_histories";

/// Command-line arguments for the omnichat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Provider backend to talk to.
    #[arrrg(optional, "Provider: anthropic, openai, openai-legacy (default: anthropic)", "PROVIDER")]
    pub provider: Option<String>,

    /// Model to use; defaults to the provider's first available model.
    #[arrrg(optional, "Model to use (default: first available model)", "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 1000)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Project folder to ingest for coding-assistant mode.
    #[arrrg(optional, "Project folder to fold into the opening prompt", "DIR")]
    pub project: Option<String>,

    /// Directory transcripts are saved into.
    #[arrrg(optional, "Directory for saved transcripts (default: chat_histories)", "DIR")]
    pub history_dir: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved configuration for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The provider wire format to use.
    pub provider: ProviderKind,

    /// Explicit model override; `None` selects the provider default.
    pub model: Option<String>,

    /// Maximum tokens per response.
    pub max_tokens: u32,

    /// Project folder for coding-assistant mode, if any.
    pub project: Option<PathBuf>,

    /// Directory transcripts are saved into.
    pub history_dir: PathBuf,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new `ChatConfig` with default values.
    pub fn new() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            project: None,
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            use_color: true,
        }
    }

    /// Resolves command-line arguments into a configuration.
    ///
    /// Fails with a configuration error for an unknown provider name.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        let provider = match args.provider {
            Some(name) => name.parse::<ProviderKind>()?,
            None => ProviderKind::Anthropic,
        };

        Ok(Self {
            provider,
            model: args.model,
            max_tokens: args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            project: args.project.map(PathBuf::from),
            history_dir: args
                .history_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_DIR)),
            use_color: !args.no_color,
        })
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self> {
        Self::from_args(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.max_tokens, 1000);
        assert!(config.model.is_none());
        assert!(config.project.is_none());
        assert_eq!(config.history_dir, PathBuf::from("chat_histories"));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from_args(ChatArgs::default()).unwrap();
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            provider: Some("openai".to_string()),
            model: Some("gpt-4".to_string()),
            max_tokens: Some(2048),
            project: Some("my-project".to_string()),
            history_dir: Some("transcripts".to_string()),
            no_color: true,
        };
        let config = ChatConfig::from_args(args).unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, Some("gpt-4".to_string()));
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.project, Some(PathBuf::from("my-project")));
        assert_eq!(config.history_dir, PathBuf::from("transcripts"));
        assert!(!config.use_color);
    }

    #[test]
    fn unknown_provider_rejected() {
        let args = ChatArgs {
            provider: Some("cohere".to_string()),
            ..ChatArgs::default()
        };
        let err = ChatConfig::from_args(args).unwrap_err();
        assert!(err.is_configuration());
    }
}
