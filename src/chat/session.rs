//! Core chat session management.
//!
//! One session drives one conversation: it dispatches each user message
//! through the [`ProviderClient`], prices the resulting usage against the
//! [`PricingTable`], and accumulates running totals. A failed turn surfaces
//! its error and leaves both history and totals untouched; the session
//! continues.

use crate::client::ProviderClient;
use crate::error::Result;
use crate::observability::{SESSION_TURNS, SESSION_UNPRICED_TURNS};
use crate::pricing::PricingTable;
use crate::providers::ProviderKind;
use crate::types::{TokenUsage, Turn};

/// Running accumulator for a session's usage and spend.
///
/// Updated once per completed turn, reset only by process restart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionTotals {
    /// Total dollar cost of all priced turns.
    pub total_cost: f64,

    /// Total input tokens across all turns.
    pub total_input_tokens: u64,

    /// Total output tokens across all turns.
    pub total_output_tokens: u64,

    /// Turns whose model had no pricing entry. These contribute zero to
    /// `total_cost` but must be reported as "unknown", not as free.
    pub unpriced_turns: u64,
}

/// The outcome of one completed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// The assistant's response text.
    pub text: String,

    /// Token usage for this exchange.
    pub usage: TokenUsage,

    /// Dollar cost of this exchange; `None` when the model is not in the
    /// pricing table.
    pub cost: Option<f64>,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The provider wire format in use.
    pub provider: ProviderKind,

    /// The active model.
    pub model: String,

    /// Completed turns so far.
    pub turns: u64,

    /// Entries in the conversation history (two per completed turn).
    pub history_len: usize,

    /// Running usage and spend totals.
    pub totals: SessionTotals,
}

/// A chat session owning the provider client and the accounting state.
pub struct ChatSession {
    client: ProviderClient,
    pricing: PricingTable,
    totals: SessionTotals,
    turns: u64,
}

impl ChatSession {
    /// Creates a new chat session.
    pub fn new(client: ProviderClient, pricing: PricingTable) -> Self {
        Self {
            client,
            pricing,
            totals: SessionTotals::default(),
            turns: 0,
        }
    }

    /// Sends one user message and accounts for the exchange.
    ///
    /// # Errors
    ///
    /// Returns the client's error unchanged when the request fails; in that
    /// case no totals are updated and no history is appended.
    pub async fn send(&mut self, input: &str) -> Result<TurnReport> {
        let (text, usage) = self.client.send_request(input).await?;
        Ok(self.account(text, usage))
    }

    fn account(&mut self, text: String, usage: TokenUsage) -> TurnReport {
        SESSION_TURNS.click();
        let cost = self
            .pricing
            .cost(&self.client.model, usage.input_tokens, usage.output_tokens);

        match cost {
            Some(cost) => self.totals.total_cost += cost,
            None => {
                SESSION_UNPRICED_TURNS.click();
                self.totals.unpriced_turns += 1;
            }
        }
        self.totals.total_input_tokens += usage.input_tokens;
        self.totals.total_output_tokens += usage.output_tokens;
        self.turns += 1;

        TurnReport { text, usage, cost }
    }

    /// The running session totals.
    pub fn totals(&self) -> &SessionTotals {
        &self.totals
    }

    /// The conversation history, in dialogue order.
    pub fn history(&self) -> &[Turn] {
        self.client.history()
    }

    /// The active model.
    pub fn model(&self) -> &str {
        &self.client.model
    }

    /// Changes the active model. Affects subsequent requests and pricing
    /// lookups only.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.client.model = model.into();
    }

    /// The provider wire format in use.
    pub fn provider_kind(&self) -> ProviderKind {
        self.client.provider_kind()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            provider: self.client.provider_kind(),
            model: self.client.model.clone(),
            turns: self.turns,
            history_len: self.client.history().len(),
            totals: self.totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn session_for(models: &[&str]) -> ChatSession {
        let config = ProviderConfig::new(
            "test-api-key",
            "https://api.openai.com/v1/chat/completions",
            models.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap();
        let client = ProviderClient::new(ProviderKind::OpenAi, &config).unwrap();
        ChatSession::new(client, PricingTable::new())
    }

    #[test]
    fn totals_accumulate_across_turns() {
        let mut session = session_for(&["gpt-4"]);

        let first = session.account("one".to_string(), TokenUsage::new(1_000_000, 0));
        let second = session.account("two".to_string(), TokenUsage::new(0, 1_000_000));

        assert_eq!(first.cost, Some(30.0));
        assert_eq!(second.cost, Some(60.0));

        let totals = session.totals();
        assert_eq!(totals.total_cost, 90.0);
        assert_eq!(totals.total_input_tokens, 1_000_000);
        assert_eq!(totals.total_output_tokens, 1_000_000);
        assert_eq!(totals.unpriced_turns, 0);
    }

    #[test]
    fn unknown_model_counts_as_unpriced_not_free() {
        let mut session = session_for(&["secret-model"]);

        let report = session.account("hi".to_string(), TokenUsage::new(100, 200));

        assert_eq!(report.cost, None);
        let totals = session.totals();
        assert_eq!(totals.total_cost, 0.0);
        assert_eq!(totals.unpriced_turns, 1);
        // Token counters still accumulate for unpriced turns.
        assert_eq!(totals.total_input_tokens, 100);
        assert_eq!(totals.total_output_tokens, 200);
    }

    #[test]
    fn recovered_turns_contribute_zero_not_nothing() {
        // A sentinel-fallback turn carries zero usage but still counts.
        let mut session = session_for(&["gpt-4"]);
        session.account("ok".to_string(), TokenUsage::new(10, 20));
        session.account("No response received.".to_string(), TokenUsage::zero());

        let stats = session.stats();
        assert_eq!(stats.turns, 2);
        assert_eq!(stats.totals.total_input_tokens, 10);
        assert_eq!(stats.totals.total_output_tokens, 20);
        assert_eq!(stats.totals.unpriced_turns, 0);
    }

    #[test]
    fn model_change_affects_pricing_lookup() {
        let mut session = session_for(&["gpt-4"]);
        session.set_model("unknown-model");

        let report = session.account("hi".to_string(), TokenUsage::new(1, 1));
        assert_eq!(report.cost, None);
        assert_eq!(session.model(), "unknown-model");
    }

    #[test]
    fn pricing_is_case_insensitive_through_session() {
        let mut session = session_for(&["GPT-4"]);
        let report = session.account("hi".to_string(), TokenUsage::new(1_000_000, 0));
        assert_eq!(report.cost, Some(30.0));
    }
}
