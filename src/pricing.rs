//! Static model pricing.
//!
//! Prices are expressed in dollars per million tokens, split into input and
//! output rates. The table is loaded once at startup and never mutated; an
//! unknown model is a valid "unknown cost" state, not an error.

use std::collections::HashMap;

/// Per-million-token prices for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingEntry {
    /// Dollars per million input tokens.
    pub input_per_million: f64,

    /// Dollars per million output tokens.
    pub output_per_million: f64,
}

impl PricingEntry {
    /// Create a new `PricingEntry`.
    pub fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }
}

/// Mapping from model identifier to [`PricingEntry`].
///
/// Lookups are case-insensitive; the table itself is keyed by lower-case
/// identifiers.
#[derive(Debug, Clone)]
pub struct PricingTable {
    entries: HashMap<String, PricingEntry>,
}

impl PricingTable {
    /// Creates the built-in pricing table.
    pub fn new() -> Self {
        let mut table = Self {
            entries: HashMap::new(),
        };
        table.insert("claude-3-haiku-20240307", PricingEntry::new(0.25, 1.25));
        table.insert("claude-3-sonnet-20240229", PricingEntry::new(3.0, 15.0));
        table.insert("claude-3-opus-20240229", PricingEntry::new(15.0, 75.0));
        table.insert("gpt-3.5-turbo", PricingEntry::new(0.5, 1.5));
        table.insert("gpt-4", PricingEntry::new(30.0, 60.0));
        table.insert("gpt-4-turbo-preview", PricingEntry::new(10.0, 30.0));
        table
    }

    /// Creates an empty pricing table.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds an entry, consuming and returning the table.
    pub fn with_entry(mut self, model: &str, entry: PricingEntry) -> Self {
        self.insert(model, entry);
        self
    }

    fn insert(&mut self, model: &str, entry: PricingEntry) {
        self.entries.insert(model.to_lowercase(), entry);
    }

    /// Looks up the pricing for a model, case-insensitively.
    ///
    /// Returns `None` for models not in the table.
    pub fn lookup(&self, model: &str) -> Option<&PricingEntry> {
        self.entries.get(&model.to_lowercase())
    }

    /// Computes the dollar cost of one exchange.
    ///
    /// Returns `None` when the model has no pricing entry; this is distinct
    /// from a real zero cost.
    pub fn cost(&self, model: &str, input_tokens: u64, output_tokens: u64) -> Option<f64> {
        let entry = self.lookup(model)?;
        let input_cost = entry.input_per_million * input_tokens as f64 / 1_000_000.0;
        let output_cost = entry.output_per_million * output_tokens as f64 / 1_000_000.0;
        Some(input_cost + output_cost)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpt4_input_price_exact() {
        let table = PricingTable::new();
        assert_eq!(table.cost("gpt-4", 1_000_000, 0), Some(30.0));
        assert_eq!(table.cost("gpt-4", 0, 1_000_000), Some(60.0));
    }

    #[test]
    fn unknown_model_is_absent_not_zero() {
        let table = PricingTable::new();
        assert_eq!(table.cost("unknown-model", 100, 100), None);
        assert!(table.lookup("unknown-model").is_none());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = PricingTable::new();
        assert_eq!(
            table.cost("GPT-4", 123, 456),
            table.cost("gpt-4", 123, 456)
        );
        assert!(table.lookup("Claude-3-Opus-20240229").is_some());
    }

    #[test]
    fn zero_tokens_cost_zero() {
        let table = PricingTable::new();
        assert_eq!(table.cost("gpt-4", 0, 0), Some(0.0));
    }

    #[test]
    fn mixed_cost_sums_both_rates() {
        let table = PricingTable::new();
        // 0.25/M in, 1.25/M out
        let cost = table.cost("claude-3-haiku-20240307", 2_000_000, 1_000_000);
        assert_eq!(cost, Some(0.5 + 1.25));
    }

    #[test]
    fn with_entry_extends_table() {
        let table = PricingTable::empty().with_entry("My-Model", PricingEntry::new(1.0, 2.0));
        assert_eq!(table.cost("my-model", 1_000_000, 1_000_000), Some(3.0));
    }
}
