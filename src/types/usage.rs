use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Token counts reported by a provider for one exchange.
///
/// Providers bill by token counts; one `TokenUsage` is produced per completed
/// request/response cycle and never mutated afterwards.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// The number of input tokens which were used.
    pub input_tokens: u64,

    /// The number of output tokens which were used.
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Create a new `TokenUsage` with the given input and output tokens.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// A zero usage record, reported when a provider omits the usage field.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage {
            input_tokens: self.input_tokens.saturating_add(rhs.input_tokens),
            output_tokens: self.output_tokens.saturating_add(rhs.output_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn usage_serialization() {
        let usage = TokenUsage::new(50, 100);
        let json = to_value(usage).unwrap();

        assert_eq!(
            json,
            json!({
                "input_tokens": 50,
                "output_tokens": 100
            })
        );
    }

    #[test]
    fn usage_addition() {
        let total = TokenUsage::new(10, 20) + TokenUsage::new(5, 7);
        assert_eq!(total, TokenUsage::new(15, 27));
    }

    #[test]
    fn zero_usage() {
        let usage = TokenUsage::zero();
        assert_eq!(usage.input_tokens, 0);
        assert_eq!(usage.output_tokens, 0);
    }
}
