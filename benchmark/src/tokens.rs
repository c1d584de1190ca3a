//! @ai:module:intent Approximate token cost of text for both execution modes
//! @ai:module:layer domain
//! @ai:module:public_api TokenEstimator, TokenEstimatorTrait, TokenCount
//! @ai:module:stateless true
//!
//! This is a character/punctuation heuristic, not a tokenizer. It is applied
//! identically to semantic and naive payloads so the two stay comparable.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// @ai:intent Token usage of one operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub input: u64,
    pub output: u64,
    pub total: u64,
}

/// @ai:intent Trait for token estimation
pub trait TokenEstimatorTrait: Send + Sync {
    /// @ai:intent Estimate the token cost of text
    /// @ai:post estimate("") == 0
    /// @ai:post estimate(a + b) >= estimate(a)
    fn estimate(&self, text: &str) -> u64;

    /// @ai:intent Estimate input context and output payload of one operation
    /// @ai:post total == input + output
    fn count_operation(&self, input: &str, output: &str) -> TokenCount {
        let input = self.estimate(input);
        let output = self.estimate(output);
        TokenCount {
            input,
            output,
            total: input + output,
        }
    }
}

/// @ai:intent Four characters per token plus 0.3 per punctuation or operator character
pub struct TokenEstimator {
    whitespace: Regex,
    punctuation: Regex,
}

impl TokenEstimator {
    /// @ai:intent Create a new estimator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("valid whitespace regex"),
            punctuation: Regex::new(r#"[{}()\[\].,;:"'`=+\-*/\\<>!@#$%^&|~]"#)
                .expect("valid punctuation regex"),
        }
    }

    /// @ai:intent Trim and collapse whitespace runs to one space
    /// @ai:example ("  a \n\t b ") -> "a b"
    /// @ai:effects pure
    pub fn normalize(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimatorTrait for TokenEstimator {
    fn estimate(&self, text: &str) -> u64 {
        let normalized = self.normalize(text);
        if normalized.is_empty() {
            return 0;
        }

        let length = normalized.chars().count() as u64;
        let punctuation = self.punctuation.find_iter(&normalized).count() as u64;

        // length / 4 + 0.3 * punctuation, truncated, in exact integer form
        (10 * length + 12 * punctuation) / 40
    }
}
