//! Token counting with graceful degradation.
//!
//! Three tiers implement [`TokenCounter`]:
//!
//! - [`ExactCounter`]: the tokenizer registered for the requested model.
//! - [`FallbackCounter`]: the generic `cl100k_base` encoding, used when the
//!   model name is not recognised.
//! - [`HeuristicCounter`]: one token per three characters, used when no
//!   tokenizer is compiled in.
//!
//! [`Capability::detect`] runs once at startup and [`select_counter`] picks a
//! tier from it. Callers never branch on availability themselves.

use crate::core::TokenCounter;
use crate::domain::model::{CountMethod, TokenCount};

/// Characters per token assumed by the heuristic tier.
pub const CHARS_PER_TOKEN: usize = 3;

/// Name of the generic encoding used by the fallback tier.
pub const FALLBACK_ENCODING: &str = "cl100k_base";

/// Whether an exact tokenizer is available in this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Tokenizer,
    Unavailable,
}

impl Capability {
    pub fn detect() -> Self {
        if cfg!(feature = "tiktoken") {
            Capability::Tokenizer
        } else {
            Capability::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Tokenizer)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn method(&self) -> CountMethod {
        CountMethod::Approx
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count() / CHARS_PER_TOKEN
    }
}

#[cfg(feature = "tiktoken")]
pub use tokenizer::{ExactCounter, FallbackCounter};

#[cfg(feature = "tiktoken")]
mod tokenizer {
    use super::FALLBACK_ENCODING;
    use crate::core::TokenCounter;
    use crate::domain::model::CountMethod;
    use crate::utils::error::{PromptError, Result};
    use tiktoken_rs::CoreBPE;

    pub struct ExactCounter {
        model: String,
        bpe: CoreBPE,
    }

    impl ExactCounter {
        /// Fails when the model name has no registered tokenizer.
        pub fn for_model(model: &str) -> Result<Self> {
            let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
                PromptError::TokenizerError {
                    message: format!("{}: {}", model, e),
                }
            })?;
            Ok(Self {
                model: model.to_string(),
                bpe,
            })
        }

        pub fn model(&self) -> &str {
            &self.model
        }
    }

    impl TokenCounter for ExactCounter {
        fn method(&self) -> CountMethod {
            CountMethod::Exact
        }

        fn count_tokens(&self, text: &str) -> usize {
            self.bpe.encode_with_special_tokens(text).len()
        }
    }

    pub struct FallbackCounter {
        bpe: CoreBPE,
    }

    impl FallbackCounter {
        pub fn new() -> Result<Self> {
            let bpe = tiktoken_rs::cl100k_base().map_err(|e| PromptError::TokenizerError {
                message: format!("{}: {}", FALLBACK_ENCODING, e),
            })?;
            Ok(Self { bpe })
        }
    }

    impl TokenCounter for FallbackCounter {
        fn method(&self) -> CountMethod {
            CountMethod::Fallback
        }

        fn count_tokens(&self, text: &str) -> usize {
            self.bpe.encode_with_special_tokens(text).len()
        }
    }
}

/// Picks the most precise counter the capability and model name allow.
pub fn select_counter(model: &str, capability: Capability) -> Box<dyn TokenCounter> {
    if capability.is_available() {
        #[cfg(feature = "tiktoken")]
        {
            match ExactCounter::for_model(model) {
                Ok(counter) => {
                    tracing::debug!("Using exact tokenizer for {}", counter.model());
                    return Box::new(counter);
                }
                Err(e) => tracing::debug!("{}", e),
            }

            match FallbackCounter::new() {
                Ok(counter) => {
                    tracing::warn!(
                        "Model '{}' not recognised, counting with {}",
                        model,
                        FALLBACK_ENCODING
                    );
                    return Box::new(counter);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }

        #[cfg(not(feature = "tiktoken"))]
        tracing::warn!("No tokenizer compiled in for '{}'", model);
    }

    tracing::debug!("Counting tokens for '{}' by character heuristic", model);
    Box::new(HeuristicCounter)
}

/// One-shot count. Prefer building a counter with [`select_counter`] for batches.
pub fn count_units(text: &str, model: &str, capability: Capability) -> TokenCount {
    select_counter(model, capability).count(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_divides_chars_by_three() {
        let counter = HeuristicCounter;
        assert_eq!(counter.count_tokens(""), 0);
        assert_eq!(counter.count_tokens("ab"), 0);
        assert_eq!(counter.count_tokens("abcdefg"), 2);
        assert_eq!(counter.count_tokens(&"x".repeat(300)), 100);
    }

    #[test]
    fn test_heuristic_counts_chars_not_bytes() {
        // 6 characters, 18 bytes
        assert_eq!(HeuristicCounter.count_tokens("日本語日本語"), 2);
    }

    #[test]
    fn test_unavailable_capability_is_approx() {
        let result = count_units(&"a".repeat(301), "gpt-4o", Capability::Unavailable);
        assert_eq!(result.count, 100);
        assert_eq!(result.method, CountMethod::Approx);
    }

    #[test]
    fn test_detect_matches_build_features() {
        assert_eq!(
            Capability::detect().is_available(),
            cfg!(feature = "tiktoken")
        );
    }

    #[cfg(feature = "tiktoken")]
    #[test]
    fn test_known_model_is_exact() {
        let text = "Hello, world! This is a prompt.";
        let result = count_units(text, "gpt-4o", Capability::Tokenizer);

        let expected = tiktoken_rs::get_bpe_from_model("gpt-4o")
            .unwrap()
            .encode_with_special_tokens(text)
            .len();
        assert_eq!(result.method, CountMethod::Exact);
        assert_eq!(result.count, expected);
    }

    #[cfg(feature = "tiktoken")]
    #[test]
    fn test_unknown_model_falls_back_to_base_encoding() {
        let text = "Hello, world! This is a prompt.";
        let result = count_units(text, "no-such-model", Capability::Tokenizer);

        let expected = tiktoken_rs::cl100k_base()
            .unwrap()
            .encode_with_special_tokens(text)
            .len();
        assert_eq!(result.method, CountMethod::Fallback);
        assert_eq!(result.count, expected);
    }
}
