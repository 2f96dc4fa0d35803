//! Fixed tokenizer for all budget arithmetic.
//!
//! Every size comparison and truncation cut point in the pipeline goes
//! through the same `o200k_base` encoding, so "already under budget" checks
//! and "truncate to N tokens" operations agree bit-for-bit. Byte or
//! character heuristics are never mixed into budget decisions.

use tiktoken_rs::CoreBPE;

use crate::error::ReposcribeError;

/// Token counter wrapping the `o200k_base` BPE.
///
/// Construct once at startup and pass by reference; the underlying encoder
/// is immutable and the construction cost (loading the vocabulary) is paid a
/// single time per process.
pub struct TokenCounter {
    bpe: CoreBPE,
}

impl TokenCounter {
    /// Load the `o200k_base` encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ReposcribeError::Tokenizer`] if the embedded vocabulary
    /// fails to load.
    pub fn new() -> Result<Self, ReposcribeError> {
        let bpe = tiktoken_rs::o200k_base()
            .map_err(|e| ReposcribeError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }

    /// Token count of `text`.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Truncate `text` to at most `max_tokens` tokens.
    ///
    /// Returns the input unchanged when it already fits. The cut lands on a
    /// token boundary; when that boundary would split a multi-byte
    /// character, the cut backs off token by token until it decodes cleanly.
    /// Line-boundary backoff is the caller's concern.
    #[must_use]
    pub fn truncate(&self, text: &str, max_tokens: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return text.to_string();
        }
        let mut end = max_tokens;
        loop {
            match self.bpe.decode(tokens[..end].to_vec()) {
                Ok(s) => return s,
                Err(_) if end > 0 => end -= 1,
                Err(_) => return String::new(),
            }
        }
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("encoding", &"o200k_base")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> TokenCounter {
        TokenCounter::new().expect("o200k_base loads")
    }

    #[test]
    fn count_is_deterministic() {
        let c = counter();
        let text = "fn main() {\n    println!(\"hello\");\n}\n";
        assert_eq!(c.count(text), c.count(text));
        assert!(c.count(text) > 0);
        assert_eq!(c.count(""), 0);
    }

    #[test]
    fn truncate_is_identity_under_limit() {
        let c = counter();
        let text = "short text";
        assert_eq!(c.truncate(text, 1_000), text);
    }

    #[test]
    fn truncate_respects_token_limit() {
        let c = counter();
        let text = "one two three four five six seven eight nine ten ".repeat(50);
        let cut = c.truncate(&text, 40);
        assert!(c.count(&cut) <= 40);
        assert!(text.starts_with(&cut));
    }

    #[test]
    fn truncate_to_zero_is_empty() {
        let c = counter();
        assert_eq!(c.truncate("some text here", 0), "");
    }
}
