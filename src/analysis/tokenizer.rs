//! Tokenizers: the first stage of every pipeline.
//!
//! A tokenizer turns one raw unit of a corpus (or a query atom) into a token
//! stream and stamps the invocation's [`Mode`] on every token.
//!
//! # Available Tokenizers
//!
//! - [`plain::PlainTextTokenizer`] - Unicode word boundaries over running text
//! - [`tagged::TaggedTokenizer`] - Pre-annotated one-token-per-line input
//!
//! In query and skip mode both tokenizers emit their whole (trimmed) input as
//! a single token: the query parser has already isolated the atom.
//!
//! # Examples
//!
//! ```
//! use cylleneus::analysis::pipeline::AnalysisContext;
//! use cylleneus::analysis::tokenizer::Tokenizer;
//! use cylleneus::analysis::tokenizer::plain::PlainTextTokenizer;
//!
//! let tokenizer = PlainTextTokenizer::new();
//! let tokens: Vec<_> = tokenizer
//!     .tokenize("Arma virumque cano", &AnalysisContext::index(0))
//!     .unwrap()
//!     .collect();
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[1].text, "virumque");
//! assert_eq!(tokens[1].pos, 1);
//! ```

pub mod plain;
pub mod tagged;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, Token, TokenStream};
use crate::error::Result;

/// Trait for tokenizers that convert raw text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text` for the given invocation.
    fn tokenize(&self, text: &str, ctx: &AnalysisContext) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Emit the input as one token, as query and skip mode require.
pub(crate) fn whole_input(text: &str, ctx: &AnalysisContext) -> TokenStream {
    let text = match ctx.mode {
        Mode::Skip => text,
        Mode::Index | Mode::Query => text.trim(),
    };
    if text.is_empty() {
        return Box::new(std::iter::empty());
    }
    let mut token = Token::new(text, ctx.mode).with_removestops(ctx.removestops);
    token.endchar = text.chars().count();
    Box::new(std::iter::once(token))
}

/// Characters after which a new sentence starts.
pub(crate) fn ends_sentence(segment: &str) -> bool {
    segment
        .chars()
        .any(|c| matches!(c, '.' | ';' | '?' | '!' | '\u{00B7}' | '\u{0387}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_input() {
        let tokens: Vec<_> = whole_input("  virtus ", &AnalysisContext::query()).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "virtus");
        assert_eq!(tokens[0].mode, Mode::Query);

        let skipped: Vec<_> = whole_input(" raw ", &AnalysisContext::skip()).collect();
        assert_eq!(skipped[0].text, " raw ");

        assert_eq!(whole_input("   ", &AnalysisContext::query()).count(), 0);
    }

    #[test]
    fn test_sentence_enders() {
        assert!(ends_sentence(". "));
        assert!(ends_sentence("\u{0387}"));
        assert!(!ends_sentence(", "));
    }
}
