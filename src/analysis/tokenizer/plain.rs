//! Running-text tokenizer.
//!
//! Splits text on Unicode word boundaries (UAX #29). When a meta shape is
//! declared, every line is read as `<reference>\t<text>` and the dotted
//! reference is assigned to the declared divisions:
//!
//! ```
//! use cylleneus::analysis::pipeline::AnalysisContext;
//! use cylleneus::analysis::tokenizer::Tokenizer;
//! use cylleneus::analysis::tokenizer::plain::PlainTextTokenizer;
//!
//! let tokenizer = PlainTextTokenizer::with_meta(["poem", "line"]);
//! let text = "1.1\tArma virumque cano\n1.2\tTroiae qui primus";
//! let tokens: Vec<_> = tokenizer
//!     .tokenize(text, &AnalysisContext::index(7))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(tokens[3].text, "Troiae");
//! assert_eq!(tokens[3].meta.get("line"), Some("2"));
//! assert_eq!(tokens[3].pos, 3);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Meta, Mode, Token, TokenStream};
use crate::analysis::tokenizer::{Tokenizer, ends_sentence, whole_input};
use crate::error::Result;

/// A tokenizer for plain running text.
#[derive(Clone, Debug, Default)]
pub struct PlainTextTokenizer {
    divisions: Vec<String>,
}

impl PlainTextTokenizer {
    /// Create a tokenizer without structural meta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer that reads a dotted reference before each line.
    pub fn with_meta<I, S>(divisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlainTextTokenizer {
            divisions: divisions.into_iter().map(Into::into).collect(),
        }
    }

    /// The declared meta shape.
    pub fn divisions(&self) -> &[String] {
        &self.divisions
    }

    fn meta_for(&self, reference: &str) -> Meta {
        let mut meta = Meta::new();
        for (division, value) in self.divisions.iter().zip(reference.split('.')) {
            meta.set(division.as_str(), value);
        }
        meta
    }

    fn index_tokens(&self, text: &str, ctx: &AnalysisContext) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut sent_id = 0;
        let mut sent_pos = 0;
        // character offset of the current line start
        let mut line_chars = 0;

        for line in text.split_inclusive('\n') {
            let (meta, body, body_offset) = match (self.divisions.is_empty(), line.split_once('\t')) {
                (false, Some((reference, body))) => (
                    self.meta_for(reference.trim()),
                    body,
                    reference.chars().count() + 1,
                ),
                _ => (Meta::new(), line, 0),
            };

            let mut chars_before = line_chars + body_offset;
            let mut last_byte = 0;
            for (byte, segment) in body.split_word_bound_indices() {
                chars_before += body[last_byte..byte].chars().count();
                last_byte = byte;

                if !segment.chars().any(char::is_alphanumeric) {
                    if ends_sentence(segment) && sent_pos > 0 {
                        sent_id += 1;
                        sent_pos = 0;
                    }
                    continue;
                }

                let length = segment.chars().count();
                let mut token = Token::index(segment, tokens.len(), chars_before, chars_before + length)
                    .with_meta(meta.clone())
                    .with_removestops(ctx.removestops);
                token.sent_id = Some(sent_id);
                token.sent_pos = Some(sent_pos);
                sent_pos += 1;
                tokens.push(token);
            }
            line_chars += line.chars().count();
        }
        tokens
    }
}

impl Tokenizer for PlainTextTokenizer {
    fn tokenize(&self, text: &str, ctx: &AnalysisContext) -> Result<TokenStream> {
        match ctx.mode {
            Mode::Index => Ok(Box::new(self.index_tokens(text, ctx).into_iter())),
            Mode::Query | Mode::Skip => Ok(whole_input(text, ctx)),
        }
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(text: &str) -> Vec<Token> {
        PlainTextTokenizer::new()
            .tokenize(text, &AnalysisContext::index(0))
            .unwrap()
            .collect()
    }

    #[test]
    fn test_positions_and_offsets() {
        let tokens = index("Gallia est omnis divisa");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[2].text, "omnis");
        assert_eq!(tokens[2].pos, 2);
        assert_eq!(tokens[2].startchar, 11);
        assert_eq!(tokens[2].endchar, 16);
        assert!(tokens.iter().all(|t| t.mode == Mode::Index));
    }

    #[test]
    fn test_offsets_count_characters() {
        let tokens = index("μῆνιν ἄειδε θεὰ");
        let start = "μῆνιν ".chars().count();
        assert_eq!(tokens[1].text, "ἄειδε");
        assert_eq!(tokens[1].startchar, start);
        assert_eq!(tokens[1].endchar, start + "ἄειδε".chars().count());
    }

    #[test]
    fn test_sentences() {
        let tokens = index("Veni. Vidi; vici!");
        let sentences: Vec<_> = tokens.iter().map(|t| (t.sent_id, t.sent_pos)).collect();
        assert_eq!(
            sentences,
            vec![(Some(0), Some(0)), (Some(1), Some(0)), (Some(2), Some(0))]
        );
    }

    #[test]
    fn test_meta_lines() {
        let tokenizer = PlainTextTokenizer::with_meta(["book", "line"]);
        let tokens: Vec<_> = tokenizer
            .tokenize("1.1\tarma cano\n1.2\tTroiae", &AnalysisContext::index(0))
            .unwrap()
            .collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].meta.get("book"), Some("1"));
        assert_eq!(tokens[2].meta.get("line"), Some("2"));
        assert!(tokens[0].is_structural());
        // offsets point into the full input, past the reference
        assert_eq!(tokens[0].startchar, 4);
        assert_eq!(tokens[2].startchar, 18);
    }

    #[test]
    fn test_query_mode_emits_single_token() {
        let tokens: Vec<_> = PlainTextTokenizer::new()
            .tokenize(" virt* ", &AnalysisContext::query())
            .unwrap()
            .collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "virt*");
        assert_eq!(tokens[0].mode, Mode::Query);
    }
}
