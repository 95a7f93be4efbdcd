//! Tokenizer for pre-annotated input.
//!
//! Treebank-style corpora arrive already lemmatized and tagged. Each line
//! holds one token:
//!
//! ```text
//! form <TAB> lemma <TAB> native tag <TAB> relation
//! ```
//!
//! Trailing columns may be omitted and `_` marks an empty column. A blank line
//! ends a sentence. A comment line `# ref = 1.4` assigns the dotted reference
//! to the declared divisions for the tokens that follow.

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Meta, Mode, Token, TokenStream};
use crate::analysis::tokenizer::{Tokenizer, whole_input};
use crate::error::Result;

/// A tokenizer for one-token-per-line annotated input.
#[derive(Clone, Debug, Default)]
pub struct TaggedTokenizer {
    divisions: Vec<String>,
}

fn column(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "_")
        .map(str::to_string)
}

impl TaggedTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer that honours `# ref = ...` comment lines.
    pub fn with_meta<I, S>(divisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TaggedTokenizer {
            divisions: divisions.into_iter().map(Into::into).collect(),
        }
    }

    fn index_tokens(&self, text: &str, ctx: &AnalysisContext) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut meta = Meta::new();
        let mut sent_id = 0;
        let mut sent_pos = 0;
        let mut offset = 0;

        for line in text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                if sent_pos > 0 {
                    sent_id += 1;
                    sent_pos = 0;
                }
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some((key, reference)) = comment.split_once('=')
                    && key.trim() == "ref"
                {
                    meta = Meta::new();
                    for (division, value) in self.divisions.iter().zip(reference.trim().split('.')) {
                        meta.set(division.as_str(), value);
                    }
                }
                continue;
            }

            let mut columns = line.split('\t');
            let Some(form) = column(columns.next()) else {
                continue;
            };
            let length = form.chars().count();
            let mut token = Token::index(form, tokens.len(), offset, offset + length)
                .with_meta(meta.clone())
                .with_removestops(ctx.removestops);
            token.lemma = column(columns.next());
            token.morpho = column(columns.next());
            token.morphosyntax = column(columns.next());
            token.sent_id = Some(sent_id);
            token.sent_pos = Some(sent_pos);

            sent_pos += 1;
            offset += length + 1;
            tokens.push(token);
        }
        tokens
    }
}

impl Tokenizer for TaggedTokenizer {
    fn tokenize(&self, text: &str, ctx: &AnalysisContext) -> Result<TokenStream> {
        match ctx.mode {
            Mode::Index => Ok(Box::new(self.index_tokens(text, ctx).into_iter())),
            Mode::Query | Mode::Skip => Ok(whole_input(text, ctx)),
        }
    }

    fn name(&self) -> &'static str {
        "tagged"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "\
# ref = 1.1
Arma\tarma\tn-p---na-\tOBJ
virumque\tvir\tn-s---ma-\tOBJ_CO
cano\tcano\tv1spia---\tPRED

Troiae\tTroia\t_
";

    #[test]
    fn test_columns() {
        let tokenizer = TaggedTokenizer::with_meta(["book", "line"]);
        let tokens: Vec<_> = tokenizer
            .tokenize(SENTENCE, &AnalysisContext::index(1))
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].text, "virumque");
        assert_eq!(tokens[1].lemma.as_deref(), Some("vir"));
        assert_eq!(tokens[1].morpho.as_deref(), Some("n-s---ma-"));
        assert_eq!(tokens[1].morphosyntax.as_deref(), Some("OBJ_CO"));
        assert_eq!(tokens[1].meta.get("line"), Some("1"));

        assert_eq!(tokens[3].morpho, None);
        assert_eq!(tokens[3].morphosyntax, None);
    }

    #[test]
    fn test_sentences_and_offsets() {
        let tokens: Vec<_> = TaggedTokenizer::new()
            .tokenize(SENTENCE, &AnalysisContext::index(1))
            .unwrap()
            .collect();

        assert_eq!(tokens[2].sent_id, Some(0));
        assert_eq!(tokens[3].sent_id, Some(1));
        assert_eq!(tokens[3].sent_pos, Some(0));
        // offsets as if the forms were joined by single spaces
        assert_eq!(tokens[1].startchar, 5);
        assert_eq!(tokens[1].endchar, 13);
        assert!(!tokens[0].is_structural());
    }
}
