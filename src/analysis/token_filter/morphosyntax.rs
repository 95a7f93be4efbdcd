//! Morphosyntactic relation labels.

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;

/// Publishes the treebank relation label of each token.
///
/// Tokens without a label are dropped at index time.
#[derive(Clone, Copy, Debug, Default)]
pub struct MorphosyntaxFilter;

impl MorphosyntaxFilter {
    pub fn new() -> Self {
        MorphosyntaxFilter
    }
}

impl Filter for MorphosyntaxFilter {
    fn filter(&self, tokens: TokenStream, _ctx: &AnalysisContext) -> Result<TokenStream> {
        let Some((mode, tokens)) = split_mode(tokens) else {
            return Ok(empty());
        };
        match mode {
            Mode::Skip => Ok(tokens),
            Mode::Index => Ok(Box::new(tokens.filter_map(|mut token| {
                let label = token.morphosyntax.as_deref()?.trim().to_lowercase();
                if label.is_empty() {
                    return None;
                }
                token.text = label;
                Some(token)
            }))),
            Mode::Query => Ok(Box::new(tokens.map(|mut token| {
                token.text = token.text.trim().to_lowercase();
                token
            }))),
        }
    }

    fn name(&self) -> &'static str {
        "morphosyntax"
    }
}
