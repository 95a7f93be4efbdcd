//! Morphological annotation keys.
//!
//! In index mode the filter follows the lemma stage and publishes each
//! token's [`AnnotationKey`] (`lemma_morpho::uri:n>annotation`) as its text,
//! so that annotations stay linked to the lemma they were derived with.
//!
//! In query mode it turns an annotation atom into a 10-slot wildcard pattern
//! without consulting any lexicon: `:ACC.SG.` is a Leipzig gloss,
//! `|n-p----g--.` a raw canonical code.

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, Token, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;
use crate::morph::key::AnnotationKey;
use crate::morph::leipzig::LeipzigTagset;
use crate::morph::tag::Tag;

/// Publishes annotation keys and parses annotation patterns.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnnotationFilter;

impl AnnotationFilter {
    pub fn new() -> Self {
        AnnotationFilter
    }

    /// Convert annotation query text into a wildcard pattern.
    ///
    /// ```
    /// use cylleneus::analysis::token_filter::annotation::AnnotationFilter;
    ///
    /// let pattern = AnnotationFilter::pattern(":ACC.SG.").unwrap();
    /// assert_eq!(pattern.to_string(), "--s----a--");
    ///
    /// let raw = AnnotationFilter::pattern("|n-p----g--.").unwrap();
    /// assert_eq!(raw.to_string(), "n-p----g--");
    ///
    /// assert!(AnnotationFilter::pattern(":NONSENSE.").is_none());
    /// ```
    pub fn pattern(text: &str) -> Option<Tag> {
        let text = text.trim();
        match text.strip_prefix('|') {
            Some(code) => code.trim_end_matches('.').parse().ok(),
            None => LeipzigTagset::new().pattern(text),
        }
    }

    fn index(token: Token) -> Option<Token> {
        let key: AnnotationKey = token.morpho.as_deref()?.parse().ok()?;
        Some(token.with_text(key.to_string()))
    }

    fn query(token: Token) -> Option<Token> {
        match Self::pattern(&token.text) {
            Some(pattern) => Some(token.with_text(pattern.to_string())),
            None => {
                log::debug!("annotation '{}' resolves to nothing", token.text);
                None
            }
        }
    }
}

impl Filter for AnnotationFilter {
    fn filter(&self, tokens: TokenStream, _ctx: &AnalysisContext) -> Result<TokenStream> {
        let Some((mode, tokens)) = split_mode(tokens) else {
            return Ok(empty());
        };
        match mode {
            Mode::Skip => Ok(tokens),
            Mode::Index => Ok(Box::new(tokens.filter_map(Self::index))),
            Mode::Query => Ok(Box::new(tokens.filter_map(Self::query))),
        }
    }

    fn name(&self) -> &'static str {
        "annotation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tokens: Vec<Token>, ctx: AnalysisContext) -> Vec<String> {
        AnnotationFilter::new()
            .filter(Box::new(tokens.into_iter()), &ctx)
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_index_publishes_composite_key() {
        let lemma = Token::index("virtus:v0123=n-----f-3-", 0, 0, 8)
            .with_morpho("n-----f-3-::v0123:0>n-s---fa3-");
        let bare = Token::index("xyz", 1, 9, 12);
        assert_eq!(
            run(vec![lemma, bare], AnalysisContext::index(0)),
            vec!["n-----f-3-::v0123:0>n-s---fa3-"]
        );
    }

    #[test]
    fn test_query_patterns() {
        let out = run(
            vec![Token::query(":GEN.PL."), Token::query("|v3spia----"), Token::query(":FOO.")],
            AnalysisContext::query(),
        );
        assert_eq!(out, vec!["--p----g--", "v3spia----"]);
    }
}
