//! Semantic fields.
//!
//! Index mode follows the lemma stage and replaces each lemma key with the
//! semantic-field codes of the lemma's senses. Query mode accepts either a
//! code (`{613}`, `{1.5}`) or English text (`{military}`), which is looked up
//! by name.

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;
use regex::Regex;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, Token, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;
use crate::lexicon::or_empty;
use crate::lexicon::wordnet::WordNet;
use crate::morph::key::LemmaKey;

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("semantic field code pattern"));

/// Maps lemmas to semantic-field codes.
#[derive(Clone, Debug)]
pub struct SemfieldFilter {
    wordnet: Arc<dyn WordNet>,
}

impl SemfieldFilter {
    pub fn new(wordnet: Arc<dyn WordNet>) -> Self {
        SemfieldFilter { wordnet }
    }

    /// Whether `text` is a semantic-field code rather than a name.
    pub fn is_code(text: &str) -> bool {
        CODE.is_match(text)
    }

    pub fn expand(&self, token: &Token) -> Vec<Token> {
        let Ok(key) = token.text.parse::<LemmaKey>() else {
            return Vec::new();
        };
        let mut seen = AHashSet::new();
        or_empty(self.wordnet.synsets(&key.uri), "wordnet synsets")
            .into_iter()
            .flat_map(|synset| synset.semfields)
            .filter(|code| seen.insert(code.clone()))
            .map(|code| token.with_text(code))
            .collect()
    }

    pub fn resolve(&self, token: &Token) -> Vec<Token> {
        let text = token.text.trim();
        if Self::is_code(text) {
            return vec![token.with_text(text)];
        }
        let mut seen = AHashSet::new();
        let resolved: Vec<Token> = or_empty(self.wordnet.semfields(None, Some(text)), "wordnet semfields")
            .into_iter()
            .filter(|field| seen.insert(field.code.clone()))
            .map(|field| token.with_text(field.code))
            .collect();
        if resolved.is_empty() {
            log::debug!("semantic field '{text}' resolves to nothing");
        }
        resolved
    }
}

impl Filter for SemfieldFilter {
    fn filter(&self, tokens: TokenStream, _ctx: &AnalysisContext) -> Result<TokenStream> {
        let Some((mode, tokens)) = split_mode(tokens) else {
            return Ok(empty());
        };
        let filter = self.clone();
        match mode {
            Mode::Skip => Ok(tokens),
            Mode::Index => Ok(Box::new(tokens.flat_map(move |token| filter.expand(&token)))),
            Mode::Query => Ok(Box::new(tokens.flat_map(move |token| filter.resolve(&token)))),
        }
    }

    fn name(&self) -> &'static str {
        "semfield"
    }
}
