//! Lemmatization against a WordNet lexicon.
//!
//! # Index mode
//!
//! Every surface form fans out to all `(lemma, tag, lexicon entry)`
//! combinations it can stand for:
//!
//! 1. The analyses come from the token itself when the corpus is annotated,
//!    otherwise from the [`Lemmatizer`].
//! 2. Each native tag converts to canonical tags through the corpus tagset.
//!    An analysis whose tag does not convert is dropped.
//! 3. Each lemma is looked up in the lexicon, restricted to the tag's part of
//!    speech.
//!
//! Each combination becomes one token whose text is the `lemma:uri=morpho`
//! key and whose `morpho` is the [`AnnotationKey`] linking the form's
//! annotation to that lemma. Forms without any lexicon entry are dropped.
//!
//! # Query mode
//!
//! - `virtus` - every lexicon entry with that citation form
//! - `virtus:v0123=n-----f-3-` - that exact key (a malformed key matches nothing)
//! - `virt*` - passed through for prefix expansion against the index
//! - a token carrying a lexical relation - the targets of that relation

use std::sync::Arc;

use ahash::AHashSet;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, Token, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;
use crate::lexicon::lemmatizer::{FormAnalysis, Lemmatizer};
use crate::lexicon::or_empty;
use crate::lexicon::wordnet::{LemmaEntry, WordNet};
use crate::morph::key::{AnnotationKey, LemmaKey};
use crate::morph::tag::Tag;
use crate::morph::tagset::Tagset;

/// Maps forms to lemma keys.
#[derive(Clone, Debug)]
pub struct LemmaFilter {
    wordnet: Arc<dyn WordNet>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
    tagset: Arc<dyn Tagset>,
}

impl LemmaFilter {
    pub fn new(wordnet: Arc<dyn WordNet>, tagset: Arc<dyn Tagset>) -> Self {
        LemmaFilter {
            wordnet,
            lemmatizer: None,
            tagset,
        }
    }

    /// Analyse unannotated forms with `lemmatizer`.
    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    fn analyses(&self, token: &Token) -> Vec<FormAnalysis> {
        if let Some(lemma) = &token.lemma {
            return vec![FormAnalysis::new(lemma.as_str(), token.morpho.as_deref())];
        }
        match &self.lemmatizer {
            Some(lemmatizer) => or_empty(lemmatizer.analyze(&token.text), "lemmatizer"),
            None => Vec::new(),
        }
    }

    fn tags(&self, analysis: &FormAnalysis) -> Vec<Tag> {
        match &analysis.morpho {
            Some(native) => {
                let tags = self.tagset.to_canonical(native);
                if tags.is_empty() {
                    log::debug!(
                        "dropping analysis '{}' with unrecognized {} tag '{native}'",
                        analysis.lemma,
                        self.tagset.name()
                    );
                }
                tags
            }
            None => vec![Tag::EMPTY],
        }
    }

    /// All lemma tokens for one indexed form.
    pub fn expand(&self, token: &Token) -> Vec<Token> {
        let mut seen = AHashSet::new();
        let mut expanded = Vec::new();

        for (n, analysis) in self.analyses(token).iter().enumerate() {
            for tag in self.tags(analysis) {
                let entries = or_empty(
                    self.wordnet.lemmas(Some(&analysis.lemma), tag.pos(), None),
                    "wordnet lemmas",
                );
                for entry in entries {
                    let key = LemmaKey::new(entry.lemma.as_str(), entry.uri.as_str(), entry.morpho);
                    let annotation =
                        AnnotationKey::new(entry.morpho, entry.uri.as_str(), n, tag.merge(&entry.morpho));
                    let (text, morpho) = (key.to_string(), annotation.to_string());
                    if !seen.insert((text.clone(), morpho.clone())) {
                        continue;
                    }
                    let mut lemma = token.with_text(text);
                    lemma.lemma = Some(entry.lemma);
                    lemma.morpho = Some(morpho);
                    expanded.push(lemma);
                }
            }
        }
        if expanded.is_empty() {
            log::trace!("no lemma for form '{}'", token.original);
        }
        expanded
    }

    /// All lemma keys a query token resolves to.
    pub fn resolve(&self, token: &Token) -> Vec<Token> {
        let text = token.text.as_str();
        if text.ends_with('*') {
            return vec![token.clone()];
        }
        if text.contains([':', '=']) {
            if LemmaKey::is_key(text) {
                return vec![token.clone()];
            }
            log::debug!("malformed lemma key '{text}' resolves to nothing");
            return Vec::new();
        }

        let entries = or_empty(self.wordnet.lemmas(Some(text), None, None), "wordnet lemmas");
        let entries: Vec<LemmaEntry> = match token.reltype {
            Some(relation) => entries
                .iter()
                .flat_map(|entry| {
                    or_empty(self.wordnet.relations(&entry.uri, relation), "wordnet relations")
                })
                .collect(),
            None => entries,
        };

        let mut seen = AHashSet::new();
        entries
            .into_iter()
            .filter_map(|entry| {
                let key = LemmaKey::new(entry.lemma, entry.uri, entry.morpho).to_string();
                seen.insert(key.clone()).then(|| token.with_text(key))
            })
            .collect()
    }
}

impl Filter for LemmaFilter {
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
        "lemma"
    }
}
