//! Word senses.
//!
//! # Index mode
//!
//! Follows the lemma stage: every lemma key fans out to the ids (`pos#offset`)
//! of the senses the lexicon records for its uri.
//!
//! # Query mode
//!
//! Interprets the contents of a gloss bracket:
//!
//! - `#n#04829550` - a raw sense id, matched against the sense field
//! - `courage` - senses whose gloss contains the word, resolved to the
//!   lemma keys linked to them
//! - `eng?courage` (token `language` set) - the gloss is searched in that
//!   language's lexicon and the senses are resolved to lemmas of this
//!   filter's language
//! - a token carrying a semantic relation - the senses are first replaced by
//!   the targets of that relation

use std::sync::Arc;

use ahash::AHashSet;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, Token, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;
use crate::lexicon::or_empty;
use crate::lexicon::wordnet::{SynsetEntry, WordNet, WordNets};
use crate::morph::key::LemmaKey;

/// Prefix of raw sense ids in gloss queries.
pub const SENSE_PREFIX: char = '#';

/// Maps lemmas to senses and glosses to lemmas.
#[derive(Clone, Debug)]
pub struct SynsetFilter {
    language: String,
    wordnets: Arc<WordNets>,
}

impl SynsetFilter {
    /// Create a filter for lemmas of `language`, which must be registered in
    /// `wordnets` to produce anything.
    pub fn new(language: impl Into<String>, wordnets: Arc<WordNets>) -> Self {
        SynsetFilter {
            language: language.into(),
            wordnets,
        }
    }

    fn wordnet(&self, language: &str) -> Option<&Arc<dyn WordNet>> {
        let wordnet = self.wordnets.get(language);
        if wordnet.is_none() {
            log::warn!("no lexicon registered for language '{language}'");
        }
        wordnet
    }

    /// Sense tokens for one lemma token.
    pub fn expand(&self, token: &Token) -> Vec<Token> {
        let Ok(key) = token.text.parse::<LemmaKey>() else {
            return Vec::new();
        };
        let Some(wordnet) = self.wordnet(&self.language) else {
            return Vec::new();
        };
        let mut seen = AHashSet::new();
        or_empty(wordnet.synsets(&key.uri), "wordnet synsets")
            .into_iter()
            .filter(|synset| seen.insert(synset.id.clone()))
            .map(|synset| token.with_text(synset.id))
            .collect()
    }

    /// Resolve a gloss query token.
    pub fn resolve(&self, token: &Token) -> Vec<Token> {
        let text = token.text.trim();
        let source_language = token.language.as_deref().unwrap_or(&self.language);
        let Some(source) = self.wordnet(source_language) else {
            return Vec::new();
        };

        if let Some(id) = text.strip_prefix(SENSE_PREFIX) {
            let ids: Vec<String> = match token.reltype {
                Some(relation) => or_empty(source.synsets_relations(id, relation), "wordnet synset relations")
                    .into_iter()
                    .map(|synset| synset.id)
                    .collect(),
                None => vec![id.to_string()],
            };
            return ids.into_iter().map(|id| token.with_text(id)).collect();
        }

        let mut synsets = or_empty(source.synsets_by_gloss(text), "wordnet gloss search");
        if let Some(relation) = token.reltype {
            synsets = synsets
                .iter()
                .flat_map(|synset| {
                    or_empty(source.synsets_relations(&synset.id, relation), "wordnet synset relations")
                })
                .collect::<Vec<SynsetEntry>>();
        }

        let Some(target) = self.wordnet(&self.language) else {
            return Vec::new();
        };
        let mut seen = AHashSet::new();
        let mut resolved = Vec::new();
        for synset in synsets {
            for entry in or_empty(target.lemmas_by_synset(&synset.id), "wordnet lemmas by synset") {
                let key = LemmaKey::new(entry.lemma, entry.uri, entry.morpho).to_string();
                if seen.insert(key.clone()) {
                    resolved.push(token.with_text(key));
                }
            }
        }
        if resolved.is_empty() {
            log::debug!("gloss '{text}' ({source_language}) resolves to nothing");
        }
        resolved
    }
}

impl Filter for SynsetFilter {
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
        "synset"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::memory::MemoryWordNet;
    use crate::lexicon::relation::Relation;
    use crate::lexicon::wordnet::LemmaEntry;

    fn synset(id: &str, gloss: &str) -> SynsetEntry {
        SynsetEntry {
            id: id.to_string(),
            gloss: gloss.to_string(),
            semfields: Vec::new(),
        }
    }

    fn filter() -> SynsetFilter {
        let mut latin = MemoryWordNet::new("lat");
        latin
            .add_lemma(LemmaEntry::new("virtus", "v0123", "n-----f-3-".parse().unwrap()))
            .add_lemma(LemmaEntry::new("fortitudo", "f0042", "n-----f-3-".parse().unwrap()))
            .add_lemma(LemmaEntry::new("probitas", "p0007", "n-----f-3-".parse().unwrap()))
            .add_synset(synset("n#04829550", "courage, bravery"))
            .add_synset(synset("n#04827652", "moral excellence"))
            .link("v0123", "n#04829550")
            .link("f0042", "n#04829550")
            .link("v0123", "n#04827652")
            .link("p0007", "n#04827652")
            .add_synset_relation("n#04829550", Relation::Hypernym, "n#04827652");

        let mut english = MemoryWordNet::new("eng");
        english
            .add_synset(synset("n#04829550", "the quality of mind that enables courage"))
            .add_synset_relation("n#04829550", Relation::Hypernym, "n#04827652");

        let wordnets = WordNets::new().with(Arc::new(latin)).with(Arc::new(english));
        SynsetFilter::new("lat", Arc::new(wordnets))
    }

    fn run(tokens: Vec<Token>, ctx: AnalysisContext) -> Vec<String> {
        filter()
            .filter(Box::new(tokens.into_iter()), &ctx)
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_index_emits_sense_ids() {
        let out = run(
            vec![Token::index("virtus:v0123=n-----f-3-", 0, 0, 6)],
            AnalysisContext::index(0),
        );
        let mut out = out;
        out.sort();
        assert_eq!(out, vec!["n#04827652", "n#04829550"]);
    }

    #[test]
    fn test_query_gloss_resolves_to_lemmas() {
        let mut out = run(vec![Token::query("courage")], AnalysisContext::query());
        out.sort();
        assert_eq!(out, vec!["fortitudo:f0042=n-----f-3-", "virtus:v0123=n-----f-3-"]);
    }

    #[test]
    fn test_query_cross_language() {
        let mut out = run(
            vec![Token::query("courage").with_language("eng")],
            AnalysisContext::query(),
        );
        out.sort();
        assert_eq!(out, vec!["fortitudo:f0042=n-----f-3-", "virtus:v0123=n-----f-3-"]);

        assert!(run(vec![Token::query("courage").with_language("grc")], AnalysisContext::query()).is_empty());
    }

    #[test]
    fn test_query_sense_id_and_relations() {
        assert_eq!(
            run(vec![Token::query("#n#04829550")], AnalysisContext::query()),
            vec!["n#04829550"]
        );
        assert_eq!(
            run(
                vec![Token::query("#n#04829550").with_reltype(Relation::Hypernym)],
                AnalysisContext::query()
            ),
            vec!["n#04827652"]
        );

        let mut hypernym_lemmas = run(
            vec![Token::query("bravery").with_reltype(Relation::Hypernym)],
            AnalysisContext::query(),
        );
        hypernym_lemmas.sort();
        assert_eq!(hypernym_lemmas, vec!["probitas:p0007=n-----f-3-", "virtus:v0123=n-----f-3-"]);
    }
}
