//! The WordNet-family lexicon interface.

use std::fmt::Debug;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lexicon::relation::Relation;
use crate::morph::tag::Tag;

/// A lemma as known to a lexicon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LemmaEntry {
    /// Citation form.
    pub lemma: String,
    /// Stable identifier of this lemma in the lexicon.
    pub uri: String,
    /// Lexical tag of the lemma itself (part of speech, gender, group...).
    pub morpho: Tag,
}

impl LemmaEntry {
    pub fn new(lemma: impl Into<String>, uri: impl Into<String>, morpho: Tag) -> Self {
        LemmaEntry {
            lemma: lemma.into(),
            uri: uri.into(),
            morpho,
        }
    }
}

/// A word sense.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynsetEntry {
    /// Sense identifier, `pos#offset`.
    pub id: String,
    /// English definition.
    pub gloss: String,
    /// Codes of the semantic fields the sense belongs to.
    pub semfields: Vec<String>,
}

/// A coded semantic domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Semfield {
    pub code: String,
    pub english: String,
}

/// A WordNet-family lexicon for one language.
///
/// Results are unordered candidate sets. An error from any method is treated
/// by callers exactly like an empty result.
pub trait WordNet: Send + Sync + Debug {
    /// ISO 639-3 code of the lexicon's language.
    fn language(&self) -> &str;

    /// Lemmas, optionally restricted by citation form, part of speech and a
    /// wildcard pattern over the lemma's own tag.
    fn lemmas(
        &self,
        lemma: Option<&str>,
        pos: Option<char>,
        morpho: Option<&Tag>,
    ) -> Result<Vec<LemmaEntry>>;

    /// Lemmas with the given uri.
    fn lemmas_by_uri(&self, uri: &str) -> Result<Vec<LemmaEntry>>;

    /// Lemmas linked to a synset.
    fn lemmas_by_synset(&self, id: &str) -> Result<Vec<LemmaEntry>>;

    /// Targets of a lexical relation from the lemma `uri`.
    fn relations(&self, uri: &str, relation: Relation) -> Result<Vec<LemmaEntry>>;

    /// Senses of the lemma `uri`.
    fn synsets(&self, uri: &str) -> Result<Vec<SynsetEntry>>;

    /// Senses whose gloss contains `text` as a word.
    fn synsets_by_gloss(&self, text: &str) -> Result<Vec<SynsetEntry>>;

    /// Targets of a semantic relation from the synset `id`.
    fn synsets_relations(&self, id: &str, relation: Relation) -> Result<Vec<SynsetEntry>>;

    /// Semantic fields by code, by English label, or all of them.
    fn semfields(&self, code: Option<&str>, english: Option<&str>) -> Result<Vec<Semfield>>;
}

/// Lexicons keyed by language code.
#[derive(Clone, Debug, Default)]
pub struct WordNets {
    wordnets: AHashMap<String, Arc<dyn WordNet>>,
}

impl WordNets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lexicon under its own language code.
    pub fn with(mut self, wordnet: Arc<dyn WordNet>) -> Self {
        self.insert(wordnet);
        self
    }

    /// Register a lexicon, replacing any previous one for the same language.
    pub fn insert(&mut self, wordnet: Arc<dyn WordNet>) {
        self.wordnets.insert(wordnet.language().to_string(), wordnet);
    }

    /// The lexicon for a language.
    pub fn get(&self, language: &str) -> Option<&Arc<dyn WordNet>> {
        self.wordnets.get(language)
    }

    /// Registered language codes.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.wordnets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.wordnets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::memory::MemoryWordNet;

    #[test]
    fn test_registry() {
        let wordnets = WordNets::new()
            .with(Arc::new(MemoryWordNet::new("lat")))
            .with(Arc::new(MemoryWordNet::new("eng")));

        assert!(wordnets.get("lat").is_some());
        assert!(wordnets.get("grc").is_none());
        let mut languages: Vec<_> = wordnets.languages().collect();
        languages.sort();
        assert_eq!(languages, vec!["eng", "lat"]);
    }
}
