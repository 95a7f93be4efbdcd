//! In-memory lexicon and lemmatizer.
//!
//! Both count the lookups they serve, which makes cache behaviour observable
//! in tests.
//!
//! # Examples
//!
//! ```
//! use cylleneus::lexicon::memory::MemoryWordNet;
//! use cylleneus::lexicon::wordnet::{LemmaEntry, WordNet};
//!
//! let mut wordnet = MemoryWordNet::new("lat");
//! wordnet.add_lemma(LemmaEntry::new("virtus", "v0123", "n-----f-3-".parse().unwrap()));
//!
//! let found = wordnet.lemmas(Some("virtus"), None, None).unwrap();
//! assert_eq!(found[0].uri, "v0123");
//! assert_eq!(wordnet.calls(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use ahash::AHashMap;

use crate::error::Result;
use crate::lexicon::lemmatizer::{FormAnalysis, Lemmatizer};
use crate::lexicon::relation::Relation;
use crate::lexicon::wordnet::{LemmaEntry, Semfield, SynsetEntry, WordNet};
use crate::morph::tag::Tag;

/// A WordNet held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryWordNet {
    language: String,
    lemmas: Vec<LemmaEntry>,
    synsets: AHashMap<String, SynsetEntry>,
    senses: AHashMap<String, Vec<String>>,
    relations: Vec<(String, Relation, String)>,
    synset_relations: Vec<(String, Relation, String)>,
    semfields: Vec<Semfield>,
    calls: AtomicUsize,
}

impl MemoryWordNet {
    pub fn new(language: impl Into<String>) -> Self {
        MemoryWordNet {
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn add_lemma(&mut self, entry: LemmaEntry) -> &mut Self {
        self.lemmas.push(entry);
        self
    }

    pub fn add_synset(&mut self, synset: SynsetEntry) -> &mut Self {
        self.synsets.insert(synset.id.clone(), synset);
        self
    }

    /// Record that lemma `uri` has the sense `synset`.
    pub fn link(&mut self, uri: &str, synset: &str) -> &mut Self {
        self.senses
            .entry(uri.to_string())
            .or_default()
            .push(synset.to_string());
        self
    }

    /// Add a lexical relation between two lemma uris.
    pub fn add_relation(&mut self, from: &str, relation: Relation, to: &str) -> &mut Self {
        self.relations
            .push((from.to_string(), relation, to.to_string()));
        self
    }

    /// Add a semantic relation between two synsets.
    pub fn add_synset_relation(&mut self, from: &str, relation: Relation, to: &str) -> &mut Self {
        self.synset_relations
            .push((from.to_string(), relation, to.to_string()));
        self
    }

    pub fn add_semfield(&mut self, code: &str, english: &str) -> &mut Self {
        self.semfields.push(Semfield {
            code: code.to_string(),
            english: english.to_string(),
        });
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    fn lemmas_where(&self, uri: &str) -> Vec<LemmaEntry> {
        self.lemmas.iter().filter(|e| e.uri == uri).cloned().collect()
    }

    fn synsets_where<'a>(&self, ids: impl Iterator<Item = &'a String>) -> Vec<SynsetEntry> {
        ids.filter_map(|id| self.synsets.get(id)).cloned().collect()
    }
}

fn gloss_contains(gloss: &str, text: &str) -> bool {
    let gloss = gloss.to_lowercase();
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return false;
    }
    if text.contains(char::is_whitespace) {
        return gloss.contains(&text);
    }
    gloss
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == text)
}

impl WordNet for MemoryWordNet {
    fn language(&self) -> &str {
        &self.language
    }

    fn lemmas(
        &self,
        lemma: Option<&str>,
        pos: Option<char>,
        morpho: Option<&Tag>,
    ) -> Result<Vec<LemmaEntry>> {
        self.count();
        Ok(self
            .lemmas
            .iter()
            .filter(|e| lemma.is_none_or(|l| e.lemma == l))
            .filter(|e| pos.is_none_or(|p| e.morpho.pos() == Some(p)))
            .filter(|e| morpho.is_none_or(|m| m.matches(&e.morpho)))
            .cloned()
            .collect())
    }

    fn lemmas_by_uri(&self, uri: &str) -> Result<Vec<LemmaEntry>> {
        self.count();
        Ok(self.lemmas_where(uri))
    }

    fn lemmas_by_synset(&self, id: &str) -> Result<Vec<LemmaEntry>> {
        self.count();
        let uris: Vec<&String> = self
            .senses
            .iter()
            .filter(|(_, ids)| ids.iter().any(|i| i == id))
            .map(|(uri, _)| uri)
            .collect();
        Ok(self
            .lemmas
            .iter()
            .filter(|e| uris.contains(&&e.uri))
            .cloned()
            .collect())
    }

    fn relations(&self, uri: &str, relation: Relation) -> Result<Vec<LemmaEntry>> {
        self.count();
        Ok(self
            .relations
            .iter()
            .filter(|(from, r, _)| from == uri && *r == relation)
            .flat_map(|(_, _, to)| self.lemmas_where(to))
            .collect())
    }

    fn synsets(&self, uri: &str) -> Result<Vec<SynsetEntry>> {
        self.count();
        Ok(self
            .senses
            .get(uri)
            .map(|ids| self.synsets_where(ids.iter()))
            .unwrap_or_default())
    }

    fn synsets_by_gloss(&self, text: &str) -> Result<Vec<SynsetEntry>> {
        self.count();
        let mut found: Vec<SynsetEntry> = self
            .synsets
            .values()
            .filter(|s| gloss_contains(&s.gloss, text))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    fn synsets_relations(&self, id: &str, relation: Relation) -> Result<Vec<SynsetEntry>> {
        self.count();
        let targets = self
            .synset_relations
            .iter()
            .filter(|(from, r, _)| from == id && *r == relation)
            .map(|(_, _, to)| to);
        Ok(self.synsets_where(targets))
    }

    fn semfields(&self, code: Option<&str>, english: Option<&str>) -> Result<Vec<Semfield>> {
        self.count();
        Ok(self
            .semfields
            .iter()
            .filter(|s| code.is_none_or(|c| s.code == c))
            .filter(|s| english.is_none_or(|e| gloss_contains(&s.english, e)))
            .cloned()
            .collect())
    }
}

/// A lemmatizer backed by a form → analyses table.
#[derive(Debug, Default)]
pub struct MemoryLemmatizer {
    forms: AHashMap<String, Vec<FormAnalysis>>,
    calls: AtomicUsize,
}

impl MemoryLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one analysis of `form`.
    pub fn add(&mut self, form: &str, lemma: &str, morpho: Option<&str>) -> &mut Self {
        self.forms
            .entry(form.to_string())
            .or_default()
            .push(FormAnalysis::new(lemma, morpho));
        self
    }

    /// Number of forms analysed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Lemmatizer for MemoryLemmatizer {
    fn analyze(&self, form: &str) -> Result<Vec<FormAnalysis>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let analyses = self
            .forms
            .get(form)
            .or_else(|| self.forms.get(&form.to_lowercase()));
        Ok(analyses.cloned().unwrap_or_default())
    }
}
