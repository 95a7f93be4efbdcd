//! A small Latin corpus with an in-memory lexicon.

#![allow(dead_code)]

use std::sync::Arc;

use cylleneus::analysis::schema::Schema;
use cylleneus::error::Result;
use cylleneus::index::memory::MemoryIndex;
use cylleneus::lexicon::memory::{MemoryLemmatizer, MemoryWordNet};
use cylleneus::lexicon::relation::Relation;
use cylleneus::lexicon::wordnet::{LemmaEntry, SynsetEntry, WordNets};
use cylleneus::morph::tag::Tag;

pub const DOCUMENTS: &[&str] = &[
    "Cum virtute viro arma",
    "virtutem cum gladio",
    "arma virum cano",
    "gladio cum arma",
];

pub const COURAGE: &str = "n#04829550";
pub const WEAPONRY: &str = "n#02728440";
pub const SWORD: &str = "n#04373894";

fn tag(code: &str) -> Tag {
    code.parse().expect("valid tag")
}

fn synset(id: &str, gloss: &str, semfields: &[&str]) -> SynsetEntry {
    SynsetEntry {
        id: id.to_string(),
        gloss: gloss.to_string(),
        semfields: semfields.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn latin() -> MemoryWordNet {
    let mut wordnet = MemoryWordNet::new("lat");
    wordnet
        .add_lemma(LemmaEntry::new("virtus", "v0123", tag("n-----f-3-")))
        .add_lemma(LemmaEntry::new("vir", "v0100", tag("n-----m-2-")))
        .add_lemma(LemmaEntry::new("cum", "c0001", tag("e---------")))
        .add_lemma(LemmaEntry::new("cum", "c0002", tag("c---------")))
        .add_lemma(LemmaEntry::new("arma", "a0100", tag("n-p---n-2-")))
        .add_lemma(LemmaEntry::new("gladius", "g0001", tag("n-----m-2-")))
        .add_synset(synset(COURAGE, "a quality of spirit that enables you to face danger; courage", &["180"]))
        .add_synset(synset(WEAPONRY, "weaponry used by military forces", &["613"]))
        .add_synset(synset(SWORD, "a cutting weapon with a long blade", &["613"]))
        .link("v0123", COURAGE)
        .link("a0100", WEAPONRY)
        .link("g0001", SWORD)
        .add_relation("v0100", Relation::DerivedForm, "v0123")
        .add_semfield("180", "Ethics")
        .add_semfield("613", "Military");
    wordnet
}

pub fn english() -> MemoryWordNet {
    let mut wordnet = MemoryWordNet::new("en");
    wordnet
        .add_lemma(LemmaEntry::new("courage", "courage-n", tag("n---------")))
        .add_synset(synset(COURAGE, "a quality of spirit that enables you to face danger; courage", &["180"]))
        .link("courage-n", COURAGE);
    wordnet
}

pub fn lemmatizer() -> MemoryLemmatizer {
    let mut lemmatizer = MemoryLemmatizer::new();
    lemmatizer
        .add("virtute", "virtus", Some("n-s---fb-"))
        .add("virtutem", "virtus", Some("n-s---fa-"))
        .add("viro", "vir", Some("n-s---md-"))
        .add("viro", "vir", Some("n-s---mb-"))
        .add("virum", "vir", Some("n-s---ma-"))
        .add("cum", "cum", Some("r--------"))
        .add("cum", "cum", Some("c--------"))
        .add("arma", "arma", Some("n-p---na-"))
        .add("arma", "arma", Some("n-p---nn-"))
        .add("gladio", "gladius", Some("n-s---md-"))
        .add("gladio", "gladius", Some("n-s---mb-"));
    lemmatizer
}

pub struct Corpus {
    pub schema: Schema,
    pub index: MemoryIndex,
    pub wordnet: Arc<MemoryWordNet>,
    pub lemmatizer: Arc<MemoryLemmatizer>,
}

pub fn corpus() -> Result<Corpus> {
    let wordnet = Arc::new(latin());
    let lemmatizer = Arc::new(lemmatizer());
    let wordnets = WordNets::new().with(wordnet.clone()).with(Arc::new(english()));
    let schema = Schema::builder()
        .with_wordnets(wordnets)
        .with_lemmatizer(lemmatizer.clone())
        .build()?;

    let mut index = MemoryIndex::new();
    for (doc_id, text) in DOCUMENTS.iter().enumerate() {
        index.add_document(&schema, doc_id as u64, text)?;
    }
    Ok(Corpus {
        schema,
        index,
        wordnet,
        lemmatizer,
    })
}
