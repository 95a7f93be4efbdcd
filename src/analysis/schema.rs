//! Indexed fields and the pipelines that feed them.
//!
//! Every document is analysed once per field. The lemma, annotation, synset
//! and semantic-field pipelines all begin with the same lexicon-backed lemma
//! stage, which the schema builds once and shares between them behind a
//! [`CachedFilter`]: the lexicon is consulted for the first of those fields
//! and replayed for the rest.
//!
//! Each field also carries a query pipeline. Query text is interpreted per
//! field, so those pipelines reuse the same stage instances without the
//! lemma prefix (a gloss or a semantic field name is not a Latin form).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use cylleneus::analysis::schema::{FieldKind, Schema};
//! use cylleneus::lexicon::memory::{MemoryLemmatizer, MemoryWordNet};
//! use cylleneus::lexicon::wordnet::LemmaEntry;
//!
//! let mut wordnet = MemoryWordNet::new("lat");
//! wordnet.add_lemma(LemmaEntry::new("arma", "a0100", "n-p---n-2-".parse().unwrap()));
//! let mut lemmatizer = MemoryLemmatizer::new();
//! lemmatizer.add("arma", "arma", Some("n-p---na-"));
//!
//! let schema = Schema::builder()
//!     .with_wordnet(Arc::new(wordnet))
//!     .with_lemmatizer(Arc::new(lemmatizer))
//!     .with_fields([FieldKind::Form, FieldKind::Lemma])
//!     .build()
//!     .unwrap();
//!
//! let fields = schema.analyze_document(0, "Arma cano").unwrap();
//! assert_eq!(fields[0].0, FieldKind::Form);
//! assert_eq!(fields[0].1.len(), 2);
//! assert_eq!(fields[1].1[0].text, "arma:a0100=n-p---n-2-");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::cache::CachedFilter;
use crate::analysis::pipeline::{AnalysisContext, Pipeline};
use crate::analysis::token::Token;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::annotation::AnnotationFilter;
use crate::analysis::token_filter::case::CaseFilter;
use crate::analysis::token_filter::lemma::LemmaFilter;
use crate::analysis::token_filter::morphosyntax::MorphosyntaxFilter;
use crate::analysis::token_filter::semfield::SemfieldFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::token_filter::synset::SynsetFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::plain::PlainTextTokenizer;
use crate::config::AnalysisConfig;
use crate::error::{CylleneusError, Result};
use crate::lexicon::lemmatizer::Lemmatizer;
use crate::lexicon::wordnet::{WordNet, WordNets};
use crate::morph::positional::PositionalTagset;
use crate::morph::tagset::Tagset;

/// The indexed fields of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Normalized surface forms.
    Form,
    /// `lemma:uri=morpho` keys.
    Lemma,
    /// Lemma-linked annotation keys.
    Annotation,
    /// Sense ids.
    Synset,
    /// Semantic-field codes.
    Semfield,
    /// Treebank relation labels.
    Morphosyntax,
}

impl FieldKind {
    /// All fields, in analysis order.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Form,
        FieldKind::Lemma,
        FieldKind::Annotation,
        FieldKind::Synset,
        FieldKind::Semfield,
        FieldKind::Morphosyntax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Form => "form",
            FieldKind::Lemma => "lemma",
            FieldKind::Annotation => "annotation",
            FieldKind::Synset => "synset",
            FieldKind::Semfield => "semfield",
            FieldKind::Morphosyntax => "morphosyntax",
        }
    }

    /// Whether the field's pipeline needs the lexicon.
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            FieldKind::Lemma | FieldKind::Annotation | FieldKind::Synset | FieldKind::Semfield
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = CylleneusError;

    fn from_str(s: &str) -> Result<Self> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CylleneusError::invalid_argument(format!("unknown field '{s}'")))
    }
}

/// One field's index and query pipelines.
#[derive(Clone, Debug)]
pub struct Field {
    kind: FieldKind,
    index: Pipeline,
    query: Pipeline,
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The pipeline documents are indexed with.
    pub fn index_pipeline(&self) -> &Pipeline {
        &self.index
    }

    /// The pipeline query atoms for this field are resolved with.
    pub fn query_pipeline(&self) -> &Pipeline {
        &self.query
    }
}

/// The fields of an index and their analysis.
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Vec<Field>,
    language: String,
    remove_stops: bool,
    wordnets: Arc<WordNets>,
    caches: Vec<Arc<CachedFilter>>,
}

impl Schema {
    /// Create a builder for constructing schemas.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Language of the corpus.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn wordnets(&self) -> &Arc<WordNets> {
        &self.wordnets
    }

    /// The lexicon of the corpus language, if registered.
    pub fn wordnet(&self) -> Option<&Arc<dyn WordNet>> {
        self.wordnets.get(&self.language)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, kind: FieldKind) -> Option<&Field> {
        self.fields.iter().find(|field| field.kind == kind)
    }

    pub fn has_field(&self, kind: FieldKind) -> bool {
        self.field(kind).is_some()
    }

    /// Look up a field that queries require.
    pub fn require(&self, kind: FieldKind) -> Result<&Field> {
        self.field(kind)
            .ok_or_else(|| CylleneusError::query(format!("schema has no {kind} field")))
    }

    /// The per-document caches shared between fields.
    pub fn caches(&self) -> &[Arc<CachedFilter>] {
        &self.caches
    }

    /// The analysis context used to index document `docix`.
    pub fn index_context(&self, docix: u64) -> AnalysisContext {
        AnalysisContext::index(docix).with_removestops(self.remove_stops)
    }

    /// Analyse one document for every field, in field order.
    pub fn analyze_document(&self, docix: u64, text: &str) -> Result<Vec<(FieldKind, Vec<Token>)>> {
        let ctx = self.index_context(docix);
        let mut analysed = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let tokens: Vec<Token> = field.index.analyze(text, &ctx)?.collect();
            log::trace!("document {docix}: {} {} tokens", tokens.len(), field.kind);
            analysed.push((field.kind, tokens));
        }
        Ok(analysed)
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder {
    config: AnalysisConfig,
    wordnets: WordNets,
    tokenizer: Arc<dyn Tokenizer>,
    tagset: Arc<dyn Tagset>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
    fields: Vec<FieldKind>,
}

impl SchemaBuilder {
    /// Start from the default analysis settings: plain text, positional tags,
    /// every field.
    pub fn new() -> Self {
        SchemaBuilder {
            config: AnalysisConfig::default(),
            wordnets: WordNets::new(),
            tokenizer: Arc::new(PlainTextTokenizer::new()),
            tagset: Arc::new(PositionalTagset::new()),
            lemmatizer: None,
            fields: FieldKind::ALL.to_vec(),
        }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_wordnets(mut self, wordnets: WordNets) -> Self {
        self.wordnets = wordnets;
        self
    }

    /// Register one lexicon.
    pub fn with_wordnet(mut self, wordnet: Arc<dyn WordNet>) -> Self {
        self.wordnets.insert(wordnet);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// The notation of the corpus's native morphology.
    pub fn with_tagset(mut self, tagset: Arc<dyn Tagset>) -> Self {
        self.tagset = tagset;
        self
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    /// Restrict the schema to `fields`.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldKind>) -> Self {
        let mut fields: Vec<FieldKind> = fields.into_iter().collect();
        fields.sort();
        fields.dedup();
        self.fields = fields;
        self
    }

    fn cached(&self, filter: Arc<dyn Filter>, caches: &mut Vec<Arc<CachedFilter>>) -> Arc<dyn Filter> {
        if !self.config.cache {
            return filter;
        }
        let cached = Arc::new(CachedFilter::new(filter));
        caches.push(Arc::clone(&cached));
        cached
    }

    fn stop_filter(&self) -> Option<StopFilter> {
        match &self.config.stop_words {
            Some(words) => Some(StopFilter::from_words(words.iter().cloned())),
            None if self.config.language == "lat" => Some(StopFilter::latin()),
            None => None,
        }
    }

    pub fn build(self) -> Result<Schema> {
        let language = self.config.language.trim().to_string();
        if language.is_empty() {
            return Err(CylleneusError::invalid_config("analysis.language must not be empty"));
        }
        if self.fields.is_empty() {
            return Err(CylleneusError::invalid_config("schema must have at least one field"));
        }

        let wordnets = Arc::new(self.wordnets.clone());
        let wordnet = wordnets.get(&language).cloned();
        if wordnet.is_none() && self.fields.iter().any(|kind| kind.is_lexical()) {
            return Err(CylleneusError::invalid_config(format!(
                "lexical fields require a lexicon for '{language}'"
            )));
        }

        let mut caches = Vec::new();
        let tokenize = || Pipeline::new(Arc::clone(&self.tokenizer));
        let lowercase: Arc<dyn Filter> = Arc::new(CaseFilter::new());

        let lemma: Option<Arc<dyn Filter>> = wordnet.as_ref().map(|wordnet| {
            let mut filter = LemmaFilter::new(Arc::clone(wordnet), Arc::clone(&self.tagset));
            if let Some(lemmatizer) = &self.lemmatizer {
                filter = filter.with_lemmatizer(Arc::clone(lemmatizer));
            }
            self.cached(Arc::new(filter), &mut caches)
        });

        let mut fields = Vec::with_capacity(self.fields.len());
        for &kind in &self.fields {
            let (index, query) = match kind {
                FieldKind::Form => {
                    let case: Arc<dyn Filter> = Arc::new(CaseFilter::for_language(&language));
                    let mut index = tokenize().add_filter(Arc::clone(&case));
                    let mut query = tokenize().add_filter(case);
                    if let Some(stop) = self.stop_filter() {
                        let stop: Arc<dyn Filter> = Arc::new(stop);
                        index = index.add_filter(Arc::clone(&stop));
                        query = query.add_filter(stop);
                    }
                    (index, query)
                }
                FieldKind::Morphosyntax => {
                    let stage: Arc<dyn Filter> = Arc::new(MorphosyntaxFilter::new());
                    (tokenize().add_filter(Arc::clone(&stage)), tokenize().add_filter(stage))
                }
                FieldKind::Lemma | FieldKind::Annotation | FieldKind::Synset | FieldKind::Semfield => {
                    let (Some(lemma), Some(wordnet)) = (&lemma, &wordnet) else {
                        return Err(CylleneusError::invalid_config(format!(
                            "{kind} field requires a lexicon for '{language}'"
                        )));
                    };
                    let prefix = tokenize()
                        .add_filter(Arc::clone(&lowercase))
                        .add_filter(Arc::clone(lemma));
                    match kind {
                        FieldKind::Lemma => (
                            prefix,
                            tokenize()
                                .add_filter(Arc::clone(&lowercase))
                                .add_filter(Arc::clone(lemma)),
                        ),
                        FieldKind::Annotation => {
                            let stage: Arc<dyn Filter> = Arc::new(AnnotationFilter::new());
                            (prefix.add_filter(Arc::clone(&stage)), tokenize().add_filter(stage))
                        }
                        FieldKind::Synset => {
                            let stage =
                                self.cached(Arc::new(SynsetFilter::new(language.as_str(), Arc::clone(&wordnets))), &mut caches);
                            (prefix.add_filter(Arc::clone(&stage)), tokenize().add_filter(stage))
                        }
                        _ => {
                            let stage = self.cached(Arc::new(SemfieldFilter::new(Arc::clone(wordnet))), &mut caches);
                            (prefix.add_filter(Arc::clone(&stage)), tokenize().add_filter(stage))
                        }
                    }
                }
            };
            fields.push(Field {
                kind,
                index: index.with_name(kind.name()),
                query: query.with_name(format!("{kind}_query")),
            });
        }
        log::debug!(
            "built {language} schema with fields {:?}",
            fields.iter().map(|f| f.kind.name()).collect::<Vec<_>>()
        );

        Ok(Schema {
            fields,
            language,
            remove_stops: self.config.remove_stops,
            wordnets,
            caches,
        })
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("config", &self.config)
            .field("tokenizer", &self.tokenizer.name())
            .field("tagset", &self.tagset.name())
            .field("fields", &self.fields)
            .finish()
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
