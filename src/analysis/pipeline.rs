//! Analysis pipelines: a tokenizer followed by an ordered list of filters.
//!
//! Each stage is a function of `(input stream, mode, docix)`. Pipelines for
//! different fields share stage instances through `Arc`, which is what lets a
//! cached stage serve every field whose pipeline contains it.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use cylleneus::analysis::pipeline::{AnalysisContext, Pipeline};
//! use cylleneus::analysis::token_filter::case::CaseFilter;
//! use cylleneus::analysis::tokenizer::plain::PlainTextTokenizer;
//!
//! let pipeline = Pipeline::new(Arc::new(PlainTextTokenizer::new()))
//!     .add_filter(Arc::new(CaseFilter::new()))
//!     .with_name("form");
//!
//! let tokens: Vec<_> = pipeline
//!     .analyze("Iulius Caesar", &AnalysisContext::index(0))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(tokens[0].text, "iulius");
//! assert_eq!(tokens[0].original, "Iulius");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::analysis::token::{Mode, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Per-invocation parameters shared by every stage of a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisContext {
    /// Mode stamped on every token by the tokenizer.
    pub mode: Mode,
    /// Document being indexed; the key of per-document caches.
    pub docix: Option<u64>,
    /// Whether stopped tokens are dropped rather than marked.
    pub removestops: bool,
}

impl AnalysisContext {
    /// Context for indexing document `docix`.
    pub fn index(docix: u64) -> Self {
        AnalysisContext {
            mode: Mode::Index,
            docix: Some(docix),
            removestops: false,
        }
    }

    /// Context for resolving query text.
    pub fn query() -> Self {
        AnalysisContext {
            mode: Mode::Query,
            docix: None,
            removestops: false,
        }
    }

    /// Context for pass-through analysis.
    pub fn skip() -> Self {
        AnalysisContext {
            mode: Mode::Skip,
            docix: None,
            removestops: false,
        }
    }

    pub fn with_removestops(mut self, removestops: bool) -> Self {
        self.removestops = removestops;
        self
    }
}

/// A tokenizer plus an ordered chain of filters.
#[derive(Clone)]
pub struct Pipeline {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl Pipeline {
    /// Create a new pipeline with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Pipeline {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this pipeline.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the tokenizer used by this pipeline.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this pipeline.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    /// Run `text` through every stage.
    pub fn analyze(&self, text: &str, ctx: &AnalysisContext) -> Result<TokenStream> {
        let tokens = self.tokenizer.tokenize(text, ctx)?;
        self.run(tokens, ctx)
    }

    /// Run already tokenized input through the filters only.
    pub fn run(&self, mut tokens: TokenStream, ctx: &AnalysisContext) -> Result<TokenStream> {
        for filter in &self.filters {
            tokens = filter.filter(tokens, ctx)?;
        }
        Ok(tokens)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<&str> = std::iter::once(self.tokenizer.name())
            .chain(self.filters.iter().map(|filter| filter.name()))
            .collect();
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &stages)
            .finish()
    }
}
