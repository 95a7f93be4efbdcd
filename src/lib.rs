//! # Cylleneus
//!
//! A morphologically and semantically aware search engine core for
//! historical-language corpora (Latin, Greek, Sanskrit).
//!
//! ## Features
//!
//! - Dual-mode (index/query) token analysis pipeline with per-document caching
//! - Canonical 10-slot morphological tags with merge/diff/wildcard algebra
//! - Conversion from positional, Leipzig, UD-feature and descriptive tagsets
//! - Query language with surface form, lemma, gloss, semantic field,
//!   morphosyntax and annotation atoms plus boolean and sequence operators
//! - Linear-time ordered/unordered proximity matching with slop

pub mod analysis;
pub mod config;
pub mod error;
pub mod index;
pub mod lexicon;
pub mod morph;
pub mod query;
pub mod search;

pub mod prelude {
    pub use crate::analysis::pipeline::{AnalysisContext, Pipeline};
    pub use crate::analysis::schema::{FieldKind, Schema, SchemaBuilder};
    pub use crate::analysis::token::{Mode, Token, TokenStream};
    pub use crate::config::EngineConfig;
    pub use crate::error::{CylleneusError, Result};
    pub use crate::index::memory::MemoryIndex;
    pub use crate::morph::tag::Tag;
    pub use crate::query::parser::QueryParser;
    pub use crate::search::searcher::{Match, Searcher};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
