//! Text analysis for Cylleneus.
//!
//! This module turns raw corpus text into the tokens of every indexed field,
//! and query atoms into the terms they match. The same stages serve both
//! directions: each one branches on the [`token::Mode`] of its input.
//!
//! - [`tokenizer`] - Plain-text and pre-annotated tokenizers
//! - [`token_filter`] - Normalization, lemmatization and lexicon expansion
//! - [`cache`] - Per-document memoization of lookup-heavy stages
//! - [`pipeline`] - Tokenizer plus ordered filters
//! - [`schema`] - The indexed fields and their pipelines

pub mod cache;
pub mod pipeline;
pub mod schema;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
