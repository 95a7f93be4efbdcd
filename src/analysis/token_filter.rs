//! Token filters: every stage after the tokenizer.
//!
//! A filter receives a token stream and produces a new one. It may rewrite
//! tokens one to one, fan one token out into several (a form with several
//! candidate lemmas) or drop it (an invalid tag). Every filter has an index
//! branch and a query branch and picks one from the mode of the first token;
//! skip-mode streams pass through unchanged.
//!
//! # Available Filters
//!
//! - [`case::CaseFilter`] - Lowercasing, Latin `j/v` folding, diacritic stripping
//! - [`stop::StopFilter`] - Stop word marking and removal
//! - [`lemma::LemmaFilter`] - Forms to `lemma:uri=morpho` keys
//! - [`annotation::AnnotationFilter`] - Lemma-linked annotation keys and query patterns
//! - [`synset::SynsetFilter`] - Lemmas to senses, gloss queries to lemmas
//! - [`semfield::SemfieldFilter`] - Lemmas to semantic-field codes
//! - [`morphosyntax::MorphosyntaxFilter`] - Dependency relation labels
//!
//! Filters that call out to a lexicon are normally wrapped in a
//! [`CachedFilter`](crate::analysis::cache::CachedFilter).
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Case → Lemma (cached) → Synset (cached) → Index
//! ```

pub mod annotation;
pub mod case;
pub mod lemma;
pub mod morphosyntax;
pub mod semfield;
pub mod stop;
pub mod synset;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// # Examples
///
/// Implementing a custom filter:
///
/// ```
/// use cylleneus::analysis::pipeline::AnalysisContext;
/// use cylleneus::analysis::token::{Mode, Token, TokenStream, split_mode};
/// use cylleneus::analysis::token_filter::Filter;
/// use cylleneus::error::Result;
///
/// struct ReverseFilter;
///
/// impl Filter for ReverseFilter {
///     fn filter(&self, tokens: TokenStream, _ctx: &AnalysisContext) -> Result<TokenStream> {
///         let Some((mode, tokens)) = split_mode(tokens) else {
///             return Ok(Box::new(std::iter::empty()));
///         };
///         match mode {
///             Mode::Skip => Ok(tokens),
///             Mode::Index | Mode::Query => Ok(Box::new(tokens.map(|mut t| {
///                 t.text = t.text.chars().rev().collect();
///                 t
///             }))),
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "reverse"
///     }
/// }
///
/// let tokens: TokenStream = Box::new(vec![Token::query("arma")].into_iter());
/// let out: Vec<_> = ReverseFilter.filter(tokens, &AnalysisContext::query()).unwrap().collect();
/// assert_eq!(out[0].text, "amra");
/// ```
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream, ctx: &AnalysisContext) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// The stream produced by a filter that received no tokens.
pub(crate) fn empty() -> TokenStream {
    Box::new(std::iter::empty())
}
