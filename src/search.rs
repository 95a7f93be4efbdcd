//! Query evaluation.
//!
//! [`resolver::QueryResolver`] turns each atom of a parsed query into index
//! terms and builds a tree of [`matcher::Matcher`]s over their postings.
//! [`searcher::Searcher`] drives that tree and yields one
//! [`searcher::Match`] per matched span.
//!
//! Sequences (`"a b c"~N`) are matched positionally by
//! [`matcher::SequenceMatcher`] using the window algorithms in [`window`].

pub mod matcher;
pub mod resolver;
pub mod searcher;
pub mod span;
pub mod window;
