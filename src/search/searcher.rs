//! Running queries.
//!
//! # Examples
//!
//! ```
//! use cylleneus::analysis::schema::{FieldKind, Schema};
//! use cylleneus::index::memory::MemoryIndex;
//! use cylleneus::search::searcher::Searcher;
//!
//! let schema = Schema::builder().with_fields([FieldKind::Form]).build().unwrap();
//! let mut index = MemoryIndex::new();
//! index.add_document(&schema, 1, "Arma uirumque cano").unwrap();
//! index.add_document(&schema, 2, "cano arma").unwrap();
//!
//! let searcher = Searcher::new(&schema, &index);
//! let query = searcher.parse("\"arma uirumque\"").unwrap();
//! let matches: Vec<_> = searcher.search(&query).unwrap().collect::<Result<_, _>>().unwrap();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].doc_id, 1);
//! assert_eq!((matches[0].startchar, matches[0].endchar), (0, 13));
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::analysis::schema::Schema;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::IndexSnapshot;
use crate::query::ast::Query;
use crate::query::parser::QueryParser;
use crate::search::matcher::{EmptyMatcher, Matcher};
use crate::search::resolver::QueryResolver;
use crate::search::span::Span;

/// One matched span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub doc_id: u64,
    /// First matched position.
    pub span_start: usize,
    /// Position after the last matched one.
    pub span_end: usize,
    pub startchar: usize,
    pub endchar: usize,
    /// Score of the document the span belongs to.
    pub score: f32,
}

impl Match {
    fn new(doc_id: u64, span: &Span, score: f32) -> Self {
        Match {
            doc_id,
            span_start: span.start,
            span_end: span.end,
            startchar: span.startchar,
            endchar: span.endchar,
            score,
        }
    }
}

/// One matched document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: u64,
    pub score: f32,
    /// Matched spans, empty for documents matched without positions
    /// (`NOT` queries).
    pub spans: Vec<Span>,
}

/// A lazy sequence of matches.
///
/// Documents are evaluated one at a time as the iterator is pulled; dropping
/// it stops the search. After an error the iterator is finished.
#[derive(Debug)]
pub struct Matches {
    matcher: Box<dyn Matcher>,
    pending: VecDeque<Match>,
    consumed: bool,
}

impl Matches {
    fn new(matcher: Box<dyn Matcher>) -> Self {
        Matches {
            matcher,
            pending: VecDeque::new(),
            consumed: false,
        }
    }
}

impl Iterator for Matches {
    type Item = Result<Match>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(Ok(found));
            }
            if self.consumed {
                self.consumed = false;
                if let Err(err) = self.matcher.next() {
                    self.matcher = Box::new(EmptyMatcher::new());
                    return Some(Err(err));
                }
            }
            if self.matcher.is_exhausted() {
                return None;
            }

            let doc_id = self.matcher.doc_id();
            let score = self.matcher.score();
            let spans = self.matcher.spans();
            if spans.is_empty() {
                self.pending.push_back(Match::new(doc_id, &Span::new(0, 0), score));
            } else {
                self.pending
                    .extend(spans.iter().map(|span| Match::new(doc_id, span, score)));
            }
            self.consumed = true;
        }
    }
}

/// Evaluates queries against one index snapshot.
#[derive(Debug)]
pub struct Searcher<'a> {
    schema: &'a Schema,
    index: &'a dyn IndexSnapshot,
    config: EngineConfig,
    parser: QueryParser,
}

impl<'a> Searcher<'a> {
    /// Create a searcher with the default configuration.
    pub fn new(schema: &'a Schema, index: &'a dyn IndexSnapshot) -> Self {
        Searcher {
            schema,
            index,
            config: EngineConfig::default(),
            parser: QueryParser::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.parser = QueryParser::from_config(&config.query);
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a query string with the configured parser.
    pub fn parse(&self, query: &str) -> Result<Query> {
        self.parser.parse(query)
    }

    /// The resolver used to build matchers.
    pub fn resolver(&self) -> QueryResolver<'_> {
        QueryResolver::new(self.schema, self.index, &self.config)
    }

    /// Match `query`, yielding one [`Match`] per matched span.
    pub fn search(&self, query: &Query) -> Result<Matches> {
        let matcher = self.resolver().matcher(query)?;
        log::debug!("searching {query} (cost {})", matcher.cost());
        Ok(Matches::new(matcher))
    }

    /// Parse and match a query string.
    pub fn search_str(&self, query: &str) -> Result<Matches> {
        self.search(&self.parse(query)?)
    }

    /// Every matched document with its spans, in document order.
    pub fn search_docs(&self, query: &Query) -> Result<Vec<Hit>> {
        let mut matcher = self.resolver().matcher(query)?;
        let mut hits = Vec::new();
        while !matcher.is_exhausted() {
            hits.push(Hit {
                doc_id: matcher.doc_id(),
                score: matcher.score(),
                spans: matcher.spans(),
            });
            matcher.next()?;
        }
        log::debug!("{query} matched {} documents", hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::FieldKind;
    use crate::index::memory::MemoryIndex;

    fn index(schema: &Schema, docs: &[&str]) -> MemoryIndex {
        let mut index = MemoryIndex::new();
        for (doc_id, text) in docs.iter().enumerate() {
            index.add_document(schema, doc_id as u64, text).unwrap();
        }
        index
    }

    fn forms() -> Schema {
        Schema::builder().with_fields([FieldKind::Form]).build().unwrap()
    }

    fn doc_ids(searcher: &Searcher<'_>, query: &str) -> Vec<u64> {
        let query = searcher.parse(query).unwrap();
        searcher.search_docs(&query).unwrap().iter().map(|hit| hit.doc_id).collect()
    }

    #[test]
    fn test_boolean_queries() {
        let schema = forms();
        let index = index(&schema, &["arma uirum", "arma cano", "cano troiae", "uirum"]);
        let searcher = Searcher::new(&schema, &index);

        assert_eq!(doc_ids(&searcher, "arma"), vec![0, 1]);
        assert_eq!(doc_ids(&searcher, "arma cano"), vec![1]);
        assert_eq!(doc_ids(&searcher, "arma OR cano"), vec![0, 1, 2]);
        assert_eq!(doc_ids(&searcher, "arma ANDNOT cano"), vec![0]);
        assert_eq!(doc_ids(&searcher, "NOT arma"), vec![2, 3]);
        assert_eq!(doc_ids(&searcher, "cano -arma"), vec![2]);
        assert_eq!(doc_ids(&searcher, "arm*"), vec![0, 1]);
        assert!(doc_ids(&searcher, "").is_empty());
        assert!(doc_ids(&searcher, "aeneas").is_empty());
    }

    #[test]
    fn test_scores() {
        let schema = forms();
        let index = index(&schema, &["arma uirum", "arma cano"]);
        let searcher = Searcher::new(&schema, &index);

        let query = searcher.parse("arma ANDMAYBE uirum").unwrap();
        let hits = searcher.search_docs(&query).unwrap();
        assert_eq!(hits[0].score, 2.0);
        assert_eq!(hits[1].score, 1.0);

        let query = searcher.parse("arma^3 REQUIRE cano").unwrap();
        let hits = searcher.search_docs(&query).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 3.0);
        assert_eq!(hits[0].spans.len(), 1);
    }

    #[test]
    fn test_one_match_per_span() {
        let schema = forms();
        let index = index(&schema, &["arma arma cano", "cano arma"]);
        let searcher = Searcher::new(&schema, &index);

        let matches: Vec<Match> = searcher.search_str("arma").unwrap().map(|m| m.unwrap()).collect();
        let found: Vec<(u64, usize)> = matches.iter().map(|m| (m.doc_id, m.span_start)).collect();
        assert_eq!(found, vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!((matches[2].startchar, matches[2].endchar), (5, 9));
    }

    #[test]
    fn test_matches_are_lazy() {
        let schema = forms();
        let index = index(&schema, &["arma", "arma", "arma"]);
        let searcher = Searcher::new(&schema, &index);
        let mut matches = searcher.search_str("arma").unwrap();
        assert_eq!(matches.next().unwrap().unwrap().doc_id, 0);
        assert_eq!(matches.matcher.doc_id(), 0);
    }

    #[test]
    fn test_positionless_documents() {
        let schema = forms();
        let index = index(&schema, &["arma", "cano"]);
        let searcher = Searcher::new(&schema, &index);
        let matches: Vec<Match> = searcher.search_str("NOT arma").unwrap().map(|m| m.unwrap()).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].doc_id, 1);
        assert_eq!((matches[0].span_start, matches[0].span_end), (0, 0));
    }

    #[test]
    fn test_sequence_slop_from_config() {
        let schema = forms();
        let index = index(&schema, &["arma et uirum", "arma uirum"]);
        let searcher = Searcher::new(&schema, &index);
        assert_eq!(doc_ids(&searcher, "\"arma uirum\""), vec![1]);
        assert_eq!(doc_ids(&searcher, "\"arma uirum\"~2"), vec![0, 1]);

        let mut config = EngineConfig::default();
        config.matcher.min_slop = 2;
        let searcher = Searcher::new(&schema, &index).with_config(config);
        assert_eq!(doc_ids(&searcher, "\"arma uirum\""), vec![0, 1]);
        assert_eq!(doc_ids(&searcher, "\"uirum arma\""), Vec::<u64>::new());

        let mut config = EngineConfig::default();
        config.matcher.ordered = false;
        let searcher = Searcher::new(&schema, &index).with_config(config);
        assert_eq!(doc_ids(&searcher, "\"uirum arma\""), vec![1]);
    }

    #[test]
    fn test_missing_field_is_a_query_error() {
        let schema = forms();
        let index = index(&schema, &["arma"]);
        let searcher = Searcher::new(&schema, &index);
        assert!(searcher.search_str("<arma>").is_err());
        assert!(searcher.search_str("arma)").is_err());
    }
}
