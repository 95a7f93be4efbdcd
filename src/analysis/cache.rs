//! Per-document memoization of a filter's index-mode output.
//!
//! Several schema fields share a pipeline prefix: the lemma, annotation,
//! synset and semantic-field pipelines all start with the same lemma stage.
//! Wrapping that stage in a [`CachedFilter`] means the lexicon is consulted
//! once per document instead of once per field.
//!
//! The cache holds at most one entry, keyed by `docix`. Analysing a different
//! document replaces it. Query and skip streams bypass the cache entirely:
//! they neither read nor write it.
//!
//! On a hit the input stream is discarded without being consumed; the cached
//! tokens stand in for everything the wrapped filter would have produced.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use cylleneus::analysis::cache::CachedFilter;
//! use cylleneus::analysis::pipeline::AnalysisContext;
//! use cylleneus::analysis::token::{Token, TokenStream};
//! use cylleneus::analysis::token_filter::Filter;
//! use cylleneus::analysis::token_filter::case::CaseFilter;
//!
//! let cached = CachedFilter::new(Arc::new(CaseFilter::new()));
//! let ctx = AnalysisContext::index(42);
//!
//! for _ in 0..2 {
//!     let tokens: TokenStream = Box::new(vec![Token::index("Roma", 0, 0, 4)].into_iter());
//!     let out: Vec<_> = cached.filter(tokens, &ctx).unwrap().collect();
//!     assert_eq!(out[0].text, "roma");
//! }
//! assert_eq!(cached.misses(), 1);
//! assert_eq!(cached.hits(), 1);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, Token, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;

struct CacheEntry {
    docix: u64,
    tokens: Arc<[Token]>,
}

/// A filter wrapper that memoizes index-mode output per document.
pub struct CachedFilter {
    inner: Arc<dyn Filter>,
    entry: Mutex<Option<CacheEntry>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CachedFilter {
    pub fn new(inner: Arc<dyn Filter>) -> Self {
        CachedFilter {
            inner,
            entry: Mutex::new(None),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// The wrapped filter.
    pub fn inner(&self) -> &Arc<dyn Filter> {
        &self.inner
    }

    /// Number of invocations served from the cache.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of invocations that ran the wrapped filter in index mode.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// The document currently cached, if any.
    pub fn cached_docix(&self) -> Option<u64> {
        self.entry.lock().as_ref().map(|entry| entry.docix)
    }

    /// Drop the cached entry.
    pub fn clear(&self) {
        *self.entry.lock() = None;
    }

    fn lookup(&self, docix: u64) -> Option<Arc<[Token]>> {
        self.entry
            .lock()
            .as_ref()
            .filter(|entry| entry.docix == docix)
            .map(|entry| Arc::clone(&entry.tokens))
    }
}

/// Yield clones of shared tokens.
fn replay(tokens: Arc<[Token]>) -> TokenStream {
    Box::new((0..tokens.len()).map(move |i| tokens[i].clone()))
}

impl Filter for CachedFilter {
    fn filter(&self, tokens: TokenStream, ctx: &AnalysisContext) -> Result<TokenStream> {
        let Some((mode, tokens)) = split_mode(tokens) else {
            return Ok(empty());
        };
        let docix = match (mode, ctx.docix) {
            (Mode::Index, Some(docix)) => docix,
            (Mode::Index, None) | (Mode::Query, _) | (Mode::Skip, _) => {
                return self.inner.filter(tokens, ctx);
            }
        };

        if let Some(cached) = self.lookup(docix) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!("{} cache hit for document {docix}", self.inner.name());
            return Ok(replay(cached));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!("{} cache miss for document {docix}", self.inner.name());
        let output: Arc<[Token]> = self.inner.filter(tokens, ctx)?.collect::<Vec<_>>().into();
        *self.entry.lock() = Some(CacheEntry {
            docix,
            tokens: Arc::clone(&output),
        });
        Ok(replay(output))
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

impl fmt::Debug for CachedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedFilter")
            .field("inner", &self.inner.name())
            .field("docix", &self.cached_docix())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token_filter::case::CaseFilter;

    /// Counts how many tokens it has processed.
    #[derive(Default)]
    struct CountingFilter {
        seen: AtomicUsize,
    }

    impl Filter for CountingFilter {
        fn filter(&self, tokens: TokenStream, _ctx: &AnalysisContext) -> Result<TokenStream> {
            let seen: Vec<Token> = tokens.collect();
            self.seen.fetch_add(seen.len(), Ordering::Relaxed);
            Ok(Box::new(seen.into_iter()))
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn stream(tokens: Vec<Token>) -> TokenStream {
        Box::new(tokens.into_iter())
    }

    #[test]
    fn test_hit_returns_equal_tokens_without_recomputing() {
        let counting = Arc::new(CountingFilter::default());
        let cached = CachedFilter::new(counting.clone());
        let ctx = AnalysisContext::index(1);
        let input = || stream(vec![Token::index("arma", 0, 0, 4), Token::index("uirum", 1, 5, 10)]);

        let first: Vec<_> = cached.filter(input(), &ctx).unwrap().collect();
        let second: Vec<_> = cached.filter(input(), &ctx).unwrap().collect();

        assert_eq!(first, second);
        assert_eq!(counting.seen.load(Ordering::Relaxed), 2);
        assert_eq!((cached.hits(), cached.misses()), (1, 1));
    }

    #[test]
    fn test_docix_change_invalidates() {
        let cached = CachedFilter::new(Arc::new(CaseFilter::new()));
        cached
            .filter(stream(vec![Token::index("Arma", 0, 0, 4)]), &AnalysisContext::index(1))
            .unwrap()
            .for_each(drop);
        let out: Vec<_> = cached
            .filter(stream(vec![Token::index("Roma", 0, 0, 4)]), &AnalysisContext::index(2))
            .unwrap()
            .collect();

        assert_eq!(out[0].text, "roma");
        assert_eq!(cached.misses(), 2);
        assert_eq!(cached.cached_docix(), Some(2));
    }

    #[test]
    fn test_mutating_a_hit_does_not_corrupt_the_cache() {
        let cached = CachedFilter::new(Arc::new(CaseFilter::new()));
        let ctx = AnalysisContext::index(3);
        let mut first: Vec<_> = cached
            .filter(stream(vec![Token::index("Roma", 0, 0, 4)]), &ctx)
            .unwrap()
            .collect();
        first[0].text.push_str("-changed");

        let second: Vec<_> = cached
            .filter(stream(vec![Token::index("Roma", 0, 0, 4)]), &ctx)
            .unwrap()
            .collect();
        assert_eq!(second[0].text, "roma");
    }

    #[test]
    fn test_query_mode_bypasses_cache() {
        let cached = CachedFilter::new(Arc::new(CaseFilter::new()));
        cached
            .filter(stream(vec![Token::index("Roma", 0, 0, 4)]), &AnalysisContext::index(5))
            .unwrap()
            .for_each(drop);

        let out: Vec<_> = cached
            .filter(stream(vec![Token::query("Arma")]), &AnalysisContext::query())
            .unwrap()
            .collect();

        assert_eq!(out[0].text, "arma");
        assert_eq!((cached.hits(), cached.misses()), (0, 1));
        assert_eq!(cached.cached_docix(), Some(5));
    }

    #[test]
    fn test_empty_stream() {
        let cached = CachedFilter::new(Arc::new(CaseFilter::new()));
        assert_eq!(cached.filter(stream(vec![]), &AnalysisContext::index(1)).unwrap().count(), 0);
        assert_eq!(cached.misses(), 0);
    }
}
