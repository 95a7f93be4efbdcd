//! Stop filter implementation.
//!
//! Marks function words as stopped. A stopped token is removed from the
//! stream when its `removestops` flag is set (see
//! [`AnalysisContext::with_removestops`]); otherwise it stays in place so that
//! positions of the surrounding words are unaffected. Query tokens are marked
//! but never removed.
//!
//! # Examples
//!
//! ```
//! use cylleneus::analysis::pipeline::AnalysisContext;
//! use cylleneus::analysis::token::{Token, TokenStream};
//! use cylleneus::analysis::token_filter::Filter;
//! use cylleneus::analysis::token_filter::stop::StopFilter;
//!
//! let filter = StopFilter::latin();
//! let tokens: TokenStream = Box::new(
//!     vec![
//!         Token::index("arma", 0, 0, 4).with_removestops(true),
//!         Token::index("et", 1, 5, 7).with_removestops(true),
//!         Token::index("uirum", 2, 8, 13).with_removestops(true),
//!     ]
//!     .into_iter(),
//! );
//!
//! let result: Vec<_> = filter.filter(tokens, &AnalysisContext::index(0)).unwrap().collect();
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[1].text, "uirum");
//! assert_eq!(result[1].pos, 2);
//! ```

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;

/// Default Latin stop words, in normalized (`u` for `v`, `i` for `j`) spelling.
const DEFAULT_LATIN_STOP_WORDS: &[&str] = &[
    "a", "ab", "ac", "ad", "adhic", "aliqui", "aliquis", "an", "ante", "apud", "at", "atque",
    "aut", "autem", "cum", "cur", "de", "deinde", "dum", "ego", "enim", "ergo", "es", "est", "et",
    "etiam", "etsi", "ex", "fio", "haud", "hic", "iam", "idem", "igitur", "ille", "in", "infra",
    "inter", "interim", "ipse", "is", "ita", "magis", "modo", "mox", "nam", "ne", "nec", "necque",
    "neque", "nisi", "non", "nos", "o", "ob", "per", "possum", "post", "pro", "quae", "quam",
    "quare", "qui", "quia", "quicumque", "quidem", "quilibet", "quis", "quisnam", "quisquam",
    "quisque", "quisquis", "quo", "quoniam", "sed", "si", "sic", "sive", "sub", "sui", "sum",
    "super", "suus", "tam", "tamen", "trans", "tu", "tum", "ubi", "uel", "uero", "unus", "ut",
];

/// Default Latin stop words as a set.
pub static DEFAULT_LATIN_STOP_WORDS_SET: LazyLock<AHashSet<String>> = LazyLock::new(|| {
    DEFAULT_LATIN_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A filter that marks (and optionally removes) stop words.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<AHashSet<String>>,
}

impl StopFilter {
    /// Create a stop filter with the default Latin stop words.
    pub fn latin() -> Self {
        Self::with_stop_words(DEFAULT_LATIN_STOP_WORDS_SET.clone())
    }

    /// Create a stop filter with custom stop words.
    pub fn with_stop_words(stop_words: AHashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// Create a stop filter from a list of stop words.
    ///
    /// ```
    /// use cylleneus::analysis::token_filter::stop::StopFilter;
    ///
    /// let filter = StopFilter::from_words(vec!["καί", "δέ"]);
    /// assert_eq!(filter.len(), 2);
    /// assert!(filter.is_stop_word("καί"));
    /// ```
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_stop_words(words.into_iter().map(Into::into).collect())
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::latin()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream, _ctx: &AnalysisContext) -> Result<TokenStream> {
        let Some((mode, tokens)) = split_mode(tokens) else {
            return Ok(empty());
        };
        let stop_words = Arc::clone(&self.stop_words);
        match mode {
            Mode::Skip => Ok(tokens),
            Mode::Index => Ok(Box::new(tokens.filter_map(move |mut token| {
                if stop_words.contains(&token.text) {
                    token.stopped = true;
                }
                (!(token.stopped && token.removestops)).then_some(token)
            }))),
            Mode::Query => Ok(Box::new(tokens.map(move |mut token| {
                token.stopped = stop_words.contains(&token.text);
                token
            }))),
        }
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
