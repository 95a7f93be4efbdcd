//! Case and orthography normalization.
//!
//! Editions of the same text disagree on capitalization, on the Latin `i/j`
//! and `u/v` distinction and on Greek accentuation. This filter folds those
//! differences away so that surface forms from different editions (and from
//! queries) meet on one key.
//!
//! # Examples
//!
//! ```
//! use cylleneus::analysis::pipeline::AnalysisContext;
//! use cylleneus::analysis::token::{Token, TokenStream};
//! use cylleneus::analysis::token_filter::Filter;
//! use cylleneus::analysis::token_filter::case::CaseFilter;
//!
//! let tokens: TokenStream = Box::new(vec![Token::index("Iuventus", 0, 0, 8)].into_iter());
//! let out: Vec<_> = CaseFilter::latin()
//!     .filter(tokens, &AnalysisContext::index(0))
//!     .unwrap()
//!     .collect();
//! assert_eq!(out[0].text, "iuuentus");
//! ```

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::token::{Mode, TokenStream, split_mode};
use crate::analysis::token_filter::{Filter, empty};
use crate::error::Result;

/// Lowercases tokens and optionally folds orthographic variants.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseFilter {
    fold_latin: bool,
    strip_diacritics: bool,
}

impl CaseFilter {
    /// Lowercase only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercase, fold `j→i` and `v→u`, strip diacritics (macrons, breves).
    pub fn latin() -> Self {
        CaseFilter {
            fold_latin: true,
            strip_diacritics: true,
        }
    }

    /// Lowercase and strip accents and breathings.
    pub fn greek() -> Self {
        CaseFilter {
            fold_latin: false,
            strip_diacritics: true,
        }
    }

    /// The form normalization appropriate for a language code.
    pub fn for_language(language: &str) -> Self {
        match language {
            "lat" => Self::latin(),
            "grc" | "san" => Self::greek(),
            _ => Self::new(),
        }
    }

    pub fn with_latin_folding(mut self, fold: bool) -> Self {
        self.fold_latin = fold;
        self
    }

    pub fn with_diacritic_stripping(mut self, strip: bool) -> Self {
        self.strip_diacritics = strip;
        self
    }

    /// Normalize one string.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped: String = if self.strip_diacritics {
            lowered.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
        } else {
            lowered
        };
        if self.fold_latin {
            stripped
                .chars()
                .map(|c| match c {
                    'j' => 'i',
                    'v' => 'u',
                    other => other,
                })
                .collect()
        } else {
            stripped
        }
    }
}

impl Filter for CaseFilter {
    fn filter(&self, tokens: TokenStream, _ctx: &AnalysisContext) -> Result<TokenStream> {
        let Some((mode, tokens)) = split_mode(tokens) else {
            return Ok(empty());
        };
        let filter = *self;
        match mode {
            Mode::Skip => Ok(tokens),
            // a trailing `*` survives normalization untouched
            Mode::Index | Mode::Query => Ok(Box::new(tokens.map(move |mut token| {
                token.text = filter.normalize(&token.text);
                token
            }))),
        }
    }

    fn name(&self) -> &'static str {
        "case"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{Token, TokenStream};

    fn run(filter: CaseFilter, tokens: Vec<Token>) -> Vec<String> {
        let stream: TokenStream = Box::new(tokens.into_iter());
        filter
            .filter(stream, &AnalysisContext::index(0))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_lowercase_only() {
        assert_eq!(CaseFilter::new().normalize("Virtus"), "virtus");
        assert_eq!(CaseFilter::new().normalize("Ἀρετή"), "ἀρετή");
    }

    #[test]
    fn test_latin_folding() {
        let filter = CaseFilter::latin();
        assert_eq!(filter.normalize("Iūlius"), "iulius");
        assert_eq!(filter.normalize("VIVIT"), "uiuit");
        assert_eq!(filter.normalize("Jove"), "ioue");
    }

    #[test]
    fn test_greek_diacritics() {
        assert_eq!(CaseFilter::greek().normalize("Ἀρετή"), "αρετη");
        assert_eq!(CaseFilter::for_language("grc").normalize("λόγος"), "λογος");
    }

    #[test]
    fn test_query_wildcard_preserved() {
        let stream: TokenStream = Box::new(vec![Token::query("Virt*")].into_iter());
        let out: Vec<_> = CaseFilter::latin()
            .filter(stream, &AnalysisContext::query())
            .unwrap()
            .collect();
        assert_eq!(out[0].text, "uirt*");
    }

    #[test]
    fn test_skip_mode_passes_through() {
        let tokens = vec![Token::new("Arma", Mode::Skip)];
        assert_eq!(run(CaseFilter::latin(), tokens), vec!["Arma"]);
    }

    #[test]
    fn test_original_is_kept() {
        let stream: TokenStream = Box::new(vec![Token::index("Arma", 0, 0, 4)].into_iter());
        let out: Vec<_> = CaseFilter::latin()
            .filter(stream, &AnalysisContext::index(0))
            .unwrap()
            .collect();
        assert_eq!(out[0].original, "Arma");
    }
}
