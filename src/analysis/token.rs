//! Token types for the analysis pipeline.
//!
//! A [`Token`] is the unit of data that flows through every stage. Tokenizers
//! create tokens, filters rewrite or expand them, and the index stores the
//! final `text` of each token as a posting.
//!
//! # Modes
//!
//! Every token carries a [`Mode`]. Tokenizers stamp the mode of the current
//! invocation on every token they emit, so a stream never mixes modes:
//!
//! - [`Mode::Index`] - exhaustive: filters emit every legitimate expansion
//! - [`Mode::Query`] - minimal: filters interpret query micro-grammars
//! - [`Mode::Skip`] - pass-through: filters forward tokens untouched
//!
//! Filters pick their branch from the first token with [`split_mode`].
//!
//! # Examples
//!
//! ```
//! use cylleneus::analysis::token::{Mode, Token};
//!
//! let token = Token::index("Virtutem", 3, 14, 22);
//! assert_eq!(token.mode, Mode::Index);
//! assert_eq!(token.original, "Virtutem");
//! assert_eq!(token.pos, 3);
//!
//! let query = Token::query("virtus");
//! assert_eq!(query.mode, Mode::Query);
//! assert_eq!(query.boost, 1.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexicon::relation::Relation;

/// The analysis mode of a pipeline invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Documents are being indexed.
    #[default]
    Index,
    /// Query text is being resolved.
    Query,
    /// Tokens pass through untouched.
    Skip,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Index => write!(f, "index"),
            Mode::Query => write!(f, "query"),
            Mode::Skip => write!(f, "skip"),
        }
    }
}

/// Structural location of a token: ordered `(division, value)` pairs such as
/// `[("book", "1"), ("chapter", "4")]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meta {
    divisions: Vec<(String, String)>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a division, keeping its original place if it already exists.
    pub fn set(&mut self, division: impl Into<String>, value: impl Into<String>) {
        let division = division.into();
        let value = value.into();
        match self.divisions.iter_mut().find(|(d, _)| *d == division) {
            Some(entry) => entry.1 = value,
            None => self.divisions.push((division, value)),
        }
    }

    pub fn with(mut self, division: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(division, value);
        self
    }

    pub fn get(&self, division: &str) -> Option<&str> {
        self.divisions
            .iter()
            .find(|(d, _)| d == division)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.divisions.iter().map(|(d, v)| (d.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.divisions.len()
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&str> = self.divisions.iter().map(|(_, v)| v.as_str()).collect();
        write!(f, "{}", values.join("."))
    }
}

/// A single token.
///
/// Tokens are plain values: fan-out filters clone them and the cache hands
/// out clones, so mutating one copy never affects another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Current matchable key, rewritten by each stage.
    pub text: String,

    /// Surface form as it appeared in the source, set once by the tokenizer.
    pub original: String,

    /// Annotated or inferred lemma.
    pub lemma: Option<String>,

    /// Morphology: a native tag, a canonical tag or a composite annotation key,
    /// depending on the stage.
    pub morpho: Option<String>,

    /// Dependency relation label.
    pub morphosyntax: Option<String>,

    /// Structural location.
    pub meta: Meta,

    /// Sentence counter within the document.
    pub sent_id: Option<usize>,

    /// Position within the sentence.
    pub sent_pos: Option<usize>,

    /// Position in the token sequence (0-based).
    pub pos: usize,

    /// Character offset where the token starts.
    pub startchar: usize,

    /// Character offset where the token ends.
    pub endchar: usize,

    /// Scoring weight (default: 1.0).
    pub boost: f32,

    /// Mode of the invocation that produced this token.
    pub mode: Mode,

    /// Whether stopped tokens are removed rather than just marked.
    pub removestops: bool,

    /// Whether a stop filter marked this token.
    pub stopped: bool,

    /// Relation operator to follow before matching (query mode).
    pub reltype: Option<Relation>,

    /// Language of a cross-language gloss query (query mode).
    pub language: Option<String>,
}

impl Token {
    /// Create a token with an explicit mode.
    pub fn new<S: Into<String>>(text: S, mode: Mode) -> Self {
        let text = text.into();
        Token {
            original: text.clone(),
            text,
            lemma: None,
            morpho: None,
            morphosyntax: None,
            meta: Meta::default(),
            sent_id: None,
            sent_pos: None,
            pos: 0,
            startchar: 0,
            endchar: 0,
            boost: 1.0,
            mode,
            removestops: false,
            stopped: false,
            reltype: None,
            language: None,
        }
    }

    /// Create an index-mode token at a position with character offsets.
    pub fn index<S: Into<String>>(text: S, pos: usize, startchar: usize, endchar: usize) -> Self {
        let mut token = Token::new(text, Mode::Index);
        token.pos = pos;
        token.startchar = startchar;
        token.endchar = endchar;
        token
    }

    /// Create a query-mode token.
    pub fn query<S: Into<String>>(text: S) -> Self {
        Token::new(text, Mode::Query)
    }

    /// Clone this token with different text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    pub fn with_lemma<S: Into<String>>(mut self, lemma: S) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_morpho<S: Into<String>>(mut self, morpho: S) -> Self {
        self.morpho = Some(morpho.into());
        self
    }

    pub fn with_morphosyntax<S: Into<String>>(mut self, label: S) -> Self {
        self.morphosyntax = Some(label.into());
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_removestops(mut self, removestops: bool) -> Self {
        self.removestops = removestops;
        self
    }

    pub fn with_reltype(mut self, relation: Relation) -> Self {
        self.reltype = Some(relation);
        self
    }

    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Whether the token carries structural meta.
    pub fn is_structural(&self) -> bool {
        !self.meta.is_empty()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream {
    /// Convert this type into a token stream.
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}

/// Determine the mode of a stream from its first token.
///
/// Returns `None` for an empty stream. The returned stream yields the peeked
/// token again and panics if any later token carries a different mode: mixing
/// modes within one invocation is a programming error.
pub fn split_mode(mut tokens: TokenStream) -> Option<(Mode, TokenStream)> {
    let first = tokens.next()?;
    let mode = first.mode;
    let stream = std::iter::once(first).chain(tokens).inspect(move |token| {
        assert_eq!(
            token.mode, mode,
            "token '{}' has mode {} in a {} stream",
            token.text, token.mode, mode
        );
    });
    Some((mode, Box::new(stream)))
}
