//! The storage collaborator.
//!
//! Search only needs a read-only view of an inverted index: postings with
//! positions and character offsets, the term dictionary of each field, and
//! stored document text. [`IndexSnapshot`] is that view; [`memory::MemoryIndex`]
//! is an in-memory implementation of it.

pub mod memory;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::analysis::schema::FieldKind;
use crate::analysis::token::Token;
use crate::error::Result;

/// One occurrence of a term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Posting {
    /// Token position.
    pub pos: usize,
    pub startchar: usize,
    pub endchar: usize,
    /// Whether the token carried structural meta.
    pub structural: bool,
}

impl Posting {
    pub fn new(pos: usize, startchar: usize, endchar: usize) -> Self {
        Posting {
            pos,
            startchar,
            endchar,
            structural: false,
        }
    }

    pub fn with_structural(mut self, structural: bool) -> Self {
        self.structural = structural;
        self
    }
}

impl From<&Token> for Posting {
    fn from(token: &Token) -> Self {
        Posting::new(token.pos, token.startchar, token.endchar).with_structural(token.is_structural())
    }
}

/// The postings of one term in one document, ordered by position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPostings {
    pub doc_id: u64,
    pub postings: Vec<Posting>,
}

/// A read-only view of an index.
pub trait IndexSnapshot: Send + Sync + Debug {
    /// All document ids, ascending.
    fn doc_ids(&self) -> Vec<u64>;

    /// Number of documents.
    fn doc_count(&self) -> usize {
        self.doc_ids().len()
    }

    /// Postings of `term` in `field`, ordered by document id.
    fn postings(&self, field: FieldKind, term: &str) -> Result<Vec<DocPostings>>;

    /// Every term of `field`, ascending.
    fn terms(&self, field: FieldKind) -> Result<Vec<String>>;

    /// Terms of `field` starting with `prefix`, ascending.
    fn terms_with_prefix(&self, field: FieldKind, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .terms(field)?
            .into_iter()
            .filter(|term| term.starts_with(prefix))
            .collect())
    }

    /// The stored text of a document.
    fn stored(&self, doc_id: u64) -> Result<Option<String>>;
}
