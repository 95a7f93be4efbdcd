//! An in-memory inverted index.

use std::collections::BTreeMap;
use std::ops::Bound;

use ahash::AHashMap;

use crate::analysis::schema::{FieldKind, Schema};
use crate::analysis::token::Token;
use crate::error::{CylleneusError, Result};
use crate::index::{DocPostings, IndexSnapshot, Posting};

type Postings = BTreeMap<u64, Vec<Posting>>;

/// Inverted index held in memory: per field, a sorted term dictionary whose
/// entries map document ids to position-ordered postings.
///
/// # Examples
///
/// ```
/// use cylleneus::analysis::schema::{FieldKind, Schema};
/// use cylleneus::index::IndexSnapshot;
/// use cylleneus::index::memory::MemoryIndex;
///
/// let schema = Schema::builder().with_fields([FieldKind::Form]).build().unwrap();
/// let mut index = MemoryIndex::new();
/// index.add_document(&schema, 1, "Arma uirumque cano").unwrap();
///
/// let postings = index.postings(FieldKind::Form, "cano").unwrap();
/// assert_eq!(postings[0].doc_id, 1);
/// assert_eq!(postings[0].postings[0].pos, 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryIndex {
    fields: AHashMap<FieldKind, BTreeMap<String, Postings>>,
    documents: BTreeMap<u64, String>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyse `text` with every field of `schema` and index it as `doc_id`.
    pub fn add_document(&mut self, schema: &Schema, doc_id: u64, text: &str) -> Result<()> {
        if self.documents.contains_key(&doc_id) {
            return Err(CylleneusError::index(format!("document {doc_id} is already indexed")));
        }
        for (field, tokens) in schema.analyze_document(doc_id, text)? {
            self.commit(doc_id, field, &tokens);
        }
        self.documents.insert(doc_id, text.to_string());
        log::debug!("indexed document {doc_id} ({} chars)", text.chars().count());
        Ok(())
    }

    /// Record analysed tokens of one field. A term occurring twice at the
    /// same position (one per reading) is stored once.
    pub fn commit(&mut self, doc_id: u64, field: FieldKind, tokens: &[Token]) {
        let terms = self.fields.entry(field).or_default();
        for token in tokens {
            let postings = terms
                .entry(token.text.clone())
                .or_default()
                .entry(doc_id)
                .or_default();
            let posting = Posting::from(token);
            match postings.binary_search_by_key(&posting.pos, |p| p.pos) {
                Ok(i) => postings[i].structural |= posting.structural,
                Err(i) => postings.insert(i, posting),
            }
        }
    }

    /// Remove a document from every field.
    pub fn remove_document(&mut self, doc_id: u64) -> bool {
        if self.documents.remove(&doc_id).is_none() {
            return false;
        }
        for terms in self.fields.values_mut() {
            terms.retain(|_, postings| {
                postings.remove(&doc_id);
                !postings.is_empty()
            });
        }
        true
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of distinct terms in `field`.
    pub fn term_count(&self, field: FieldKind) -> usize {
        self.fields.get(&field).map_or(0, BTreeMap::len)
    }

    /// Store text for a document whose tokens are committed directly.
    pub fn store(&mut self, doc_id: u64, text: impl Into<String>) {
        self.documents.insert(doc_id, text.into());
    }
}

impl IndexSnapshot for MemoryIndex {
    fn doc_ids(&self) -> Vec<u64> {
        self.documents.keys().copied().collect()
    }

    fn doc_count(&self) -> usize {
        self.documents.len()
    }

    fn postings(&self, field: FieldKind, term: &str) -> Result<Vec<DocPostings>> {
        let Some(postings) = self.fields.get(&field).and_then(|terms| terms.get(term)) else {
            return Ok(Vec::new());
        };
        Ok(postings
            .iter()
            .map(|(&doc_id, postings)| DocPostings {
                doc_id,
                postings: postings.clone(),
            })
            .collect())
    }

    fn terms(&self, field: FieldKind) -> Result<Vec<String>> {
        Ok(self
            .fields
            .get(&field)
            .map(|terms| terms.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn terms_with_prefix(&self, field: FieldKind, prefix: &str) -> Result<Vec<String>> {
        let Some(terms) = self.fields.get(&field) else {
            return Ok(Vec::new());
        };
        Ok(terms
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(term, _)| term)
            .take_while(|term| term.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn stored(&self, doc_id: u64) -> Result<Option<String>> {
        Ok(self.documents.get(&doc_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Meta;

    fn forms() -> Schema {
        Schema::builder().with_fields([FieldKind::Form]).build().unwrap()
    }

    #[test]
    fn test_add_document() {
        let schema = forms();
        let mut index = MemoryIndex::new();
        index.add_document(&schema, 2, "cum uirtute cum").unwrap();
        index.add_document(&schema, 1, "cum").unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.doc_ids(), vec![1, 2]);

        let postings = index.postings(FieldKind::Form, "cum").unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].doc_id, 1);
        let positions: Vec<usize> = postings[1].postings.iter().map(|p| p.pos).collect();
        assert_eq!(positions, vec![0, 2]);
        assert_eq!(postings[1].postings[1].startchar, 12);
        assert_eq!(postings[1].postings[1].endchar, 15);

        assert_eq!(index.stored(1).unwrap().as_deref(), Some("cum"));
        assert!(index.postings(FieldKind::Lemma, "cum").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_document() {
        let schema = forms();
        let mut index = MemoryIndex::new();
        index.add_document(&schema, 1, "arma").unwrap();
        assert!(index.add_document(&schema, 1, "arma").is_err());
    }

    #[test]
    fn test_same_position_is_stored_once() {
        let mut index = MemoryIndex::new();
        let structural = Token::index("arma", 0, 0, 4).with_meta(Meta::new().with("line", "1"));
        index.commit(1, FieldKind::Lemma, &[Token::index("arma", 0, 0, 4), structural]);
        let postings = index.postings(FieldKind::Lemma, "arma").unwrap();
        assert_eq!(postings[0].postings.len(), 1);
        assert!(postings[0].postings[0].structural);
    }

    #[test]
    fn test_terms_with_prefix() {
        let schema = forms();
        let mut index = MemoryIndex::new();
        index.add_document(&schema, 1, "arma armis arx uirum").unwrap();
        assert_eq!(index.term_count(FieldKind::Form), 4);
        assert_eq!(
            index.terms_with_prefix(FieldKind::Form, "arm").unwrap(),
            vec!["arma", "armis"]
        );
        assert!(index.terms_with_prefix(FieldKind::Form, "z").unwrap().is_empty());
    }

    #[test]
    fn test_remove_document() {
        let schema = forms();
        let mut index = MemoryIndex::new();
        index.add_document(&schema, 1, "arma").unwrap();
        index.add_document(&schema, 2, "arma cano").unwrap();
        assert!(index.remove_document(2));
        assert!(!index.remove_document(2));
        assert_eq!(index.terms(FieldKind::Form).unwrap(), vec!["arma"]);
    }
}
