//! Lexical collaborators used by the analysis pipeline.
//!
//! Lemma, gloss and semantic-field expansion all depend on a WordNet-family
//! lexicon per language and on a morphological analyser for surface forms.
//! Both are modelled as traits injected into the filters that need them; the
//! crate never reaches for a process-wide client.
//!
//! # Modules
//!
//! - [`wordnet`] - The [`wordnet::WordNet`] trait, its entry types and the [`wordnet::WordNets`] registry
//! - [`lemmatizer`] - The [`lemmatizer::Lemmatizer`] trait for surface-form analysis
//! - [`relation`] - Lexical and semantic relation operators
//! - [`memory`] - In-memory reference implementations

pub mod lemmatizer;
pub mod memory;
pub mod relation;
pub mod wordnet;

use crate::error::Result;

/// Collapse a collaborator failure into an empty expansion.
///
/// Lookups are allowed to fail; a failing lexicon simply contributes nothing.
pub(crate) fn or_empty<T>(result: Result<Vec<T>>, what: &str) -> Vec<T> {
    match result {
        Ok(values) => values,
        Err(e) => {
            log::warn!("{what} failed, treating as empty expansion: {e}");
            Vec::new()
        }
    }
}
