//! Morphological analysis of surface forms.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One analysis of a surface form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormAnalysis {
    /// Citation form of the lemma.
    pub lemma: String,
    /// Native morphological tag of the form, if the analyser reports one.
    pub morpho: Option<String>,
}

impl FormAnalysis {
    pub fn new(lemma: impl Into<String>, morpho: Option<&str>) -> Self {
        FormAnalysis {
            lemma: lemma.into(),
            morpho: morpho.map(str::to_string),
        }
    }
}

/// Produces candidate lemmas for a surface form.
///
/// Forms that come with their lemma already annotated (treebanks) skip the
/// lemmatizer entirely.
pub trait Lemmatizer: Send + Sync + Debug {
    /// All analyses of `form`. Unknown forms yield an empty vector.
    fn analyze(&self, form: &str) -> Result<Vec<FormAnalysis>>;
}
