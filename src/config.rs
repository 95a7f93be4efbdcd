//! Configuration for analysis, query resolution and matching.
//!
//! Every section has sensible defaults, so a configuration file only needs to
//! name the values it overrides:
//!
//! ```
//! use cylleneus::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "matcher": { "min_slop": 3 } }"#).unwrap();
//! assert_eq!(config.matcher.min_slop, 3);
//! assert!(config.matcher.ordered);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CylleneusError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Analysis pipeline settings.
    pub analysis: AnalysisConfig,

    /// Query resolution settings.
    pub query: QueryConfig,

    /// Sequence/span matcher settings.
    pub matcher: MatcherConfig,
}

impl EngineConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Check the values that cannot be expressed by the types alone.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.language.trim().is_empty() {
            return Err(CylleneusError::invalid_config(
                "analysis.language must not be empty",
            ));
        }
        if self.query.max_expansions == 0 {
            return Err(CylleneusError::invalid_config(
                "query.max_expansions must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Settings for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Language code of the corpus (selects the WordNet used for lookups).
    pub language: String,

    /// Whether stopwords are removed from the form field.
    pub remove_stops: bool,

    /// Replacement stopword list. `None` keeps the built-in Latin list.
    pub stop_words: Option<Vec<String>>,

    /// Whether lookup-heavy stages memoize their output per document.
    pub cache: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            language: "lat".to_string(),
            remove_stops: false,
            stop_words: None,
            cache: true,
        }
    }
}

/// Settings for resolving query atoms against the lexicon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of index terms one prefix wildcard may expand to. A
    /// wildcard matching more terms fails to resolve.
    pub max_expansions: usize,

    /// Slop assigned to quoted sequences without an explicit `~N`.
    pub default_sequence_slop: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            max_expansions: 1024,
            default_sequence_slop: 1,
        }
    }
}

/// Settings for the positional sequence matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Smallest slop any sequence is evaluated with. Values below 1 are clamped to 1.
    pub min_slop: u32,

    /// Whether sequences require their terms in query order.
    pub ordered: bool,

    /// Minimum slop applied when any subquery matched structurally annotated
    /// tokens. `None` disables the widening.
    pub meta_min_slop: Option<u32>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            min_slop: 1,
            ordered: true,
            meta_min_slop: Some(2),
        }
    }
}
