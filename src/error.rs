//! Error types for the Cylleneus library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`CylleneusError`] enum.
//!
//! Not every failure is an error: an invalid native tag drops its token, a
//! malformed query atom resolves to nothing, and a collaborator failure is
//! treated as "no expansion". Errors are reserved for malformed query syntax,
//! bad configuration and I/O.
//!
//! # Examples
//!
//! ```
//! use cylleneus::error::{CylleneusError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(CylleneusError::invalid_argument("Invalid input"))
//! }
//!
//! assert!(example_operation().is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Cylleneus operations.
#[derive(Error, Debug)]
pub enum CylleneusError {
    /// I/O errors (configuration files, corpus input, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query-related errors (parsing, invalid queries, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Index collaborator errors
    #[error("Index error: {0}")]
    Index(String),

    /// Errors reported by an external lexical collaborator (WordNet, lemmatizer)
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with CylleneusError.
pub type Result<T> = std::result::Result<T, CylleneusError>;

impl CylleneusError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Query(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Query(msg.into()) // Parse errors are treated as query errors
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Index(msg.into())
    }

    /// Create a new collaborator error.
    pub fn collaborator<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Collaborator(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CylleneusError::Other(msg.into())
    }
}
