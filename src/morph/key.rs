//! Composite index keys built from lemmas and tags.
//!
//! The lemma field indexes `lemma:uri=morpho` keys. The annotation field
//! indexes `lemma_morpho::uri:n>annotation` keys, where `annotation` is the
//! form's tag merged with the lemma's own tag and `n` numbers the analyses of
//! one form.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CylleneusError, Result};
use crate::morph::tag::Tag;

static LEMMA_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\s:=]+):([^\s:=]+)=([a-z0-9-]{10})$").expect("lemma key pattern")
});

static ANNOTATION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9-]{10})::([^\s:>]+):(\d+)>([a-z0-9-]{10})$")
        .expect("annotation key pattern")
});

/// A `lemma:uri=morpho` key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LemmaKey {
    pub lemma: String,
    pub uri: String,
    pub morpho: Tag,
}

impl LemmaKey {
    pub fn new(lemma: impl Into<String>, uri: impl Into<String>, morpho: Tag) -> Self {
        LemmaKey {
            lemma: lemma.into(),
            uri: uri.into(),
            morpho,
        }
    }

    /// Whether `text` has the shape of a lemma key.
    pub fn is_key(text: &str) -> bool {
        LEMMA_KEY.is_match(text)
    }
}

impl FromStr for LemmaKey {
    type Err = CylleneusError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = LEMMA_KEY
            .captures(s)
            .ok_or_else(|| CylleneusError::analysis(format!("malformed lemma key '{s}'")))?;
        Ok(LemmaKey {
            lemma: caps[1].to_string(),
            uri: caps[2].to_string(),
            morpho: caps[3].parse()?,
        })
    }
}

impl fmt::Display for LemmaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}={}", self.lemma, self.uri, self.morpho)
    }
}

/// A `lemma_morpho::uri:n>annotation` key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationKey {
    pub lemma_morpho: Tag,
    pub uri: String,
    pub n: usize,
    pub annotation: Tag,
}

impl AnnotationKey {
    pub fn new(lemma_morpho: Tag, uri: impl Into<String>, n: usize, annotation: Tag) -> Self {
        AnnotationKey {
            lemma_morpho,
            uri: uri.into(),
            n,
            annotation,
        }
    }

    /// Whether this key satisfies an annotation pattern, optionally restricted
    /// to one lemma uri.
    pub fn satisfies(&self, pattern: &Tag, uri: Option<&str>) -> bool {
        uri.is_none_or(|u| u == self.uri) && pattern.matches(&self.annotation)
    }
}

impl FromStr for AnnotationKey {
    type Err = CylleneusError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = ANNOTATION_KEY
            .captures(s)
            .ok_or_else(|| CylleneusError::analysis(format!("malformed annotation key '{s}'")))?;
        let n = caps[3]
            .parse::<usize>()
            .map_err(|e| CylleneusError::analysis(format!("bad analysis number in '{s}': {e}")))?;
        Ok(AnnotationKey {
            lemma_morpho: caps[1].parse()?,
            uri: caps[2].to_string(),
            n,
            annotation: caps[4].parse()?,
        })
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}:{}>{}",
            self.lemma_morpho, self.uri, self.n, self.annotation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lemma_key() {
        let key: LemmaKey = "virtus:v0123=n-----f-3-".parse().unwrap();
        assert_eq!(key.lemma, "virtus");
        assert_eq!(key.uri, "v0123");
        assert_eq!(key.morpho.to_string(), "n-----f-3-");
        assert_eq!(key.to_string(), "virtus:v0123=n-----f-3-");
        assert!(LemmaKey::is_key("virtus:v0123=n-----f-3-"));
    }

    #[test]
    fn test_malformed_lemma_keys() {
        for text in [
            "virtus",
            "virtus:v0123",
            "virtus:v0123=n-----f",
            "virtus:v0123=N-----F-3-",
            "vir tus:v0123=n-----f-3-",
        ] {
            assert!(text.parse::<LemmaKey>().is_err(), "{text}");
        }
    }

    #[test]
    fn test_annotation_key() {
        let key: AnnotationKey = "n-----f-3-::v0123:0>n-s---fa3-".parse().unwrap();
        assert_eq!(key.uri, "v0123");
        assert_eq!(key.n, 0);
        assert_eq!(key.to_string(), "n-----f-3-::v0123:0>n-s---fa3-");

        let accusative: Tag = "-------a--".parse().unwrap();
        let genitive: Tag = "-------g--".parse().unwrap();
        assert!(key.satisfies(&accusative, None));
        assert!(key.satisfies(&accusative, Some("v0123")));
        assert!(!key.satisfies(&accusative, Some("x999")));
        assert!(!key.satisfies(&genitive, None));

        assert!("n-----f-3-::v0123>n-s---fa3-".parse::<AnnotationKey>().is_err());
    }
}
