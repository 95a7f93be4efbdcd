//! The canonical 10-slot morphological tag.
//!
//! A tag is a fixed-width code over `{a-z, 0-9, '-'}`:
//!
//! ```text
//! slot:  0    1               2       3      4     5      6       7     8      9
//!        pos  person/degree   number  tense  mood  voice  gender  case  group  stem
//! ```
//!
//! `'-'` means "unset". Slot 1 holds the person for verbs and the degree for
//! adjectives and adverbs; [`Tag::person`] and [`Tag::degree`] check the part
//! of speech before reading it.
//!
//! # Examples
//!
//! ```
//! use cylleneus::morph::tag::{Slot, Tag};
//!
//! let form: Tag = "n-p----g--".parse().unwrap();
//! let lemma: Tag = "n-----f-3-".parse().unwrap();
//!
//! let merged = form.merge(&lemma);
//! assert_eq!(merged.to_string(), "n-p---fg3-");
//! assert_eq!(merged.get(Slot::Gender), Some('f'));
//!
//! let query: Tag = "--p----g--".parse().unwrap();
//! assert!(query.matches(&merged));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CylleneusError, Result};

/// Number of slots in a canonical tag.
pub const TAG_LEN: usize = 10;

/// The placeholder for an unset slot.
pub const UNSET: char = '-';

/// Canonical part-of-speech codes (slot 0).
pub mod pos {
    pub const NOUN: char = 'n';
    pub const VERB: char = 'v';
    pub const ADJECTIVE: char = 'a';
    pub const ADVERB: char = 'r';
    pub const PRONOUN: char = 'p';
    pub const NUMERAL: char = 'm';
    pub const CONJUNCTION: char = 'c';
    pub const PREPOSITION: char = 'e';
    pub const INTERJECTION: char = 'i';
    pub const PARTICLE: char = 'g';
    pub const ARTICLE: char = 'l';

    /// All canonical part-of-speech codes.
    pub const ALL: &[char] = &[
        NOUN,
        VERB,
        ADJECTIVE,
        ADVERB,
        PRONOUN,
        NUMERAL,
        CONJUNCTION,
        PREPOSITION,
        INTERJECTION,
        PARTICLE,
        ARTICLE,
    ];

    /// Parts of speech whose slot 1 holds a degree of comparison.
    pub fn takes_degree(pos: char) -> bool {
        pos == ADJECTIVE || pos == ADVERB
    }

    /// Parts of speech whose slot 1 holds a grammatical person.
    pub fn takes_person(pos: char) -> bool {
        pos == VERB
    }
}

/// Named tag slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Pos,
    PersonOrDegree,
    Number,
    Tense,
    Mood,
    Voice,
    Gender,
    Case,
    Group,
    Stem,
}

impl Slot {
    /// All slots in positional order.
    pub const ALL: [Slot; TAG_LEN] = [
        Slot::Pos,
        Slot::PersonOrDegree,
        Slot::Number,
        Slot::Tense,
        Slot::Mood,
        Slot::Voice,
        Slot::Gender,
        Slot::Case,
        Slot::Group,
        Slot::Stem,
    ];

    /// Zero-based position of this slot in the code.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Values accepted in this slot, or `None` when any alphabet character is allowed.
    pub fn values(self) -> Option<&'static [char]> {
        match self {
            Slot::Pos => Some(pos::ALL),
            Slot::PersonOrDegree => Some(&['1', '2', '3', 'p', 'c', 's']),
            Slot::Number => Some(&['s', 'p', 'd']),
            Slot::Tense => Some(&['p', 'i', 'f', 'r', 'l', 't', 'a']),
            Slot::Mood => Some(&['i', 's', 'm', 'n', 'p', 'd', 'g', 'u', 'o']),
            Slot::Voice => Some(&['a', 'p', 'm', 'e', 'd']),
            Slot::Gender => Some(&['m', 'f', 'n', 'c']),
            Slot::Case => Some(&['n', 'g', 'd', 'a', 'b', 'v', 'l', 'i']),
            Slot::Group | Slot::Stem => None,
        }
    }

    /// Whether `value` is legal in this slot.
    pub fn accepts(self, value: char) -> bool {
        match self.values() {
            Some(values) => values.contains(&value),
            None => is_alphabet(value) && value != UNSET,
        }
    }
}

fn is_alphabet(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == UNSET
}

/// A canonical morphological tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; TAG_LEN]);

impl Tag {
    /// The fully unset tag `----------`, the identity of [`Tag::merge`].
    pub const EMPTY: Tag = Tag([b'-'; TAG_LEN]);

    /// Create an empty tag.
    pub fn new() -> Self {
        Tag::EMPTY
    }

    /// Get the value of a slot, or `None` when it is unset.
    pub fn get(&self, slot: Slot) -> Option<char> {
        let value = self.0[slot.index()] as char;
        (value != UNSET).then_some(value)
    }

    /// Set a slot. Passing [`UNSET`] clears it.
    pub fn set(&mut self, slot: Slot, value: char) -> Result<()> {
        if value != UNSET && !slot.accepts(value) {
            return Err(CylleneusError::analysis(format!(
                "'{value}' is not a legal value for slot {slot:?}"
            )));
        }
        self.0[slot.index()] = value as u8;
        Ok(())
    }

    /// Return a copy of this tag with a slot set.
    pub fn with(mut self, slot: Slot, value: char) -> Result<Self> {
        self.set(slot, value)?;
        Ok(self)
    }

    /// Whether every slot is unset.
    pub fn is_empty(&self) -> bool {
        *self == Tag::EMPTY
    }

    /// The part of speech.
    pub fn pos(&self) -> Option<char> {
        self.get(Slot::Pos)
    }

    /// The grammatical person, only meaningful for verbs.
    pub fn person(&self) -> Option<char> {
        match self.pos() {
            Some(p) if pos::takes_person(p) => self.get(Slot::PersonOrDegree),
            _ => None,
        }
    }

    /// The degree of comparison, only meaningful for adjectives and adverbs.
    pub fn degree(&self) -> Option<char> {
        match self.pos() {
            Some(p) if pos::takes_degree(p) => self.get(Slot::PersonOrDegree),
            _ => None,
        }
    }

    /// Combine two tags, preferring informative values; `self` wins when both are set.
    pub fn merge(&self, other: &Tag) -> Tag {
        let mut merged = *self;
        for (slot, value) in merged.0.iter_mut().zip(other.0.iter()) {
            if *slot == b'-' {
                *slot = *value;
            }
        }
        merged
    }

    /// Keep `other`'s values only in the slots where it differs from `self`.
    pub fn diff(&self, other: &Tag) -> Tag {
        let mut diff = Tag::EMPTY;
        for (i, (a, b)) in self.0.iter().zip(other.0.iter()).enumerate() {
            if a != b {
                diff.0[i] = *b;
            }
        }
        diff
    }

    /// Treat `self` as a pattern: unset slots match anything, set slots must be equal.
    pub fn matches(&self, tag: &Tag) -> bool {
        self.0
            .iter()
            .zip(tag.0.iter())
            .all(|(q, t)| *q == b'-' || q == t)
    }

    /// Iterate over the slot characters.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().map(|b| *b as char)
    }
}

/// Merge two tags; see [`Tag::merge`].
pub fn merge(a: &Tag, b: &Tag) -> Tag {
    a.merge(b)
}

/// Diff two tags; see [`Tag::diff`].
pub fn diff(a: &Tag, b: &Tag) -> Tag {
    a.diff(b)
}

/// Match `tag` against the wildcard pattern `query`; see [`Tag::matches`].
pub fn wildcard_match(query: &Tag, tag: &Tag) -> bool {
    query.matches(tag)
}

impl Default for Tag {
    fn default() -> Self {
        Tag::EMPTY
    }
}

impl FromStr for Tag {
    type Err = CylleneusError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != TAG_LEN {
            return Err(CylleneusError::analysis(format!(
                "tag '{s}' must have exactly {TAG_LEN} slots"
            )));
        }
        let mut tag = Tag::EMPTY;
        for (i, c) in s.chars().enumerate() {
            if !is_alphabet(c) {
                return Err(CylleneusError::analysis(format!(
                    "tag '{s}' contains illegal character '{c}'"
                )));
            }
            tag.0[i] = c as u8;
        }
        Ok(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> Tag {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let t = tag("v3spia---1");
        assert_eq!(t.to_string(), "v3spia---1");
        assert_eq!(t.pos(), Some('v'));
        assert_eq!(t.get(Slot::Case), None);

        assert!("v3spia".parse::<Tag>().is_err());
        assert!("V3SPIA----".parse::<Tag>().is_err());
        assert!("v3spia---*".parse::<Tag>().is_err());
    }

    #[test]
    fn test_merge_identity_and_idempotence() {
        let a = tag("n-s---mn2-");
        let b = tag("a-p---fa1-");

        assert_eq!(a.merge(&Tag::EMPTY), a);
        assert_eq!(Tag::EMPTY.merge(&a), a);
        assert_eq!(a.merge(&a.merge(&b)), a.merge(&b));
        // left-biased on conflicts
        assert_eq!(a.merge(&b), a);
        assert_eq!(tag("--s-------").merge(&b), tag("a-s---fa1-"));
    }

    #[test]
    fn test_diff() {
        let a = tag("n-s---mn2-");
        let b = tag("n-p---mg2-");
        assert_eq!(a.diff(&b), tag("--p----g--"));
        assert_eq!(a.diff(&a), Tag::EMPTY);
    }

    #[test]
    fn test_wildcard_match() {
        let t = tag("n-p---fg1-");
        assert!(t.matches(&t));
        assert!(tag("--p----g--").matches(&t));
        assert!(Tag::EMPTY.matches(&t));
        assert!(!tag("--s----g--").matches(&t));
        // a set query slot does not match an unset tag slot
        assert!(!tag("-------a--").matches(&Tag::EMPTY));
    }

    #[test]
    fn test_wildcard_match_with_unset_slots() {
        let t = tag("v3spia---1");
        let mut pattern = t;
        for slot in Slot::ALL {
            pattern.set(slot, UNSET).unwrap();
            assert!(pattern.matches(&t));
        }
    }

    #[test]
    fn test_person_and_degree_depend_on_pos() {
        let verb = tag("v3spia----");
        assert_eq!(verb.person(), Some('3'));
        assert_eq!(verb.degree(), None);

        let adjective = tag("ac----mn--");
        assert_eq!(adjective.degree(), Some('c'));
        assert_eq!(adjective.person(), None);
    }

    #[test]
    fn test_set_validates_slot_values() {
        let mut t = Tag::new();
        assert!(t.set(Slot::Case, 'b').is_ok());
        assert!(t.set(Slot::Case, 'x').is_err());
        assert!(t.set(Slot::Group, '3').is_ok());
        assert_eq!(t.to_string(), "-------b3-");
    }

    #[test]
    fn test_serde() {
        let t = tag("n-s---fa3-");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"n-s---fa3-\"");
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<Tag>("\"bad\"").is_err());
    }
}
