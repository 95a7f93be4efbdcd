//! Nine-position treebank tags.
//!
//! Dependency treebanks of Latin and Greek encode morphology as a 9-character
//! positional code:
//!
//! ```text
//! position:  0    1       2       3      4     5      6       7     8
//!            pos  person  number  tense  mood  voice  gender  case  degree
//! ```
//!
//! Canonical tags have no separate degree slot: degree moves into slot 1 for
//! adjectives and adverbs. Participles (`t`) become verbs with participial mood.

use crate::morph::tag::{Slot, Tag, pos};
use crate::morph::tagset::{TagBuilder, Tagset};

const NATIVE_LEN: usize = 9;

/// Native part-of-speech code → canonical code. `None` means "not annotated"
/// (punctuation and unknown words are dropped).
fn canonical_pos(native: char) -> Option<Option<char>> {
    let mapped = match native {
        'n' => Some(pos::NOUN),
        'v' | 't' => Some(pos::VERB),
        'a' => Some(pos::ADJECTIVE),
        'd' => Some(pos::ADVERB),
        'p' => Some(pos::PRONOUN),
        'm' => Some(pos::NUMERAL),
        'c' => Some(pos::CONJUNCTION),
        'r' => Some(pos::PREPOSITION),
        'i' | 'e' => Some(pos::INTERJECTION),
        'g' => Some(pos::PARTICLE),
        'l' => Some(pos::ARTICLE),
        '-' => None,
        _ => return None,
    };
    Some(mapped)
}

fn native_pos(tag: &Tag) -> char {
    match tag.pos() {
        Some(pos::VERB) if tag.get(Slot::Mood) == Some('p') => 't',
        Some(pos::ADVERB) => 'd',
        Some(pos::PREPOSITION) => 'r',
        Some(other) => other,
        None => '-',
    }
}

/// Canonical slots for native positions 1..=7, which share their value sets.
const SHARED: [(usize, Slot); 7] = [
    (1, Slot::PersonOrDegree),
    (2, Slot::Number),
    (3, Slot::Tense),
    (4, Slot::Mood),
    (5, Slot::Voice),
    (6, Slot::Gender),
    (7, Slot::Case),
];

/// The nine-position treebank notation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionalTagset;

impl PositionalTagset {
    /// Create a new positional tagset.
    pub fn new() -> Self {
        PositionalTagset
    }
}

impl Tagset for PositionalTagset {
    fn to_canonical(&self, native: &str) -> Vec<Tag> {
        let chars: Vec<char> = native.trim().chars().collect();
        if chars.len() != NATIVE_LEN {
            return Vec::new();
        }

        let mut builder = TagBuilder::new();
        let Some(part_of_speech) = canonical_pos(chars[0]) else {
            return Vec::new();
        };
        if let Some(p) = part_of_speech {
            builder.add(Slot::Pos, p);
        }
        if chars[0] == 't' {
            if chars[4] != '-' && chars[4] != 'p' {
                return Vec::new();
            }
            builder.add(Slot::Mood, 'p');
        }

        for (position, slot) in SHARED {
            let value = chars[position];
            if value == '-' {
                continue;
            }
            // slot 1 only holds the person here; degree arrives from position 8
            if slot == Slot::PersonOrDegree && !matches!(value, '1' | '2' | '3') {
                return Vec::new();
            }
            builder.add(slot, value);
        }

        let degree = chars[8];
        if degree != '-' {
            match part_of_speech {
                Some(p) if pos::takes_degree(p) => {
                    if builder.has(Slot::PersonOrDegree) || !matches!(degree, 'p' | 'c' | 's') {
                        return Vec::new();
                    }
                    builder.add(Slot::PersonOrDegree, degree);
                }
                // degree on other parts of speech has no canonical slot
                _ => log::trace!("ignoring degree '{degree}' of native tag '{native}'"),
            }
        }

        builder.build()
    }

    fn from_canonical(&self, tag: &Tag) -> Option<String> {
        let mut native = ['-'; NATIVE_LEN];
        native[0] = native_pos(tag);
        for (position, slot) in SHARED {
            if let Some(value) = tag.get(slot) {
                native[position] = value;
            }
        }
        if let Some(degree) = tag.degree() {
            native[1] = '-';
            native[8] = degree;
        }
        if native[0] == 't' {
            native[4] = 'p';
        }
        Some(native.iter().collect())
    }

    fn name(&self) -> &'static str {
        "positional"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(native: &str) -> Vec<String> {
        PositionalTagset::new()
            .to_canonical(native)
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_verb() {
        assert_eq!(convert("v3spia---"), vec!["v3spia----"]);
    }

    #[test]
    fn test_noun() {
        assert_eq!(convert("n-s---fa-"), vec!["n-s---fa--"]);
    }

    #[test]
    fn test_degree_moves_to_slot_one() {
        assert_eq!(convert("a-s---mnc"), vec!["acs---mn--"]);
        assert_eq!(convert("d--------"), vec!["r---------"]);
        assert_eq!(convert("d-------s"), vec!["rs--------"]);
    }

    #[test]
    fn test_participle() {
        assert_eq!(convert("t-prppmn-"), vec!["v-prppmn--"]);
    }

    #[test]
    fn test_invalid_tags_are_dropped() {
        assert!(convert("u--------").is_empty());
        assert!(convert("x--------").is_empty());
        assert!(convert("n-s---fz-").is_empty());
        assert!(convert("v3spia").is_empty());
        assert!(convert("a4s---mn-").is_empty());
    }

    #[test]
    fn test_round_trip() {
        let tagset = PositionalTagset::new();
        for native in ["v3spia---", "n-s---fa-", "a-s---mnc", "t-prppmn-", "d-------s"] {
            let tags = tagset.to_canonical(native);
            assert_eq!(tags.len(), 1);
            assert_eq!(tagset.from_canonical(&tags[0]).unwrap(), native);
        }
    }

    #[test]
    fn test_inverse_is_coarser_for_group_and_stem() {
        let tagset = PositionalTagset::new();
        let tag: Tag = "n-s---fa3-".parse().unwrap();
        let native = tagset.from_canonical(&tag).unwrap();
        assert_eq!(native, "n-s---fa-");
        let back = &tagset.to_canonical(&native)[0];
        assert!(back.matches(&tag));
    }
}
