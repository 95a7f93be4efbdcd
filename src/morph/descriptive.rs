//! Space-separated descriptive analyses.
//!
//! Morphological analysers and older digital editions describe forms with
//! words: `noun masc/fem gen pl`, `verb 3rd sg pres ind act`. Words separated
//! by `/` are alternatives for one slot and expand to one tag each.

use crate::morph::tag::{Slot, Tag, pos};
use crate::morph::tagset::{TagBuilder, Tagset};

/// Descriptive words, their slot and canonical value. The first entry for a
/// given slot value is the one rendered by `from_canonical`.
const WORDS: &[(&str, Slot, char)] = &[
    ("noun", Slot::Pos, pos::NOUN),
    ("verb", Slot::Pos, pos::VERB),
    ("adj", Slot::Pos, pos::ADJECTIVE),
    ("adjective", Slot::Pos, pos::ADJECTIVE),
    ("adv", Slot::Pos, pos::ADVERB),
    ("adverb", Slot::Pos, pos::ADVERB),
    ("pron", Slot::Pos, pos::PRONOUN),
    ("pronoun", Slot::Pos, pos::PRONOUN),
    ("numeral", Slot::Pos, pos::NUMERAL),
    ("conj", Slot::Pos, pos::CONJUNCTION),
    ("prep", Slot::Pos, pos::PREPOSITION),
    ("interj", Slot::Pos, pos::INTERJECTION),
    ("particle", Slot::Pos, pos::PARTICLE),
    ("article", Slot::Pos, pos::ARTICLE),
    ("1st", Slot::PersonOrDegree, '1'),
    ("2nd", Slot::PersonOrDegree, '2'),
    ("3rd", Slot::PersonOrDegree, '3'),
    ("positive", Slot::PersonOrDegree, 'p'),
    ("comp", Slot::PersonOrDegree, 'c'),
    ("superl", Slot::PersonOrDegree, 's'),
    ("sg", Slot::Number, 's'),
    ("pl", Slot::Number, 'p'),
    ("dual", Slot::Number, 'd'),
    ("pres", Slot::Tense, 'p'),
    ("imperf", Slot::Tense, 'i'),
    ("fut", Slot::Tense, 'f'),
    ("perf", Slot::Tense, 'r'),
    ("plupf", Slot::Tense, 'l'),
    ("futperf", Slot::Tense, 't'),
    ("aor", Slot::Tense, 'a'),
    ("ind", Slot::Mood, 'i'),
    ("subj", Slot::Mood, 's'),
    ("imperat", Slot::Mood, 'm'),
    ("inf", Slot::Mood, 'n'),
    ("part", Slot::Mood, 'p'),
    ("ger", Slot::Mood, 'd'),
    ("gerundive", Slot::Mood, 'g'),
    ("supine", Slot::Mood, 'u'),
    ("opt", Slot::Mood, 'o'),
    ("act", Slot::Voice, 'a'),
    ("pass", Slot::Voice, 'p'),
    ("mid", Slot::Voice, 'm'),
    ("mp", Slot::Voice, 'e'),
    ("dep", Slot::Voice, 'd'),
    ("masc", Slot::Gender, 'm'),
    ("fem", Slot::Gender, 'f'),
    ("neut", Slot::Gender, 'n'),
    ("common", Slot::Gender, 'c'),
    ("nom", Slot::Case, 'n'),
    ("gen", Slot::Case, 'g'),
    ("dat", Slot::Case, 'd'),
    ("acc", Slot::Case, 'a'),
    ("abl", Slot::Case, 'b'),
    ("voc", Slot::Case, 'v'),
    ("loc", Slot::Case, 'l'),
    ("ins", Slot::Case, 'i'),
];

fn lookup(word: &str) -> Option<(Slot, char)> {
    let lower = word.to_lowercase();
    WORDS
        .iter()
        .find(|(w, _, _)| *w == lower)
        .map(|(_, slot, value)| (*slot, *value))
}

/// The descriptive word notation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescriptiveTagset;

impl DescriptiveTagset {
    /// Create a new descriptive tagset.
    pub fn new() -> Self {
        DescriptiveTagset
    }
}

impl Tagset for DescriptiveTagset {
    fn to_canonical(&self, native: &str) -> Vec<Tag> {
        let mut builder = TagBuilder::new();
        let mut words = 0;

        for word in native.split_whitespace() {
            words += 1;
            let mut slot_of_word = None;
            for alternative in word.split('/') {
                let Some((slot, value)) = lookup(alternative) else {
                    log::trace!("unknown descriptive word '{alternative}' in '{native}'");
                    return Vec::new();
                };
                // alternatives must describe the same category
                if slot_of_word.is_some_and(|s| s != slot) {
                    return Vec::new();
                }
                slot_of_word = Some(slot);
                builder.add(slot, value);
            }
        }
        if words == 0 {
            return Vec::new();
        }

        let parts_of_speech = builder.candidates(Slot::Pos).to_vec();
        for value in builder.candidates(Slot::PersonOrDegree) {
            let legal = if value.is_ascii_digit() {
                parts_of_speech.iter().all(|p| pos::takes_person(*p))
            } else {
                !parts_of_speech.is_empty() && parts_of_speech.iter().all(|p| pos::takes_degree(*p))
            };
            if !legal {
                log::trace!("'{value}' in slot 1 does not fit the part of speech of '{native}'");
                return Vec::new();
            }
        }

        builder.build()
    }

    fn from_canonical(&self, tag: &Tag) -> Option<String> {
        let words: Vec<&str> = Slot::ALL
            .iter()
            .filter_map(|slot| {
                let value = tag.get(*slot)?;
                WORDS
                    .iter()
                    .find(|(_, s, v)| s == slot && *v == value)
                    .map(|(w, _, _)| *w)
            })
            .collect();
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }

    fn name(&self) -> &'static str {
        "descriptive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(native: &str) -> Vec<String> {
        DescriptiveTagset::new()
            .to_canonical(native)
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_ambiguous_gender_expands() {
        assert_eq!(
            convert("noun masc/fem gen pl"),
            vec!["n-p---mg--", "n-p---fg--"]
        );
    }

    #[test]
    fn test_multiple_ambiguities_form_a_product() {
        assert_eq!(convert("adj masc/neut nom/acc sg").len(), 4);
    }

    #[test]
    fn test_verb() {
        assert_eq!(convert("verb 3rd sg pres ind act"), vec!["v3spia----"]);
        assert_eq!(convert("3rd pl perf"), vec!["-3pr------"]);
    }

    #[test]
    fn test_slot_one_depends_on_pos() {
        assert_eq!(convert("adj comp masc nom sg"), vec!["acs---mn--"]);
        assert!(convert("noun comp").is_empty());
        assert!(convert("comp").is_empty());
        assert!(convert("noun 3rd sg").is_empty());
    }

    #[test]
    fn test_invalid_input() {
        assert!(convert("noun frobnicative").is_empty());
        assert!(convert("masc/gen").is_empty());
        assert!(convert("").is_empty());
    }

    #[test]
    fn test_round_trip() {
        let tagset = DescriptiveTagset::new();
        for native in ["noun pl fem gen", "verb 3rd sg pres ind act", "adj comp sg masc nom"] {
            let tags = tagset.to_canonical(native);
            assert_eq!(tags.len(), 1);
            let rendered = tagset.from_canonical(&tags[0]).unwrap();
            assert_eq!(tagset.to_canonical(&rendered), tags);
        }
    }
}
