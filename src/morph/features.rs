//! UD-style feature bundles.
//!
//! Native tags look like `NOUN|Case=Gen|Gender=Masc,Fem|Number=Plur`. The
//! leading universal part of speech is optional; comma-separated values are
//! alternatives and expand to one canonical tag each. Unknown feature names
//! are ignored, unknown values of known features invalidate the tag.

use std::collections::BTreeMap;

use crate::morph::tag::{Slot, Tag, pos};
use crate::morph::tagset::{TagBuilder, Tagset};

fn upos(name: &str) -> Option<Option<char>> {
    let mapped = match name {
        "NOUN" | "PROPN" => Some(pos::NOUN),
        "VERB" | "AUX" => Some(pos::VERB),
        "ADJ" => Some(pos::ADJECTIVE),
        "ADV" => Some(pos::ADVERB),
        "PRON" | "DET" => Some(pos::PRONOUN),
        "NUM" => Some(pos::NUMERAL),
        "CCONJ" | "SCONJ" => Some(pos::CONJUNCTION),
        "ADP" => Some(pos::PREPOSITION),
        "INTJ" => Some(pos::INTERJECTION),
        "PART" => Some(pos::PARTICLE),
        "X" | "SYM" => None,
        _ => return None,
    };
    Some(mapped)
}

/// Features that map one-to-one onto a canonical slot.
const VALUES: &[(&str, &str, Slot, char)] = &[
    ("Case", "Nom", Slot::Case, 'n'),
    ("Case", "Gen", Slot::Case, 'g'),
    ("Case", "Dat", Slot::Case, 'd'),
    ("Case", "Acc", Slot::Case, 'a'),
    ("Case", "Abl", Slot::Case, 'b'),
    ("Case", "Voc", Slot::Case, 'v'),
    ("Case", "Loc", Slot::Case, 'l'),
    ("Case", "Ins", Slot::Case, 'i'),
    ("Gender", "Masc", Slot::Gender, 'm'),
    ("Gender", "Fem", Slot::Gender, 'f'),
    ("Gender", "Neut", Slot::Gender, 'n'),
    ("Gender", "Com", Slot::Gender, 'c'),
    ("Number", "Sing", Slot::Number, 's'),
    ("Number", "Plur", Slot::Number, 'p'),
    ("Number", "Dual", Slot::Number, 'd'),
    ("Person", "1", Slot::PersonOrDegree, '1'),
    ("Person", "2", Slot::PersonOrDegree, '2'),
    ("Person", "3", Slot::PersonOrDegree, '3'),
    ("Mood", "Ind", Slot::Mood, 'i'),
    ("Mood", "Sub", Slot::Mood, 's'),
    ("Mood", "Imp", Slot::Mood, 'm'),
    ("Mood", "Opt", Slot::Mood, 'o'),
    ("VerbForm", "Inf", Slot::Mood, 'n'),
    ("VerbForm", "Part", Slot::Mood, 'p'),
    ("VerbForm", "Ger", Slot::Mood, 'd'),
    ("VerbForm", "Gdv", Slot::Mood, 'g'),
    ("VerbForm", "Sup", Slot::Mood, 'u'),
    ("Voice", "Act", Slot::Voice, 'a'),
    ("Voice", "Pass", Slot::Voice, 'p'),
    ("Voice", "Mid", Slot::Voice, 'm'),
    ("Degree", "Pos", Slot::PersonOrDegree, 'p'),
    ("Degree", "Cmp", Slot::PersonOrDegree, 'c'),
    ("Degree", "Sup", Slot::PersonOrDegree, 's'),
];

/// Tense is expressed by `Tense` together with `Aspect`.
fn tense(tense: &str, aspect: Option<&str>) -> Option<Option<char>> {
    let value = match (tense, aspect) {
        ("Pres", _) => Some('p'),
        ("Fut", Some("Perf")) => Some('t'),
        ("Fut", _) => Some('f'),
        ("Pqp", _) => Some('l'),
        ("Past", Some("Imp")) => Some('i'),
        ("Past", Some("Perf")) => Some('r'),
        // past without aspect is underspecified
        ("Past", _) => None,
        _ => return None,
    };
    Some(value)
}

/// The UD feature-bundle notation.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureTagset;

impl FeatureTagset {
    /// Create a new feature tagset.
    pub fn new() -> Self {
        FeatureTagset
    }
}

impl Tagset for FeatureTagset {
    fn to_canonical(&self, native: &str) -> Vec<Tag> {
        let mut builder = TagBuilder::new();
        let mut features: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        let mut part_of_speech = None;

        for (i, segment) in native.trim().split('|').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() || segment == "_" {
                continue;
            }
            match segment.split_once('=') {
                Some((name, values)) => {
                    features.insert(name, values.split(',').collect());
                }
                None if i == 0 => match upos(segment) {
                    Some(p) => part_of_speech = p,
                    None => return Vec::new(),
                },
                None => return Vec::new(),
            }
        }
        if let Some(p) = part_of_speech {
            builder.add(Slot::Pos, p);
        }

        for (name, values) in &features {
            match *name {
                "Tense" => {
                    let aspect = features.get("Aspect").and_then(|a| a.first().copied());
                    for value in values {
                        match tense(value, aspect) {
                            Some(Some(t)) => {
                                builder.add(Slot::Tense, t);
                            }
                            Some(None) => {}
                            None => return Vec::new(),
                        }
                    }
                }
                "Degree" if !part_of_speech.is_some_and(pos::takes_degree) => {
                    log::trace!("ignoring Degree outside adjectives/adverbs in '{native}'");
                }
                "Person" if part_of_speech.is_some_and(|p| !pos::takes_person(p)) => {
                    log::trace!("ignoring Person outside verbs in '{native}'");
                }
                _ => {
                    let known = VALUES.iter().any(|(feature, _, _, _)| feature == name);
                    if !known {
                        continue;
                    }
                    for value in values {
                        match VALUES
                            .iter()
                            .find(|(feature, v, _, _)| feature == name && v == value)
                        {
                            Some((_, _, slot, canonical)) => {
                                builder.add(*slot, *canonical);
                            }
                            None => return Vec::new(),
                        }
                    }
                }
            }
        }

        builder.build()
    }

    fn from_canonical(&self, tag: &Tag) -> Option<String> {
        let mut parts = Vec::new();
        let upos = match tag.pos() {
            Some(pos::NOUN) => "NOUN",
            Some(pos::VERB) => "VERB",
            Some(pos::ADJECTIVE) => "ADJ",
            Some(pos::ADVERB) => "ADV",
            Some(pos::PRONOUN) => "PRON",
            Some(pos::NUMERAL) => "NUM",
            Some(pos::CONJUNCTION) => "CCONJ",
            Some(pos::PREPOSITION) => "ADP",
            Some(pos::INTERJECTION) => "INTJ",
            Some(pos::PARTICLE) => "PART",
            Some(pos::ARTICLE) => "DET",
            _ => "X",
        };
        parts.push(upos.to_string());

        let mut features: BTreeMap<&str, &str> = BTreeMap::new();
        for slot in Slot::ALL {
            let Some(value) = tag.get(slot) else {
                continue;
            };
            if slot == Slot::Tense {
                let (t, aspect) = match value {
                    'p' => ("Pres", None),
                    'f' => ("Fut", None),
                    't' => ("Fut", Some("Perf")),
                    'l' => ("Pqp", None),
                    'i' => ("Past", Some("Imp")),
                    'r' => ("Past", Some("Perf")),
                    _ => continue,
                };
                features.insert("Tense", t);
                if let Some(a) = aspect {
                    features.insert("Aspect", a);
                }
                continue;
            }
            let degree_slot = slot == Slot::PersonOrDegree && tag.degree().is_some();
            if let Some((feature, v, _, _)) = VALUES.iter().find(|(feature, _, s, c)| {
                *s == slot
                    && *c == value
                    && (slot != Slot::PersonOrDegree || (*feature == "Degree") == degree_slot)
            }) {
                features.insert(feature, v);
            }
        }
        parts.extend(features.iter().map(|(k, v)| format!("{k}={v}")));
        Some(parts.join("|"))
    }

    fn name(&self) -> &'static str {
        "features"
    }
}
