//! Leipzig interlinear glosses.
//!
//! Glosses are dot-separated abbreviations such as `GEN.PL` or `3.SG.PRS.IND`.
//! They carry no part of speech, group or stem, so converting a canonical tag
//! to a gloss is lossy in those slots. Query annotations (`:ACC.SG.`) use this
//! notation and are converted without any lexicon lookup.

use crate::morph::tag::{Slot, Tag};
use crate::morph::tagset::{TagBuilder, Tagset};

/// Gloss abbreviations and the slot value each one denotes.
const GLOSSES: &[(&str, Slot, char)] = &[
    ("1", Slot::PersonOrDegree, '1'),
    ("2", Slot::PersonOrDegree, '2'),
    ("3", Slot::PersonOrDegree, '3'),
    ("POS", Slot::PersonOrDegree, 'p'),
    ("CMPR", Slot::PersonOrDegree, 'c'),
    ("SUPL", Slot::PersonOrDegree, 's'),
    ("SG", Slot::Number, 's'),
    ("PL", Slot::Number, 'p'),
    ("DU", Slot::Number, 'd'),
    ("PRS", Slot::Tense, 'p'),
    ("IMPF", Slot::Tense, 'i'),
    ("FUT", Slot::Tense, 'f'),
    ("PRF", Slot::Tense, 'r'),
    ("PLPRF", Slot::Tense, 'l'),
    ("FUTPRF", Slot::Tense, 't'),
    ("AOR", Slot::Tense, 'a'),
    ("IND", Slot::Mood, 'i'),
    ("SBJV", Slot::Mood, 's'),
    ("IMP", Slot::Mood, 'm'),
    ("INF", Slot::Mood, 'n'),
    ("PTCP", Slot::Mood, 'p'),
    ("GER", Slot::Mood, 'd'),
    ("GERV", Slot::Mood, 'g'),
    ("SUP", Slot::Mood, 'u'),
    ("OPT", Slot::Mood, 'o'),
    ("ACT", Slot::Voice, 'a'),
    ("PASS", Slot::Voice, 'p'),
    ("MID", Slot::Voice, 'm'),
    ("MPASS", Slot::Voice, 'e'),
    ("DEP", Slot::Voice, 'd'),
    ("M", Slot::Gender, 'm'),
    ("F", Slot::Gender, 'f'),
    ("N", Slot::Gender, 'n'),
    ("C", Slot::Gender, 'c'),
    ("NOM", Slot::Case, 'n'),
    ("GEN", Slot::Case, 'g'),
    ("DAT", Slot::Case, 'd'),
    ("ACC", Slot::Case, 'a'),
    ("ABL", Slot::Case, 'b'),
    ("VOC", Slot::Case, 'v'),
    ("LOC", Slot::Case, 'l'),
    ("INS", Slot::Case, 'i'),
];

/// Long-form aliases accepted on input only.
const ALIASES: &[(&str, &str)] = &[
    ("MASC", "M"),
    ("FEM", "F"),
    ("NEUT", "N"),
    ("COMM", "C"),
    ("PRES", "PRS"),
    ("IPFV", "IMPF"),
    ("PERF", "PRF"),
    ("SUBJ", "SBJV"),
    ("IMPV", "IMP"),
];

/// Slots rendered by [`LeipzigTagset::from_canonical`], in output order.
const OUTPUT_ORDER: &[Slot] = &[
    Slot::PersonOrDegree,
    Slot::Number,
    Slot::Tense,
    Slot::Mood,
    Slot::Voice,
    Slot::Gender,
    Slot::Case,
];

fn lookup(gloss: &str) -> Option<(Slot, char)> {
    let upper = gloss.to_ascii_uppercase();
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, target)| *target)
        .unwrap_or(upper.as_str());
    GLOSSES
        .iter()
        .find(|(abbr, _, _)| *abbr == canonical)
        .map(|(_, slot, value)| (*slot, *value))
}

/// The Leipzig gloss notation.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeipzigTagset;

impl LeipzigTagset {
    /// Create a new Leipzig tagset.
    pub fn new() -> Self {
        LeipzigTagset
    }

    /// Convert a gloss into a single wildcard pattern.
    ///
    /// Leading `:`/`|` markers and trailing dots are ignored. Returns `None`
    /// for unknown abbreviations or for two different values in one slot.
    pub fn pattern(&self, gloss: &str) -> Option<Tag> {
        let mut tags = self.to_canonical(gloss);
        if tags.len() == 1 { tags.pop() } else { None }
    }
}

impl Tagset for LeipzigTagset {
    fn to_canonical(&self, native: &str) -> Vec<Tag> {
        let body = native.trim().trim_start_matches([':', '|']);
        let mut builder = TagBuilder::new();
        let mut seen = 0;
        for gloss in body.split('.').filter(|g| !g.is_empty()) {
            seen += 1;
            match lookup(gloss) {
                Some((slot, value)) => {
                    if builder.has(slot) && !builder.candidates(slot).contains(&value) {
                        builder.invalidate();
                    } else {
                        builder.add(slot, value);
                    }
                }
                None => {
                    builder.invalidate();
                }
            }
        }
        if seen == 0 {
            return Vec::new();
        }
        builder.build()
    }

    fn from_canonical(&self, tag: &Tag) -> Option<String> {
        let glosses: Vec<&str> = OUTPUT_ORDER
            .iter()
            .filter_map(|slot| {
                let value = tag.get(*slot)?;
                GLOSSES
                    .iter()
                    .find(|(_, s, v)| s == slot && *v == value)
                    .map(|(abbr, _, _)| *abbr)
            })
            .collect();
        if glosses.is_empty() {
            None
        } else {
            Some(glosses.join("."))
        }
    }

    fn name(&self) -> &'static str {
        "leipzig"
    }
}
