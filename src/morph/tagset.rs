//! Conversion between corpus-native morphology and canonical tags.

use std::fmt::Debug;

use crate::morph::tag::{Slot, TAG_LEN, Tag};

/// A corpus-native morphological notation.
///
/// Conversions are deterministic and table driven. Ambiguous native input
/// expands to every legal canonical tag; unrecognized input converts to an
/// empty vector, which the analysis pipeline treats as "drop the token".
pub trait Tagset: Send + Sync + Debug {
    /// Convert a native tag into all canonical tags it can denote.
    fn to_canonical(&self, native: &str) -> Vec<Tag>;

    /// Render a canonical tag in this notation. The result may be coarser than
    /// the tag when the notation cannot express some slots.
    fn from_canonical(&self, tag: &Tag) -> Option<String>;

    /// Get the name of this tagset.
    fn name(&self) -> &'static str;
}

/// Collects candidate values per slot and expands them into tags.
#[derive(Clone, Debug, Default)]
pub struct TagBuilder {
    slots: [Vec<char>; TAG_LEN],
    invalid: bool,
}

impl TagBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate value for a slot. Illegal values mark the whole tag invalid.
    pub fn add(&mut self, slot: Slot, value: char) -> &mut Self {
        if !slot.accepts(value) {
            self.invalid = true;
            return self;
        }
        let candidates = &mut self.slots[slot.index()];
        if !candidates.contains(&value) {
            candidates.push(value);
        }
        self
    }

    /// Add several alternative values for a slot.
    pub fn add_all(&mut self, slot: Slot, values: &[char]) -> &mut Self {
        for value in values {
            self.add(slot, *value);
        }
        self
    }

    /// Mark the native input as unrecognized.
    pub fn invalidate(&mut self) -> &mut Self {
        self.invalid = true;
        self
    }

    /// Whether a slot already has candidates.
    pub fn has(&self, slot: Slot) -> bool {
        !self.slots[slot.index()].is_empty()
    }

    /// The candidates collected for a slot.
    pub fn candidates(&self, slot: Slot) -> &[char] {
        &self.slots[slot.index()]
    }

    /// Drop all candidates of a slot.
    pub fn clear(&mut self, slot: Slot) -> &mut Self {
        self.slots[slot.index()].clear();
        self
    }

    /// Expand the Cartesian product of all slot candidates.
    pub fn build(&self) -> Vec<Tag> {
        if self.invalid {
            return Vec::new();
        }
        let mut tags = vec![Tag::EMPTY];
        for slot in Slot::ALL {
            let candidates = &self.slots[slot.index()];
            if candidates.is_empty() {
                continue;
            }
            let mut expanded = Vec::with_capacity(tags.len() * candidates.len());
            for tag in &tags {
                for value in candidates {
                    if let Ok(next) = tag.with(slot, *value) {
                        expanded.push(next);
                    }
                }
            }
            tags = expanded;
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tag() {
        let mut builder = TagBuilder::new();
        builder.add(Slot::Pos, 'n').add(Slot::Case, 'g').add(Slot::Number, 'p');
        let tags = builder.build();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].to_string(), "n-p----g--");
    }

    #[test]
    fn test_cartesian_product() {
        let mut builder = TagBuilder::new();
        builder
            .add(Slot::Pos, 'n')
            .add_all(Slot::Gender, &['m', 'f'])
            .add_all(Slot::Case, &['n', 'v']);
        let tags: Vec<String> = builder.build().iter().map(|t| t.to_string()).collect();
        assert_eq!(
            tags,
            vec!["n-----mn--", "n-----mv--", "n-----fn--", "n-----fv--"]
        );
    }

    #[test]
    fn test_duplicates_and_invalid_values() {
        let mut builder = TagBuilder::new();
        builder.add(Slot::Case, 'a').add(Slot::Case, 'a');
        assert_eq!(builder.build().len(), 1);

        builder.add(Slot::Case, 'x');
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_empty_builder_yields_empty_tag() {
        assert_eq!(TagBuilder::new().build(), vec![Tag::EMPTY]);
    }
}
