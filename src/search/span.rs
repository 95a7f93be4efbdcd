//! Matched positions.

use serde::{Deserialize, Serialize};

use crate::index::Posting;

/// A run of token positions matched in one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
    /// Character offset of the first matched token.
    pub startchar: usize,
    /// Character offset after the last matched token.
    pub endchar: usize,
    /// Whether any matched token carried structural meta.
    pub structural: bool,
}

impl Span {
    /// Create a span without character offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Span {
            start,
            end,
            startchar: 0,
            endchar: 0,
            structural: false,
        }
    }

    pub fn with_chars(mut self, startchar: usize, endchar: usize) -> Self {
        self.startchar = startchar;
        self.endchar = endchar;
        self
    }

    pub fn with_structural(mut self, structural: bool) -> Self {
        self.structural = structural;
        self
    }

    /// Get the length of this span.
    pub fn length(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span overlaps with another span.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if this span contains another span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Get the distance between this span and another span.
    pub fn distance_to(&self, other: &Span) -> usize {
        if self.overlaps(other) {
            0
        } else if self.end <= other.start {
            other.start - self.end
        } else {
            self.start - other.end
        }
    }

    /// Distance between the first and the last position covered.
    pub fn width(&self) -> usize {
        self.length().saturating_sub(1)
    }

    /// The smallest span covering both.
    pub fn union(&self, other: &Span) -> Span {
        let startchar = match self.start.cmp(&other.start) {
            std::cmp::Ordering::Less => self.startchar,
            std::cmp::Ordering::Greater => other.startchar,
            std::cmp::Ordering::Equal => self.startchar.min(other.startchar),
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            startchar,
            endchar: self.endchar.max(other.endchar),
            structural: self.structural || other.structural,
        }
    }
}

impl From<&Posting> for Span {
    fn from(posting: &Posting) -> Self {
        Span::new(posting.pos, posting.pos + 1)
            .with_chars(posting.startchar, posting.endchar)
            .with_structural(posting.structural)
    }
}

/// Sort spans and collapse those covering the same positions.
pub fn normalize(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_unstable();
    spans.dedup_by(|later, kept| {
        let same = later.start == kept.start && later.end == kept.end;
        if same {
            kept.structural |= later.structural;
        }
        same
    });
    spans
}
