//! Matcher implementations for query execution.
//!
//! A matcher walks the documents satisfying one query node in ascending id
//! order. Once built it is positioned on its first document, or exhausted;
//! an exhausted matcher reports `u64::MAX` as its document. On the current
//! document it reports the matched [`Span`]s and a score.
//!
//! Positional matchers ([`ColocationMatcher`], [`SequenceMatcher`]) first
//! align their children on a document and then check positions, moving on
//! until a document yields at least one span.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::Debug;

use ahash::AHashMap;

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::index::{DocPostings, Posting};
use crate::search::span::{self, Span};
use crate::search::window;

/// Trait for document matchers.
pub trait Matcher: Send + Debug {
    /// Get the current document ID.
    fn doc_id(&self) -> u64;

    /// Move to the next matching document.
    fn next(&mut self) -> Result<bool>;

    /// Skip to the first document >= target.
    fn skip_to(&mut self, target: u64) -> Result<bool>;

    /// Get the cost of iterating through this matcher.
    fn cost(&self) -> u64;

    /// Check if this matcher is exhausted.
    fn is_exhausted(&self) -> bool;

    /// Spans matched in the current document, sorted by start.
    fn spans(&self) -> Vec<Span>;

    /// Score of the current document.
    fn score(&self) -> f32;
}

/// A matcher that matches no documents.
#[derive(Debug, Default)]
pub struct EmptyMatcher;

impl EmptyMatcher {
    pub fn new() -> Self {
        EmptyMatcher
    }
}

impl Matcher for EmptyMatcher {
    fn doc_id(&self) -> u64 {
        u64::MAX
    }

    fn next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn skip_to(&mut self, _target: u64) -> Result<bool> {
        Ok(false)
    }

    fn cost(&self) -> u64 {
        0
    }

    fn is_exhausted(&self) -> bool {
        true
    }

    fn spans(&self) -> Vec<Span> {
        Vec::new()
    }

    fn score(&self) -> f32 {
        0.0
    }
}

/// A matcher over the postings of one or more index terms.
#[derive(Debug)]
pub struct TermMatcher {
    docs: Vec<DocPostings>,
    cursor: usize,
    boost: f32,
}

impl TermMatcher {
    /// Create a matcher over postings ordered by document id.
    pub fn new(docs: Vec<DocPostings>) -> Self {
        TermMatcher {
            docs,
            cursor: 0,
            boost: 1.0,
        }
    }

    /// Merge the postings of several terms into one matcher. Occurrences of
    /// different terms at the same position count once.
    pub fn from_terms(terms: impl IntoIterator<Item = Vec<DocPostings>>) -> Self {
        let mut merged: BTreeMap<u64, Vec<Posting>> = BTreeMap::new();
        for docs in terms {
            for doc in docs {
                merged.entry(doc.doc_id).or_default().extend(doc.postings);
            }
        }
        let docs = merged
            .into_iter()
            .map(|(doc_id, mut postings)| {
                postings.sort_by_key(|posting| posting.pos);
                postings.dedup_by(|later, kept| {
                    let same = later.pos == kept.pos;
                    if same {
                        kept.structural |= later.structural;
                    }
                    same
                });
                DocPostings { doc_id, postings }
            })
            .collect();
        TermMatcher::new(docs)
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

impl Matcher for TermMatcher {
    fn doc_id(&self) -> u64 {
        self.docs.get(self.cursor).map_or(u64::MAX, |doc| doc.doc_id)
    }

    fn next(&mut self) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        self.cursor += 1;
        Ok(!self.is_exhausted())
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        self.cursor += self.docs[self.cursor..].partition_point(|doc| doc.doc_id < target);
        Ok(!self.is_exhausted())
    }

    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.docs.len()
    }

    fn spans(&self) -> Vec<Span> {
        self.docs
            .get(self.cursor)
            .map(|doc| doc.postings.iter().map(Span::from).collect())
            .unwrap_or_default()
    }

    fn score(&self) -> f32 {
        if self.is_exhausted() { 0.0 } else { self.boost }
    }
}

/// A matcher that implements conjunction (AND) of multiple matchers.
#[derive(Debug)]
pub struct ConjunctionMatcher {
    /// The matchers that must all match.
    matchers: Vec<Box<dyn Matcher>>,
    /// Current document ID.
    current_doc: u64,
    /// Whether this matcher is exhausted.
    exhausted: bool,
    /// Total cost estimate.
    cost: u64,
}

impl ConjunctionMatcher {
    /// Create a new conjunction matcher from multiple matchers.
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Result<Self> {
        let cost = matchers.iter().map(|m| m.cost()).sum();
        let mut matcher = ConjunctionMatcher {
            exhausted: matchers.is_empty(),
            matchers,
            current_doc: u64::MAX,
            cost,
        };
        matcher.advance_to_alignment()?;
        Ok(matcher)
    }

    /// Advance all matchers to be aligned on the same document.
    fn advance_to_alignment(&mut self) -> Result<bool> {
        if self.exhausted {
            self.current_doc = u64::MAX;
            return Ok(false);
        }

        loop {
            let max_doc = self.matchers.iter().map(|m| m.doc_id()).max().unwrap_or(u64::MAX);
            if max_doc == u64::MAX {
                self.exhausted = true;
                self.current_doc = u64::MAX;
                return Ok(false);
            }

            let mut all_aligned = true;
            for matcher in &mut self.matchers {
                if matcher.doc_id() < max_doc {
                    if !matcher.skip_to(max_doc)? {
                        self.exhausted = true;
                        self.current_doc = u64::MAX;
                        return Ok(false);
                    }
                    if matcher.doc_id() != max_doc {
                        all_aligned = false;
                    }
                }
            }

            if all_aligned {
                self.current_doc = max_doc;
                return Ok(true);
            }
        }
    }

    /// The child matchers, in construction order.
    pub fn matchers(&self) -> &[Box<dyn Matcher>] {
        &self.matchers
    }
}

impl Matcher for ConjunctionMatcher {
    fn doc_id(&self) -> u64 {
        if self.exhausted { u64::MAX } else { self.current_doc }
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if !self.matchers[0].next()? {
            self.exhausted = true;
            self.current_doc = u64::MAX;
            return Ok(false);
        }
        self.advance_to_alignment()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.exhausted || target <= self.current_doc {
            return Ok(!self.exhausted);
        }
        if !self.matchers[0].skip_to(target)? {
            self.exhausted = true;
            self.current_doc = u64::MAX;
            return Ok(false);
        }
        self.advance_to_alignment()
    }

    fn cost(&self) -> u64 {
        self.cost
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn spans(&self) -> Vec<Span> {
        if self.exhausted {
            return Vec::new();
        }
        span::normalize(self.matchers.iter().flat_map(|m| m.spans()).collect())
    }

    fn score(&self) -> f32 {
        if self.exhausted {
            return 0.0;
        }
        self.matchers.iter().map(|m| m.score()).sum()
    }
}

/// A helper struct for tracking matchers in the disjunction heap.
#[derive(Debug)]
struct MatcherEntry {
    matcher: Box<dyn Matcher>,
}

impl PartialEq for MatcherEntry {
    fn eq(&self, other: &Self) -> bool {
        self.matcher.doc_id() == other.matcher.doc_id()
    }
}

impl Eq for MatcherEntry {}

impl PartialOrd for MatcherEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatcherEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: lower doc IDs come first
        other.matcher.doc_id().cmp(&self.matcher.doc_id())
    }
}

/// A matcher that implements disjunction (OR) of multiple matchers.
#[derive(Debug)]
pub struct DisjunctionMatcher {
    /// Min-heap of active matchers, ordered by current doc_id.
    heap: BinaryHeap<MatcherEntry>,
    /// Current document ID.
    current_doc: u64,
    /// Total cost estimate.
    cost: u64,
}

impl DisjunctionMatcher {
    /// Create a new disjunction matcher from multiple matchers.
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        let mut heap = BinaryHeap::new();
        let mut cost = 0;
        for matcher in matchers {
            if !matcher.is_exhausted() {
                cost += matcher.cost();
                heap.push(MatcherEntry { matcher });
            }
        }
        let mut matcher = DisjunctionMatcher {
            heap,
            current_doc: u64::MAX,
            cost,
        };
        matcher.update_current();
        matcher
    }

    fn update_current(&mut self) {
        self.current_doc = self.heap.peek().map_or(u64::MAX, |entry| entry.matcher.doc_id());
    }

    /// Matchers positioned on the current document.
    fn current(&self) -> impl Iterator<Item = &dyn Matcher> {
        let current_doc = self.current_doc;
        self.heap
            .iter()
            .map(|entry| entry.matcher.as_ref())
            .filter(move |matcher| matcher.doc_id() == current_doc)
    }
}

impl Matcher for DisjunctionMatcher {
    fn doc_id(&self) -> u64 {
        self.current_doc
    }

    fn next(&mut self) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        let current_doc = self.current_doc;

        // Advance all matchers that are at the current document
        let mut matchers_to_reinsert = Vec::new();
        while self.heap.peek().is_some_and(|entry| entry.matcher.doc_id() == current_doc) {
            let Some(mut entry) = self.heap.pop() else {
                break;
            };
            if entry.matcher.next()? {
                matchers_to_reinsert.push(entry);
            }
        }
        self.heap.extend(matchers_to_reinsert);
        self.update_current();
        Ok(!self.is_exhausted())
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.is_exhausted() || target <= self.current_doc {
            return Ok(!self.is_exhausted());
        }

        let mut matchers_to_reinsert = Vec::new();
        while let Some(mut entry) = self.heap.pop() {
            if entry.matcher.skip_to(target)? {
                matchers_to_reinsert.push(entry);
            }
        }
        self.heap.extend(matchers_to_reinsert);
        self.update_current();
        Ok(!self.is_exhausted())
    }

    fn cost(&self) -> u64 {
        self.cost
    }

    fn is_exhausted(&self) -> bool {
        self.current_doc == u64::MAX
    }

    fn spans(&self) -> Vec<Span> {
        span::normalize(self.current().flat_map(|m| m.spans()).collect())
    }

    fn score(&self) -> f32 {
        self.current().map(|m| m.score()).sum()
    }
}

/// A matcher that excludes documents matched by a negative matcher.
#[derive(Debug)]
pub struct AndNotMatcher {
    positive: Box<dyn Matcher>,
    negative: Box<dyn Matcher>,
    current_doc: u64,
}

impl AndNotMatcher {
    pub fn new(positive: Box<dyn Matcher>, negative: Box<dyn Matcher>) -> Result<Self> {
        let mut matcher = AndNotMatcher {
            positive,
            negative,
            current_doc: u64::MAX,
        };
        matcher.advance_to_next_valid()?;
        Ok(matcher)
    }

    /// Advance to the next positive document the negative matcher misses.
    fn advance_to_next_valid(&mut self) -> Result<bool> {
        loop {
            let doc_id = self.positive.doc_id();
            if doc_id == u64::MAX {
                self.current_doc = u64::MAX;
                return Ok(false);
            }
            if self.negative.doc_id() < doc_id {
                self.negative.skip_to(doc_id)?;
            }
            if self.negative.doc_id() != doc_id {
                self.current_doc = doc_id;
                return Ok(true);
            }
            self.positive.next()?;
        }
    }
}

impl Matcher for AndNotMatcher {
    fn doc_id(&self) -> u64 {
        self.current_doc
    }

    fn next(&mut self) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        self.positive.next()?;
        self.advance_to_next_valid()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.is_exhausted() || target <= self.current_doc {
            return Ok(!self.is_exhausted());
        }
        self.positive.skip_to(target)?;
        self.advance_to_next_valid()
    }

    fn cost(&self) -> u64 {
        self.positive.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.current_doc == u64::MAX
    }

    fn spans(&self) -> Vec<Span> {
        if self.is_exhausted() { Vec::new() } else { self.positive.spans() }
    }

    fn score(&self) -> f32 {
        if self.is_exhausted() { 0.0 } else { self.positive.score() }
    }
}

/// Documents of a required matcher, scored higher where an optional matcher
/// also matches.
#[derive(Debug)]
pub struct AndMaybeMatcher {
    required: Box<dyn Matcher>,
    optional: Box<dyn Matcher>,
}

impl AndMaybeMatcher {
    pub fn new(required: Box<dyn Matcher>, optional: Box<dyn Matcher>) -> Result<Self> {
        let mut matcher = AndMaybeMatcher { required, optional };
        matcher.sync_optional()?;
        Ok(matcher)
    }

    fn sync_optional(&mut self) -> Result<bool> {
        let doc_id = self.required.doc_id();
        if doc_id != u64::MAX && self.optional.doc_id() < doc_id {
            self.optional.skip_to(doc_id)?;
        }
        Ok(doc_id != u64::MAX)
    }

    fn optional_matches(&self) -> bool {
        !self.required.is_exhausted() && self.optional.doc_id() == self.required.doc_id()
    }
}

impl Matcher for AndMaybeMatcher {
    fn doc_id(&self) -> u64 {
        self.required.doc_id()
    }

    fn next(&mut self) -> Result<bool> {
        self.required.next()?;
        self.sync_optional()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        self.required.skip_to(target)?;
        self.sync_optional()
    }

    fn cost(&self) -> u64 {
        self.required.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.required.is_exhausted()
    }

    fn spans(&self) -> Vec<Span> {
        let mut spans = self.required.spans();
        if self.optional_matches() {
            spans.extend(self.optional.spans());
        }
        span::normalize(spans)
    }

    fn score(&self) -> f32 {
        let mut score = self.required.score();
        if self.optional_matches() {
            score += self.optional.score();
        }
        score
    }
}

/// Documents matched by both sides, reported and scored from the left side
/// only.
#[derive(Debug)]
pub struct RequireMatcher {
    inner: ConjunctionMatcher,
}

impl RequireMatcher {
    pub fn new(scored: Box<dyn Matcher>, required: Box<dyn Matcher>) -> Result<Self> {
        Ok(RequireMatcher {
            inner: ConjunctionMatcher::new(vec![scored, required])?,
        })
    }
}

impl Matcher for RequireMatcher {
    fn doc_id(&self) -> u64 {
        self.inner.doc_id()
    }

    fn next(&mut self) -> Result<bool> {
        self.inner.next()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        self.inner.skip_to(target)
    }

    fn cost(&self) -> u64 {
        self.inner.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }

    fn spans(&self) -> Vec<Span> {
        if self.is_exhausted() { Vec::new() } else { self.inner.matchers[0].spans() }
    }

    fn score(&self) -> f32 {
        if self.is_exhausted() { 0.0 } else { self.inner.matchers[0].score() }
    }
}

/// A matcher that matches every document the negative matcher misses.
#[derive(Debug)]
pub struct NotMatcher {
    /// The matcher for documents to exclude.
    negative: Box<dyn Matcher>,
    /// Every document of the index, ascending.
    doc_ids: Vec<u64>,
    cursor: usize,
}

impl NotMatcher {
    pub fn new(negative: Box<dyn Matcher>, doc_ids: Vec<u64>) -> Result<Self> {
        let mut matcher = NotMatcher {
            negative,
            doc_ids,
            cursor: 0,
        };
        matcher.advance_to_next_valid()?;
        Ok(matcher)
    }

    /// Advance to the next document not matched by the negative matcher.
    fn advance_to_next_valid(&mut self) -> Result<bool> {
        while let Some(&doc_id) = self.doc_ids.get(self.cursor) {
            if self.negative.doc_id() < doc_id {
                self.negative.skip_to(doc_id)?;
            }
            if self.negative.doc_id() != doc_id {
                return Ok(true);
            }
            self.cursor += 1;
        }
        Ok(false)
    }
}

impl Matcher for NotMatcher {
    fn doc_id(&self) -> u64 {
        self.doc_ids.get(self.cursor).copied().unwrap_or(u64::MAX)
    }

    fn next(&mut self) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        self.cursor += 1;
        self.advance_to_next_valid()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        self.cursor += self.doc_ids[self.cursor..].partition_point(|&doc_id| doc_id < target);
        self.advance_to_next_valid()
    }

    fn cost(&self) -> u64 {
        self.doc_ids.len() as u64
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.doc_ids.len()
    }

    fn spans(&self) -> Vec<Span> {
        Vec::new()
    }

    fn score(&self) -> f32 {
        if self.is_exhausted() { 0.0 } else { 1.0 }
    }
}

/// Multiplies the score of another matcher.
#[derive(Debug)]
pub struct BoostMatcher {
    inner: Box<dyn Matcher>,
    boost: f32,
}

impl BoostMatcher {
    pub fn new(inner: Box<dyn Matcher>, boost: f32) -> Self {
        BoostMatcher { inner, boost }
    }
}

impl Matcher for BoostMatcher {
    fn doc_id(&self) -> u64 {
        self.inner.doc_id()
    }

    fn next(&mut self) -> Result<bool> {
        self.inner.next()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        self.inner.skip_to(target)
    }

    fn cost(&self) -> u64 {
        self.inner.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }

    fn spans(&self) -> Vec<Span> {
        self.inner.spans()
    }

    fn score(&self) -> f32 {
        self.inner.score() * self.boost
    }
}

/// Positions matched by every child at once, such as a form and the
/// annotation attached to it.
#[derive(Debug)]
pub struct ColocationMatcher {
    inner: ConjunctionMatcher,
    spans: Vec<Span>,
}

impl ColocationMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Result<Self> {
        let mut matcher = ColocationMatcher {
            inner: ConjunctionMatcher::new(matchers)?,
            spans: Vec::new(),
        };
        matcher.settle()?;
        Ok(matcher)
    }

    fn colocated(&self) -> Vec<Span> {
        let mut matchers = self.inner.matchers.iter();
        let Some(first) = matchers.next() else {
            return Vec::new();
        };
        let mut spans = first.spans();
        for matcher in matchers {
            let by_start: AHashMap<usize, Span> =
                matcher.spans().into_iter().map(|span| (span.start, span)).collect();
            spans = spans
                .into_iter()
                .filter_map(|span| by_start.get(&span.start).map(|other| span.union(other)))
                .collect();
        }
        spans
    }

    /// Move forward until the aligned document has colocated positions.
    fn settle(&mut self) -> Result<bool> {
        while !self.inner.is_exhausted() {
            self.spans = self.colocated();
            if !self.spans.is_empty() {
                return Ok(true);
            }
            self.inner.next()?;
        }
        self.spans.clear();
        Ok(false)
    }
}

impl Matcher for ColocationMatcher {
    fn doc_id(&self) -> u64 {
        self.inner.doc_id()
    }

    fn next(&mut self) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        self.inner.next()?;
        self.settle()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.is_exhausted() || target <= self.doc_id() {
            return Ok(!self.is_exhausted());
        }
        self.inner.skip_to(target)?;
        self.settle()
    }

    fn cost(&self) -> u64 {
        self.inner.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }

    fn spans(&self) -> Vec<Span> {
        self.spans.clone()
    }

    fn score(&self) -> f32 {
        self.inner.score()
    }
}

/// Slop and ordering of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proximity {
    /// Requested slop. Values below 1 act as 1.
    pub slop: u32,
    /// Whether members must appear in query order.
    pub ordered: bool,
    /// Slop floor for documents where a member matched structural tokens.
    pub meta_min_slop: Option<u32>,
}

impl Proximity {
    pub fn new(slop: u32) -> Self {
        Proximity {
            slop,
            ordered: true,
            meta_min_slop: None,
        }
    }

    /// Apply the matcher settings to a requested slop.
    pub fn from_config(slop: u32, config: &MatcherConfig) -> Self {
        Proximity {
            slop: slop.max(config.min_slop),
            ordered: config.ordered,
            meta_min_slop: config.meta_min_slop,
        }
    }

    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    pub fn meta_min_slop(mut self, meta_min_slop: Option<u32>) -> Self {
        self.meta_min_slop = meta_min_slop;
        self
    }

    /// The slop a sequence of `members` is evaluated with. N members are never
    /// closer than N - 1 positions.
    ///
    /// ```
    /// use cylleneus::search::matcher::Proximity;
    ///
    /// let proximity = Proximity::new(0).meta_min_slop(Some(2));
    /// assert_eq!(proximity.effective(2, false), 1);
    /// assert_eq!(proximity.effective(2, true), 2);
    /// assert_eq!(proximity.effective(4, false), 3);
    /// ```
    pub fn effective(&self, members: usize, structural: bool) -> usize {
        let mut slop = (self.slop.max(1) as usize).max(members.saturating_sub(1));
        if structural && let Some(meta) = self.meta_min_slop {
            slop = slop.max(meta as usize);
        }
        slop
    }
}

/// Members matched within a proximity window.
///
/// Each member carries a weight; the score of a document is the weighted sum
/// of the member scores.
#[derive(Debug)]
pub struct SequenceMatcher {
    inner: ConjunctionMatcher,
    boosts: Vec<f32>,
    proximity: Proximity,
    windows: Vec<Span>,
}

impl SequenceMatcher {
    pub fn new(members: Vec<(Box<dyn Matcher>, f32)>, proximity: Proximity) -> Result<Self> {
        let (matchers, boosts): (Vec<_>, Vec<_>) = members.into_iter().unzip();
        let mut matcher = SequenceMatcher {
            inner: ConjunctionMatcher::new(matchers)?,
            boosts,
            proximity,
            windows: Vec::new(),
        };
        matcher.settle()?;
        Ok(matcher)
    }

    fn current_windows(&self) -> Vec<Span> {
        let lists: Vec<Vec<Span>> = self.inner.matchers.iter().map(|m| m.spans()).collect();
        let structural = lists.iter().flatten().any(|span| span.structural);
        let slop = self.proximity.effective(lists.len(), structural);
        window::windows(&lists, slop, self.proximity.ordered)
    }

    /// Move forward until the aligned document has a window.
    fn settle(&mut self) -> Result<bool> {
        while !self.inner.is_exhausted() {
            self.windows = self.current_windows();
            if !self.windows.is_empty() {
                return Ok(true);
            }
            self.inner.next()?;
        }
        self.windows.clear();
        Ok(false)
    }
}

impl Matcher for SequenceMatcher {
    fn doc_id(&self) -> u64 {
        self.inner.doc_id()
    }

    fn next(&mut self) -> Result<bool> {
        if self.is_exhausted() {
            return Ok(false);
        }
        self.inner.next()?;
        self.settle()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.is_exhausted() || target <= self.doc_id() {
            return Ok(!self.is_exhausted());
        }
        self.inner.skip_to(target)?;
        self.settle()
    }

    fn cost(&self) -> u64 {
        self.inner.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }

    fn spans(&self) -> Vec<Span> {
        self.windows.clone()
    }

    fn score(&self) -> f32 {
        if self.is_exhausted() {
            return 0.0;
        }
        self.inner
            .matchers
            .iter()
            .zip(&self.boosts)
            .map(|(matcher, boost)| matcher.score() * boost)
            .sum()
    }
}
