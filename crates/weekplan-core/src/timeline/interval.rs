//! Interval arithmetic over minute offsets within a day.
//!
//! Free time is tracked as a sorted list of disjoint half-open intervals.
//! Occupying a block subtracts it from every free interval; the list stays
//! sorted and non-overlapping after every operation.

use serde::{Deserialize, Serialize};

/// Half-open range of minutes `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length in minutes. Zero for empty or inverted intervals.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if this interval can hold a block of the given length
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.len() >= minutes
    }

    /// Check if two intervals share at least one minute
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Subtract `block` from `interval`.
///
/// Returns the interval unchanged when they do not overlap, nothing when the
/// block covers it, and otherwise the left and/or right remainders.
pub fn subtract_block(interval: Interval, block: Interval) -> Vec<Interval> {
    if !interval.overlaps(&block) {
        return if interval.is_empty() {
            Vec::new()
        } else {
            vec![interval]
        };
    }

    let mut pieces = Vec::with_capacity(2);
    if block.start > interval.start {
        pieces.push(Interval::new(interval.start, block.start));
    }
    if block.end < interval.end {
        pieces.push(Interval::new(block.end, interval.end));
    }
    pieces
}

/// Remove `block` from every interval in `free`, returning a sorted list.
pub fn remove_block(free: &[Interval], block: Interval) -> Vec<Interval> {
    let mut out: Vec<Interval> = free
        .iter()
        .flat_map(|interval| subtract_block(*interval, block))
        .collect();
    out.sort_by_key(|i| i.start);
    out
}

/// Ordered, non-overlapping free time for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeIntervals {
    intervals: Vec<Interval>,
}

impl FreeIntervals {
    /// Start with one interval spanning the whole window.
    pub fn new(window: Interval) -> Self {
        let intervals = if window.is_empty() {
            Vec::new()
        } else {
            vec![window]
        };
        Self { intervals }
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total free minutes.
    pub fn total_minutes(&self) -> u32 {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Mark `block` as busy.
    pub fn occupy(&mut self, block: Interval) {
        self.intervals = remove_block(&self.intervals, block);
    }

    /// Whether `block` lies wholly inside one free interval.
    pub fn covers(&self, block: Interval) -> bool {
        self.intervals
            .iter()
            .any(|i| i.start <= block.start && block.end <= i.end)
    }

    /// Earliest interval long enough for `minutes`.
    pub fn first_fit(&self, minutes: u32) -> Option<Interval> {
        self.intervals.iter().copied().find(|i| i.can_fit(minutes))
    }
}
