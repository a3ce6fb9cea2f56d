//! Indicator runs.
//!
//! A sorted interval set holding the byte ranges marked with one indicator. Filling merges
//! touching ranges into a single run, the way host editors coalesce adjacent indicator fills.

/// A half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Interval {
    /// Create a new interval.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check if interval contains a specific position
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for an empty interval.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Interval tree of non-overlapping runs.
///
/// Uses a sorted vector with binary search. Because runs never overlap, the runs are sorted by
/// both start and end and a point query is a single binary search.
#[derive(Debug, Clone, Default)]
pub struct IntervalTree {
    /// Disjoint, non-touching runs sorted by start.
    intervals: Vec<Interval>,
}

impl IntervalTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// All runs in ascending order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of runs.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Clear all runs
    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    /// The run containing `pos`, if any.
    pub fn run_at(&self, pos: usize) -> Option<Interval> {
        let idx = self.intervals.partition_point(|i| i.start <= pos);
        idx.checked_sub(1)
            .map(|i| self.intervals[i])
            .filter(|i| i.contains(pos))
    }

    /// The unmarked gap containing `pos`, bounded by `doc_len`.
    pub fn gap_at(&self, pos: usize, doc_len: usize) -> Interval {
        let idx = self.intervals.partition_point(|i| i.start <= pos);
        let start = idx
            .checked_sub(1)
            .map(|i| self.intervals[i].end)
            .unwrap_or(0);
        let end = self
            .intervals
            .get(idx)
            .map(|i| i.start)
            .unwrap_or(doc_len)
            .max(start);
        Interval::new(start, end)
    }

    /// Runs overlapping `[start, end)`.
    pub fn query_range(&self, start: usize, end: usize) -> &[Interval] {
        if start >= end {
            return &[];
        }
        let first = self.intervals.partition_point(|i| i.end <= start);
        let last = self.intervals.partition_point(|i| i.start < end);
        &self.intervals[first..last.max(first)]
    }

    /// Mark `[start, end)`, merging with every run it overlaps or touches.
    pub fn fill(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let first = self.intervals.partition_point(|i| i.end < start);
        let last = self.intervals.partition_point(|i| i.start <= end);

        let mut merged = Interval::new(start, end);
        if first < last {
            merged.start = merged.start.min(self.intervals[first].start);
            merged.end = merged.end.max(self.intervals[last - 1].end);
        }
        self.intervals.splice(first..last, std::iter::once(merged));
    }

    /// Unmark `[start, end)`, splitting runs that straddle its edges.
    pub fn clear_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let first = self.intervals.partition_point(|i| i.end <= start);
        let last = self.intervals.partition_point(|i| i.start < end);
        if first >= last {
            return;
        }

        let mut kept = Vec::with_capacity(2);
        let head = self.intervals[first];
        if head.start < start {
            kept.push(Interval::new(head.start, start));
        }
        let tail = self.intervals[last - 1];
        if tail.end > end {
            kept.push(Interval::new(end, tail.end));
        }
        self.intervals.splice(first..last, kept);
    }

    /// Update offsets (when text changes)
    ///
    /// Call this method to update all runs when inserting `delta` bytes at position `pos`.
    /// Text inserted strictly inside a run extends it; text inserted at a run's edge does not.
    pub fn update_for_insertion(&mut self, pos: usize, delta: usize) {
        for interval in &mut self.intervals {
            if interval.start >= pos {
                interval.start += delta;
                interval.end += delta;
            } else if interval.end > pos {
                // Run spans insertion point, extend end position
                interval.end += delta;
            }
        }
    }

    /// Update offsets (when text is deleted)
    ///
    /// Call this method to update all runs when deleting bytes in range `[start, end)`.
    pub fn update_for_deletion(&mut self, start: usize, end: usize) {
        let delta = end - start;

        for interval in &mut self.intervals {
            if interval.end <= start {
                // Run is before deletion range, unaffected
                continue;
            } else if interval.start >= end {
                // Run is after deletion range, move forward
                interval.start -= delta;
                interval.end -= delta;
            } else if interval.start >= start && interval.end <= end {
                // Run is completely within deletion range
                interval.end = interval.start;
            } else if interval.start < start && interval.end > end {
                // Run spans deletion range, shrink
                interval.end -= delta;
            } else if interval.start < start {
                // Run partially in deletion range (end part)
                interval.end = start;
            } else {
                // Run partially in deletion range (start part)
                interval.start = start;
                interval.end -= delta;
            }
        }

        self.intervals.retain(|i| !i.is_empty());
        self.coalesce();
    }

    /// Merge runs that became adjacent after a deletion.
    fn coalesce(&mut self) {
        let mut merged: Vec<Interval> = Vec::with_capacity(self.intervals.len());
        for interval in self.intervals.drain(..) {
            match merged.last_mut() {
                Some(last) if last.end >= interval.start => last.end = last.end.max(interval.end),
                _ => merged.push(interval),
            }
        }
        self.intervals = merged;
    }
}
