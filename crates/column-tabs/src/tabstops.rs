//! Engine-owned tab stops.
//!
//! Applies the stops computed by [`crate::layout`] to every line of a range without touching the
//! text, and remembers which lines the engine owns so that the user's own stops can be put back
//! later. Each line is in exactly one of three states:
//!
//! - unowned,
//! - owned, with no prior manual stops (empty snapshot),
//! - owned, with a saved snapshot of the manual stops it had before.
//!
//! The snapshot is taken only on the first unowned → owned transition and dropped exactly when
//! ownership is released.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::host::{HostEditor, RedrawSuspended};
use crate::layout::{ColumnLayout, LayoutParams, compute_layout};
use crate::model::ColumnModelView;

/// Per-line ownership of tab stops for the attached document.
#[derive(Debug, Clone, Default)]
pub struct TabstopOwnership {
    owned: Vec<bool>,
    saved_manual_px: Vec<Vec<i32>>,
}

impl TabstopOwnership {
    /// Create empty tracking state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow or shrink the tracking vectors to `line_count` lines.
    pub fn ensure_capacity(&mut self, line_count: usize) {
        self.owned.resize(line_count, false);
        self.saved_manual_px.resize_with(line_count, Vec::new);
    }

    /// Forget everything without touching the editor.
    pub fn reset(&mut self) {
        self.owned.clear();
        self.saved_manual_px.clear();
    }

    /// Whether any line is engine-owned.
    pub fn has_any_owned(&self) -> bool {
        self.owned.iter().any(|&owned| owned)
    }

    /// Whether `line` is engine-owned.
    pub fn is_owned(&self, line: usize) -> bool {
        self.owned.get(line).copied().unwrap_or(false)
    }

    /// The manual stops saved for `line` when the engine took it over.
    pub fn saved_manual_stops(&self, line: usize) -> &[i32] {
        self.saved_manual_px
            .get(line)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of engine-owned lines.
    pub fn owned_count(&self) -> usize {
        self.owned.iter().filter(|&&owned| owned).count()
    }

    /// Compute stops for `lines` and write them onto every line in the range.
    ///
    /// Lines not yet owned have their current stops snapshotted first. When the range has fewer
    /// than two columns, lines already owned lose their stops (but stay owned, so a release still
    /// restores their manual stops) and unowned lines are left alone.
    pub fn apply<H: HostEditor + ?Sized>(
        &mut self,
        host: &mut H,
        model: &ColumnModelView<'_>,
        lines: RangeInclusive<usize>,
        params: LayoutParams,
    ) -> ColumnLayout {
        let layout = compute_layout(&*host, model, lines.clone(), params);
        if layout.stops.is_empty() {
            let mut cleared = 0usize;
            for line in lines.clone() {
                if self.is_owned(line) {
                    host.clear_tab_stops(line);
                    cleared += 1;
                }
            }
            debug!(?lines, cleared, "no column boundaries, owned stops cleared");
            return layout;
        }

        self.ensure_capacity(host.line_count());
        for line in lines.clone() {
            if line >= self.owned.len() {
                break;
            }
            if !self.owned[line] {
                self.saved_manual_px[line] = host.tab_stops(line);
            }
            host.clear_tab_stops(line);
            for &stop in &layout.stops {
                host.add_tab_stop(line, stop);
            }
            self.owned[line] = true;
        }

        debug!(?lines, stops = ?layout.stops, "applied column tab stops");
        layout
    }

    /// Clear the stops of every owned line, optionally restoring the saved manual stops.
    ///
    /// Returns the number of lines released.
    pub fn release<H: HostEditor + ?Sized>(&mut self, host: &mut H, restore_manual: bool) -> usize {
        let line_count = host.line_count();
        let limit = self.owned.len().min(line_count);
        if !self.owned[..limit].iter().any(|&owned| owned) {
            self.ensure_capacity(line_count);
            return 0;
        }

        let mut released = 0usize;
        {
            let mut host = RedrawSuspended::new(host);
            for line in 0..limit {
                if !self.owned[line] {
                    continue;
                }
                host.clear_tab_stops(line);
                let saved = std::mem::take(&mut self.saved_manual_px[line]);
                if restore_manual {
                    for stop in saved {
                        host.add_tab_stop(line, stop);
                    }
                }
                self.owned[line] = false;
                released += 1;
            }
        }

        self.ensure_capacity(line_count);
        debug!(released, restore_manual, "released column tab stops");
        released
    }

    /// Clear the stops of every line in the document and forget all tracking.
    pub fn clear_all<H: HostEditor + ?Sized>(&mut self, host: &mut H) {
        let line_count = host.line_count();
        {
            let mut host = RedrawSuspended::new(host);
            for line in 0..line_count {
                host.clear_tab_stops(line);
            }
        }
        self.reset();
        debug!(line_count, "cleared all tab stops");
    }
}
