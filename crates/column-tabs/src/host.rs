//! Host editor interface.
//!
//! The alignment engine never owns the document. Everything it needs (line geometry, raw bytes,
//! mutations, pixel metrics, tab stops, invisible indicators) is requested from the host through
//! [`HostEditor`]. All positions are **byte offsets** into the document, and all widths are
//! pixels in the host's default style.
//!
//! [`crate::memory::MemoryEditor`] is a complete in-process implementation.

use std::ops::{Deref, DerefMut};

/// A stable, opaque identity for a document (not for a particular view of it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentId(pub u64);

/// Identifier of a host text attribute ("indicator").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorId(pub u32);

impl IndicatorId {
    /// Indicator used for engine-inserted padding unless configured otherwise.
    pub const PADDING: Self = Self(30);

    /// Create an indicator id from a raw number.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// The operations the engine needs from a host editor component.
pub trait HostEditor {
    /// Number of lines in the document (at least 1).
    fn line_count(&self) -> usize;

    /// Byte offset of the start of `line`.
    fn line_start(&self, line: usize) -> usize;

    /// Byte length of `line`, excluding the line terminator.
    fn line_length(&self, line: usize) -> usize;

    /// Byte offset of the end of `line` (before the terminator).
    fn line_end(&self, line: usize) -> usize {
        self.line_start(line) + self.line_length(line)
    }

    /// Total document length in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the document contains no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of `[start, end)`.
    fn text_range(&self, start: usize, end: usize) -> Vec<u8>;

    /// The byte at `pos`, or `0` past the end of the document.
    fn byte_at(&self, pos: usize) -> u8;

    /// Insert `text` at `pos`.
    fn insert_text(&mut self, pos: usize, text: &[u8]);

    /// Delete `[start, end)`.
    fn delete_range(&mut self, start: usize, end: usize);

    /// Open an undo group. Groups nest; only the outermost one is visible to the user.
    fn begin_undo_group(&mut self);

    /// Close the innermost undo group.
    fn end_undo_group(&mut self);

    /// Width in pixels of `text` rendered in the default style.
    fn text_width(&self, text: &[u8]) -> i32;

    /// Remove all tab stops from `line`.
    fn clear_tab_stops(&mut self, line: usize);

    /// Add a tab stop at pixel offset `x` on `line`.
    fn add_tab_stop(&mut self, line: usize, x: i32);

    /// The first tab stop on `line` strictly after `x`, or `0` if there is none.
    fn next_tab_stop(&self, line: usize, x: i32) -> i32;

    /// Select the indicator that subsequent fill/clear calls operate on.
    fn set_current_indicator(&mut self, indicator: IndicatorId);

    /// Give `indicator` a style that renders nothing.
    fn set_indicator_invisible(&mut self, indicator: IndicatorId);

    /// Mark `[start, start + len)` with the current indicator.
    fn indicator_fill(&mut self, start: usize, len: usize);

    /// Unmark `[start, start + len)` for the current indicator.
    fn indicator_clear(&mut self, start: usize, len: usize);

    /// Whether `pos` carries `indicator`.
    fn indicator_at(&self, indicator: IndicatorId, pos: usize) -> bool;

    /// Start of the run containing `pos` that has the same `indicator` value as `pos`.
    fn indicator_start(&self, indicator: IndicatorId, pos: usize) -> usize;

    /// End (exclusive) of the run containing `pos` that has the same `indicator` value as `pos`.
    fn indicator_end(&self, indicator: IndicatorId, pos: usize) -> usize;

    /// Identity of the attached document.
    fn document_id(&self) -> DocumentId;

    /// Enable or disable automatic repaint.
    fn set_redraw(&mut self, enabled: bool);

    /// All tab stops on `line`, in ascending order.
    fn tab_stops(&self, line: usize) -> Vec<i32> {
        let mut stops = Vec::new();
        let mut x = 0;
        loop {
            let next = self.next_tab_stop(line, x);
            if next <= x {
                break;
            }
            stops.push(next);
            x = next;
        }
        stops
    }

    /// Width of a single space glyph.
    fn space_width(&self) -> i32 {
        self.text_width(b" ")
    }
}

/// An open undo group that closes when dropped.
///
/// Dereferences to the host so every mutation made through the scope lands in the group.
pub struct UndoScope<'a, H: HostEditor + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: HostEditor + ?Sized> UndoScope<'a, H> {
    /// Open a new undo group on `host`.
    pub fn new(host: &'a mut H) -> Self {
        host.begin_undo_group();
        Self { host }
    }
}

impl<H: HostEditor + ?Sized> Deref for UndoScope<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: HostEditor + ?Sized> DerefMut for UndoScope<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: HostEditor + ?Sized> Drop for UndoScope<'_, H> {
    fn drop(&mut self) {
        self.host.end_undo_group();
    }
}

/// Suspends repaint until dropped.
pub struct RedrawSuspended<'a, H: HostEditor + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: HostEditor + ?Sized> RedrawSuspended<'a, H> {
    /// Turn repaint off on `host`.
    pub fn new(host: &'a mut H) -> Self {
        host.set_redraw(false);
        Self { host }
    }
}

impl<H: HostEditor + ?Sized> Deref for RedrawSuspended<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: HostEditor + ?Sized> DerefMut for RedrawSuspended<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: HostEditor + ?Sized> Drop for RedrawSuspended<'_, H> {
    fn drop(&mut self) {
        self.host.set_redraw(true);
    }
}

/// Select `indicator` and make it invisible before marking padding with it.
pub(crate) fn prepare_indicator<H: HostEditor + ?Sized>(host: &mut H, indicator: IndicatorId) {
    host.set_indicator_invisible(indicator);
    host.set_current_indicator(indicator);
}
