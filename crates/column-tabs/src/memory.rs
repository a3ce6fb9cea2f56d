//! In-memory host editor.
//!
//! [`MemoryEditor`] implements [`HostEditor`] on top of a [`Rope`], with per-line tab stops,
//! indicator runs, nested undo groups and a redraw switch. Pixel widths are deterministic:
//! every terminal cell (UAX #11) is `cell_width_px` wide unless a glyph override says otherwise,
//! which lets tests reason about exact stop positions while still exercising proportional
//! layouts.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::host::{DocumentId, HostEditor, IndicatorId};
use crate::intervals::{Interval, IntervalTree};

/// Default width of one character cell in pixels.
pub const DEFAULT_CELL_WIDTH_PX: i32 = 8;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
enum Edit {
    Insert { pos: usize, text: String },
    Delete { pos: usize, text: String },
}

/// A self-contained document plus the editor-side state the engine talks to.
#[derive(Debug)]
pub struct MemoryEditor {
    id: DocumentId,
    rope: Rope,
    tab_stops: Vec<Vec<i32>>,
    indicators: HashMap<IndicatorId, IntervalTree>,
    invisible: HashSet<IndicatorId>,
    current_indicator: IndicatorId,
    cell_width_px: i32,
    glyph_widths: HashMap<char, i32>,
    undo_depth: usize,
    undo_groups: Vec<Vec<Edit>>,
    redraw_enabled: bool,
    redraw_count: usize,
}

impl MemoryEditor {
    /// Create an editor holding `text`, with a fresh document identity.
    pub fn new(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let line_count = rope.len_lines();
        Self {
            id: DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed)),
            rope,
            tab_stops: vec![Vec::new(); line_count],
            indicators: HashMap::new(),
            invisible: HashSet::new(),
            current_indicator: IndicatorId::PADDING,
            cell_width_px: DEFAULT_CELL_WIDTH_PX,
            glyph_widths: HashMap::new(),
            undo_depth: 0,
            undo_groups: Vec::new(),
            redraw_enabled: true,
            redraw_count: 0,
        }
    }

    /// Use `px` as the width of one character cell.
    pub fn with_cell_width(mut self, px: i32) -> Self {
        self.cell_width_px = px.max(1);
        self
    }

    /// Render `ch` `px` pixels wide regardless of its cell width.
    pub fn with_glyph_width(mut self, ch: char, px: i32) -> Self {
        self.glyph_widths.insert(ch, px);
        self
    }

    /// Replace the document identity.
    pub fn with_document_id(mut self, id: DocumentId) -> Self {
        self.id = id;
        self
    }

    /// The full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of `line` without its terminator.
    pub fn line_text(&self, line: usize) -> String {
        let start = self.line_start(line);
        String::from_utf8_lossy(&self.text_range(start, start + self.line_length(line)))
            .into_owned()
    }

    /// Marked runs of `indicator`, ascending.
    pub fn indicator_runs(&self, indicator: IndicatorId) -> Vec<Interval> {
        self.indicators
            .get(&indicator)
            .map(|tree| tree.intervals().to_vec())
            .unwrap_or_default()
    }

    /// Drop every run of `indicator` without touching the text.
    ///
    /// Models an external restyle that loses the marking.
    pub fn strip_indicator(&mut self, indicator: IndicatorId) {
        if let Some(tree) = self.indicators.get_mut(&indicator) {
            tree.clear();
        }
    }

    /// Whether `indicator` has been made invisible.
    pub fn is_indicator_invisible(&self, indicator: IndicatorId) -> bool {
        self.invisible.contains(&indicator)
    }

    /// Number of completed undo groups.
    pub fn undo_group_count(&self) -> usize {
        self.undo_groups.len()
    }

    /// Revert the most recent undo group. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.undo_depth > 0 {
            return false;
        }
        let Some(group) = self.undo_groups.pop() else {
            return false;
        };
        for edit in group.into_iter().rev() {
            match edit {
                Edit::Insert { pos, text } => self.raw_delete(pos, pos + text.len()),
                Edit::Delete { pos, text } => self.raw_insert(pos, &text),
            }
        }
        true
    }

    /// Whether repaint is currently enabled.
    pub fn is_redraw_enabled(&self) -> bool {
        self.redraw_enabled
    }

    /// How many times repaint was switched back on.
    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }

    fn record(&mut self, edit: Edit) {
        if self.undo_depth > 0 {
            if let Some(group) = self.undo_groups.last_mut() {
                group.push(edit);
                return;
            }
        }
        self.undo_groups.push(vec![edit]);
    }

    fn raw_insert(&mut self, pos: usize, text: &str) {
        let pos = pos.min(self.rope.len_bytes());
        let line = self.rope.byte_to_line(pos);
        self.rope.insert(self.rope.byte_to_char(pos), text);

        let new_lines = text.matches('\n').count();
        if new_lines > 0 {
            let at = (line + 1).min(self.tab_stops.len());
            self.tab_stops
                .splice(at..at, std::iter::repeat_n(Vec::new(), new_lines));
        }
        for tree in self.indicators.values_mut() {
            tree.update_for_insertion(pos, text.len());
        }
    }

    fn raw_delete(&mut self, start: usize, end: usize) {
        let end = end.min(self.rope.len_bytes());
        let start = start.min(end);
        if start == end {
            return;
        }
        let first_line = self.rope.byte_to_line(start);
        let last_line = self.rope.byte_to_line(end);
        self.rope
            .remove(self.rope.byte_to_char(start)..self.rope.byte_to_char(end));

        if last_line > first_line {
            let to = (last_line + 1).min(self.tab_stops.len());
            let from = (first_line + 1).min(to);
            self.tab_stops.drain(from..to);
        }
        for tree in self.indicators.values_mut() {
            tree.update_for_deletion(start, end);
        }
    }

    fn grapheme_width(&self, grapheme: &str) -> i32 {
        let mut chars = grapheme.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if let Some(px) = self.glyph_widths.get(&ch) {
                return *px;
            }
            if ch == '\t' {
                return self.cell_width_px;
            }
        }
        UnicodeWidthStr::width(grapheme) as i32 * self.cell_width_px
    }
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new("")
    }
}

impl HostEditor for MemoryEditor {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_byte(line.min(self.rope.len_lines()))
    }

    fn line_length(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_bytes();
        if len > 0 && slice.byte(len - 1) == b'\n' {
            len -= 1;
            if len > 0 && slice.byte(len - 1) == b'\r' {
                len -= 1;
            }
        }
        len
    }

    fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    fn text_range(&self, start: usize, end: usize) -> Vec<u8> {
        let end = end.min(self.rope.len_bytes());
        let start = start.min(end);
        self.rope.bytes_at(start).take(end - start).collect()
    }

    fn byte_at(&self, pos: usize) -> u8 {
        if pos < self.rope.len_bytes() {
            self.rope.byte(pos)
        } else {
            0
        }
    }

    fn insert_text(&mut self, pos: usize, text: &[u8]) {
        if text.is_empty() {
            return;
        }
        let pos = pos.min(self.rope.len_bytes());
        let text = String::from_utf8_lossy(text).into_owned();
        self.raw_insert(pos, &text);
        self.record(Edit::Insert { pos, text });
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.rope.len_bytes());
        let start = start.min(end);
        if start == end {
            return;
        }
        let text = String::from_utf8_lossy(&self.text_range(start, end)).into_owned();
        self.raw_delete(start, end);
        self.record(Edit::Delete { pos: start, text });
    }

    fn begin_undo_group(&mut self) {
        if self.undo_depth == 0 {
            self.undo_groups.push(Vec::new());
        }
        self.undo_depth += 1;
    }

    fn end_undo_group(&mut self) {
        if self.undo_depth == 0 {
            return;
        }
        self.undo_depth -= 1;
        if self.undo_depth == 0 && self.undo_groups.last().is_some_and(Vec::is_empty) {
            self.undo_groups.pop();
        }
    }

    fn text_width(&self, text: &[u8]) -> i32 {
        let text = String::from_utf8_lossy(text);
        text.graphemes(true)
            .map(|g| self.grapheme_width(g))
            .fold(0i32, i32::saturating_add)
    }

    fn clear_tab_stops(&mut self, line: usize) {
        if let Some(stops) = self.tab_stops.get_mut(line) {
            stops.clear();
        }
    }

    fn add_tab_stop(&mut self, line: usize, x: i32) {
        if x <= 0 {
            return;
        }
        if let Some(stops) = self.tab_stops.get_mut(line) {
            if let Err(idx) = stops.binary_search(&x) {
                stops.insert(idx, x);
            }
        }
    }

    fn next_tab_stop(&self, line: usize, x: i32) -> i32 {
        self.tab_stops
            .get(line)
            .and_then(|stops| stops.iter().copied().find(|&stop| stop > x))
            .unwrap_or(0)
    }

    fn set_current_indicator(&mut self, indicator: IndicatorId) {
        self.current_indicator = indicator;
    }

    fn set_indicator_invisible(&mut self, indicator: IndicatorId) {
        self.invisible.insert(indicator);
    }

    fn indicator_fill(&mut self, start: usize, len: usize) {
        let doc_len = self.rope.len_bytes();
        let end = start.saturating_add(len).min(doc_len);
        self.indicators
            .entry(self.current_indicator)
            .or_default()
            .fill(start.min(end), end);
    }

    fn indicator_clear(&mut self, start: usize, len: usize) {
        if let Some(tree) = self.indicators.get_mut(&self.current_indicator) {
            tree.clear_range(start, start.saturating_add(len));
        }
    }

    fn indicator_at(&self, indicator: IndicatorId, pos: usize) -> bool {
        self.indicators
            .get(&indicator)
            .is_some_and(|tree| tree.run_at(pos).is_some())
    }

    fn indicator_start(&self, indicator: IndicatorId, pos: usize) -> usize {
        self.indicator_extent(indicator, pos).start
    }

    fn indicator_end(&self, indicator: IndicatorId, pos: usize) -> usize {
        self.indicator_extent(indicator, pos).end
    }

    fn document_id(&self) -> DocumentId {
        self.id
    }

    fn set_redraw(&mut self, enabled: bool) {
        if enabled && !self.redraw_enabled {
            self.redraw_count += 1;
        }
        self.redraw_enabled = enabled;
    }
}

impl MemoryEditor {
    fn indicator_extent(&self, indicator: IndicatorId, pos: usize) -> Interval {
        let doc_len = self.rope.len_bytes();
        match self.indicators.get(&indicator) {
            Some(tree) => tree
                .run_at(pos)
                .unwrap_or_else(|| tree.gap_at(pos, doc_len)),
            None => Interval::new(0, doc_len),
        }
    }
}
