//! Padding mutation layer.
//!
//! Inserts tab/space padding into the text so columns line up, marks every inserted byte with an
//! invisible indicator, and records each insertion in a per-document [`InsertionLog`] that serves
//! as a fallback when the marking is lost. Removal never deletes bytes that were not inserted
//! here: the indicator sweep only touches marked runs, and the log path only deletes ranges that
//! still contain nothing but spaces and tabs.
//!
//! Undo grouping and the per-document presence flag are handled by
//! [`ColumnTabs`](crate::ColumnTabs); the functions here only mutate and record.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use tracing::{trace, warn};

use crate::host::{DocumentId, HostEditor, IndicatorId};
use crate::model::ColumnModelView;
use crate::numeric::{parse_numeric, trim_field};

/// A recorded run of inserted padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadRange {
    /// Document byte offset of the run.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
    /// The byte that followed the run when it was inserted (a delimiter or a number's first
    /// byte). A range no longer followed by it is stale.
    pub anchor: u8,
}

impl PadRange {
    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Ordered record of inserted padding for one document.
///
/// Recorded ranges are shifted as later edits made by the engine move the text around them, so
/// the log stays valid across compound operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertionLog {
    ranges: Vec<PadRange>,
}

impl InsertionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded ranges, in insertion order.
    pub fn ranges(&self) -> &[PadRange] {
        &self.ranges
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of recorded ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Forget every recorded range.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Record `len` bytes inserted at `pos` and followed by `anchor`, shifting ranges at or
    /// after `pos`.
    ///
    /// A run inserted right against an already recorded one extends it, so every range keeps
    /// the anchor of the text it was inserted in front of.
    pub fn record_insertion(&mut self, pos: usize, len: usize, anchor: u8) {
        self.shift_for_insertion(pos, len);
        if let Some(next) = self.ranges.iter_mut().find(|r| r.start == pos + len) {
            next.start = pos;
            next.len += len;
        } else if let Some(previous) = self.ranges.iter_mut().find(|r| r.end() == pos) {
            previous.len += len;
        } else {
            self.ranges.push(PadRange {
                start: pos,
                len,
                anchor,
            });
        }
    }

    /// Shift ranges for `len` bytes inserted at `pos` without recording them.
    pub fn shift_for_insertion(&mut self, pos: usize, len: usize) {
        for range in &mut self.ranges {
            if range.start >= pos {
                range.start += len;
            } else if range.end() > pos {
                range.len += len;
            }
        }
    }

    /// Adjust ranges for the deletion of `[start, end)`.
    pub fn note_deletion(&mut self, start: usize, end: usize) {
        let delta = end - start;
        for range in &mut self.ranges {
            let range_end = range.end();
            if range_end <= start {
                continue;
            } else if range.start >= end {
                range.start -= delta;
            } else {
                let overlap = range_end.min(end) - range.start.max(start);
                range.start = range.start.min(start);
                range.len -= overlap;
            }
        }
        self.ranges.retain(|range| range.len > 0);
    }
}

/// Padding facts for one document.
#[derive(Debug, Clone, Default)]
pub struct DocPadding {
    /// The document currently carries engine-inserted padding.
    pub has_pads: bool,
    /// Fallback record of inserted runs.
    pub log: InsertionLog,
}

/// Padding presence flags and insertion logs keyed by document identity.
///
/// Entries survive document switches: they describe text content, not view state.
#[derive(Debug, Clone, Default)]
pub struct PaddingStore {
    docs: HashMap<DocumentId, DocPadding>,
}

impl PaddingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `doc` carries engine-inserted padding.
    pub fn has_padding(&self, doc: DocumentId) -> bool {
        self.docs.get(&doc).is_some_and(|d| d.has_pads)
    }

    /// Set the presence flag for `doc`.
    pub fn set_has_padding(&mut self, doc: DocumentId, has_pads: bool) {
        self.docs.entry(doc).or_default().has_pads = has_pads;
    }

    /// The insertion log of `doc`, if any.
    pub fn log(&self, doc: DocumentId) -> Option<&InsertionLog> {
        self.docs.get(&doc).map(|d| &d.log)
    }

    /// The insertion log of `doc`, created on demand.
    pub fn log_mut(&mut self, doc: DocumentId) -> &mut InsertionLog {
        &mut self.docs.entry(doc).or_default().log
    }

    /// Mark `doc` clean: flag cleared and log discarded.
    pub fn mark_clean(&mut self, doc: DocumentId) {
        if let Some(entry) = self.docs.get_mut(&doc) {
            entry.has_pads = false;
            entry.log.clear();
        }
    }

    /// Forget `doc` entirely (e.g. when it is closed).
    pub fn forget(&mut self, doc: DocumentId) {
        self.docs.remove(&doc);
    }
}

/// Per-column result of the numeric scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericColumn {
    /// Largest integer-digit count of any number in the column.
    pub max_int_digits: usize,
    /// Some number in the column has a decimal separator.
    pub has_decimal: bool,
    /// Number of fields holding a number.
    pub numeric_fields: usize,
}

/// Outcome of a decimal-alignment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericAlignment {
    /// Statistics per column index.
    pub columns: Vec<NumericColumn>,
    /// Spaces inserted.
    pub inserted: usize,
    /// Previously inserted spaces removed.
    pub removed: usize,
}

/// Insert one marked tab before every delimiter of `lines` that is not already preceded by one.
///
/// Lines are processed top to bottom and left to right, with a running per-line delta keeping
/// the model's offsets valid after earlier insertions. Returns the number of tabs inserted.
pub(crate) fn insert_tab_padding<H: HostEditor + ?Sized>(
    host: &mut H,
    model: &ColumnModelView<'_>,
    lines: RangeInclusive<usize>,
    log: &mut InsertionLog,
) -> usize {
    let mut inserted = 0usize;

    for line in lines {
        let fields = model.fields(line);
        if fields.len() < 2 {
            continue;
        }
        let line_start = host.line_start(line);
        let mut delta = 0usize;

        for span in &fields[..fields.len() - 1] {
            let field_start = line_start + span.start + delta;
            let pos = line_start + span.end + delta;
            if pos > field_start && host.byte_at(pos - 1) == b'\t' {
                continue;
            }

            host.insert_text(pos, b"\t");
            host.indicator_fill(pos, 1);
            log.record_insertion(pos, 1, host.byte_at(pos + 1));
            trace!(line, pos, "inserted tab padding");
            delta += 1;
            inserted += 1;
        }
    }

    inserted
}

/// Delete every run marked with `indicator`, sweeping from the end of the document.
///
/// Loop invariant: no byte at or after `pos` is marked. Each step either deletes the marked run
/// ending at `pos` and continues from its start, or skips the unmarked run ending at `pos`.
/// Adjacent single-byte fills coalesced by the host are removed as one run.
pub(crate) fn remove_marked<H: HostEditor + ?Sized>(host: &mut H, indicator: IndicatorId) -> usize {
    let mut removed = 0usize;
    let mut pos = host.len();

    while pos > 0 {
        let probe = pos - 1;
        if host.indicator_at(indicator, probe) {
            let start = host.indicator_start(indicator, probe).min(probe);
            let end = host.indicator_end(indicator, probe).clamp(probe + 1, pos);
            host.delete_range(start, end);
            removed += end - start;
            pos = start;
        } else {
            pos = host.indicator_start(indicator, probe).min(probe);
        }
    }

    removed
}

/// Delete the logged runs that still hold only spaces and tabs and are still followed by their
/// anchor byte, highest position first.
///
/// The anchor check catches a log gone stale behind the engine's back, e.g. when the host's undo
/// reverted the pass that recorded it.
pub(crate) fn remove_logged<H: HostEditor + ?Sized>(host: &mut H, log: &InsertionLog) -> usize {
    let mut ranges = log.ranges().to_vec();
    ranges.sort_by(|a, b| b.start.cmp(&a.start));

    let mut removed = 0usize;
    for range in ranges {
        if range.len == 0 || range.end() > host.len() {
            warn!(start = range.start, len = range.len, "logged padding out of bounds, skipped");
            continue;
        }
        let bytes = host.text_range(range.start, range.end());
        if bytes.len() != range.len || !bytes.iter().all(|&b| b == b' ' || b == b'\t') {
            warn!(start = range.start, len = range.len, "logged padding was edited, skipped");
            continue;
        }
        if host.byte_at(range.end()) != range.anchor {
            warn!(start = range.start, len = range.len, "logged padding lost its anchor, skipped");
            continue;
        }
        host.delete_range(range.start, range.end());
        removed += range.len;
    }

    removed
}

/// Collect per-column integer-digit statistics over `lines`.
pub(crate) fn scan_numeric_columns<H: HostEditor + ?Sized>(
    host: &H,
    model: &ColumnModelView<'_>,
    lines: RangeInclusive<usize>,
) -> Vec<NumericColumn> {
    let mut columns: Vec<NumericColumn> = Vec::new();

    for line in lines {
        let line_start = host.line_start(line);
        for (column, span) in model.fields(line).iter().enumerate() {
            let field = host.text_range(line_start + span.start, line_start + span.end);
            let token = parse_numeric(trim_field(&field).1);
            if !token.ok {
                continue;
            }
            if columns.len() <= column {
                columns.resize(column + 1, NumericColumn::default());
            }
            let stats = &mut columns[column];
            stats.max_int_digits = stats.max_int_digits.max(token.int_digits);
            stats.has_decimal |= token.has_decimal;
            stats.numeric_fields += 1;
        }
    }

    columns
}

/// Leading spaces a number needs so its integer part right-aligns within the column.
///
/// One separating space, plus one per missing integer digit, minus one for an explicit sign so
/// the sign hangs to the left of the digits.
pub fn needed_leading_spaces(
    column_max_int_digits: usize,
    int_digits: usize,
    has_sign: bool,
) -> usize {
    let needed = 1 + column_max_int_digits.saturating_sub(int_digits);
    if has_sign { needed.saturating_sub(1) } else { needed }
}

/// Decimal-align every numeric field of `lines`.
///
/// Shortfalls are filled with marked spaces right before the number. Excess is only trimmed from
/// a marked run touching the number; unmarked (user) whitespace is never deleted.
pub(crate) fn apply_numeric_padding<H: HostEditor + ?Sized>(
    host: &mut H,
    model: &ColumnModelView<'_>,
    lines: RangeInclusive<usize>,
    indicator: IndicatorId,
    log: &mut InsertionLog,
) -> NumericAlignment {
    let columns = scan_numeric_columns(&*host, model, lines.clone());
    let mut inserted = 0usize;
    let mut removed = 0usize;

    for line in lines {
        let line_start = host.line_start(line);
        let mut delta = 0isize;

        for (column, span) in model.fields(line).iter().enumerate() {
            let Some(stats) = columns.get(column).filter(|c| c.numeric_fields > 0) else {
                continue;
            };
            let field_start = offset_by(line_start + span.start, delta);
            let field_end = offset_by(line_start + span.end, delta);
            let field = host.text_range(field_start, field_end);
            let (trim_offset, trimmed) = trim_field(&field);
            let token = parse_numeric(trimmed);
            if !token.ok {
                continue;
            }

            let token_in_field = trim_offset + token.start;
            let token_pos = field_start + token_in_field;
            let existing = field[..token_in_field]
                .iter()
                .rev()
                .take_while(|&&b| b == b' ')
                .count();
            let needed =
                needed_leading_spaces(stats.max_int_digits, token.int_digits, token.has_sign);

            if existing < needed {
                let count = needed - existing;
                host.insert_text(token_pos, &vec![b' '; count]);
                host.indicator_fill(token_pos, count);
                log.record_insertion(token_pos, count, host.byte_at(token_pos + count));
                trace!(line, column, pos = token_pos, count, "inserted numeric padding");
                delta += count as isize;
                inserted += count;
            } else if existing > needed
                && token_pos > 0
                && host.indicator_at(indicator, token_pos - 1)
            {
                let run_start = host
                    .indicator_start(indicator, token_pos - 1)
                    .max(token_pos - existing);
                let count = (existing - needed).min(token_pos - run_start);
                if count > 0 {
                    host.delete_range(token_pos - count, token_pos);
                    log.note_deletion(token_pos - count, token_pos);
                    trace!(line, column, pos = token_pos, count, "trimmed numeric padding");
                    delta -= count as isize;
                    removed += count;
                }
            }
        }
    }

    NumericAlignment {
        columns,
        inserted,
        removed,
    }
}

fn offset_by(pos: usize, delta: isize) -> usize {
    pos.checked_add_signed(delta).unwrap_or(0)
}
