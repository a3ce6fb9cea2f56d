//! Pixel tab-stop layout for delimited lines.
//!
//! Given a line range and a [`ColumnModelView`], computes one pixel stop per inter-column
//! boundary so that every column fits its widest cell plus a fixed left gap and a small safety
//! margin. The computation is read-only: nothing is written to the host.
//!
//! The algorithm runs in passes:
//!
//! 1. **Measure** every cell (tabs stripped) and every visible delimiter; record each line's
//!    natural end X when its own fields are laid out end to end.
//! 2. **Prefer**: `stop[c] = x + max_cell[c] + gap + min_advance`, then
//!    `x = stop[c] + max_delim[c]`.
//! 3. **Clamp**: lines that end before a boundary contribute `min(natural_end, preferred)`.
//! 4. **Final**: `max(preferred, clamp)`, forced non-decreasing.

use std::ops::RangeInclusive;

use tracing::trace;

use crate::host::HostEditor;
use crate::model::{ColumnModelView, FieldSpan};

/// Spacing rules for a layout pass, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Gap placed between a column's widest cell and its stop.
    pub gap_before_px: i32,
    /// Extra advance so a typed tab never lands exactly on a stop.
    pub min_advance_px: i32,
}

impl LayoutParams {
    /// Parameters for `gap_px`, with the minimum advance derived from the host's space width.
    pub fn for_host<H: HostEditor + ?Sized>(
        host: &H,
        gap_px: i32,
        min_advance_floor_px: i32,
    ) -> Self {
        Self {
            gap_before_px: gap_px.max(0),
            min_advance_px: min_advance_px(host.space_width(), min_advance_floor_px),
        }
    }
}

/// Half a space glyph, but never less than `floor_px`.
pub fn min_advance_px(space_width_px: i32, floor_px: i32) -> i32 {
    (space_width_px / 2).max(floor_px)
}

/// Result of a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Largest field count over the range.
    pub max_columns: usize,
    /// Widest cell per column.
    pub max_cell_px: Vec<i32>,
    /// Widest visible delimiter per boundary.
    pub max_delimiter_px: Vec<i32>,
    /// Preferred stop per boundary before clamping.
    pub preferred: Vec<i32>,
    /// Natural end X of each line in the range, in range order.
    pub natural_end_px: Vec<i32>,
    /// Final, non-decreasing stops (`max_columns - 1` of them, or none).
    pub stops: Vec<i32>,
}

impl ColumnLayout {
    /// The clamp a line contributes to `boundary`, if it ends at or before that boundary.
    ///
    /// `line_index` is the position of the line inside the laid-out range.
    pub fn clamp_for_line(
        &self,
        line_index: usize,
        field_count: usize,
        boundary: usize,
    ) -> Option<i32> {
        let natural_end = *self.natural_end_px.get(line_index)?;
        let preferred = *self.preferred.get(boundary)?;
        (boundary + 1 >= field_count).then(|| natural_end.min(preferred))
    }
}

struct LineMeasure {
    field_count: usize,
    natural_end: i32,
}

/// Compute the layout of `lines` (document lines covered by `model`).
pub fn compute_layout<H: HostEditor + ?Sized>(
    host: &H,
    model: &ColumnModelView<'_>,
    lines: RangeInclusive<usize>,
    params: LayoutParams,
) -> ColumnLayout {
    let max_columns = model.max_columns(lines.clone());
    if max_columns < 2 {
        return ColumnLayout {
            max_columns,
            ..ColumnLayout::default()
        };
    }

    let boundaries = max_columns - 1;
    let delimiter = model.delimiter();
    let measure_delimiters = !delimiter.is_tab && delimiter.len > 0;
    let advance = params.gap_before_px.saturating_add(params.min_advance_px);

    let mut max_cell_px = vec![0i32; max_columns];
    let mut max_delimiter_px = vec![0i32; boundaries];
    let mut measures = Vec::new();

    // Pass 1: measurement.
    for line in lines {
        let fields = model.fields(line);
        let line_start = host.line_start(line);
        let mut natural_end = 0i32;

        for (column, span) in fields.iter().enumerate() {
            let cell_px = measure_cell(host, line_start, span);
            max_cell_px[column] = max_cell_px[column].max(cell_px);
            natural_end = natural_end.saturating_add(cell_px);

            if column + 1 < fields.len() {
                let delimiter_px = if measure_delimiters && span.delimiter_len() > 0 {
                    host.text_width(&host.text_range(
                        line_start + span.end,
                        line_start + span.delimiter_end,
                    ))
                } else {
                    0
                };
                max_delimiter_px[column] = max_delimiter_px[column].max(delimiter_px);
                natural_end = natural_end
                    .saturating_add(advance)
                    .saturating_add(delimiter_px);
            }
        }

        measures.push(LineMeasure {
            field_count: fields.len(),
            natural_end,
        });
    }

    // Pass 2: preferred stops.
    let mut preferred = Vec::with_capacity(boundaries);
    let mut x = 0i32;
    for column in 0..boundaries {
        let stop = x
            .saturating_add(max_cell_px[column])
            .saturating_add(advance);
        preferred.push(stop);
        x = stop.saturating_add(max_delimiter_px[column]);
    }

    // Pass 3: end-of-line clamp.
    let mut clamp = vec![0i32; boundaries];
    for measure in &measures {
        let last_field = measure.field_count.saturating_sub(1);
        for boundary in last_field..boundaries {
            clamp[boundary] = clamp[boundary].max(measure.natural_end.min(preferred[boundary]));
        }
    }

    let mut stops = Vec::with_capacity(boundaries);
    let mut previous = 0i32;
    for boundary in 0..boundaries {
        let stop = preferred[boundary].max(clamp[boundary]).max(previous);
        stops.push(stop);
        previous = stop;
    }

    trace!(
        lines = measures.len(),
        max_columns,
        ?stops,
        "computed column layout"
    );

    ColumnLayout {
        max_columns,
        max_cell_px,
        max_delimiter_px,
        preferred,
        natural_end_px: measures.iter().map(|m| m.natural_end).collect(),
        stops,
    }
}

/// Width of a cell with its tab characters removed.
fn measure_cell<H: HostEditor + ?Sized>(host: &H, line_start: usize, span: &FieldSpan) -> i32 {
    if span.end <= span.start {
        return 0;
    }
    let mut text = host.text_range(line_start + span.start, line_start + span.end);
    text.retain(|&b| b != b'\t');
    if text.is_empty() {
        0
    } else {
        host.text_width(&text)
    }
}
