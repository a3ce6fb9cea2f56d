//! Engine configuration and per-call options.

use crate::host::IndicatorId;
use crate::model::LineRange;

/// Default left gap, in space widths, placed before every column.
pub const DEFAULT_GAP_CELLS: u32 = 2;

/// Smallest minimum-advance (in pixels) added after the widest cell of a column.
pub const DEFAULT_MIN_ADVANCE_FLOOR_PX: i32 = 2;

/// Long-lived engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColumnTabsConfig {
    /// Indicator used to mark inserted padding.
    pub indicator: IndicatorId,
    /// Gap (in space widths) used when a caller does not pass one.
    pub gap_cells: u32,
    /// Lower bound for the half-space minimum advance.
    pub min_advance_floor_px: i32,
}

impl Default for ColumnTabsConfig {
    fn default() -> Self {
        Self {
            indicator: IndicatorId::PADDING,
            gap_cells: DEFAULT_GAP_CELLS,
            min_advance_floor_px: DEFAULT_MIN_ADVANCE_FLOOR_PX,
        }
    }
}

/// Options for [`ColumnTabs::insert_padding`](crate::ColumnTabs::insert_padding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaddingOptions {
    /// Document lines to pad.
    pub range: LineRange,
    /// Left gap in space widths.
    pub gap_cells: u32,
    /// Skip text mutation entirely when the delimiter itself is a tab.
    ///
    /// A lone tab after content already lands on the computed stop.
    pub collapse_on_tab_delimiter: bool,
}

impl Default for PaddingOptions {
    fn default() -> Self {
        Self {
            range: LineRange::ALL,
            gap_cells: DEFAULT_GAP_CELLS,
            collapse_on_tab_delimiter: true,
        }
    }
}
