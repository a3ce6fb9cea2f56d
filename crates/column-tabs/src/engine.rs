//! The column-alignment root object.
//!
//! [`ColumnTabs`] owns everything that must outlive a single call: configuration, tab-stop
//! ownership for the attached document, and the per-document padding store. Hosts keep one
//! instance for the lifetime of the plugin and pass their editor binding into each operation.
//!
//! Per document the two alignment axes are independent:
//!
//! ```text
//! Clean --insert_padding--> Padded --remove_padding--> Clean
//! Clean --apply_tab_stops--> VisuallyAligned --release_tab_stops--> Clean
//! ```
//!
//! and `Padded + VisuallyAligned` is a normal combined state.

use tracing::debug;

use crate::config::{ColumnTabsConfig, PaddingOptions};
use crate::error::ColumnTabsError;
use crate::host::{DocumentId, HostEditor, UndoScope, prepare_indicator};
use crate::layout::LayoutParams;
use crate::model::{ColumnModelView, DelimiterSpec, LineRange};
use crate::padding::{self, NumericAlignment, PaddingStore};
use crate::tabstops::TabstopOwnership;

/// Result of the compound [`ColumnTabs::align_columns`] command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignReport {
    /// Decimal alignment outcome, when numeric mode was requested.
    pub numeric: Option<NumericAlignment>,
    /// Tabs inserted before delimiters.
    pub tabs_inserted: usize,
}

/// Column alignment engine state.
#[derive(Debug, Clone, Default)]
pub struct ColumnTabs {
    config: ColumnTabsConfig,
    tabstops: TabstopOwnership,
    padding: PaddingStore,
}

impl ColumnTabs {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with `config`.
    pub fn with_config(config: ColumnTabsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &ColumnTabsConfig {
        &self.config
    }

    /// Tab-stop ownership for the attached document.
    pub fn tabstops(&self) -> &TabstopOwnership {
        &self.tabstops
    }

    /// Per-document padding state.
    pub fn padding(&self) -> &PaddingStore {
        &self.padding
    }

    fn layout_params<H: HostEditor + ?Sized>(&self, host: &H, gap_px: i32) -> LayoutParams {
        LayoutParams::for_host(host, gap_px, self.config.min_advance_floor_px)
    }

    fn gap_px_for_cells<H: HostEditor + ?Sized>(host: &H, gap_cells: u32) -> i32 {
        host.space_width()
            .saturating_mul(i32::try_from(gap_cells).unwrap_or(i32::MAX))
    }

    /// Set engine-owned tab stops on `range` with a gap of `gap_px` pixels.
    ///
    /// Returns the stops written (empty when the range has no delimiters).
    pub fn apply_tab_stops<H: HostEditor + ?Sized>(
        &mut self,
        host: &mut H,
        model: &ColumnModelView<'_>,
        range: LineRange,
        gap_px: i32,
    ) -> Result<Vec<i32>, ColumnTabsError> {
        let lines = model.resolve_range(range, host.line_count())?;
        let params = self.layout_params(&*host, gap_px);
        Ok(self.tabstops.apply(host, model, lines, params).stops)
    }

    /// [`apply_tab_stops`](Self::apply_tab_stops) with the gap given in space widths.
    pub fn apply_tab_stops_cells<H: HostEditor + ?Sized>(
        &mut self,
        host: &mut H,
        model: &ColumnModelView<'_>,
        range: LineRange,
        gap_cells: u32,
    ) -> Result<Vec<i32>, ColumnTabsError> {
        let gap_px = Self::gap_px_for_cells(&*host, gap_cells);
        self.apply_tab_stops(host, model, range, gap_px)
    }

    /// Drop engine ownership of every line, optionally restoring the user's own stops.
    ///
    /// Returns the number of lines released.
    pub fn release_tab_stops<H: HostEditor + ?Sized>(
        &mut self,
        host: &mut H,
        restore_manual: bool,
    ) -> usize {
        self.tabstops.release(host, restore_manual)
    }

    /// Clear tab stops on every line, owned or not.
    pub fn clear_all_tab_stops<H: HostEditor + ?Sized>(&mut self, host: &mut H) {
        self.tabstops.clear_all(host);
    }

    /// Forget tab-stop ownership without touching the editor.
    pub fn reset_visual_state(&mut self) {
        self.tabstops.reset();
    }

    /// Whether any line currently carries engine-owned stops.
    pub fn has_owned_lines(&self) -> bool {
        self.tabstops.has_any_owned()
    }

    /// Align `options.range` with tab stops plus marked tab padding before each delimiter.
    ///
    /// Returns the number of tabs inserted. Nothing is inserted when the range has no
    /// delimiters, or when the delimiter is a tab and `collapse_on_tab_delimiter` is set.
    pub fn insert_padding<H: HostEditor + ?Sized>(
        &mut self,
        host: &mut H,
        model: &ColumnModelView<'_>,
        options: PaddingOptions,
    ) -> Result<usize, ColumnTabsError> {
        let lines = model.resolve_range(options.range, host.line_count())?;
        let gap_px = Self::gap_px_for_cells(&*host, options.gap_cells);
        let params = self.layout_params(&*host, gap_px);

        let layout = self.tabstops.apply(host, model, lines.clone(), params);
        if layout.max_columns < 2 {
            return Ok(0);
        }
        if options.collapse_on_tab_delimiter && model.delimiter().is_tab {
            debug!(?lines, "tab delimiter, stops only");
            return Ok(0);
        }

        let doc = host.document_id();
        let indicator = self.config.indicator;
        let inserted = {
            let mut scope = UndoScope::new(host);
            prepare_indicator(&mut *scope, indicator);
            let log = self.padding.log_mut(doc);
            padding::insert_tab_padding(&mut *scope, model, lines.clone(), log)
        };

        if inserted > 0 {
            self.padding.set_has_padding(doc, true);
        }
        debug!(?lines, inserted, "inserted tab padding");
        Ok(inserted)
    }

    /// Remove every engine-inserted padding byte from the attached document.
    ///
    /// Marked runs are removed first; the insertion log is consulted only when no marked run
    /// exists. Returns `false` when there was nothing to remove, which is not an error.
    pub fn remove_padding<H: HostEditor + ?Sized>(&mut self, host: &mut H) -> bool {
        let doc = host.document_id();
        let indicator = self.config.indicator;

        let (removed, via_log) = {
            let mut scope = UndoScope::new(host);
            let removed = padding::remove_marked(&mut *scope, indicator);
            if removed > 0 {
                (removed, false)
            } else {
                match self.padding.log(doc) {
                    Some(log) if !log.is_empty() => {
                        (padding::remove_logged(&mut *scope, log), true)
                    }
                    _ => (0, false),
                }
            }
        };

        if removed > 0 {
            self.padding.mark_clean(doc);
        }
        debug!(removed, via_log, "removed padding");
        removed > 0
    }

    /// Decimal-align numeric fields of `range` with marked spaces.
    pub fn apply_numeric_padding<H: HostEditor + ?Sized>(
        &mut self,
        host: &mut H,
        model: &ColumnModelView<'_>,
        range: LineRange,
    ) -> Result<NumericAlignment, ColumnTabsError> {
        let lines = model.resolve_range(range, host.line_count())?;
        let doc = host.document_id();
        let indicator = self.config.indicator;

        let alignment = {
            let mut scope = UndoScope::new(host);
            prepare_indicator(&mut *scope, indicator);
            padding::apply_numeric_padding(
                &mut *scope,
                model,
                lines.clone(),
                indicator,
                self.padding.log_mut(doc),
            )
        };

        if alignment.inserted > 0 {
            self.padding.set_has_padding(doc, true);
        }
        debug!(
            ?lines,
            inserted = alignment.inserted,
            removed = alignment.removed,
            "applied numeric padding"
        );
        Ok(alignment)
    }

    /// Align columns as one user-visible action: optional decimal alignment, then tab padding.
    ///
    /// The model is re-scanned from the host between the two passes so the second pass sees the
    /// spaces inserted by the first. Everything lands in one undo group.
    pub fn align_columns<H: HostEditor + ?Sized>(
        &mut self,
        host: &mut H,
        delimiter: &DelimiterSpec,
        options: PaddingOptions,
        numeric: bool,
    ) -> Result<AlignReport, ColumnTabsError> {
        let mut scope = UndoScope::new(host);

        let numeric = if numeric {
            let model = ColumnModelView::scan(&*scope, delimiter, options.range)?;
            Some(self.apply_numeric_padding(&mut *scope, &model, options.range)?)
        } else {
            None
        };

        let model = ColumnModelView::scan(&*scope, delimiter, options.range)?;
        let tabs_inserted = self.insert_padding(&mut *scope, &model, options)?;

        Ok(AlignReport {
            numeric,
            tabs_inserted,
        })
    }

    /// Whether `doc` carries engine-inserted padding.
    pub fn has_padding(&self, doc: DocumentId) -> bool {
        self.padding.has_padding(doc)
    }

    /// Whether the attached document carries engine-inserted padding.
    pub fn has_padding_current<H: HostEditor + ?Sized>(&self, host: &H) -> bool {
        self.padding.has_padding(host.document_id())
    }

    /// Override the padding-presence flag of `doc`.
    pub fn set_padding_flag(&mut self, doc: DocumentId, has_pads: bool) {
        self.padding.set_has_padding(doc, has_pads);
    }

    /// Release tab stops (restoring manual ones) and reset visual tracking.
    ///
    /// Meant for document-switch events; padding state is left alone.
    pub fn cleanup_visuals<H: HostEditor + ?Sized>(&mut self, host: &mut H) {
        self.tabstops.release(host, true);
        self.tabstops.reset();
    }

    /// [`cleanup_visuals`](Self::cleanup_visuals) plus destructive padding removal.
    ///
    /// Returns whether any padding was removed.
    pub fn cleanup_all_for_doc<H: HostEditor + ?Sized>(&mut self, host: &mut H) -> bool {
        self.cleanup_visuals(host);
        self.remove_padding(host)
    }

    /// The host attached a different document: line-indexed tracking no longer applies.
    pub fn on_document_switched(&mut self) {
        self.tabstops.reset();
    }
}
