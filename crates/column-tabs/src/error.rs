//! Error type shared by every column operation.

use thiserror::Error;

/// Errors returned by column-alignment operations.
///
/// Every variant is raised before any text or tab stop is touched, so an `Err` never leaves a
/// half-aligned document behind. "Nothing to do" outcomes are reported through `Ok` values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnTabsError {
    /// The column model has no usable line source.
    #[error("column model has no lines")]
    EmptyModel,
    /// The requested line range is inverted or empty after clamping.
    #[error("empty line range: {first}..={last}")]
    EmptyRange {
        /// First requested document line.
        first: usize,
        /// Last requested document line (after resolving "through the end").
        last: usize,
    },
}
