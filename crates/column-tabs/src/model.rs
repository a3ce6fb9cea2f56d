//! Column model: per-line delimiter positions over a window of the document.
//!
//! The model is produced once per scan (usually by an external CSV parser, or by
//! [`ColumnModelView::scan`]) and is only ever read by the alignment engine. Lines are reached
//! through a single [`LineSource`] capability, so the layout code is the same for a small eager
//! vector and for a huge lazily-scanned range.

use std::borrow::Cow;
use std::ops::RangeInclusive;

use crate::error::ColumnTabsError;
use crate::host::HostEditor;

/// Immutable delimiter facts for one document line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLineInfo {
    /// Byte length of the line, excluding the terminator.
    pub line_length: usize,
    /// Byte offsets (within the line) of every delimiter occurrence, ascending.
    pub delimiter_offsets: Vec<usize>,
}

impl ColumnLineInfo {
    /// Create line info from its length and delimiter offsets.
    pub fn new(line_length: usize, delimiter_offsets: Vec<usize>) -> Self {
        Self {
            line_length,
            delimiter_offsets,
        }
    }

    /// Number of fields before delimiter collapsing.
    pub fn field_count(&self) -> usize {
        self.delimiter_offsets.len() + 1
    }
}

/// Byte span of one field inside a line, plus the delimiter run that follows it.
///
/// All offsets are relative to the line start. For the last field of a line,
/// `delimiter_end == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    /// Field start (inclusive).
    pub start: usize,
    /// Field end (exclusive); also the start of the following delimiter run.
    pub end: usize,
    /// End (exclusive) of the following delimiter run.
    pub delimiter_end: usize,
}

impl FieldSpan {
    /// Byte length of the delimiter run after this field.
    pub fn delimiter_len(&self) -> usize {
        self.delimiter_end - self.end
    }
}

/// Delimiter properties carried by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterInfo {
    /// The delimiter is a single `'\t'`.
    pub is_tab: bool,
    /// Fixed byte length of one delimiter occurrence.
    pub len: usize,
    /// Consecutive delimiter occurrences form one boundary.
    pub collapse: bool,
}

impl DelimiterInfo {
    /// Describe the literal delimiter `bytes`.
    pub fn for_bytes(bytes: &[u8], collapse: bool) -> Self {
        Self {
            is_tab: bytes == b"\t",
            len: bytes.len(),
            collapse,
        }
    }
}

/// A literal delimiter used by [`ColumnModelView::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterSpec {
    /// Delimiter bytes (e.g. `b","`).
    pub pattern: Vec<u8>,
    /// Collapse runs of consecutive delimiters into one boundary.
    pub collapse: bool,
}

impl DelimiterSpec {
    /// A delimiter without collapsing.
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
            collapse: false,
        }
    }

    /// Enable or disable collapsing of consecutive delimiters.
    pub fn with_collapse(mut self, collapse: bool) -> Self {
        self.collapse = collapse;
        self
    }

    /// Delimiter properties for a model built from this spec.
    pub fn info(&self) -> DelimiterInfo {
        DelimiterInfo::for_bytes(&self.pattern, self.collapse)
    }

    fn offsets_in(&self, line: &[u8]) -> Vec<usize> {
        let pattern = self.pattern.as_slice();
        let mut offsets = Vec::new();
        if pattern.is_empty() || line.len() < pattern.len() {
            return offsets;
        }
        let mut i = 0usize;
        while i + pattern.len() <= line.len() {
            if &line[i..i + pattern.len()] == pattern {
                offsets.push(i);
                i += pattern.len();
            } else {
                i += 1;
            }
        }
        offsets
    }
}

/// Random access to [`ColumnLineInfo`] by model index.
pub trait LineSource {
    /// Number of lines the source covers.
    fn len(&self) -> usize;

    /// Returns `true` if the source covers no lines.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Line info for model index `index`, or `None` past the end.
    fn line(&self, index: usize) -> Option<Cow<'_, ColumnLineInfo>>;
}

/// An eagerly materialized sequence of lines.
#[derive(Debug, Clone, Default)]
pub struct VecLineSource {
    lines: Vec<ColumnLineInfo>,
}

impl VecLineSource {
    /// Wrap an already parsed sequence.
    pub fn new(lines: Vec<ColumnLineInfo>) -> Self {
        Self { lines }
    }
}

impl LineSource for VecLineSource {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<Cow<'_, ColumnLineInfo>> {
        self.lines.get(index).map(Cow::Borrowed)
    }
}

/// A lazy accessor that produces line info on demand.
pub struct FnLineSource<F> {
    len: usize,
    accessor: F,
}

impl<F> FnLineSource<F>
where
    F: Fn(usize) -> Option<ColumnLineInfo>,
{
    /// A source of `len` lines answered by `accessor`.
    pub fn new(len: usize, accessor: F) -> Self {
        Self { len, accessor }
    }
}

impl<F> LineSource for FnLineSource<F>
where
    F: Fn(usize) -> Option<ColumnLineInfo>,
{
    fn len(&self) -> usize {
        self.len
    }

    fn line(&self, index: usize) -> Option<Cow<'_, ColumnLineInfo>> {
        if index >= self.len {
            return None;
        }
        (self.accessor)(index).map(Cow::Owned)
    }
}

/// A requested span of document lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRange {
    /// First document line.
    pub first: usize,
    /// Last document line (inclusive); `None` means through the end of the model.
    pub last: Option<usize>,
}

impl LineRange {
    /// Every line the model covers.
    pub const ALL: Self = Self {
        first: 0,
        last: None,
    };

    /// Lines `first..=last`.
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first,
            last: Some(last),
        }
    }

    /// Lines from `first` through the end of the model.
    pub fn from_line(first: usize) -> Self {
        Self { first, last: None }
    }
}

impl Default for LineRange {
    fn default() -> Self {
        Self::ALL
    }
}

/// A window of column facts over contiguous document lines.
pub struct ColumnModelView<'a> {
    doc_start_line: usize,
    source: Box<dyn LineSource + 'a>,
    delimiter: DelimiterInfo,
}

impl<'a> ColumnModelView<'a> {
    /// A model over any [`LineSource`] whose index 0 is document line `doc_start_line`.
    pub fn new(
        doc_start_line: usize,
        source: impl LineSource + 'a,
        delimiter: DelimiterInfo,
    ) -> Self {
        Self {
            doc_start_line,
            source: Box::new(source),
            delimiter,
        }
    }

    /// An eager model.
    pub fn from_lines(
        doc_start_line: usize,
        lines: Vec<ColumnLineInfo>,
        delimiter: DelimiterInfo,
    ) -> Self {
        Self::new(doc_start_line, VecLineSource::new(lines), delimiter)
    }

    /// A lazy model of `len` lines.
    pub fn from_fn<F>(
        doc_start_line: usize,
        len: usize,
        accessor: F,
        delimiter: DelimiterInfo,
    ) -> Self
    where
        F: Fn(usize) -> Option<ColumnLineInfo> + 'a,
    {
        Self::new(doc_start_line, FnLineSource::new(len, accessor), delimiter)
    }

    /// Build an eager model by searching host text for a literal delimiter.
    pub fn scan<H: HostEditor + ?Sized>(
        host: &H,
        spec: &DelimiterSpec,
        range: LineRange,
    ) -> Result<ColumnModelView<'static>, ColumnTabsError> {
        let line_count = host.line_count();
        let last_doc_line = line_count.saturating_sub(1);
        let last = range.last.unwrap_or(last_doc_line).min(last_doc_line);
        if line_count == 0 || range.first > last {
            return Err(ColumnTabsError::EmptyRange {
                first: range.first,
                last,
            });
        }

        let lines = (range.first..=last)
            .map(|line| {
                let start = host.line_start(line);
                let text = host.text_range(start, start + host.line_length(line));
                ColumnLineInfo::new(text.len(), spec.offsets_in(&text))
            })
            .collect();

        Ok(ColumnModelView::from_lines(range.first, lines, spec.info()))
    }

    /// Document line of model index 0.
    pub fn doc_start_line(&self) -> usize {
        self.doc_start_line
    }

    /// Number of lines in the model.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns `true` if the model has no usable lines.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Delimiter properties.
    pub fn delimiter(&self) -> DelimiterInfo {
        self.delimiter
    }

    /// Line info for a document line, if the model covers it.
    pub fn line_info(&self, doc_line: usize) -> Option<Cow<'_, ColumnLineInfo>> {
        let index = doc_line.checked_sub(self.doc_start_line)?;
        self.source.line(index)
    }

    /// Field spans of a document line, honoring delimiter collapsing.
    pub fn fields(&self, doc_line: usize) -> Vec<FieldSpan> {
        match self.line_info(doc_line) {
            Some(info) => field_spans(&info, self.delimiter.len, self.delimiter.collapse),
            None => Vec::new(),
        }
    }

    /// Largest field count over `lines`.
    pub fn max_columns(&self, lines: RangeInclusive<usize>) -> usize {
        lines.map(|line| self.fields(line).len()).max().unwrap_or(0)
    }

    /// Clamp `range` to the lines covered by both the model and the document.
    pub fn resolve_range(
        &self,
        range: LineRange,
        doc_line_count: usize,
    ) -> Result<RangeInclusive<usize>, ColumnTabsError> {
        if self.is_empty() {
            return Err(ColumnTabsError::EmptyModel);
        }

        let model_last = self.doc_start_line + self.len() - 1;
        let requested_last = range.last.unwrap_or(model_last);
        let first = range.first.max(self.doc_start_line);
        let last = requested_last
            .min(model_last)
            .min(doc_line_count.saturating_sub(1));

        if doc_line_count == 0 || first > last {
            return Err(ColumnTabsError::EmptyRange {
                first: range.first,
                last: requested_last,
            });
        }
        Ok(first..=last)
    }
}

impl std::fmt::Debug for ColumnModelView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnModelView")
            .field("doc_start_line", &self.doc_start_line)
            .field("len", &self.len())
            .field("delimiter", &self.delimiter)
            .finish()
    }
}

/// Split a line into field spans.
///
/// Offsets that fall inside the previous delimiter are clamped forward; with `collapse`, any
/// delimiter starting at or before the end of the previous one extends the same boundary.
pub fn field_spans(info: &ColumnLineInfo, delimiter_len: usize, collapse: bool) -> Vec<FieldSpan> {
    let line_len = info.line_length;
    let offsets = &info.delimiter_offsets;
    let mut spans = Vec::with_capacity(offsets.len() + 1);
    let mut start = 0usize;
    let mut i = 0usize;

    while i < offsets.len() {
        let end = offsets[i].clamp(start, line_len);
        let mut delimiter_end = (end + delimiter_len).min(line_len);
        i += 1;

        if collapse {
            while i < offsets.len() && offsets[i] <= delimiter_end {
                delimiter_end = delimiter_end.max((offsets[i] + delimiter_len).min(line_len));
                i += 1;
            }
        }

        spans.push(FieldSpan {
            start,
            end,
            delimiter_end,
        });
        start = delimiter_end;
    }

    spans.push(FieldSpan {
        start,
        end: line_len,
        delimiter_end: line_len,
    });
    spans
}
