#![warn(missing_docs)]
//! Column Tabs - Headless Column Alignment Engine
//!
//! # Overview
//!
//! `column-tabs` lines up the columns of delimited text (CSV, TSV, pipe tables...) inside a host
//! editor component it does not own. Given a per-line delimiter model it can either:
//!
//! - set **pixel tab stops** per line, leaving the text untouched, or
//! - insert **padding** (tabs before delimiters, spaces before numbers for decimal alignment),
//!   marked with an invisible indicator so it can later be removed exactly.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ColumnTabs (engine state, public API)      │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Tab-stop ownership  │  Padding + log       │  ← Mutation
//! ├──────────────────────┴──────────────────────┤
//! │  Layout Engine (pixel stops)                │  ← Computation
//! ├─────────────────────────────────────────────┤
//! │  Column Model  │  Numeric tokens            │  ← Input
//! ├─────────────────────────────────────────────┤
//! │  HostEditor (external editor binding)       │  ← Host
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use column_tabs::{
//!     ColumnModelView, ColumnTabs, DelimiterSpec, LineRange, MemoryEditor, PaddingOptions,
//! };
//!
//! let mut editor = MemoryEditor::new("a,bb,ccc\ndddd,e,f");
//! let mut engine = ColumnTabs::new();
//!
//! let model = ColumnModelView::scan(&editor, &DelimiterSpec::new(","), LineRange::ALL).unwrap();
//! let inserted = engine.insert_padding(&mut editor, &model, PaddingOptions::default()).unwrap();
//! assert_eq!(inserted, 4);
//! assert_eq!(editor.text(), "a\t,bb\t,ccc\ndddd\t,e\t,f");
//!
//! assert!(engine.remove_padding(&mut editor));
//! assert_eq!(editor.text(), "a,bb,ccc\ndddd,e,f");
//! ```
//!
//! # Module Description
//!
//! - [`host`] - Host editor interface and RAII undo/redraw scopes
//! - [`model`] - Column model, line sources and the literal-delimiter scanner
//! - [`numeric`] - Numeric token scanner for decimal alignment
//! - [`layout`] - Two-pass pixel tab-stop layout
//! - [`tabstops`] - Engine-owned tab stops with manual-stop restore
//! - [`padding`] - Marked padding insertion/removal and the fallback insertion log
//! - [`engine`] - [`ColumnTabs`], the state root tying it all together
//! - [`memory`] - In-memory [`HostEditor`] for tests and embedding
//!
//! # Threading
//!
//! Every operation is synchronous and runs to completion on the calling thread. State is not
//! synchronized; hosts drive the engine from their UI thread.

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod intervals;
pub mod layout;
pub mod memory;
pub mod model;
pub mod numeric;
pub mod padding;
pub mod tabstops;

pub use config::{ColumnTabsConfig, PaddingOptions};
pub use engine::{AlignReport, ColumnTabs};
pub use error::ColumnTabsError;
pub use host::{DocumentId, HostEditor, IndicatorId, RedrawSuspended, UndoScope};
pub use layout::{ColumnLayout, LayoutParams, compute_layout};
pub use memory::MemoryEditor;
pub use model::{
    ColumnLineInfo, ColumnModelView, DelimiterInfo, DelimiterSpec, FieldSpan, FnLineSource,
    LineRange, LineSource, VecLineSource,
};
pub use numeric::{NumericToken, parse_numeric};
pub use padding::{InsertionLog, NumericAlignment, NumericColumn, PadRange, PaddingStore};
pub use tabstops::TabstopOwnership;
