//! Core library for the sheet-unify command line application.
//!
//! The library merges spreadsheets that share a schema in name only: header
//! rows sit at different positions, columns are reordered, labels differ in
//! accents or spacing, and some columns are missing or extra. Header text is
//! canonicalised in [`normalize`], header rows are located by [`detect`],
//! columns are matched by name in [`align`], rows are projected in
//! [`reconcile`], and [`merge`] drives the whole pipeline. Workbook IO lives
//! under [`io`] behind the [`WorkbookCodec`] trait.

pub mod align;
pub mod detect;
pub mod error;
pub mod inspect;
pub mod io;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod options;
pub mod reconcile;
pub mod report;

pub use error::{MergeError, Result};
pub use io::{ExcelCodec, WorkbookCodec};
pub use merge::{MergeOutcome, MergedWorkbook, merge_sheets, merge_workbooks};
pub use options::MergeOptions;
