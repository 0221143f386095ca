//! Workbook decoding and encoding.
//!
//! The merge engine only talks to the [`WorkbookCodec`] trait; [`ExcelCodec`]
//! is the calamine/rust_xlsxwriter backed implementation used by the CLI.

pub mod excel_read;
pub mod excel_write;

use crate::error::Result;
use crate::model::{DecodedSheet, UnifiedTable};

/// Reads the first sheet of a workbook and writes merged tables.
pub trait WorkbookCodec {
    /// Decodes the first sheet of the workbook named `name`.
    ///
    /// Failures are reported as [`MergeError::Decode`](crate::MergeError::Decode)
    /// carrying `name`.
    fn decode(&self, name: &str, bytes: &[u8]) -> Result<DecodedSheet>;

    /// Encodes `table` as a single-sheet workbook.
    fn encode(&self, table: &UnifiedTable, sheet_label: &str) -> Result<Vec<u8>>;
}

/// Spreadsheet codec backed by calamine for reading and rust_xlsxwriter for
/// writing `.xlsx` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelCodec;

impl WorkbookCodec for ExcelCodec {
    fn decode(&self, name: &str, bytes: &[u8]) -> Result<DecodedSheet> {
        excel_read::read_first_sheet(name, bytes)
    }

    fn encode(&self, table: &UnifiedTable, sheet_label: &str) -> Result<Vec<u8>> {
        excel_write::write_table(table, sheet_label)
    }
}
