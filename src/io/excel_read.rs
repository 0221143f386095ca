use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{DataType, Ods, Range, Reader, Xls, Xlsb, Xlsx};

use crate::error::{MergeError, Result};
use crate::model::{Cell, DecodedSheet, Row, Sheet};

/// Container formats understood by the reader, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    Xlsx,
    Xls,
    Xlsb,
    Ods,
}

impl WorkbookKind {
    /// Guesses the container from the extension of `name`, falling back to
    /// `.xlsx` for unknown or missing extensions.
    pub fn from_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xls" | "xla" => WorkbookKind::Xls,
            "xlsb" => WorkbookKind::Xlsb,
            "ods" => WorkbookKind::Ods,
            _ => WorkbookKind::Xlsx,
        }
    }
}

/// Reads the first sheet of the workbook held in `bytes`.
pub fn read_first_sheet(name: &str, bytes: &[u8]) -> Result<DecodedSheet> {
    let cursor = Cursor::new(bytes);
    let read = match WorkbookKind::from_name(name) {
        WorkbookKind::Xlsx => first_range::<_, Xlsx<_>>(cursor),
        WorkbookKind::Xls => first_range::<_, Xls<_>>(cursor),
        WorkbookKind::Xlsb => first_range::<_, Xlsb<_>>(cursor),
        WorkbookKind::Ods => first_range::<_, Ods<_>>(cursor),
    };

    let (sheet_name, range) = read.map_err(|message| MergeError::Decode {
        file: name.to_string(),
        message,
    })?;

    Ok(DecodedSheet::new(name, sheet_name, range_to_sheet(&range)))
}

fn first_range<RS, R>(reader: RS) -> std::result::Result<(String, Range<DataType>), String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let mut workbook = R::new(reader).map_err(|error| error.to_string())?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "workbook has no sheets".to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| format!("missing sheet '{sheet_name}'"))?
        .map_err(|error| error.to_string())?;
    Ok((sheet_name, range))
}

fn range_to_sheet(range: &Range<DataType>) -> Sheet {
    let rows: Vec<Row> = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Sheet::new(rows)
}

fn cell_from_data(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::DateTime(value) => Cell::DateTime(*value),
        DataType::Duration(value) => Cell::Number(*value),
        other => Cell::Text(other.to_string()),
    }
}
