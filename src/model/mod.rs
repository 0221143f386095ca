/// Represents a single spreadsheet cell value.
///
/// Values are carried through the merge untouched; the only interpretation
/// applied to them is rendering header cells as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Absent or empty cell.
    #[default]
    Empty,
    /// Plain string value.
    Text(String),
    /// Numeric value. Integer cells are widened to `f64` by the reader.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Date or time stored as a spreadsheet serial number.
    DateTime(f64),
}

impl Cell {
    /// Returns `true` for empty cells and text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as display text.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) | Cell::DateTime(value) => format_number(*value),
            Cell::Bool(value) => value.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A positional sequence of cells.
pub type Row = Vec<Cell>;

/// Read-only snapshot of the first sheet of a workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Row>,
}

impl Sheet {
    /// Creates a sheet from the provided rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

/// Raw input handed to the merge: a file identifier and its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFile {
    /// Identifier used in diagnostics and in the provenance column.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// First sheet of an input file after decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSheet {
    /// Identifier of the file the sheet was read from.
    pub file: String,
    /// Name of the sheet inside the workbook.
    pub sheet_name: String,
    pub sheet: Sheet,
}

impl DecodedSheet {
    pub fn new(file: impl Into<String>, sheet_name: impl Into<String>, sheet: Sheet) -> Self {
        Self {
            file: file.into(),
            sheet_name: sheet_name.into(),
            sheet,
        }
    }
}

/// The merged output: one header row followed by the reconciled data rows.
///
/// Every row holds exactly `columns.len()` cells, the last one being the
/// provenance cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl UnifiedTable {
    /// Returns the table as plain rows with the header first, the shape the
    /// workbook writer expects.
    pub fn to_rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.columns.iter().map(|column| Cell::from(column.as_str())).collect());
        rows.extend(self.rows.iter().cloned());
        rows
    }
}
