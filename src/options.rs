use crate::align::DuplicatePolicy;

/// Default name of the appended provenance column.
pub const SOURCE_COLUMN: &str = "source_file";
/// Default name of the single sheet in the merged workbook.
pub const SHEET_LABEL: &str = "Unificado";

/// Selects which rendering of the reference header is written to the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Normalized comparison tokens (lower-case, accent-free).
    #[default]
    Normalized,
    /// Trimmed labels exactly as they appear in the first file.
    Original,
}

/// Tunables for a merge. `Default` yields the standard policy.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    /// Rows scanned for a labelled header (two or more non-empty cells).
    pub header_scan_rows: usize,
    /// Rows scanned when matching candidates against the reference header.
    pub fallback_scan_rows: usize,
    /// Share of reference tokens a candidate row must contain to be taken as
    /// the header by the fallback scan.
    pub fallback_match_ratio: f64,
    /// A file missing strictly more than this share of the reference columns
    /// is rejected.
    pub max_missing_ratio: f64,
    pub duplicate_policy: DuplicatePolicy,
    pub header_style: HeaderStyle,
    pub source_column: String,
    pub sheet_label: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            header_scan_rows: 8,
            fallback_scan_rows: 12,
            fallback_match_ratio: 0.4,
            max_missing_ratio: 0.5,
            duplicate_policy: DuplicatePolicy::default(),
            header_style: HeaderStyle::default(),
            source_column: SOURCE_COLUMN.to_string(),
            sheet_label: SHEET_LABEL.to_string(),
        }
    }
}
