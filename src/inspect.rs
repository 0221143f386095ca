use serde::Serialize;

use crate::detect::{DetectionMethod, HeaderRowDetector};
use crate::model::DecodedSheet;
use crate::normalize::NormalizedHeader;
use crate::options::MergeOptions;

/// Preview of a decoded file, produced without merging anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSummary {
    pub file: String,
    pub sheet_name: String,
    pub header_row: usize,
    pub detection: DetectionMethod,
    /// Header labels as written in the file.
    pub headers: Vec<String>,
    /// Normalized comparison tokens for `headers`.
    pub tokens: Vec<String>,
    /// Total rows in the sheet, header and padding included.
    pub row_count: usize,
}

/// Summarises each sheet the way a merge would see it.
///
/// The first sheet's header guides detection in the others, mirroring the
/// merge itself.
pub fn inspect_sheets(sheets: &[DecodedSheet], options: &MergeOptions) -> Vec<SheetSummary> {
    let detector = HeaderRowDetector::from_options(options);
    let mut reference: Option<NormalizedHeader> = None;
    let mut summaries = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        let detection = detector.detect(&sheet.sheet, reference.as_ref());
        let header = sheet
            .sheet
            .row(detection.row)
            .map(|row| NormalizedHeader::from_row(row))
            .unwrap_or_default();

        summaries.push(SheetSummary {
            file: sheet.file.clone(),
            sheet_name: sheet.sheet_name.clone(),
            header_row: detection.row,
            detection: detection.method,
            headers: header.labels().to_vec(),
            tokens: header.tokens().to_vec(),
            row_count: sheet.sheet.rows().len(),
        });

        if reference.is_none() && !header.is_empty() {
            reference = Some(header);
        }
    }

    summaries
}
