use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Cell, Sheet};
use crate::normalize::{NormalizedHeader, normalize_cell};
use crate::options::MergeOptions;

/// How the header row of a sheet was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// First row with at least two labelled cells.
    Labelled,
    /// First row sharing enough tokens with the reference header.
    ReferenceMatch,
    /// Nothing matched; row 0 is assumed.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDetection {
    pub row: usize,
    pub method: DetectionMethod,
}

/// Locates the header row of a sheet.
///
/// Real-world exports often carry title banners or padding rows above the
/// header, so the detector first looks for a row with two or more labelled
/// cells and then falls back to matching rows against the reference header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderRowDetector {
    scan_rows: usize,
    fallback_rows: usize,
    match_ratio: f64,
}

impl Default for HeaderRowDetector {
    fn default() -> Self {
        Self::from_options(&MergeOptions::default())
    }
}

impl HeaderRowDetector {
    pub fn from_options(options: &MergeOptions) -> Self {
        Self {
            scan_rows: options.header_scan_rows,
            fallback_rows: options.fallback_scan_rows,
            match_ratio: options.fallback_match_ratio,
        }
    }

    /// Returns the header row of `sheet`. Never fails; defaults to row 0.
    pub fn detect(&self, sheet: &Sheet, reference: Option<&NormalizedHeader>) -> HeaderDetection {
        if let Some(row) = self.first_labelled_row(sheet) {
            return HeaderDetection {
                row,
                method: DetectionMethod::Labelled,
            };
        }

        let matched = reference.and_then(|reference| self.first_matching_row(sheet, reference));
        if let Some(row) = matched {
            return HeaderDetection {
                row,
                method: DetectionMethod::ReferenceMatch,
            };
        }

        HeaderDetection {
            row: 0,
            method: DetectionMethod::Default,
        }
    }

    fn first_labelled_row(&self, sheet: &Sheet) -> Option<usize> {
        sheet
            .rows()
            .iter()
            .take(self.scan_rows)
            .position(|row| row.iter().filter(|cell| !cell.is_blank()).count() >= 2)
    }

    fn first_matching_row(&self, sheet: &Sheet, reference: &NormalizedHeader) -> Option<usize> {
        let tokens = reference.token_set();
        let required = self.required_matches(reference.len());

        sheet
            .rows()
            .iter()
            .take(self.fallback_rows)
            .position(|row| count_matches(row, &tokens) >= required)
    }

    fn required_matches(&self, reference_len: usize) -> usize {
        // Epsilon absorbs f64 rounding of the product.
        let scaled = (self.match_ratio * reference_len as f64 + 1e-9).floor();
        (scaled as usize).max(1)
    }
}

fn count_matches(row: &[Cell], tokens: &HashSet<&str>) -> usize {
    row.iter()
        .map(normalize_cell)
        .filter(|token| !token.is_empty() && tokens.contains(token.as_str()))
        .count()
}

/// Detects the header row with the default scan limits.
pub fn detect_header_row(sheet: &Sheet, reference: Option<&NormalizedHeader>) -> usize {
    HeaderRowDetector::default().detect(sheet, reference).row
}
