use serde::Serialize;

use crate::detect::DetectionMethod;

/// Diagnostics gathered for one input file during a successful merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub sheet_name: String,
    /// Zero-based index of the detected header row.
    pub header_row: usize,
    pub detection: DetectionMethod,
    /// Reference tokens left empty for this file.
    pub missing: Vec<String>,
    /// Columns dropped because the reference does not know them.
    pub extra: Vec<String>,
    /// Tokens carried by more than one column of the file.
    pub duplicates: Vec<String>,
    pub rows_merged: usize,
    pub blank_rows_skipped: usize,
}

impl FileReport {
    /// Human-readable, non-fatal findings for this file.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        match self.detection {
            DetectionMethod::Labelled => {}
            DetectionMethod::ReferenceMatch => warnings.push(format!(
                "'{}': header located at row {} by matching the reference columns",
                self.file,
                self.header_row + 1
            )),
            DetectionMethod::Default => warnings.push(format!(
                "'{}': no header row detected, assuming the first row",
                self.file
            )),
        }
        if !self.missing.is_empty() {
            warnings.push(format!(
                "'{}': missing columns left empty: {}",
                self.file,
                self.missing.join(", ")
            ));
        }
        if !self.extra.is_empty() {
            warnings.push(format!(
                "'{}': extra columns dropped: {}",
                self.file,
                self.extra.join(", ")
            ));
        }
        if !self.duplicates.is_empty() {
            warnings.push(format!(
                "'{}': duplicated columns resolved by policy: {}",
                self.file,
                self.duplicates.join(", ")
            ));
        }
        warnings
    }
}

/// Summary of a merge, attached to every successful result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    pub reference_labels: Vec<String>,
    pub reference_tokens: Vec<String>,
    pub files: Vec<FileReport>,
    pub total_rows: usize,
    pub warnings: Vec<String>,
}

impl MergeReport {
    pub(crate) fn push_file(&mut self, file: FileReport) {
        self.total_rows += file.rows_merged;
        self.warnings.extend(file.warnings());
        self.files.push(file);
    }
}
