//! Merge orchestration.
//!
//! A merge runs in four phases: every input is decoded (in parallel), the
//! reference schema is taken from the first file, every file is validated
//! against it, and finally all data rows are projected into the unified
//! table. Any failure aborts the whole merge before output is produced.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::align::{Alignment, align};
use crate::detect::{HeaderDetection, HeaderRowDetector};
use crate::error::{MergeError, Result};
use crate::io::WorkbookCodec;
use crate::model::{DecodedSheet, InputFile, UnifiedTable};
use crate::normalize::NormalizedHeader;
use crate::options::{HeaderStyle, MergeOptions};
use crate::reconcile::RowReconciler;
use crate::report::{FileReport, MergeReport};

/// Result of merging already-decoded sheets.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: UnifiedTable,
    pub report: MergeReport,
}

/// Result of merging raw workbooks: the encoded output plus its report.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedWorkbook {
    pub bytes: Vec<u8>,
    pub report: MergeReport,
}

/// Decodes, merges and re-encodes the given workbooks.
#[instrument(level = "info", skip_all, fields(files = inputs.len()))]
pub fn merge_workbooks<C>(
    inputs: &[InputFile],
    codec: &C,
    options: &MergeOptions,
) -> Result<MergedWorkbook>
where
    C: WorkbookCodec + Sync,
{
    if inputs.is_empty() {
        return Err(MergeError::NoInput);
    }

    let sheets = decode_all(inputs, codec)?;
    let outcome = merge_sheets(&sheets, options)?;
    let bytes = codec.encode(&outcome.table, &options.sheet_label)?;
    debug!(byte_count = bytes.len(), "merged workbook encoded");

    Ok(MergedWorkbook {
        bytes,
        report: outcome.report,
    })
}

/// Decodes every input concurrently.
///
/// All decodes run to completion before any result is inspected; the sheets
/// come back in input order and the first failure in input order wins.
#[instrument(level = "debug", skip_all, fields(files = inputs.len()))]
pub fn decode_all<C>(inputs: &[InputFile], codec: &C) -> Result<Vec<DecodedSheet>>
where
    C: WorkbookCodec + Sync,
{
    if inputs.is_empty() {
        return Err(MergeError::NoInput);
    }

    let decoded: Vec<Result<DecodedSheet>> = inputs
        .par_iter()
        .map(|input| codec.decode(&input.name, &input.bytes))
        .collect();

    let sheets = decoded.into_iter().collect::<Result<Vec<_>>>()?;
    for sheet in &sheets {
        debug!(
            file = %sheet.file,
            sheet = %sheet.sheet_name,
            row_count = sheet.sheet.rows().len(),
            "decoded first sheet"
        );
    }
    Ok(sheets)
}

/// Merges already-decoded sheets into one table.
///
/// The first sheet defines the reference schema. Every sheet, the first one
/// included, must provide at least the configured share of the reference
/// columns, otherwise the merge fails with
/// [`MergeError::SchemaDivergence`] and nothing is returned.
#[instrument(level = "info", skip_all, fields(files = sheets.len()))]
pub fn merge_sheets(sheets: &[DecodedSheet], options: &MergeOptions) -> Result<MergeOutcome> {
    let detector = HeaderRowDetector::from_options(options);
    let reference = reference_schema(sheets, &detector)?;
    info!(
        columns = reference.len(),
        reference = %reference.tokens().join(", "),
        "reference schema derived"
    );

    let plans = validate(sheets, &reference, &detector, options)?;

    let mut report = MergeReport {
        reference_labels: reference.labels().to_vec(),
        reference_tokens: reference.tokens().to_vec(),
        ..MergeReport::default()
    };
    let mut rows = Vec::new();

    for plan in plans {
        let reconciler = RowReconciler::new(&plan.alignment, reference.tokens(), &plan.sheet.file);
        let data_rows = plan.sheet.sheet.rows().iter().skip(plan.detection.row + 1);
        let reconciled = reconciler.reconcile(data_rows);
        debug!(
            file = %plan.sheet.file,
            rows = reconciled.rows.len(),
            skipped = reconciled.skipped,
            "file reconciled"
        );

        let file_report = FileReport {
            file: plan.sheet.file.clone(),
            sheet_name: plan.sheet.sheet_name.clone(),
            header_row: plan.detection.row,
            detection: plan.detection.method,
            missing: plan.alignment.missing.clone(),
            extra: plan.alignment.extra.clone(),
            duplicates: plan.alignment.duplicates.clone(),
            rows_merged: reconciled.rows.len(),
            blank_rows_skipped: reconciled.skipped,
        };
        for warning in file_report.warnings() {
            warn!("{warning}");
        }
        report.push_file(file_report);
        rows.extend(reconciled.rows);
    }

    let mut columns = match options.header_style {
        HeaderStyle::Normalized => reference.tokens().to_vec(),
        HeaderStyle::Original => reference.labels().to_vec(),
    };
    columns.push(options.source_column.clone());

    info!(rows = rows.len(), "merge completed");
    Ok(MergeOutcome {
        table: UnifiedTable { columns, rows },
        report,
    })
}

/// Validated merge inputs for one file.
struct FilePlan<'a> {
    sheet: &'a DecodedSheet,
    detection: HeaderDetection,
    alignment: Alignment,
}

fn reference_schema(
    sheets: &[DecodedSheet],
    detector: &HeaderRowDetector,
) -> Result<NormalizedHeader> {
    let first = sheets.first().ok_or(MergeError::NoInput)?;
    let detection = detector.detect(&first.sheet, None);
    let header = first
        .sheet
        .row(detection.row)
        .map(|row| NormalizedHeader::from_row(row))
        .unwrap_or_default();

    if header.is_empty() {
        return Err(MergeError::EmptyReference {
            file: first.file.clone(),
        });
    }
    Ok(header)
}

#[instrument(level = "debug", skip_all)]
fn validate<'a>(
    sheets: &'a [DecodedSheet],
    reference: &NormalizedHeader,
    detector: &HeaderRowDetector,
    options: &MergeOptions,
) -> Result<Vec<FilePlan<'a>>> {
    let mut plans = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        let detection = detector.detect(&sheet.sheet, Some(reference));
        let header = sheet
            .sheet
            .row(detection.row)
            .map(|row| NormalizedHeader::from_row(row))
            .unwrap_or_default();
        let alignment = align(header.tokens(), reference.tokens(), options.duplicate_policy);
        debug!(
            file = %sheet.file,
            header_row = detection.row,
            method = ?detection.method,
            missing = alignment.missing.len(),
            extra = alignment.extra.len(),
            "header aligned"
        );

        if alignment.exceeds_missing_ratio(reference.len(), options.max_missing_ratio) {
            return Err(MergeError::SchemaDivergence {
                file: sheet.file.clone(),
                missing: alignment.missing,
                reference_len: reference.len(),
            });
        }

        plans.push(FilePlan {
            sheet,
            detection,
            alignment,
        });
    }

    Ok(plans)
}
