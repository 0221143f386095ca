use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use serde_json::{Value, json};
use sheet_unify::detect::DetectionMethod;
use sheet_unify::model::{Cell, InputFile};
use sheet_unify::options::HeaderStyle;
use sheet_unify::{ExcelCodec, MergeError, MergeOptions, WorkbookCodec, merge_workbooks};
use tempfile::tempdir;

/// Writes `rows` into the first sheet of a new workbook at `path`.
fn write_fixture(path: &Path, sheet_name: &str, rows: Value) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).expect("sheet named");

    let rows = rows.as_array().expect("fixture rows");
    for (row_idx, row) in rows.iter().enumerate() {
        let cells = row.as_array().expect("fixture row");
        for (col_idx, cell) in cells.iter().enumerate() {
            let (row_num, col_num) = (row_idx as u32, col_idx as u16);
            match cell {
                Value::String(text) => {
                    worksheet
                        .write_string(row_num, col_num, text.as_str())
                        .expect("string written");
                }
                Value::Number(number) => {
                    worksheet
                        .write_number(row_num, col_num, number.as_f64().expect("finite"))
                        .expect("number written");
                }
                Value::Bool(flag) => {
                    worksheet
                        .write_boolean(row_num, col_num, *flag)
                        .expect("boolean written");
                }
                _ => {}
            }
        }
    }

    workbook.save(path).expect("fixture saved");
}

fn load_input(path: &Path) -> InputFile {
    let name = path
        .file_name()
        .expect("file name")
        .to_string_lossy()
        .into_owned();
    InputFile::new(name, fs::read(path).expect("fixture read"))
}

fn decode_output(bytes: &[u8]) -> Vec<Vec<Cell>> {
    let decoded = ExcelCodec.decode("unificado.xlsx", bytes).expect("output decoded");
    assert_eq!(decoded.sheet_name, "Unificado");
    decoded.sheet.rows().to_vec()
}

fn text(value: &str) -> Cell {
    Cell::from(value)
}

#[test]
fn identical_headers_are_concatenated_with_provenance() {
    let dir = tempdir().expect("temporary directory");
    let first = dir.path().join("file1.xlsx");
    let second = dir.path().join("file2.xlsx");
    write_fixture(&first, "Hoja1", json!([["id", "name"], [1, "a"], [2, "b"]]));
    write_fixture(&second, "Hoja1", json!([["id", "name"], [3, "c"]]));

    let inputs = vec![load_input(&first), load_input(&second)];
    let merged = merge_workbooks(&inputs, &ExcelCodec, &MergeOptions::default()).expect("merge");

    let rows = decode_output(&merged.bytes);
    assert_eq!(
        rows,
        vec![
            vec![text("id"), text("name"), text("source_file")],
            vec![Cell::Number(1.0), text("a"), text("file1.xlsx")],
            vec![Cell::Number(2.0), text("b"), text("file1.xlsx")],
            vec![Cell::Number(3.0), text("c"), text("file2.xlsx")],
        ]
    );
    assert_eq!(merged.report.total_rows, 3);
    assert!(merged.report.warnings.is_empty());
}

#[test]
fn reordered_and_missing_columns_are_realigned_by_name() {
    let dir = tempdir().expect("temporary directory");
    let first = dir.path().join("clientes.xlsx");
    let second = dir.path().join("sucursal.xlsx");
    write_fixture(
        &first,
        "Datos",
        json!([["id", "name", "email"], [1, "ana", "ana@example.com"]]),
    );
    write_fixture(&second, "Datos", json!([["name", "id"], ["bo", 2]]));

    let inputs = vec![load_input(&first), load_input(&second)];
    let merged = merge_workbooks(&inputs, &ExcelCodec, &MergeOptions::default()).expect("merge");

    let rows = decode_output(&merged.bytes);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[2],
        vec![Cell::Number(2.0), text("bo"), Cell::Empty, text("sucursal.xlsx")]
    );
    assert_eq!(merged.report.files[1].missing, ["email"]);
}

#[test]
fn divergent_file_aborts_without_output() {
    let dir = tempdir().expect("temporary directory");
    let first = dir.path().join("ref.xlsx");
    let second = dir.path().join("otro.xlsx");
    write_fixture(&first, "Hoja1", json!([["a", "b", "c", "d"], [1, 2, 3, 4]]));
    write_fixture(&second, "Hoja1", json!([["a", "z"], [1, 9]]));

    let inputs = vec![load_input(&first), load_input(&second)];
    let error =
        merge_workbooks(&inputs, &ExcelCodec, &MergeOptions::default()).expect_err("rejected");

    match error {
        MergeError::SchemaDivergence { file, missing, .. } => {
            assert_eq!(file, "otro.xlsx");
            assert_eq!(missing, ["b", "c", "d"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn messy_exports_are_reconciled() {
    let dir = tempdir().expect("temporary directory");
    let first = dir.path().join("enero.xlsx");
    let second = dir.path().join("febrero.xlsx");
    write_fixture(
        &first,
        "Enero",
        json!([
            ["Número", "Nombre", "Activo"],
            [1, "ana", true],
            ["", "  "],
            [2, "bo", false]
        ]),
    );
    write_fixture(
        &second,
        "Febrero",
        json!([
            ["Reporte de febrero"],
            [],
            ["\u{feff}ACTIVO ", "  numero", "nombre", "Observaciones"],
            [true, 3, "cy", "nueva"]
        ]),
    );

    let inputs = vec![load_input(&first), load_input(&second)];
    let options = MergeOptions {
        header_style: HeaderStyle::Original,
        ..MergeOptions::default()
    };
    let merged = merge_workbooks(&inputs, &ExcelCodec, &options).expect("merge");

    let rows = decode_output(&merged.bytes);
    assert_eq!(
        rows,
        vec![
            vec![text("Número"), text("Nombre"), text("Activo"), text("source_file")],
            vec![Cell::Number(1.0), text("ana"), Cell::Bool(true), text("enero.xlsx")],
            vec![Cell::Number(2.0), text("bo"), Cell::Bool(false), text("enero.xlsx")],
            vec![Cell::Number(3.0), text("cy"), Cell::Bool(true), text("febrero.xlsx")],
        ]
    );

    let report = &merged.report;
    assert_eq!(report.reference_tokens, ["numero", "nombre", "activo"]);
    assert_eq!(report.files[0].blank_rows_skipped, 1);
    assert_eq!(report.files[1].sheet_name, "Febrero");
    assert_eq!(report.files[1].header_row, 2);
    assert_eq!(report.files[1].extra, ["observaciones"]);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn corrupt_input_is_reported_by_name() {
    let dir = tempdir().expect("temporary directory");
    let first = dir.path().join("bueno.xlsx");
    write_fixture(&first, "Hoja1", json!([["id", "name"], [1, "a"]]));

    let inputs = vec![
        load_input(&first),
        InputFile::new("roto.xlsx", b"definitely not a zip".to_vec()),
    ];
    let error =
        merge_workbooks(&inputs, &ExcelCodec, &MergeOptions::default()).expect_err("rejected");

    assert!(matches!(error, MergeError::Decode { .. }));
    assert_eq!(error.file(), Some("roto.xlsx"));
}

#[test]
fn empty_reference_file_is_rejected() {
    let dir = tempdir().expect("temporary directory");
    let first = dir.path().join("vacio.xlsx");
    let second = dir.path().join("datos.xlsx");
    write_fixture(&first, "Hoja1", json!([]));
    write_fixture(&second, "Hoja1", json!([["id", "name"], [1, "a"]]));

    let inputs = vec![load_input(&first), load_input(&second)];
    let error =
        merge_workbooks(&inputs, &ExcelCodec, &MergeOptions::default()).expect_err("rejected");

    assert!(matches!(error, MergeError::EmptyReference { ref file } if file == "vacio.xlsx"));
}

#[test]
fn single_column_export_is_matched_against_reference_header() {
    let dir = tempdir().expect("temporary directory");
    let first = dir.path().join("maestro.xlsx");
    let second = dir.path().join("ids.xlsx");
    write_fixture(&first, "Hoja1", json!([["Código", "Nombre"], [1, "ana"]]));
    let mut rows = vec![json!(["Exportado por sistema"]); 9];
    rows.push(json!(["CODIGO"]));
    rows.push(json!([2]));
    write_fixture(&second, "Hoja1", Value::Array(rows));

    let inputs = vec![load_input(&first), load_input(&second)];
    let merged = merge_workbooks(&inputs, &ExcelCodec, &MergeOptions::default()).expect("merge");

    let rows = decode_output(&merged.bytes);
    assert_eq!(
        rows,
        vec![
            vec![text("codigo"), text("nombre"), text("source_file")],
            vec![Cell::Number(1.0), text("ana"), text("maestro.xlsx")],
            vec![Cell::Number(2.0), Cell::Empty, text("ids.xlsx")],
        ]
    );
    let file = &merged.report.files[1];
    assert_eq!(file.header_row, 9);
    assert_eq!(file.detection, DetectionMethod::ReferenceMatch);
}
