use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::model::{Cell, UnifiedTable};

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes the merged table as a single-sheet `.xlsx` workbook and returns
/// its bytes.
pub fn write_table(table: &UnifiedTable, sheet_label: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_TIME_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_label)?;

    for (row_idx, row) in table.to_rows().iter().enumerate() {
        let row_num = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(value) if row_idx == 0 => {
                    worksheet.write_string_with_format(
                        row_num,
                        col_num,
                        value.as_str(),
                        &header_format,
                    )?;
                }
                Cell::Text(value) => {
                    worksheet.write_string(row_num, col_num, value.as_str())?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(row_num, col_num, *value)?;
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean(row_num, col_num, *value)?;
                }
                Cell::DateTime(value) => {
                    worksheet.write_number_with_format(row_num, col_num, *value, &date_format)?;
                }
            }
        }
    }

    if let Some(col_end) = table.columns.len().checked_sub(1) {
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofilter(0, 0, table.rows.len() as u32, col_end as u16)?;
    }

    Ok(workbook.save_to_buffer()?)
}
