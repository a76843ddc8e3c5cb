// Spreadsheet import/export (xlsx, xls, xlsb, ods in; xlsx out)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use skucheck_recon::{Table, Value, VerifyError};

use crate::source_name;

/// Excel's sheet-name length limit.
const MAX_SHEET_NAME: usize = 31;

/// Read one sheet (the first unless `sheet` is given). Row 1 is the header.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, VerifyError> {
    if !path.exists() {
        return Err(VerifyError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let unreadable = |reason: String| VerifyError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| unreadable(format!("Failed to open Excel file: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| unreadable(format!("no sheet named '{wanted}'")))?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| VerifyError::EmptySource {
                path: path.to_path_buf(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| unreadable(format!("Failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(VerifyError::EmptySource {
            path: path.to_path_buf(),
        });
    };
    let columns: Vec<String> = header.iter().map(|cell| cell_value(cell).to_string()).collect();

    let mut table = Table::new(source_name(path), columns);
    for row in rows {
        table.push_row(row.iter().map(cell_value).collect())?;
    }

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = table.len(),
        "sheet loaded"
    );
    Ok(table)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::text(s.as_str()),
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        // Store as TRUE/FALSE text, as Excel displays it
        Data::Bool(b) => Value::text(if *b { "TRUE" } else { "FALSE" }),
        // #N/A and friends are missing values, not SKUs
        Data::Error(_) => Value::Null,
        // Serial number, 1900 date system
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::text(s.as_str()),
    }
}

/// Write a table to a single-sheet xlsx file: bold header, numbers as numbers,
/// nulls left blank.
pub fn write_table(table: &Table, path: &Path, sheet: &str) -> Result<(), VerifyError> {
    let write_err = |reason: String| VerifyError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let cell_err = |row: u32, col: u16, e: rust_xlsxwriter::XlsxError| {
        write_err(format!("Failed to write cell ({row}, {col}): {e}"))
    };

    let mut workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let sheet_name: String = sheet.chars().take(MAX_SHEET_NAME).collect();
    let worksheet = workbook
        .add_worksheet()
        .set_name(&sheet_name)
        .map_err(|e| write_err(format!("Failed to create sheet '{sheet_name}': {e}")))?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(|e| write_err(format!("Failed to write header '{name}': {e}")))?;
    }

    for (row_idx, row) in table.rows().enumerate() {
        let row32 = (row_idx + 1) as u32;
        for (col, value) in row.values().iter().enumerate() {
            let col16 = col as u16;
            match value {
                Value::Null => {}
                Value::Text(s) => {
                    worksheet
                        .write_string(row32, col16, s)
                        .map_err(|e| cell_err(row32, col16, e))?;
                }
                Value::Number(n) => {
                    worksheet
                        .write_number(row32, col16, *n)
                        .map_err(|e| cell_err(row32, col16, e))?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| write_err(format!("Failed to save XLSX file: {e}")))?;
    Ok(())
}
