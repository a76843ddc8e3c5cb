// Delimited import/export

use std::path::Path;

use skucheck_recon::{Table, Value, VerifyError};

use crate::{read_source, source_name};

/// Field contents treated as missing, the same markers pandas' `read_csv` maps to NaN.
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read a comma-delimited UTF-8 file with a header row.
pub fn read_table(path: &Path) -> Result<Table, VerifyError> {
    let bytes = read_source(path)?;
    let name = source_name(path);
    let content = decode_utf8(&bytes, &name)?;
    parse_table(&content, &name, b',').map_err(|e| match e {
        VerifyError::EmptySource { .. } => VerifyError::EmptySource { path: path.to_path_buf() },
        other => other,
    })
}

/// Strict UTF-8, with a leading byte-order mark tolerated.
fn decode_utf8(bytes: &[u8], name: &str) -> Result<String, VerifyError> {
    let (decoded, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(VerifyError::malformed(name, None, "file is not valid UTF-8"));
    }
    Ok(decoded.into_owned())
}

/// Parse delimited text into a table named `name`.
pub fn parse_table(content: &str, name: &str, delimiter: u8) -> Result<Table, VerifyError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed_from_csv(name, &e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(VerifyError::EmptySource { path: name.into() });
    }

    let mut table = Table::new(name, headers);
    for record in reader.records() {
        let record = record.map_err(|e| malformed_from_csv(name, &e))?;
        let values = record.iter().map(parse_field).collect();
        table.push_row(values)?;
    }

    Ok(table)
}

fn parse_field(field: &str) -> Value {
    if NA_MARKERS.contains(&field) {
        Value::Null
    } else {
        Value::text(field)
    }
}

fn malformed_from_csv(name: &str, err: &csv::Error) -> VerifyError {
    let line = err.position().map(|p| p.line());
    let detail = match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("found {len} fields, expected {expected_len}")
        }
        _ => err.to_string(),
    };
    VerifyError::malformed(name, line, detail)
}

/// Write a table as comma-delimited UTF-8 with a header row. Nulls become empty fields.
pub fn write_table(table: &Table, path: &Path) -> Result<(), VerifyError> {
    let write_err = |reason: String| VerifyError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_path(path)
        .map_err(|e| write_err(e.to_string()))?;

    writer
        .write_record(table.columns())
        .map_err(|e| write_err(e.to_string()))?;

    for row in table.rows() {
        let record: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
        writer.write_record(&record).map_err(|e| write_err(e.to_string()))?;
    }

    writer.flush().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}
