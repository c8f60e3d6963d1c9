use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;
use thiserror::Error;

use super::model::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type: .{extension}")]
    Unsupported { extension: String },
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("reading workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("{0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse an uploaded file into a [`Table`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – comma-separated text, header row with column names
/// * `.xlsx` – Excel workbook, first worksheet, first row as header
///
/// Anything else fails with [`LoadError::Unsupported`]; the caller is
/// expected to skip that file and keep going with the rest of the batch.
pub fn load_upload(file_name: &str, bytes: &[u8]) -> Result<Table, LoadError> {
    let extension = extension_of(file_name);
    match extension.as_str() {
        "csv" => load_csv(bytes),
        "xlsx" => load_xlsx(bytes),
        _ => Err(LoadError::Unsupported { extension }),
    }
}

/// Filesystem wrapper used by the UI: reads the file and returns its declared
/// size alongside the parsed table.
pub fn load_path(path: &Path) -> anyhow::Result<(u64, Table)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let table = load_upload(file_name, &bytes)?;
    Ok((bytes.len() as u64, table))
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        // Short rows are padded with nulls; extra fields are dropped.
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(guess_cell_type(record.get(idx).unwrap_or("")));
        }
    }

    build_table(headers, cells)
}

/// Guess the type of a raw CSV cell: integer, float, ISO date, else text.
/// Empty cells are missing values. Non-finite float spellings ("nan", "inf")
/// stay text so no NaN ever enters a numeric column.
fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if is_iso_date(s) {
        return CellValue::Date(s.to_string());
    }
    CellValue::Text(s.to_string())
}

fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

fn load_xlsx(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Malformed("workbook has no worksheets".into()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::Malformed("worksheet has no header row".into()))?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).map_or(CellValue::Null, convert_cell));
        }
    }

    build_table(headers, cells)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                CellValue::Null
            } else if is_iso_date(t) {
                CellValue::Date(t.to_string())
            } else {
                CellValue::Text(t.to_string())
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| CellValue::Date(ndt.format("%Y-%m-%d").to_string()))
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) => CellValue::Date(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Shared assembly
// ---------------------------------------------------------------------------

fn build_table(headers: Vec<String>, cells: Vec<Vec<CellValue>>) -> Result<Table, LoadError> {
    let columns: Vec<Column> = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::new(columns).map_err(|e| LoadError::Malformed(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    #[test]
    fn csv_infers_column_kinds_from_cells() {
        let csv = "id,name,score,joined\n1,alice,9.5,2024-01-02\n2,bob,8.0,2024-02-03\n";
        let table = load_upload("people.csv", csv.as_bytes()).unwrap();

        assert_eq!(table.column_names(), vec!["id", "name", "score", "joined"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("id").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(table.column("name").unwrap().kind, ColumnKind::Text);
        assert_eq!(table.column("score").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(table.column("joined").unwrap().kind, ColumnKind::Temporal);
    }

    #[test]
    fn csv_empty_cells_become_nulls_and_short_rows_are_padded() {
        let csv = "a,b,c\n1,,3\n4,5\n";
        let table = load_upload("data.csv", csv.as_bytes()).unwrap();

        assert_eq!(table.column("b").unwrap().values[0], CellValue::Null);
        assert_eq!(table.column("c").unwrap().values[1], CellValue::Null);
        assert_eq!(table.column("b").unwrap().values[1], CellValue::Integer(5));
    }

    #[test]
    fn csv_keeps_nan_and_inf_spellings_out_of_numeric_columns() {
        let csv = "v\nNaN\ninf\n";
        let table = load_upload("data.csv", csv.as_bytes()).unwrap();
        assert_eq!(table.column("v").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_upload("report.txt", b"id,value\n1,2\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Unsupported { ref extension } if extension == "txt"
        ));
        assert_eq!(err.to_string(), "unsupported file type: .txt");
    }

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        let table = load_upload("DATA.CSV", b"a\n1\n").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn xlsx_round_trips_through_the_exporter_buffer() {
        use crate::data::export::{export_table, ExportFormat};

        let source = load_upload("in.csv", b"id,label\n1,alpha\n2,beta\n").unwrap();
        let exported = export_table(&source, "in.csv", ExportFormat::Xlsx).unwrap();
        let reloaded = load_upload(&exported.file_name, &exported.bytes).unwrap();

        assert_eq!(reloaded.column_names(), vec!["id", "label"]);
        assert_eq!(reloaded.row_count(), 2);
        assert_eq!(reloaded.column("id").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(
            reloaded.column("label").unwrap().values[1],
            CellValue::Text("beta".into())
        );
    }
}