use thiserror::Error;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Export format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Xlsx];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("writing workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// A fully materialized download artifact: the serialized bytes, the derived
/// target filename and the matching MIME type.
#[derive(Debug)]
pub struct ExportResult {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Serialize the table into an in-memory buffer in the target format. No row
/// index column is emitted; the output filename swaps the original file's
/// extension for the target format's.
pub fn export_table(
    table: &Table,
    original_name: &str,
    format: ExportFormat,
) -> Result<ExportResult, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => to_csv_bytes(table)?,
        ExportFormat::Xlsx => to_xlsx_bytes(table)?,
    };
    Ok(ExportResult {
        bytes,
        file_name: swap_extension(original_name, format.extension()),
        mime: format.mime(),
    })
}

fn swap_extension(name: &str, extension: &str) -> String {
    match name.rfind('.') {
        Some(dot) => format!("{}.{extension}", &name[..dot]),
        None => format!("{name}.{extension}"),
    }
}

fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.column_count() == 0 {
        // A projection down to zero columns still exports a valid file:
        // just the empty header line.
        return Ok(b"\n".to_vec());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;
    for idx in 0..table.row_count() {
        let record: Vec<String> = table
            .row(idx)
            .into_iter()
            .map(|cell| cell.to_string())
            .collect();
        writer.write_record(&record)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn to_xlsx_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = col_idx as u16;
        worksheet.write_string(0, col, &column.name)?;
        for (row_idx, cell) in column.values.iter().enumerate() {
            let row = row_idx as u32 + 1;
            match cell {
                CellValue::Integer(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row, col, *f)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                CellValue::Date(d) => {
                    worksheet.write_string(row, col, d)?;
                }
                CellValue::Null => {}
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_upload;
    use crate::data::model::CellValue;

    #[test]
    fn csv_bytes_have_header_row_and_empty_fields_for_nulls() {
        let table = load_upload("t.csv", b"id,name\n1,alice\n2,\n").unwrap();
        let result = export_table(&table, "t.csv", ExportFormat::Csv).unwrap();

        assert_eq!(
            String::from_utf8(result.bytes).unwrap(),
            "id,name\n1,alice\n2,\n"
        );
    }

    #[test]
    fn filename_swaps_extension_regardless_of_original_format() {
        let table = load_upload("t.csv", b"a\n1\n").unwrap();

        let csv = export_table(&table, "report.xlsx", ExportFormat::Csv).unwrap();
        assert_eq!(csv.file_name, "report.csv");

        let xlsx = export_table(&table, "report.csv", ExportFormat::Xlsx).unwrap();
        assert_eq!(xlsx.file_name, "report.xlsx");

        let bare = export_table(&table, "report", ExportFormat::Csv).unwrap();
        assert_eq!(bare.file_name, "report.csv");
    }

    #[test]
    fn mime_types_follow_the_fixed_two_entry_mapping() {
        assert_eq!(ExportFormat::Csv.mime(), "text/csv");
        assert_eq!(
            ExportFormat::Xlsx.mime(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn csv_round_trip_reproduces_names_and_values() {
        let source = load_upload(
            "orders.csv",
            b"id,region,amount\n1,north,10.5\n2,south,\n3,north,4.25\n",
        )
        .unwrap();
        let result = export_table(&source, "orders.csv", ExportFormat::Csv).unwrap();
        let reloaded = load_upload(&result.file_name, &result.bytes).unwrap();

        assert_eq!(reloaded.column_names(), source.column_names());
        assert_eq!(reloaded.row_count(), source.row_count());
        assert_eq!(
            reloaded.column("amount").unwrap().values[0],
            CellValue::Float(10.5)
        );
        assert_eq!(reloaded.column("amount").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn zero_column_table_still_exports() {
        let result =
            export_table(&Table::empty(), "empty.csv", ExportFormat::Csv).unwrap();
        assert_eq!(result.file_name, "empty.csv");
        assert_eq!(String::from_utf8(result.bytes).unwrap(), "\n");
    }
}
