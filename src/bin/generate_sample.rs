use anyhow::{Context, Result};

/// Deterministic demo dataset: orders with a few exact duplicate rows and
/// gaps in the `unit_price` column, so the cleaning pipeline has something
/// to do when exercised by hand.
#[derive(Clone)]
struct SampleRow {
    order_id: i64,
    region: &'static str,
    units: i64,
    unit_price: Option<f64>,
    order_date: String,
}

const HEADERS: [&str; 5] = ["order_id", "region", "units", "unit_price", "order_date"];

fn sample_rows() -> Vec<SampleRow> {
    let regions = ["north", "south", "east", "west"];
    let mut rows: Vec<SampleRow> = (0..40i64)
        .map(|i| SampleRow {
            order_id: i + 1,
            region: regions[(i % 4) as usize],
            units: 5 + (i * 7) % 23,
            unit_price: if i % 9 == 4 {
                None
            } else {
                Some(4.5 + (i % 11) as f64 * 1.25)
            },
            order_date: format!("2024-{:02}-{:02}", 1 + i % 12, 1 + i % 28),
        })
        .collect();

    // Exact duplicates for "Remove duplicates" to find.
    for idx in [2usize, 11, 25] {
        let dup = rows[idx].clone();
        rows.push(dup);
    }
    rows
}

fn write_csv(rows: &[SampleRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path("sample_data.csv").context("creating sample_data.csv")?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record([
            row.order_id.to_string(),
            row.region.to_string(),
            row.units.to_string(),
            row.unit_price.map(|p| p.to_string()).unwrap_or_default(),
            row.order_date.clone(),
        ])?;
    }
    writer.flush().context("flushing sample_data.csv")?;
    Ok(())
}

fn write_xlsx(rows: &[SampleRow]) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        worksheet.write_number(r, 0, row.order_id as f64)?;
        worksheet.write_string(r, 1, row.region)?;
        worksheet.write_number(r, 2, row.units as f64)?;
        if let Some(price) = row.unit_price {
            worksheet.write_number(r, 3, price)?;
        }
        worksheet.write_string(r, 4, &row.order_date)?;
    }
    workbook
        .save("sample_data.xlsx")
        .context("writing sample_data.xlsx")?;
    Ok(())
}

fn main() -> Result<()> {
    let rows = sample_rows();
    write_csv(&rows)?;
    write_xlsx(&rows)?;
    println!(
        "Wrote {} rows to sample_data.csv and sample_data.xlsx",
        rows.len()
    );
    Ok(())
}
