use std::collections::HashSet;

use super::model::{CellValue, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Cleaning operations – both in-place, both idempotent on reapplication
// ---------------------------------------------------------------------------

/// Remove rows that fully duplicate an earlier row. The first occurrence and
/// the relative order of survivors are preserved. Returns the number of rows
/// removed.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let row_count = table.row_count();
    let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(row_count);
    let mut keep = Vec::with_capacity(row_count);
    for idx in 0..row_count {
        let row: Vec<CellValue> = table.row(idx).into_iter().cloned().collect();
        keep.push(seen.insert(row));
    }

    let removed = keep.iter().filter(|&&k| !k).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

/// Replace missing cells in every numeric column with that column's mean,
/// computed over its non-missing cells at invocation time. A numeric column
/// with no non-missing cells has an undefined mean and is left untouched.
/// Non-numeric columns are never modified. Returns the number of cells filled.
pub fn fill_missing_numeric(table: &mut Table) -> usize {
    let mut filled = 0;
    for column in table.columns_mut() {
        if column.kind != ColumnKind::Numeric {
            continue;
        }
        let (sum, count) = column
            .values
            .iter()
            .filter_map(|v| v.as_f64())
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            continue;
        }
        let mean = sum / count as f64;
        for cell in &mut column.values {
            if cell.is_null() {
                *cell = CellValue::Float(mean);
                filled += 1;
            }
        }
    }
    filled
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_upload;
    use crate::data::model::Column;

    fn table_from_csv(csv: &str) -> Table {
        load_upload("test.csv", csv.as_bytes()).unwrap()
    }

    #[test]
    fn removes_full_duplicates_keeping_first_occurrence() {
        let mut table = table_from_csv("id,value\n1,10\n2,20\n1,10\n3,30\n2,20\n");

        let removed = remove_duplicates(&mut table);

        assert_eq!(removed, 2);
        assert_eq!(table.row_count(), 3);
        let ids: Vec<_> = table.column("id").unwrap().values.clone();
        assert_eq!(
            ids,
            vec![
                CellValue::Integer(1),
                CellValue::Integer(2),
                CellValue::Integer(3)
            ]
        );
    }

    #[test]
    fn rows_differing_in_one_cell_are_not_duplicates() {
        let mut table = table_from_csv("id,value\n1,10\n1,11\n");
        assert_eq!(remove_duplicates(&mut table), 0);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn duplicate_removal_is_idempotent() {
        let mut table = table_from_csv("a,b\nx,1\nx,1\ny,2\n");
        assert_eq!(remove_duplicates(&mut table), 1);
        assert_eq!(remove_duplicates(&mut table), 0);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn fills_missing_numeric_cells_with_the_column_mean() {
        let mut table = table_from_csv("id,score\n1,10\n2,\n3,20\n");

        let filled = fill_missing_numeric(&mut table);

        assert_eq!(filled, 1);
        assert_eq!(
            table.column("score").unwrap().values[1],
            CellValue::Float(15.0)
        );
    }

    #[test]
    fn fill_leaves_text_columns_and_their_nulls_alone() {
        let mut table = table_from_csv("name,score\nalice,1\n,2\n");

        let filled = fill_missing_numeric(&mut table);

        assert_eq!(filled, 0);
        assert_eq!(table.column("name").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn fill_skips_numeric_columns_with_no_observed_values() {
        // An all-null column infers as text, so force a numeric kind the way
        // a cleaned-then-emptied column could carry it.
        let mut column = Column::new("v", vec![CellValue::Null, CellValue::Null]);
        column.kind = ColumnKind::Numeric;
        let mut table = Table::new(vec![column]).unwrap();

        assert_eq!(fill_missing_numeric(&mut table), 0);
        assert_eq!(table.column("v").unwrap().values[0], CellValue::Null);
    }

    #[test]
    fn fill_is_idempotent() {
        let mut table = table_from_csv("v\n10\n\n20\n");
        assert_eq!(fill_missing_numeric(&mut table), 1);
        assert_eq!(fill_missing_numeric(&mut table), 0);
        assert_eq!(
            table.column("v").unwrap().values[1],
            CellValue::Float(15.0)
        );
    }

    #[test]
    fn spec_worked_example_dedupe_then_fill() {
        // (1,10),(1,10),(2,) → dedupe → (1,10),(2,) → fill → (2,10.0)
        let mut table = table_from_csv("id,value\n1,10\n1,10\n2,\n");

        assert_eq!(remove_duplicates(&mut table), 1);
        assert_eq!(table.row_count(), 2);

        assert_eq!(fill_missing_numeric(&mut table), 1);
        assert_eq!(
            table.column("value").unwrap().values[1],
            CellValue::Float(10.0)
        );
    }
}
