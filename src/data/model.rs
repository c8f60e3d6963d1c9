use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
/// Rows are deduplicated through hash sets, so `CellValue` must be `Eq` and
/// `Hash` even though it carries floats.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Hash so whole rows can live in a HashSet --
// Floats compare and hash bitwise; the loader never produces NaN or ±inf.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        use CellValue::*;
        match (self, other) {
            (Text(a), Text(b)) | (Date(a), Date(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Null, Null) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, used for means and chart axes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – inferred column classification
// ---------------------------------------------------------------------------

/// One authoritative notion of a column's type, shared by the cleaner,
/// selector and chart builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
}

impl ColumnKind {
    /// Classify a column from its cells. Nulls don't vote; a column whose
    /// non-null cells are all numeric is `Numeric`, all dates is `Temporal`,
    /// anything else (including mixed or empty) is `Text`.
    pub fn infer(values: &[CellValue]) -> Self {
        let mut saw_any = false;
        let mut all_numeric = true;
        let mut all_temporal = true;
        for value in values {
            match value {
                CellValue::Null => continue,
                CellValue::Integer(_) | CellValue::Float(_) => all_temporal = false,
                CellValue::Date(_) => all_numeric = false,
                CellValue::Text(_) => {
                    all_numeric = false;
                    all_temporal = false;
                }
            }
            saw_any = true;
        }
        if !saw_any {
            return ColumnKind::Text;
        }
        if all_numeric {
            ColumnKind::Numeric
        } else if all_temporal {
            ColumnKind::Temporal
        } else {
            ColumnKind::Text
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Temporal => "date",
        }
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// A named column with its inferred kind.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its kind from the cells.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&values);
        Column {
            name: name.into(),
            kind,
            values,
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("column '{name}' has {found} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// The in-memory dataset for one uploaded file: an ordered sequence of
/// equal-length, uniquely-named columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, enforcing unique names and equal column lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                if column.values.len() != expected {
                    return Err(TableError::RaggedColumn {
                        name: column.name.clone(),
                        expected,
                        found: column.values.len(),
                    });
                }
            }
        }
        Ok(Table { columns })
    }

    pub fn empty() -> Self {
        Table::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of the `Numeric` columns, in table order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// One row as cell references across all columns.
    pub fn row(&self, idx: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// Keep only the rows flagged `true`, preserving order.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.row_count());
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&false));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn num(values: &[Option<f64>]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| v.map(CellValue::Float).unwrap_or(CellValue::Null))
            .collect()
    }

    #[test]
    fn infers_numeric_when_all_non_null_cells_are_numbers() {
        let values = vec![
            CellValue::Integer(1),
            CellValue::Null,
            CellValue::Float(2.5),
        ];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Numeric);
    }

    #[test]
    fn infers_temporal_for_date_columns() {
        let values = vec![
            CellValue::Date("2024-01-02".into()),
            CellValue::Null,
            CellValue::Date("2024-03-04".into()),
        ];
        assert_eq!(ColumnKind::infer(&values), ColumnKind::Temporal);
    }

    #[test]
    fn mixed_and_all_null_columns_fall_back_to_text() {
        let mixed = vec![CellValue::Integer(1), CellValue::Text("a".into())];
        assert_eq!(ColumnKind::infer(&mixed), ColumnKind::Text);
        assert_eq!(
            ColumnKind::infer(&[CellValue::Null, CellValue::Null]),
            ColumnKind::Text
        );
    }

    #[test]
    fn table_rejects_duplicate_column_names() {
        let columns = vec![
            Column::new("a", num(&[Some(1.0)])),
            Column::new("a", num(&[Some(2.0)])),
        ];
        assert!(matches!(
            Table::new(columns),
            Err(TableError::DuplicateColumn(name)) if name == "a"
        ));
    }

    #[test]
    fn table_rejects_ragged_columns() {
        let columns = vec![
            Column::new("a", num(&[Some(1.0), Some(2.0)])),
            Column::new("b", num(&[Some(3.0)])),
        ];
        assert!(matches!(
            Table::new(columns),
            Err(TableError::RaggedColumn { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn float_cells_compare_and_hash_consistently() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(CellValue::Float(10.0));
        assert!(set.contains(&CellValue::Float(10.0)));
        assert!(!set.contains(&CellValue::Integer(10)));
        assert!(!set.contains(&CellValue::Null));
    }

    #[test]
    fn retain_rows_keeps_flagged_rows_in_order() {
        let mut table = Table::new(vec![
            Column::new("id", vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)]),
            Column::new("name", vec![
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
                CellValue::Text("c".into()),
            ]),
        ])
        .unwrap();

        table.retain_rows(&[true, false, true]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row(1), vec![&CellValue::Integer(3), &CellValue::Text("c".into())]);
    }
}
