use thiserror::Error;

use super::model::{Table, TableError};

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error(transparent)]
    Invalid(#[from] TableError),
}

/// Project a table to exactly the requested columns, in the requested order.
/// Every requested name must exist in the table. Requesting zero columns is
/// legal and yields an empty-column table, which downstream components treat
/// as "no numeric columns available".
pub fn select_columns(table: &Table, names: &[String]) -> Result<Table, SelectError> {
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let column = table
            .column(name)
            .ok_or_else(|| SelectError::UnknownColumn(name.clone()))?;
        columns.push(column.clone());
    }
    Ok(Table::new(columns)?)
}
