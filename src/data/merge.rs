use super::model::{Table, Value};
use crate::error::{CurateError, Result};

/// Concatenate tables in input order.
///
/// The output column list is the union of all inputs, in order of first
/// appearance. Cells for columns a source table lacked are `Null`. No
/// validation or label normalization happens here.
pub fn combine(tables: &[Table]) -> Result<Table> {
    if tables.is_empty() {
        return Err(CurateError::NoInput);
    }

    let mut columns: Vec<String> = Vec::new();
    for table in tables {
        for col in table.columns() {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }
    }

    let total: usize = tables.iter().map(Table::len).sum();
    let mut rows = Vec::with_capacity(total);
    for table in tables {
        // Position of each output column within this source, if present.
        let mapping: Vec<Option<usize>> = columns.iter().map(|c| table.column_index(c)).collect();
        for row in table.rows() {
            rows.push(
                mapping
                    .iter()
                    .map(|src| src.map_or(Value::Null, |idx| row[idx].clone()))
                    .collect(),
            );
        }
    }

    log::info!(
        "Combined {} tables into {total} records with {} columns",
        tables.len(),
        columns.len()
    );
    Ok(Table::new(columns, rows))
}
