/// Mapping tests over in-memory tables, organized by stage.

pub mod join_scenarios;
pub mod properties;
pub mod reports;

use subchassis_mapper::table::{CellValue, Table};

/// Build a table from string headers and rows
pub fn table(name: &str, headers: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
    Table::from_rows(name, headers.iter().map(|h| h.to_string()).collect(), rows).unwrap()
}

/// Rows of text cells; `None` is a missing cell
pub fn text_rows(rows: &[&[Option<&str>]]) -> Vec<Vec<CellValue>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| CellValue::from(*cell)).collect())
        .collect()
}
