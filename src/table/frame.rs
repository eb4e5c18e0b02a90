use std::collections::HashSet;
use std::fmt;

use super::cell::CellValue;
use crate::error::{MapperError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// In-memory sheet: named, equal-length columns with positionally aligned rows
///
/// Column names are unique; both invariants are checked on construction so
/// later lookups only have to deal with names that do not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(MapperError::DuplicateColumn {
                    column: column.name.clone(),
                    table: name,
                });
            }
            if column.len() != row_count {
                return Err(MapperError::ColumnLengthMismatch {
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            row_count,
        })
    }

    /// Build a table from row-major data, padding short rows with `Missing`
    pub fn from_rows(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|header| Column::new(header, Vec::with_capacity(rows.len())))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(MapperError::ColumnLengthMismatch {
                    column: format!("row {}", row_idx + 1),
                    expected: width,
                    actual: row.len(),
                });
            }
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or_default());
            }
        }

        Self::new(name, columns)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| MapperError::column_not_found(name, &self.name))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self.column_index(name)?;
        Ok(&self.columns[idx])
    }

    pub fn column_at(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        &self.columns[column].values[row]
    }

    /// Append a column; it must have the table's row count and a fresh name
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(&column.name) {
            return Err(MapperError::DuplicateColumn {
                column: column.name,
                table: self.name.clone(),
            });
        }
        let actual = column.len();
        if !self.columns.is_empty() && actual != self.row_count {
            return Err(MapperError::ColumnLengthMismatch {
                column: column.name,
                expected: self.row_count,
                actual,
            });
        }
        self.row_count = column.len();
        self.columns.push(column);
        Ok(())
    }

    /// Copy of the table restricted to the given rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), rows.iter().map(|&r| c.values[r].clone()).collect()))
            .collect();

        Table {
            name: self.name.clone(),
            columns,
            row_count: rows.len(),
        }
    }

    /// Name that does not collide with any existing column
    pub fn unique_column_name(&self, base: &str, suffix: &str) -> String {
        let mut candidate = base.to_string();
        while self.has_column(&candidate) {
            candidate.push_str(suffix);
        }
        candidate
    }
}

/// A column referenced by name, validated against a table on use
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef(String);

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn resolve(&self, table: &Table) -> Result<usize> {
        table.column_index(&self.0)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ColumnRef {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}
