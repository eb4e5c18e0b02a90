//! Row filters over a joined table

use std::collections::BTreeSet;

use crate::error::Result;
use crate::mapping::normalize;
use crate::table::{CellValue, ColumnRef, Table};

pub const MISSING_LABEL: &str = "missing";

/// Category a cell is filtered and grouped by: its normalized text, or
/// `None` when that text is empty
///
/// Blank cells form their own category, distinct from any text value.
pub fn category_key(value: &CellValue) -> Option<String> {
    let text = normalize(value);
    (!text.is_empty()).then_some(text)
}

/// Display label of a category; the missing category shows `missing_label`
pub fn category_label(key: Option<&str>, missing_label: &str) -> String {
    key.unwrap_or(missing_label).to_string()
}

/// Allowed categories per column; a row must pass every non-empty entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    entries: Vec<(ColumnRef, BTreeSet<Option<String>>)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, column: impl Into<ColumnRef>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(column, values);
        self
    }

    /// Also allow blank cells in `column`
    pub fn with_missing(mut self, column: impl Into<ColumnRef>) -> Self {
        self.insert_missing(column);
        self
    }

    /// Add allowed text values for a column, merging with any existing entry
    ///
    /// Values are trimmed; a value that trims to nothing allows blank cells.
    pub fn insert<I, S>(&mut self, column: impl Into<ColumnRef>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = values.into_iter().map(|v| {
            let text = Into::<String>::into(v).trim().to_string();
            (!text.is_empty()).then_some(text)
        });
        self.insert_keys(column, keys);
    }

    pub fn insert_missing(&mut self, column: impl Into<ColumnRef>) {
        self.insert_keys(column, [None]);
    }

    /// Add allowed categories as produced by [`category_key`]
    pub fn insert_keys<I>(&mut self, column: impl Into<ColumnRef>, keys: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let column = column.into();
        match self.entries.iter().position(|(c, _)| *c == column) {
            Some(idx) => self.entries[idx].1.extend(keys),
            None => self.entries.push((column, keys.into_iter().collect())),
        }
    }

    pub fn entries(&self) -> &[(ColumnRef, BTreeSet<Option<String>>)] {
        &self.entries
    }

    /// True when no entry constrains anything
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, allowed)| allowed.is_empty())
    }

    /// Indices of rows passing every constraint, in table order
    ///
    /// Every entry's column must exist, even one with no allowed values.
    pub fn matching_rows(&self, table: &Table) -> Result<Vec<usize>> {
        let resolved = self
            .entries
            .iter()
            .map(|(column, allowed)| column.resolve(table).map(|idx| (idx, allowed)))
            .collect::<Result<Vec<_>>>()?;
        let active: Vec<_> = resolved
            .into_iter()
            .filter(|(_, allowed)| !allowed.is_empty())
            .collect();

        Ok((0..table.row_count())
            .filter(|&row| {
                active
                    .iter()
                    .all(|(col, allowed)| allowed.contains(&category_key(table.cell(row, *col))))
            })
            .collect())
    }
}
