//! Filtered views, summary statistics and grouped counts

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use super::filter::{FilterSpec, MISSING_LABEL, category_key, category_label};
use crate::error::Result;
use crate::mapping::{JoinResult, normalize};
use crate::table::{CellValue, Column, ColumnRef, Table};

pub const COUNT_COLUMN: &str = "Count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_rows: usize,
    pub distinct_keys: usize,
    pub unmatched_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub table: Table,
    pub stats: SummaryStats,
    /// `(category, Count)` rows in order of first appearance
    pub grouped: Option<Table>,
}

/// Derives filtered views and statistics from a join result
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    key_column: ColumnRef,
    attribute_column: ColumnRef,
    missing_label: String,
}

impl ReportAssembler {
    pub fn new(key_column: impl Into<ColumnRef>, attribute_column: impl Into<ColumnRef>) -> Self {
        Self {
            key_column: key_column.into(),
            attribute_column: attribute_column.into(),
            missing_label: MISSING_LABEL.to_string(),
        }
    }

    pub fn with_missing_label(mut self, label: impl Into<String>) -> Self {
        self.missing_label = label.into();
        self
    }

    pub fn missing_label(&self) -> &str {
        &self.missing_label
    }

    pub fn filter_and_summarize(
        &self,
        result: &JoinResult,
        filters: &FilterSpec,
        group_by: Option<&ColumnRef>,
    ) -> Result<Report> {
        let source = &result.table;

        // Fail on misreferenced columns before doing any work
        self.key_column.resolve(source)?;
        self.attribute_column.resolve(source)?;
        if let Some(column) = group_by {
            column.resolve(source)?;
        }

        let rows = filters.matching_rows(source)?;
        let table = if filters.is_empty() {
            source.clone()
        } else {
            debug!("Filter kept {} of {} rows", rows.len(), source.row_count());
            source.select_rows(&rows)
        };

        let stats = self.summarize(&table)?;
        let grouped = group_by
            .map(|column| self.group_counts(&table, column))
            .transpose()?;

        Ok(Report { table, stats, grouped })
    }

    pub fn summarize(&self, table: &Table) -> Result<SummaryStats> {
        let keys = table.column(self.key_column.name())?;
        let attribute = table.column(self.attribute_column.name())?;

        let distinct_keys = keys
            .values
            .iter()
            .map(normalize)
            .filter(|k| !k.is_empty())
            .collect::<HashSet<_>>()
            .len();

        Ok(SummaryStats {
            total_rows: table.row_count(),
            distinct_keys,
            unmatched_rows: attribute.values.iter().filter(|v| v.is_missing()).count(),
        })
    }

    /// Count rows per category of `column`
    ///
    /// Blank cells form one group labelled with the missing label, separate
    /// from a text value that happens to read the same.
    pub fn group_counts(&self, table: &Table, column: &ColumnRef) -> Result<Table> {
        let values = &table.column(column.name())?.values;

        let mut order: Vec<Option<String>> = Vec::new();
        let mut counts: HashMap<Option<String>, usize> = HashMap::new();
        for value in values {
            let key = category_key(value);
            let count = counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push(key);
            }
            *count += 1;
        }

        let count_values = order
            .iter()
            .map(|key| CellValue::Number(counts[key] as f64))
            .collect();
        let categories = order
            .iter()
            .map(|key| CellValue::Text(category_label(key.as_deref(), &self.missing_label)))
            .collect();

        let count_name = if column.name() == COUNT_COLUMN {
            format!("{}_n", COUNT_COLUMN)
        } else {
            COUNT_COLUMN.to_string()
        };

        Table::new(
            format!("{} counts", column.name()),
            vec![
                Column::new(column.name(), categories),
                Column::new(count_name, count_values),
            ],
        )
    }
}
