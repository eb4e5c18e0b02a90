//! Left outer join of a planning table against a reference table

use std::collections::HashMap;

use log::{debug, warn};

use super::normalize::{BlankKeyPolicy, composite_key, normalize};
use crate::error::{MapperError, Result};
use crate::table::{CellValue, Column, ColumnRef, Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// Ordered (left, right) column pairs forming the join key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpec {
    pairs: Vec<KeyPair>,
}

impl KeySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(left: impl Into<ColumnRef>, right: impl Into<ColumnRef>) -> Self {
        Self::new().with_pair(left, right)
    }

    pub fn with_pair(mut self, left: impl Into<ColumnRef>, right: impl Into<ColumnRef>) -> Self {
        self.push(left, right);
        self
    }

    pub fn push(&mut self, left: impl Into<ColumnRef>, right: impl Into<ColumnRef>) {
        self.pairs.push(KeyPair {
            left: left.into(),
            right: right.into(),
        });
    }

    pub fn pairs(&self) -> &[KeyPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Resolve every pair against both tables before any row is read
    fn bind(&self, left: &Table, right: &Table) -> Result<(Vec<usize>, Vec<usize>)> {
        if self.pairs.is_empty() {
            return Err(MapperError::EmptyKeySpec);
        }

        let left_idx = self
            .pairs
            .iter()
            .map(|p| p.left.resolve(left))
            .collect::<Result<Vec<_>>>()?;
        let right_idx = self
            .pairs
            .iter()
            .map(|p| p.right.resolve(right))
            .collect::<Result<Vec<_>>>()?;

        Ok((left_idx, right_idx))
    }
}

#[derive(Debug, Clone)]
pub struct JoinOptions {
    /// Placed between normalized fragments of a composite key
    pub separator: String,
    pub blank_keys: BlankKeyPolicy,
    /// Appended to an attribute column name that already exists on the left
    pub collision_suffix: String,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            blank_keys: BlankKeyPolicy::NeverMatch,
            collision_suffix: "_ref".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinResult {
    /// Left table with attribute columns appended
    pub table: Table,
    /// Per left row: whether a reference row was found
    pub matched: Vec<bool>,
    /// Names of the appended columns, in order
    pub attribute_columns: Vec<String>,
    /// Reference rows ignored because an earlier row had the same key
    pub duplicate_reference_rows: usize,
}

impl JoinResult {
    pub fn row_count(&self) -> usize {
        self.matched.len()
    }

    pub fn matched_count(&self) -> usize {
        self.matched.iter().filter(|m| **m).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.row_count() - self.matched_count()
    }

    pub fn unmatched_rows(&self) -> Vec<usize> {
        self.matched
            .iter()
            .enumerate()
            .filter(|(_, m)| !**m)
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinReconciler {
    options: JoinOptions,
}

impl JoinReconciler {
    pub fn new(options: JoinOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JoinOptions {
        &self.options
    }

    fn row_key(&self, table: &Table, columns: &[usize], row: usize) -> Option<String> {
        composite_key(
            columns.iter().map(|&col| normalize(table.cell(row, col))),
            &self.options.separator,
            self.options.blank_keys,
        )
    }

    /// Left outer join; duplicate reference keys resolve to the first row
    pub fn join(
        &self,
        left: &Table,
        right: &Table,
        key_spec: &KeySpec,
        attributes: &[ColumnRef],
    ) -> Result<JoinResult> {
        let (left_keys, right_keys) = key_spec.bind(left, right)?;
        let attribute_idx = attributes
            .iter()
            .map(|a| a.resolve(right))
            .collect::<Result<Vec<_>>>()?;

        let mut index: HashMap<String, usize> = HashMap::with_capacity(right.row_count());
        let mut duplicate_reference_rows = 0;
        let mut blank_reference_rows = 0;

        for row in 0..right.row_count() {
            match self.row_key(right, &right_keys, row) {
                Some(key) => {
                    if index.contains_key(&key) {
                        duplicate_reference_rows += 1;
                    } else {
                        index.insert(key, row);
                    }
                }
                None => blank_reference_rows += 1,
            }
        }

        debug!(
            "Indexed {} reference keys from '{}' ({} rows)",
            index.len(),
            right.name(),
            right.row_count()
        );
        if duplicate_reference_rows > 0 {
            warn!(
                "{} reference rows share a key with an earlier row; first occurrence wins",
                duplicate_reference_rows
            );
        }
        if blank_reference_rows > 0 {
            debug!("{} reference rows have a blank key and are never matched", blank_reference_rows);
        }

        let found: Vec<Option<usize>> = (0..left.row_count())
            .map(|row| {
                self.row_key(left, &left_keys, row)
                    .and_then(|key| index.get(&key).copied())
            })
            .collect();

        let mut table = left.clone();
        let mut attribute_columns = Vec::with_capacity(attributes.len());
        for &col in &attribute_idx {
            let source = right.column_at(col);
            let name = table.unique_column_name(&source.name, &self.options.collision_suffix);
            let values = found
                .iter()
                .map(|hit| hit.map(|r| source.values[r].clone()).unwrap_or(CellValue::Missing))
                .collect();
            table.push_column(Column::new(name.clone(), values))?;
            attribute_columns.push(name);
        }

        let matched: Vec<bool> = found.iter().map(Option::is_some).collect();
        debug!(
            "Joined '{}' onto '{}': {} of {} rows matched",
            right.name(),
            left.name(),
            matched.iter().filter(|m| **m).count(),
            matched.len()
        );

        Ok(JoinResult {
            table,
            matched,
            attribute_columns,
            duplicate_reference_rows,
        })
    }
}

/// Join with default options
pub fn join(
    left: &Table,
    right: &Table,
    key_spec: &KeySpec,
    attributes: &[ColumnRef],
) -> Result<JoinResult> {
    JoinReconciler::default().join(left, right, key_spec, attributes)
}
