//! Error types shared by the mapping core and the workbook adapters

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MapperError>;

#[derive(Debug, Error)]
pub enum MapperError {
    /// A referenced column is absent from its table
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { column: String, table: String },

    /// A join was requested without any key column pairs
    #[error("key spec has no column pairs")]
    EmptyKeySpec,

    /// Input bytes are not a readable workbook, or the sheet reference is invalid
    #[error("failed to parse sheet: {reason}")]
    SheetParseFailure { reason: String },

    /// Fuzzy suggestion found nothing and no manual choice was supplied
    #[error("no column matches '{concept}'")]
    NoMatchingColumns { concept: String },

    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { column: String, table: String },

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to write workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
}

impl MapperError {
    pub fn column_not_found(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
            table: table.into(),
        }
    }

    pub fn sheet_parse(reason: impl ToString) -> Self {
        Self::SheetParseFailure {
            reason: reason.to_string(),
        }
    }
}
