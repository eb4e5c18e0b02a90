//! Tabular data model shared by readers, the join and the report layer

pub mod cell;
pub mod frame;

pub use cell::CellValue;
pub use frame::{Column, ColumnRef, Table};
