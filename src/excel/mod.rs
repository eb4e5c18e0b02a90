pub mod reader;
pub mod writer;

pub use reader::{CsvReader, SheetRef, TableReader, XlsxReader, reader_for_path};
pub use writer::{HighlightSpec, SummarySheet, TableWriter, XlsxWriter};
