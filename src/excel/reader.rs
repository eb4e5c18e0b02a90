//! Reading sheets into [`Table`]s

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use chrono::Timelike;
use log::debug;

use crate::error::{MapperError, Result};
use crate::table::{CellValue, Table};

/// Which sheet of a workbook to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Index(usize),
    Name(String),
}

impl SheetRef {
    /// Resolve against the workbook's sheet list
    pub fn resolve<'a>(&self, sheets: &'a [String]) -> Result<&'a str> {
        match self {
            SheetRef::Index(idx) => sheets.get(*idx).map(String::as_str).ok_or_else(|| {
                MapperError::sheet_parse(format!(
                    "sheet index {} out of range ({} sheets)",
                    idx,
                    sheets.len()
                ))
            }),
            SheetRef::Name(name) => sheets
                .iter()
                .find(|s| *s == name)
                .map(String::as_str)
                .ok_or_else(|| MapperError::sheet_parse(format!("sheet '{}' not found", name))),
        }
    }
}

impl From<&str> for SheetRef {
    fn from(value: &str) -> Self {
        SheetRef::Name(value.to_string())
    }
}

impl From<usize> for SheetRef {
    fn from(value: usize) -> Self {
        SheetRef::Index(value)
    }
}

pub trait TableReader {
    fn list_sheets(&self, bytes: &[u8]) -> Result<Vec<String>>;
    fn read_sheet(&self, bytes: &[u8], sheet: &SheetRef) -> Result<Table>;
}

/// Pick a reader from the file extension; anything but `.csv` is read as xlsx
pub fn reader_for_path(path: &Path) -> Box<dyn TableReader> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1");
        Box::new(CsvReader::new(stem))
    } else {
        Box::new(XlsxReader)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReader;

impl XlsxReader {
    fn open(bytes: &[u8]) -> Result<Xlsx<Cursor<&[u8]>>> {
        Xlsx::new(Cursor::new(bytes)).map_err(MapperError::sheet_parse)
    }
}

impl TableReader for XlsxReader {
    fn list_sheets(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let sheets = Self::open(bytes)?.sheet_names();
        if sheets.is_empty() {
            return Err(MapperError::sheet_parse("workbook contains no sheets"));
        }
        Ok(sheets)
    }

    fn read_sheet(&self, bytes: &[u8], sheet: &SheetRef) -> Result<Table> {
        let mut workbook = Self::open(bytes)?;
        let sheets = workbook.sheet_names();
        let name = sheet.resolve(&sheets)?.to_string();

        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| MapperError::sheet_parse(format!("error reading sheet '{}': {}", name, e)))?;

        debug!("Sheet '{}' range {:?}", name, range.get_size());
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect::<Vec<_>>());
        rows_to_table(&name, rows)
    }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if ts.time().num_seconds_from_midnight() == 0 => {
                CellValue::Text(ts.format("%Y-%m-%d").to_string())
            }
            Some(ts) => CellValue::Text(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Single-sheet reader for comma separated files
#[derive(Debug, Clone)]
pub struct CsvReader {
    sheet_name: String,
}

impl CsvReader {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl TableReader for CsvReader {
    fn list_sheets(&self, _bytes: &[u8]) -> Result<Vec<String>> {
        Ok(vec![self.sheet_name.clone()])
    }

    fn read_sheet(&self, bytes: &[u8], sheet: &SheetRef) -> Result<Table> {
        let sheets = self.list_sheets(bytes)?;
        sheet.resolve(&sheets)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(MapperError::sheet_parse)?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Missing
                        } else {
                            CellValue::text(field)
                        }
                    })
                    .collect(),
            );
        }

        rows_to_table(&self.sheet_name, rows.into_iter())
    }
}

/// First row is the header; fully blank data rows are skipped
fn rows_to_table(name: &str, mut rows: impl Iterator<Item = Vec<CellValue>>) -> Result<Table> {
    let Some(header_row) = rows.next() else {
        return Table::new(name, Vec::new());
    };

    let data: Vec<Vec<CellValue>> = rows.collect();
    let total = data.len();
    let data: Vec<Vec<CellValue>> = data
        .into_iter()
        .filter(|row| row.iter().any(|c| !c.is_missing()))
        .collect();
    if data.len() < total {
        debug!("Skipped {} blank rows in '{}'", total - data.len(), name);
    }

    let width = data
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header_row.len()))
        .max()
        .unwrap_or(0);

    Table::from_rows(name, header_names(header_row, width), data)
}

/// Header text as written; blanks become `Unnamed: <idx>` and repeats get
/// `.1`, `.2`, ... suffixes
pub fn header_names(header_row: Vec<CellValue>, width: usize) -> Vec<String> {
    let raw: Vec<String> = (0..width)
        .map(|idx| match header_row.get(idx) {
            Some(cell) if !cell.to_string().is_empty() => cell.to_string(),
            _ => format!("Unnamed: {}", idx),
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());
    for base in raw {
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}
