//! Writing mapped tables to xlsx with highlighted cells

use std::collections::BTreeSet;

use chrono::Utc;
use log::debug;
use rust_xlsxwriter::{Chart, ChartType, Color, Format, FormatPattern, Workbook, Worksheet};

use crate::error::Result;
use crate::report::SummaryStats;
use crate::table::{CellValue, Table};

pub const DEFAULT_HIGHLIGHT: u32 = 0xFFC7CE;
pub const SUMMARY_SHEET: &str = "Summary";

/// Cells (row index, column name) rendered with the highlight fill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSpec {
    cells: BTreeSet<(usize, String)>,
}

impl HighlightSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: usize, column: impl Into<String>) {
        self.cells.insert((row, column.into()));
    }

    pub fn contains(&self, row: usize, column: &str) -> bool {
        self.cells.contains(&(row, column.to_string()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn merge(&mut self, other: HighlightSpec) {
        self.cells.extend(other.cells);
    }

    /// Every missing cell of `column`
    pub fn missing_in(table: &Table, column: &str) -> Result<Self> {
        let values = &table.column(column)?.values;
        let mut spec = Self::new();
        for (row, value) in values.iter().enumerate() {
            if value.is_missing() {
                spec.insert(row, column);
            }
        }
        Ok(spec)
    }
}

pub trait TableWriter {
    fn write_sheet(&self, table: &Table, sheet_name: &str, highlight: &HighlightSpec) -> Result<Vec<u8>>;
}

/// Stats and grouped counts for the optional summary sheet
#[derive(Debug, Clone, Copy)]
pub struct SummarySheet<'a> {
    pub stats: &'a SummaryStats,
    pub grouped: Option<&'a Table>,
}

#[derive(Debug, Clone)]
pub struct XlsxWriter {
    highlight_color: u32,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT)
    }
}

impl XlsxWriter {
    pub fn new(highlight_color: u32) -> Self {
        Self { highlight_color }
    }

    /// Parse `FFC7CE` / `#FFC7CE` style colors
    pub fn parse_color(hex: &str) -> Option<u32> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok()
    }

    /// Data sheet, followed by a summary sheet with a chart when given
    pub fn write_report(
        &self,
        table: &Table,
        sheet_name: &str,
        highlight: &HighlightSpec,
        summary: Option<SummarySheet<'_>>,
    ) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name)?;
        self.write_table(sheet, table, highlight)?;

        if let Some(summary) = summary {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SUMMARY_SHEET)?;
            write_summary(sheet, summary)?;
        }

        let bytes = workbook.save_to_buffer()?;
        debug!(
            "Wrote {} rows to '{}' ({} highlighted cells, {} bytes)",
            table.row_count(),
            sheet_name,
            highlight.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn write_table(&self, sheet: &mut Worksheet, table: &Table, highlight: &HighlightSpec) -> Result<()> {
        let header_format = Format::new().set_bold();
        let fill = Format::new()
            .set_background_color(Color::RGB(self.highlight_color))
            .set_pattern(FormatPattern::Solid);

        for (col, column) in table.columns().iter().enumerate() {
            let col = col as u16;
            sheet.write_string_with_format(0, col, &column.name, &header_format)?;

            for (row, value) in column.values.iter().enumerate() {
                let format = highlight.contains(row, &column.name).then_some(&fill);
                write_cell(sheet, row as u32 + 1, col, value, format)?;
            }
        }

        sheet.autofit();
        Ok(())
    }
}

impl TableWriter for XlsxWriter {
    fn write_sheet(&self, table: &Table, sheet_name: &str, highlight: &HighlightSpec) -> Result<Vec<u8>> {
        self.write_report(table, sheet_name, highlight, None)
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> Result<()> {
    match (value, format) {
        (CellValue::Missing, Some(format)) => {
            sheet.write_blank(row, col, format)?;
        }
        (CellValue::Missing, None) => {}
        (CellValue::Text(s), Some(format)) => {
            sheet.write_string_with_format(row, col, s, format)?;
        }
        (CellValue::Text(s), None) => {
            sheet.write_string(row, col, s)?;
        }
        (CellValue::Number(n), Some(format)) => {
            sheet.write_number_with_format(row, col, *n, format)?;
        }
        (CellValue::Number(n), None) => {
            sheet.write_number(row, col, *n)?;
        }
        (CellValue::Bool(b), Some(format)) => {
            sheet.write_boolean_with_format(row, col, *b, format)?;
        }
        (CellValue::Bool(b), None) => {
            sheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn write_summary(sheet: &mut Worksheet, summary: SummarySheet<'_>) -> Result<()> {
    let title_format = Format::new().set_bold().set_font_size(16);

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White);

    let metric_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF2F2F2));

    sheet.write_string_with_format(0, 0, "Mapping Summary", &title_format)?;
    sheet.write_string(1, 0, format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")))?;

    sheet.write_string_with_format(3, 0, "Key Metrics", &header_format)?;
    let metrics = [
        ("Total Rows:", summary.stats.total_rows),
        ("Distinct Keys:", summary.stats.distinct_keys),
        ("Unmatched Rows:", summary.stats.unmatched_rows),
    ];
    for (offset, (label, value)) in metrics.iter().enumerate() {
        let row = 4 + offset as u32;
        sheet.write_string_with_format(row, 0, *label, &metric_format)?;
        sheet.write_number(row, 1, *value as f64)?;
    }

    if let Some(grouped) = summary.grouped {
        write_grouped(sheet, grouped, &header_format)?;
    }

    sheet.autofit();
    Ok(())
}

/// Grouped counts from row 8 down, with a column chart beside them
fn write_grouped(sheet: &mut Worksheet, grouped: &Table, header_format: &Format) -> Result<()> {
    const FIRST_ROW: u32 = 8;

    for (col, column) in grouped.columns().iter().take(2).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(FIRST_ROW, col, &column.name, header_format)?;
        for (row, value) in column.values.iter().enumerate() {
            write_cell(sheet, FIRST_ROW + 1 + row as u32, col, value, None)?;
        }
    }

    if grouped.row_count() == 0 || grouped.column_count() < 2 {
        return Ok(());
    }

    let first = FIRST_ROW + 1;
    let last = FIRST_ROW + grouped.row_count() as u32;
    let category_name = grouped.column_at(0).name.clone();
    let count_name = grouped.column_at(1).name.clone();

    let mut chart = Chart::new(ChartType::Column);
    chart
        .add_series()
        .set_categories((SUMMARY_SHEET, first, 0, last, 0))
        .set_values((SUMMARY_SHEET, first, 1, last, 1))
        .set_name(count_name.as_str());
    chart.title().set_name(format!("Rows by {}", category_name).as_str());
    chart.x_axis().set_name(category_name.as_str());
    chart.y_axis().set_name(count_name.as_str());
    chart.legend().set_hidden();

    sheet.insert_chart(FIRST_ROW, 3, &chart)?;
    Ok(())
}
