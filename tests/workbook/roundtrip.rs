use std::io::{Cursor, Read};

use subchassis_mapper::MapperError;
use subchassis_mapper::excel::{HighlightSpec, SheetRef, SummarySheet, TableReader, TableWriter, XlsxReader, XlsxWriter};
use subchassis_mapper::report::SummaryStats;
use subchassis_mapper::table::{CellValue, Column, Table};

fn mapped() -> Table {
    Table::new(
        "mapped",
        vec![
            Column::new("Style", vec!["A1".into(), "A2".into(), "A3".into()]),
            Column::new("Qty", vec![12.0.into(), 1234.0.into(), CellValue::Missing]),
            Column::new("Active", vec![true.into(), false.into(), true.into()]),
            Column::new(
                "LatestSubChassis",
                vec!["SC100".into(), CellValue::Missing, CellValue::Missing],
            ),
        ],
    )
    .unwrap()
}

#[test]
fn test_written_sheet_reads_back() {
    let table = mapped();
    let highlight = HighlightSpec::missing_in(&table, "LatestSubChassis").unwrap();
    assert_eq!(highlight.len(), 2);

    let bytes = XlsxWriter::default()
        .write_sheet(&table, "Mapped Data", &highlight)
        .unwrap();

    let reader = XlsxReader;
    assert_eq!(reader.list_sheets(&bytes).unwrap(), vec!["Mapped Data"]);

    let read = reader.read_sheet(&bytes, &SheetRef::from("Mapped Data")).unwrap();
    assert_eq!(read.name(), "Mapped Data");
    assert_eq!(read.column_names(), table.column_names());
    assert_eq!(read.row_count(), 3);
    for (written, read) in table.columns().iter().zip(read.columns()) {
        assert_eq!(written.values, read.values, "column {}", written.name);
    }
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn test_missing_attribute_cells_carry_highlight_fill() {
    let table = mapped();
    let highlight = HighlightSpec::missing_in(&table, "LatestSubChassis").unwrap();
    let bytes = XlsxWriter::default()
        .write_sheet(&table, "Mapped Data", &highlight)
        .unwrap();

    let styles = part(&bytes, "xl/styles.xml");
    assert!(styles.contains(r#"patternType="solid""#));
    assert!(styles.contains(r#"rgb="FFFFC7CE""#));

    let sheet = part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<c r="D3" s=""#));
    assert!(sheet.contains(r#"<c r="D4" s=""#));
    // matched value and other columns stay unstyled
    assert!(sheet.contains(r#"<c r="D2" t="s">"#));
    assert!(!sheet.contains(r#"<c r="B4""#));
}

#[test]
fn test_summary_sheet_is_added() {
    let table = mapped();
    let stats = SummaryStats {
        total_rows: 3,
        distinct_keys: 3,
        unmatched_rows: 2,
    };
    let grouped = Table::new(
        "LatestSubChassis counts",
        vec![
            Column::new("LatestSubChassis", vec!["SC100".into(), "missing".into()]),
            Column::new("Count", vec![1.0.into(), 2.0.into()]),
        ],
    )
    .unwrap();

    let bytes = XlsxWriter::new(0xFFEB9C)
        .write_report(
            &table,
            "Mapped Data",
            &HighlightSpec::new(),
            Some(SummarySheet {
                stats: &stats,
                grouped: Some(&grouped),
            }),
        )
        .unwrap();

    let reader = XlsxReader;
    assert_eq!(reader.list_sheets(&bytes).unwrap(), vec!["Mapped Data", "Summary"]);

    let summary = reader.read_sheet(&bytes, &SheetRef::Index(1)).unwrap();
    assert_eq!(summary.column_names()[0], "Mapping Summary");

    let labels: Vec<String> = summary.column_at(0).values.iter().map(|v| v.to_string()).collect();
    let unmatched = labels.iter().position(|l| l == "Unmatched Rows:").unwrap();
    assert_eq!(summary.cell(unmatched, 1), &CellValue::Number(2.0));
    assert!(labels.iter().any(|l| l == "missing"));
}

#[test]
fn test_missing_sheet_is_parse_failure() {
    let bytes = XlsxWriter::default()
        .write_sheet(&mapped(), "Mapped Data", &HighlightSpec::new())
        .unwrap();
    let err = XlsxReader.read_sheet(&bytes, &SheetRef::from("Sheet1")).unwrap_err();
    assert!(matches!(err, MapperError::SheetParseFailure { .. }));
}
