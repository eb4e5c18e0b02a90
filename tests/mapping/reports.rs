use super::{table, text_rows};
use subchassis_mapper::MapperError;
use subchassis_mapper::mapping::{JoinResult, KeySpec, join};
use subchassis_mapper::report::{FilterSpec, ReportAssembler, render_bar_chart};
use subchassis_mapper::table::{CellValue, ColumnRef};

fn joined() -> JoinResult {
    let planning = table(
        "planning",
        &["Style", "Dept", "Season"],
        text_rows(&[
            &[Some("A1"), Some("Men"), Some("SS25")],
            &[Some("A2"), Some("Men"), Some("SS25")],
            &[Some("B1"), Some("Women"), Some("AW25")],
            &[Some("C1"), None, Some("AW25")],
        ]),
    );
    let reference = table(
        "reference",
        &["Style", "LatestSubChassis"],
        text_rows(&[&[Some("A1"), Some("SC100")], &[Some("B1"), Some("SC200")]]),
    );
    join(
        &planning,
        &reference,
        &KeySpec::single("Style", "Style"),
        &[ColumnRef::new("LatestSubChassis")],
    )
    .unwrap()
}

fn assembler() -> ReportAssembler {
    ReportAssembler::new("Style", "LatestSubChassis")
}

fn pairs(grouped: &subchassis_mapper::table::Table) -> Vec<(String, f64)> {
    (0..grouped.row_count())
        .map(|row| {
            let count = match grouped.cell(row, 1) {
                CellValue::Number(n) => *n,
                other => panic!("count is not a number: {other:?}"),
            };
            (grouped.cell(row, 0).to_string(), count)
        })
        .collect()
}

#[test]
fn test_grouping_with_missing_category() {
    let report = assembler()
        .filter_and_summarize(&joined(), &FilterSpec::new(), Some(&ColumnRef::new("Dept")))
        .unwrap();
    assert_eq!(
        pairs(&report.grouped.unwrap()),
        vec![
            ("Men".to_string(), 2.0),
            ("Women".to_string(), 1.0),
            ("missing".to_string(), 1.0)
        ]
    );
}

#[test]
fn test_filter_then_group_on_attribute() {
    let filters = FilterSpec::new().with("Season", ["AW25"]);
    let report = assembler()
        .filter_and_summarize(&joined(), &filters, Some(&ColumnRef::new("LatestSubChassis")))
        .unwrap();

    assert_eq!(report.stats.total_rows, 2);
    assert_eq!(report.stats.distinct_keys, 2);
    assert_eq!(report.stats.unmatched_rows, 1);
    assert_eq!(
        pairs(&report.grouped.unwrap()),
        vec![("SC200".to_string(), 1.0), ("missing".to_string(), 1.0)]
    );
}

#[test]
fn test_filter_can_select_missing_cells() {
    let filters = FilterSpec::new().with_missing("LatestSubChassis");
    let report = assembler()
        .filter_and_summarize(&joined(), &filters, None)
        .unwrap();
    let styles: Vec<String> = report
        .table
        .column("Style")
        .unwrap()
        .values
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(styles, vec!["A2", "C1"]);
}

#[test]
fn test_missing_text_stays_apart_from_blank_cells() {
    let planning = table(
        "planning",
        &["Style", "Dept"],
        text_rows(&[
            &[Some("A1"), Some("missing")],
            &[Some("A2"), None],
            &[Some("A3"), Some("missing")],
        ]),
    );
    let reference = table(
        "reference",
        &["Style", "LatestSubChassis"],
        text_rows(&[&[Some("A1"), Some("SC100")]]),
    );
    let result = join(
        &planning,
        &reference,
        &KeySpec::single("Style", "Style"),
        &[ColumnRef::new("LatestSubChassis")],
    )
    .unwrap();

    let report = assembler()
        .filter_and_summarize(&result, &FilterSpec::new(), Some(&ColumnRef::new("Dept")))
        .unwrap();
    let grouped = report.grouped.unwrap();
    assert_eq!(grouped.row_count(), 2);
    assert_eq!(pairs(&grouped)[0], ("missing".to_string(), 2.0));
    assert_eq!(pairs(&grouped)[1], ("missing".to_string(), 1.0));

    let blank_only = FilterSpec::new().with_missing("Dept");
    let report = assembler()
        .filter_and_summarize(&result, &blank_only, None)
        .unwrap();
    assert_eq!(report.table.row_count(), 1);
    assert_eq!(report.table.cell(0, 0), &CellValue::text("A2"));
}

#[test]
fn test_filters_are_conjunctive() {
    let filters = FilterSpec::new()
        .with("Dept", ["Men", "Women"])
        .with("Season", ["SS25"]);
    let report = assembler()
        .filter_and_summarize(&joined(), &filters, None)
        .unwrap();
    assert_eq!(report.table.row_count(), 2);
}

#[test]
fn test_unknown_group_column() {
    let err = assembler()
        .filter_and_summarize(&joined(), &FilterSpec::new(), Some(&ColumnRef::new("Region")))
        .unwrap_err();
    assert!(matches!(err, MapperError::ColumnNotFound { column, .. } if column == "Region"));
}

#[test]
fn test_terminal_chart_scales_bars() {
    let report = assembler()
        .filter_and_summarize(&joined(), &FilterSpec::new(), Some(&ColumnRef::new("Dept")))
        .unwrap();
    let chart = render_bar_chart(&report.grouped.unwrap(), "Dept", "Count", 10).unwrap();
    let lines: Vec<&str> = chart.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].matches('█').count(), 10);
    assert_eq!(lines[1].matches('█').count(), 5);
    assert!(lines[2].starts_with("missing"));
}
