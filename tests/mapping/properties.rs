use std::collections::HashSet;

use super::table;
use subchassis_mapper::mapping::{KeySpec, join, normalize};
use subchassis_mapper::report::{FilterSpec, ReportAssembler};
use subchassis_mapper::table::{CellValue, ColumnRef, Table};

/// Deterministic mix of padded, numeric, blank and repeated style codes
fn style_cell(seed: usize) -> CellValue {
    match seed % 7 {
        0 => CellValue::Missing,
        1 => CellValue::text(format!(" S{} ", seed % 5)),
        2 => CellValue::Number((seed % 4) as f64),
        3 => CellValue::text(""),
        _ => CellValue::text(format!("S{}", seed % 5)),
    }
}

fn planning(rows: usize) -> Table {
    table(
        "planning",
        &["Style", "Qty"],
        (0..rows)
            .map(|i| vec![style_cell(i * 3 + 1), CellValue::Number(i as f64)])
            .collect(),
    )
}

fn reference(rows: usize) -> Table {
    table(
        "reference",
        &["Style", "LatestSubChassis"],
        (0..rows)
            .map(|i| vec![style_cell(i * 5 + 2), CellValue::text(format!("SC{}", i))])
            .collect(),
    )
}

#[test]
fn test_join_preserves_left_rows_and_columns() {
    for (l, r) in [(0, 0), (1, 0), (0, 3), (7, 4), (20, 13), (31, 31)] {
        let left = planning(l);
        let right = reference(r);
        let result = join(
            &left,
            &right,
            &KeySpec::single("Style", "Style"),
            &[ColumnRef::new("LatestSubChassis")],
        )
        .unwrap();

        assert_eq!(result.table.row_count(), left.row_count());
        assert_eq!(result.row_count(), left.row_count());
        for (idx, column) in left.columns().iter().enumerate() {
            assert_eq!(result.table.column_at(idx), column);
        }
    }
}

#[test]
fn test_matched_iff_key_present_in_reference() {
    let left = planning(40);
    let right = reference(17);
    let result = join(
        &left,
        &right,
        &KeySpec::single("Style", "Style"),
        &[ColumnRef::new("LatestSubChassis")],
    )
    .unwrap();

    let reference_keys: HashSet<String> = right
        .column("Style")
        .unwrap()
        .values
        .iter()
        .map(normalize)
        .filter(|k| !k.is_empty())
        .collect();

    for (row, value) in left.column("Style").unwrap().values.iter().enumerate() {
        let key = normalize(value);
        let expected = !key.is_empty() && reference_keys.contains(&key);
        assert_eq!(result.matched[row], expected, "row {} key '{}'", row, key);
        assert_eq!(result.table.cell(row, 2).is_missing(), !expected);
    }
}

#[test]
fn test_normalize_is_idempotent() {
    let values = [
        CellValue::Missing,
        CellValue::text("  A1\t"),
        CellValue::text(""),
        CellValue::Number(1234.0),
        CellValue::Number(-0.5),
        CellValue::Bool(true),
    ];
    for value in values {
        let once = normalize(&value);
        assert_eq!(normalize(&CellValue::text(once.clone())), once);
    }
}

#[test]
fn test_empty_filter_is_identity() {
    let result = join(
        &planning(12),
        &reference(6),
        &KeySpec::single("Style", "Style"),
        &[ColumnRef::new("LatestSubChassis")],
    )
    .unwrap();
    let assembler = ReportAssembler::new("Style", "LatestSubChassis");

    let empty_sets = FilterSpec::new().with("Style", Vec::<String>::new());
    for filters in [FilterSpec::new(), empty_sets] {
        let report = assembler.filter_and_summarize(&result, &filters, None).unwrap();
        assert_eq!(report.table, result.table);
        assert_eq!(report.stats.unmatched_rows, result.unmatched_count());
    }
}
