use super::{table, text_rows};
use subchassis_mapper::MapperError;
use subchassis_mapper::mapping::{BlankKeyPolicy, JoinOptions, JoinReconciler, KeySpec, join};
use subchassis_mapper::table::{CellValue, ColumnRef};

#[test]
fn test_style_and_dept_composite_key() {
    let left = table(
        "planning",
        &["Style", "Dept"],
        text_rows(&[&[Some("A1"), Some("Men")], &[Some("A2"), Some("Men")]]),
    );
    let right = table(
        "reference",
        &["Style", "Dept", "LatestSubChassis"],
        text_rows(&[&[Some("A1"), Some("Men"), Some("SC100")]]),
    );

    let keys = KeySpec::single("Style", "Style").with_pair("Dept", "Dept");
    let result = join(&left, &right, &keys, &[ColumnRef::new("LatestSubChassis")]).unwrap();

    assert_eq!(result.table.column_names(), vec!["Style", "Dept", "LatestSubChassis"]);
    assert_eq!(result.matched, vec![true, false]);
    assert_eq!(result.table.cell(0, 2), &CellValue::text("SC100"));
    assert_eq!(result.table.cell(1, 2), &CellValue::Missing);
    assert_eq!(result.unmatched_rows(), vec![1]);
}

#[test]
fn test_keys_match_across_text_and_number_cells() {
    let left = table("planning", &["Style"], vec![vec![CellValue::Number(1234.0)]]);
    let right = table(
        "reference",
        &["Style #", "LatestSubChassis"],
        vec![vec![CellValue::text(" 1234 "), CellValue::text("SC7")]],
    );

    let result = join(
        &left,
        &right,
        &KeySpec::single("Style", "Style #"),
        &[ColumnRef::new("LatestSubChassis")],
    )
    .unwrap();
    assert_eq!(result.matched_count(), 1);
    assert_eq!(result.table.cell(0, 1), &CellValue::text("SC7"));
}

#[test]
fn test_first_reference_row_wins() {
    let left = table("planning", &["Style"], text_rows(&[&[Some("A1")]]));
    let right = table(
        "reference",
        &["Style", "LatestSubChassis"],
        text_rows(&[&[Some("A1"), Some("first")], &[Some("A1 "), Some("second")]]),
    );

    let result = join(
        &left,
        &right,
        &KeySpec::single("Style", "Style"),
        &[ColumnRef::new("LatestSubChassis")],
    )
    .unwrap();
    assert_eq!(result.table.cell(0, 1), &CellValue::text("first"));
    assert_eq!(result.duplicate_reference_rows, 1);
}

#[test]
fn test_blank_keys_follow_policy() {
    let left = table(
        "planning",
        &["Style", "Season"],
        text_rows(&[
            &[Some("A1"), None],
            &[Some("A2"), Some("SS25")],
            &[None, Some("SS25")],
        ]),
    );
    let right = table(
        "reference",
        &["Style", "Season", "LatestSubChassis"],
        text_rows(&[
            &[Some("A1"), Some(" "), Some("SC1")],
            &[Some("A2"), Some("SS25"), Some("SC2")],
            &[Some(""), Some("SS25"), Some("SC3")],
        ]),
    );
    let keys = KeySpec::single("Style", "Style").with_pair("Season", "Season");
    let attributes = [ColumnRef::new("LatestSubChassis")];

    // a blank season still keys on style; a blank style never matches
    let strict = join(&left, &right, &keys, &attributes).unwrap();
    assert_eq!(strict.matched, vec![true, true, false]);
    assert_eq!(strict.table.cell(0, 2), &CellValue::text("SC1"));
    assert!(strict.table.cell(2, 2).is_missing());

    let literal = JoinReconciler::new(JoinOptions {
        blank_keys: BlankKeyPolicy::MatchLiteral,
        ..JoinOptions::default()
    })
    .join(&left, &right, &keys, &attributes)
    .unwrap();
    assert_eq!(literal.matched, vec![true, true, true]);
    assert_eq!(literal.table.cell(2, 2), &CellValue::text("SC3"));
}

#[test]
fn test_colliding_attribute_name_is_suffixed() {
    let left = table(
        "planning",
        &["Style", "LatestSubChassis"],
        text_rows(&[&[Some("A1"), Some("old")]]),
    );
    let right = table(
        "reference",
        &["Style", "LatestSubChassis"],
        text_rows(&[&[Some("A1"), Some("new")]]),
    );

    let result = join(
        &left,
        &right,
        &KeySpec::single("Style", "Style"),
        &[ColumnRef::new("LatestSubChassis")],
    )
    .unwrap();
    assert_eq!(result.attribute_columns, vec!["LatestSubChassis_ref"]);
    assert_eq!(result.table.cell(0, 1), &CellValue::text("old"));
    assert_eq!(result.table.cell(0, 2), &CellValue::text("new"));
}

#[test]
fn test_custom_separator_changes_nothing_for_plain_keys() {
    let left = table("planning", &["A", "B"], text_rows(&[&[Some("x"), Some("y")]]));
    let right = table("reference", &["A", "B", "V"], text_rows(&[&[Some("x"), Some("y"), Some("1")]]));

    let result = JoinReconciler::new(JoinOptions {
        separator: "|".to_string(),
        ..JoinOptions::default()
    })
    .join(
        &left,
        &right,
        &KeySpec::single("A", "A").with_pair("B", "B"),
        &[ColumnRef::new("V")],
    )
    .unwrap();
    assert_eq!(result.matched, vec![true]);
}

#[test]
fn test_unknown_columns_rejected_before_join() {
    let left = table("planning", &["Style"], text_rows(&[&[Some("A1")]]));
    let right = table("reference", &["Style", "LatestSubChassis"], vec![]);

    let err = join(&left, &right, &KeySpec::single("Style No", "Style"), &[]).unwrap_err();
    match err {
        MapperError::ColumnNotFound { column, table } => {
            assert_eq!(column, "Style No");
            assert_eq!(table, "planning");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = join(
        &left,
        &right,
        &KeySpec::single("Style", "Style"),
        &[ColumnRef::new("SubChassis")],
    )
    .unwrap_err();
    assert!(matches!(err, MapperError::ColumnNotFound { .. }));

    let err = join(&left, &right, &KeySpec::new(), &[]).unwrap_err();
    assert!(matches!(err, MapperError::EmptyKeySpec));
}
