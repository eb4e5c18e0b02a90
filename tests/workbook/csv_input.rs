use std::path::Path;

use subchassis_mapper::MappingSession;
use subchassis_mapper::config::Config;
use subchassis_mapper::excel::{SheetRef, TableReader, XlsxReader, reader_for_path};
use subchassis_mapper::mapping::KeySpec;
use subchassis_mapper::table::CellValue;

const PLANNING: &[u8] = b"Style No,Dept,Season,Qty
A1,Men,SS25,10
A2 ,Men,SS25,4
B1,Women,,7
,,,
C9,Kids,AW25,1
";

const REFERENCE: &[u8] = b"Style,Dept,Season,LatestSubChassis
A1,Men,SS25,SC100
A2,Men,SS25,SC200
A2,Men,SS25,SC999
B1,Women,,SC300
";

#[test]
fn test_csv_is_single_sheet_named_after_file() {
    let reader = reader_for_path(Path::new("data/planning.csv"));
    assert_eq!(reader.list_sheets(PLANNING).unwrap(), vec!["planning"]);

    let table = reader.read_sheet(PLANNING, &SheetRef::Index(0)).unwrap();
    assert_eq!(table.column_names(), vec!["Style No", "Dept", "Season", "Qty"]);
    // the all-blank line is dropped
    assert_eq!(table.row_count(), 4);
    assert!(table.cell(2, 2).is_missing());
}

#[test]
fn test_session_from_csv_to_xlsx() {
    let planning = reader_for_path(Path::new("planning.csv"))
        .read_sheet(PLANNING, &SheetRef::Index(0))
        .unwrap();
    let reference = reader_for_path(Path::new("reference.csv"))
        .read_sheet(REFERENCE, &SheetRef::Index(0))
        .unwrap();

    let mut session = MappingSession::new(planning, reference);
    session.keys = KeySpec::single("Style No", "Style")
        .with_pair("Dept", "Dept")
        .with_pair("Season", "Season");
    session.summary = true;

    let config = Config::default();
    let outcome = session.run(&config).unwrap();

    // B1's season is blank on both sides; style still keys it
    assert_eq!(outcome.join.matched, vec![true, true, true, false]);
    assert_eq!(outcome.join.duplicate_reference_rows, 1);
    assert_eq!(outcome.report.stats.unmatched_rows, 1);
    assert_eq!(outcome.highlight.len(), 1);

    let reader = XlsxReader;
    assert_eq!(
        reader.list_sheets(&outcome.workbook).unwrap(),
        vec!["Mapped Data", "Summary"]
    );
    let written = reader.read_sheet(&outcome.workbook, &SheetRef::Index(0)).unwrap();
    let attribute = &written.column("LatestSubChassis").unwrap().values;
    assert_eq!(
        attribute,
        &vec![
            CellValue::text("SC100"),
            CellValue::text("SC200"),
            CellValue::text("SC300"),
            CellValue::Missing
        ]
    );
}
