mod common;

use std::io::Write;

use serp_pixel::report::format_summary;
use serp_pixel::{
    BatchRunner, BatchSummary, Cell, DelimitedSheet, Delimiter, FieldKind, SerpError,
    SheetColumns, SheetRow, WidthMeasurer,
};

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

#[test]
fn test_unreadable_row_does_not_stop_batch() {
    let rows = vec![
        SheetRow::new(1, text("First title"), text("First description")),
        SheetRow::new(
            2,
            text("Second title"),
            Cell::Unreadable("cell holds a formula error".into()),
        ),
        SheetRow::new(3, text("Third title"), Cell::Empty),
    ];

    let mut runner = BatchRunner::new(common::sans_measurer());
    let out: Vec<_> = runner.run(rows).collect();

    assert_eq!(out.len(), 3);
    assert_eq!(
        out.iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let first = out[0].outcome.as_ref().unwrap();
    assert!(first.title.is_some());
    assert!(first.description.is_some());

    match &out[1].outcome {
        Err(SerpError::RowRead { row, .. }) => assert_eq!(*row, 2),
        other => panic!("expected a row read error, got {other:?}"),
    }

    let third = out[2].outcome.as_ref().unwrap();
    assert!(third.title.is_some());
    assert!(third.description.is_none());
}

#[test]
fn test_row_results_match_single_measurements() {
    let mut single = common::sans_measurer();
    let expected = single
        .measure("Trail Running Shoes", FieldKind::Title)
        .unwrap();

    let mut runner = BatchRunner::new(common::sans_measurer());
    let row = runner.measure_row(SheetRow::new(
        5,
        text("  Trail Running Shoes  "),
        Cell::Empty,
    ));
    let measured = row.outcome.unwrap();
    assert_eq!(measured.title, Some(expected));
    assert_eq!(measured.iter().count(), 1);
}

#[test]
fn test_font_failure_is_captured_per_row() {
    let mut runner = BatchRunner::new(WidthMeasurer::new(
        serp_pixel::serp_pixel_fonts::FontTable::new(),
    ));
    let rows = vec![
        SheetRow::new(2, text("Needs a font"), Cell::Empty),
        SheetRow::new(3, Cell::Empty, Cell::Empty),
    ];
    let out: Vec<_> = runner.run(rows).collect();
    assert!(out[0].is_error());
    assert!(!out[1].is_error());
}

#[test]
fn test_sheet_file_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "URL\tTitle\tDescription").unwrap();
    writeln!(file, "/a\tRunning Shoes\tLightweight shoes for daily runs").unwrap();
    writeln!(file, "/b\t{}\t", "Very Long Title ".repeat(10).trim()).unwrap();
    writeln!(file, "/c\t\t   ").unwrap();
    file.flush().unwrap();

    let columns = SheetColumns::from_letters(Some("B"), Some("C")).unwrap();
    let sheet = DelimitedSheet::open(file.path(), Delimiter::Tab, columns, 2).unwrap();

    let mut runner = BatchRunner::new(common::sans_measurer());
    let mut summary = BatchSummary::new();
    for row in runner.run(sheet) {
        summary.record(&row);
    }

    assert!(summary.failed_rows.is_empty());
    assert_eq!(summary.title.total, 2);
    assert_eq!(summary.title.ok, 1);
    assert_eq!(summary.title.over, 1);
    assert_eq!(summary.title.over_rows[0].row, 3);
    assert_eq!(summary.description.total, 1);
    assert_eq!(summary.description.ok, 1);

    let table = format_summary(&summary, &[FieldKind::Title, FieldKind::Description]);
    assert!(table.contains("TITLES: 1/2 OK | 1 over 580px limit"));
    assert!(table.contains("DESCRIPTIONS: 1/1 OK | 0 over 990px limit"));
}

#[test]
fn test_summary_serializes_for_json_output() {
    let rows = vec![SheetRow::new(2, text("Shoes"), Cell::Empty)];
    let mut runner = BatchRunner::new(common::sans_measurer());
    let mut summary = BatchSummary::new();
    for row in runner.run(rows) {
        summary.record(&row);
    }
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["title"]["total"], 1);
    assert_eq!(json["title"]["max_px"], 580);
    assert_eq!(json["failed_rows"].as_array().unwrap().len(), 0);
}
