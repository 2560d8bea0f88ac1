//! Integration tests for Excel rendering
//!
//! Reports are built with the engine, saved to a temp file and read back
//! with calamine to check sheet order, layout and cell values.

use std::fs::File;
use std::io::BufReader;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::NaiveDate;
use fcreport_core::{RawCell, RawTable, RenderError, ReportDate, SalesReport};
use fcreport_engine::ReportBuilder;
use fcreport_render::ExcelRenderer;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const HEADERS: [&str; 11] = [
    "Forecaster ",
    "SKU",
    "Sales Rep",
    "BU",
    "Starting Forecast",
    "Lag 3 Fcst",
    "Forecast",
    "Shipped",
    "Delivery Notes",
    "Current Allocation",
    "Open Orders",
];

fn row(sku: &str, bu: &str, forecast: f64, shipped: f64) -> Vec<RawCell> {
    vec![
        RawCell::from("Dana"),
        RawCell::from(sku),
        RawCell::from("Lee"),
        RawCell::from(bu),
        RawCell::Number(forecast),
        RawCell::Number(forecast),
        RawCell::Number(forecast),
        RawCell::Number(shipped),
        RawCell::Number(0.0),
        RawCell::Number(0.0),
        RawCell::Number(0.0),
    ]
}

/// Two groups: SPEAKERS with two over / one under, HEADPHONES with one under
fn create_report(table: RawTable) -> SalesReport {
    let date = ReportDate::new(NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
    ReportBuilder::new(date).build(table).unwrap()
}

fn sample_table() -> RawTable {
    RawTable::new(HEADERS)
        .row(row("SPK-1", "SPEAKERS", 100.0, 150.0))
        .row(row("SPK-2", "SPEAKERS", 100.0, 70.0))
        .row(row("HP-1", "GAMING-HEADPHONES", 200.0, 100.0))
        .row(row("SPK-3", "SPEAKERS", 50.0, 80.0))
        .row(row("HP-2", "LIFESTYLE-HEADPHONES", 10.0, 10.0))
}

fn render_and_open(
    renderer: &ExcelRenderer,
    report: &SalesReport,
) -> (TempDir, Sheets<BufReader<File>>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    renderer.save(report, &path).unwrap();
    let workbook = open_workbook_auto(&path).unwrap();
    (dir, workbook)
}

fn sheet(workbook: &mut Sheets<BufReader<File>>, name: &str) -> Range<Data> {
    workbook.worksheet_range(name).unwrap()
}

fn text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected text at ({row}, {col}), got {other:?}"),
    }
}

fn number(range: &Range<Data>, row: u32, col: u32) -> f64 {
    match range.get_value((row, col)) {
        Some(Data::Float(n)) => *n,
        Some(Data::Int(n)) => *n as f64,
        other => panic!("expected number at ({row}, {col}), got {other:?}"),
    }
}

#[test]
fn sheets_are_written_in_order() {
    let report = create_report(sample_table());
    let (_dir, workbook) = render_and_open(&ExcelRenderer::new(), &report);

    assert_eq!(
        workbook.sheet_names(),
        vec![
            "fc_v_actual_Data_7.3.25",
            "Sales Report Generated",
            "SPEAKERS_Report",
            "HEADPHONES_Report",
        ]
    );
}

#[test]
fn raw_sheet_is_a_verbatim_copy() {
    let report = create_report(sample_table());
    let (_dir, mut workbook) = render_and_open(&ExcelRenderer::new(), &report);
    let raw = sheet(&mut workbook, "fc_v_actual_Data_7.3.25");

    assert_eq!(text(&raw, 0, 0), "Forecaster ");
    assert_eq!(text(&raw, 0, 10), "Open Orders");
    assert_eq!(text(&raw, 3, 1), "HP-1");
    assert_eq!(text(&raw, 3, 3), "GAMING-HEADPHONES");
    assert_eq!(number(&raw, 3, 6), 200.0);
    assert_eq!(raw.height(), 6);
}

#[test]
fn main_sheet_holds_every_row_with_metrics() {
    let report = create_report(sample_table());
    let (_dir, mut workbook) = render_and_open(&ExcelRenderer::new(), &report);
    let main = sheet(&mut workbook, "Sales Report Generated");

    assert_eq!(main.height(), 6);
    assert_eq!(text(&main, 0, 0), "FORECASTER");
    assert_eq!(text(&main, 0, 3), "BU");
    assert_eq!(text(&main, 0, 4), "BU Code");
    assert_eq!(text(&main, 0, 6), "Lag 3 Fcst");
    assert_eq!(text(&main, 0, 14), "Result (Over FC or Under FC)");
    assert_eq!(text(&main, 0, 20), "% Difference");

    // HP-1: display label, source code, result and status
    assert_eq!(text(&main, 3, 1), "HP-1");
    assert_eq!(text(&main, 3, 3), "HEADPHONES - GAMING");
    assert_eq!(text(&main, 3, 4), "GAMING-HEADPHONES");
    assert_eq!(text(&main, 3, 12), "HEADPHONES");
    assert_eq!(number(&main, 3, 13), 100.0);
    assert_eq!(number(&main, 3, 14), -100.0);
    assert_eq!(text(&main, 3, 16), "Underselling");

    // 3 July of a 31-day month
    assert_eq!(number(&main, 1, 17), 0.1);

    // HP-2 sold exactly its forecast
    assert_eq!(text(&main, 5, 16), "On Target");
}

#[test]
fn group_sheet_layout() {
    let report = create_report(sample_table());
    let (_dir, mut workbook) = render_and_open(&ExcelRenderer::new(), &report);
    let speakers = sheet(&mut workbook, "SPEAKERS_Report");

    assert_eq!(text(&speakers, 0, 0), "Sales Performance Report");
    assert_eq!(text(&speakers, 1, 0), "Business Unit (BU): SPEAKERS");
    assert_eq!(text(&speakers, 2, 0), "Generated On: 03-Jul-2025");
    assert_eq!(text(&speakers, 3, 0), "Top 10 Overselling and Underselling SKUs");

    // Overselling table: header on row 6, highest result first
    assert_eq!(text(&speakers, 5, 14), "Over FC");
    assert_eq!(text(&speakers, 5, 21), "Result_Abs");
    assert_eq!(text(&speakers, 6, 1), "SPK-1");
    assert_eq!(text(&speakers, 7, 1), "SPK-3");
    assert_eq!(number(&speakers, 7, 21), 30.0);

    // Underselling table after the two overselling rows and the gap
    let under_header = 6 + 2 + 15 + 2;
    assert_eq!(text(&speakers, under_header, 14), "Under FC");
    assert_eq!(text(&speakers, under_header + 1, 1), "SPK-2");
    assert_eq!(number(&speakers, under_header + 1, 14), -30.0);
    assert_eq!(number(&speakers, under_header + 1, 21), 30.0);
}

#[test]
fn group_without_overselling_keeps_both_headers() {
    let report = create_report(sample_table());
    let (_dir, mut workbook) = render_and_open(&ExcelRenderer::new(), &report);
    let headphones = sheet(&mut workbook, "HEADPHONES_Report");

    assert_eq!(text(&headphones, 5, 14), "Over FC");
    assert_eq!(headphones.get_value((6, 1)), Some(&Data::Empty));

    let under_header = 6 + 15 + 2;
    assert_eq!(text(&headphones, under_header, 14), "Under FC");
    assert_eq!(text(&headphones, under_header + 1, 1), "HP-1");
    assert_eq!(text(&headphones, under_header + 1, 3), "HEADPHONES - GAMING");
}

#[test]
fn long_and_empty_labels_get_valid_sheet_names() {
    let table = RawTable::new(HEADERS)
        .row(row("X-1", "PORTABLE OUTDOOR SPEAKERS SERIES", 10.0, 20.0))
        .row(row("X-2", "", 10.0, 5.0));
    let report = create_report(table);
    let (_dir, workbook) = render_and_open(&ExcelRenderer::new(), &report);

    let names = workbook.sheet_names();
    assert_eq!(names[2], "PORTABLE OUTDOOR SPEAKER_Report");
    assert_eq!(names[3], "UnknownBU_Report");
    assert!(names.iter().all(|n| n.chars().count() <= 31));
}

#[test]
fn raw_copy_can_be_skipped() {
    let report = create_report(sample_table());
    let renderer = ExcelRenderer::new().no_raw_copy().no_charts();
    let (_dir, workbook) = render_and_open(&renderer, &report);
    assert_eq!(workbook.sheet_names()[0], "Sales Report Generated");
    assert_eq!(workbook.sheet_names().len(), 3);
}

#[test]
fn empty_dataset_renders_main_sheet_only() {
    let report = create_report(RawTable::new(HEADERS));
    let (_dir, mut workbook) = render_and_open(&ExcelRenderer::new(), &report);

    assert_eq!(
        workbook.sheet_names(),
        vec!["fc_v_actual_Data_7.3.25", "Sales Report Generated"]
    );
    let main = sheet(&mut workbook, "Sales Report Generated");
    assert_eq!(main.height(), 1);
}

#[test]
fn save_reports_io_failures() {
    let report = create_report(sample_table());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.xlsx");

    let err = ExcelRenderer::new().save(&report, &path).unwrap_err();
    assert!(matches!(err, RenderError::Io(_)), "got {err:?}");
    assert!(err.to_string().starts_with("IO error:"));
    assert!(!path.exists());
}
