//! Workbook package tests
//!
//! Charts, conditional formats and header styles are not visible through
//! calamine, so these tests open the rendered XLSX as a zip archive and
//! inspect the generated XML parts directly.
//!
//! Sample layout (report date 2025-07-03):
//! - sheet1: raw copy
//! - sheet2: Sales Report Generated (Result in column O)
//! - sheet3: SPEAKERS_Report, 2 overselling + 1 underselling rows
//! - sheet4: HEADPHONES_Report, 1 underselling row

use std::io::{Cursor, Read};

use chrono::NaiveDate;
use fcreport_core::{RawCell, RawTable, ReportDate, Renderer};
use fcreport_engine::ReportBuilder;
use fcreport_render::ExcelRenderer;
use pretty_assertions::assert_eq;
use zip::ZipArchive;

const HEADERS: [&str; 11] = [
    "Forecaster",
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
    let mut cells = vec![
        RawCell::from("Dana"),
        RawCell::from(sku),
        RawCell::from("Lee"),
        RawCell::from(bu),
    ];
    cells.extend([forecast, forecast, forecast, shipped, 0.0, 0.0, 0.0].map(RawCell::Number));
    cells
}

fn sample_table() -> RawTable {
    RawTable::new(HEADERS)
        .row(row("SPK-1", "SPEAKERS", 100.0, 150.0))
        .row(row("SPK-2", "SPEAKERS", 100.0, 70.0))
        .row(row("HP-1", "GAMING-HEADPHONES", 200.0, 100.0))
        .row(row("SPK-3", "SPEAKERS", 50.0, 80.0))
        .row(row("HP-2", "LIFESTYLE-HEADPHONES", 10.0, 10.0))
}

/// Rendered workbook opened as a zip package
struct Package {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Package {
    fn render(renderer: &ExcelRenderer, table: RawTable) -> Self {
        let date = ReportDate::new(NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        let report = ReportBuilder::new(date).build(table).unwrap();
        let bytes = renderer.render(&report).unwrap();
        Self {
            archive: ZipArchive::new(Cursor::new(bytes)).unwrap(),
        }
    }

    fn part(&mut self, name: &str) -> String {
        let mut xml = String::new();
        self.archive
            .by_name(name)
            .unwrap_or_else(|_| panic!("missing part {name}"))
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    fn chart_count(&self) -> usize {
        self.archive
            .file_names()
            .filter(|n| n.starts_with("xl/charts/chart") && n.ends_with(".xml"))
            .count()
    }
}

/// Value of the `<c:max val=".."/>` axis bound, if any
fn axis_max(chart_xml: &str) -> Option<f64> {
    let start = chart_xml.find("<c:max val=\"")? + "<c:max val=\"".len();
    let end = start + chart_xml[start..].find('"')?;
    chart_xml[start..end].parse().ok()
}

/// Style index of a cell, e.g. `s="3"` for `<c r="N1" s="3" ...>`
fn cell_style(sheet_xml: &str, cell: &str) -> String {
    let marker = format!("<c r=\"{cell}\" s=\"");
    let start = sheet_xml
        .find(&marker)
        .unwrap_or_else(|| panic!("no styled cell {cell}"))
        + marker.len();
    let end = start + sheet_xml[start..].find('"').unwrap();
    sheet_xml[start..end].to_string()
}

// ============================================================================
// Charts
// ============================================================================

#[test]
fn one_chart_per_non_empty_ranking_table() {
    let package = Package::render(&ExcelRenderer::new(), sample_table());
    // SPEAKERS: overselling + underselling, HEADPHONES: underselling only
    assert_eq!(package.chart_count(), 3);
}

#[test]
fn group_without_underselling_gets_a_single_chart() {
    let table = RawTable::new(HEADERS)
        .row(row("SPK-1", "SPEAKERS", 100.0, 150.0))
        .row(row("SPK-3", "SPEAKERS", 50.0, 80.0));
    let mut package = Package::render(&ExcelRenderer::new(), table);

    assert_eq!(package.chart_count(), 1);
    let chart = package.part("xl/charts/chart1.xml");
    assert!(chart.contains("Top 10 Overselling by Result"));
    assert_eq!(axis_max(&chart), None);
}

#[test]
fn overselling_chart_plots_sku_against_result() {
    let mut package = Package::render(&ExcelRenderer::new(), sample_table());
    let chart = package.part("xl/charts/chart1.xml");

    assert!(chart.contains("Top 10 Overselling by Result"));
    // Two rows under the header on row 6: B7:B8 (SKU), O7:O8 (Over FC)
    assert!(chart.contains("$B$7:$B$8"), "categories: {chart}");
    assert!(chart.contains("$O$7:$O$8"), "values: {chart}");
    assert_eq!(axis_max(&chart), None);
    assert!(!chart.contains("rot=\"2700000\""));
}

#[test]
fn underselling_chart_scales_axis_and_rotates_labels() {
    let mut package = Package::render(&ExcelRenderer::new(), sample_table());

    // SPEAKERS: header at row 26 (6 + 2 + 15 + 2, 0-based 25), one row
    let speakers = package.part("xl/charts/chart2.xml");
    assert!(speakers.contains("Top 10 Underselling by Result"));
    assert!(speakers.contains("$B$27:$B$27"), "categories: {speakers}");
    assert!(speakers.contains("$V$27:$V$27"), "values: {speakers}");
    let max = axis_max(&speakers).expect("y-axis max");
    assert!((max - 36.0).abs() < 1e-9, "1.2 x 30, got {max}");
    assert!(speakers.contains("rot=\"2700000\""));

    // HEADPHONES: no overselling rows, header at 0-based row 23
    let headphones = package.part("xl/charts/chart3.xml");
    assert!(headphones.contains("$B$25:$B$25"), "categories: {headphones}");
    assert!(headphones.contains("$V$25:$V$25"), "values: {headphones}");
    let max = axis_max(&headphones).expect("y-axis max");
    assert!((max - 120.0).abs() < 1e-9, "1.2 x 100, got {max}");
    assert!(headphones.contains("rot=\"2700000\""));
}

#[test]
fn charts_can_be_disabled() {
    let package = Package::render(&ExcelRenderer::new().no_charts(), sample_table());
    assert_eq!(package.chart_count(), 0);
}

// ============================================================================
// Conditional formats
// ============================================================================

#[test]
fn negative_results_are_conditionally_red() {
    let mut package = Package::render(&ExcelRenderer::new(), sample_table());

    let raw = package.part("xl/worksheets/sheet1.xml");
    assert!(!raw.contains("<cfRule"));

    let main = package.part("xl/worksheets/sheet2.xml");
    assert!(main.contains("sqref=\"O2:O6\""), "main sheet: {main}");
    assert!(main.contains("operator=\"lessThan\""));

    let speakers = package.part("xl/worksheets/sheet3.xml");
    assert!(speakers.contains("sqref=\"O27\""), "speakers: {speakers}");
    assert!(speakers.contains("operator=\"lessThan\""));

    let headphones = package.part("xl/worksheets/sheet4.xml");
    assert!(headphones.contains("sqref=\"O25\""), "headphones: {headphones}");
    assert!(headphones.contains("operator=\"lessThan\""));

    let styles = package.part("xl/styles.xml");
    assert!(styles.contains("FFFF0000"), "red font in dxf styles");
}

// ============================================================================
// Header styles
// ============================================================================

#[test]
fn only_derived_headers_are_highlighted() {
    let mut package = Package::render(&ExcelRenderer::new(), sample_table());
    let main = package.part("xl/worksheets/sheet2.xml");

    let plain = cell_style(&main, "A1");
    let highlighted = cell_style(&main, "N1");
    assert_ne!(plain, highlighted);

    // A..M: source columns and BU Group; N..U: the eight derived columns
    for col in 'A'..='M' {
        assert_eq!(cell_style(&main, &format!("{col}1")), plain, "column {col}");
    }
    for col in 'N'..='U' {
        assert_eq!(cell_style(&main, &format!("{col}1")), highlighted, "column {col}");
    }

    let styles = package.part("xl/styles.xml");
    assert!(styles.contains("FFFFC000"), "highlight fill");
}
