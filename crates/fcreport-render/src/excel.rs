//! Excel sales report renderer
//!
//! Generates an XLSX workbook with these sheets, in order:
//! - `fc_v_actual_Data_<M.D.YY>`: verbatim copy of the source table
//! - `Sales Report Generated`: every row with its derived metrics
//! - `<group>_Report`: one per business-unit group, with the top overselling
//!   and underselling SKUs and a column chart for each
//!
//! ## Group Sheet Layout
//!
//! ```text
//! A1  Sales Performance Report
//! A2  Business Unit (BU): HEADPHONES
//! A3  Generated On: 03-Jul-2025
//! A4  Top 10 Overselling and Underselling SKUs
//! A6  | FORECASTER | SKU | ... | Over FC | ... | Result_Abs |     [chart at L, 2 rows below]
//!     | ...        |     |     |         |     |            |
//!     (15 + 2 spacer rows)
//!     | FORECASTER | SKU | ... | Under FC | ... | Result_Abs |    [chart at L, 2 rows below]
//! ```
//!
//! Negative `Result` / `Under FC` values are colored through **conditional
//! formatting**, so they stay highlighted if a user edits the numbers.
//!
//! The renderer only lays out what the engine computed; it derives no
//! values of its own.

use std::path::Path;

use fcreport_core::{
    EnrichedRecord, GroupRanking, RankedRecord, RawCell, RawTable, RenderError, Renderer,
    SalesReport,
};
use rust_xlsxwriter::{
    Chart, ChartAxisLabelPosition, ChartFont, ChartType, ConditionalFormatCell,
    ConditionalFormatCellRule, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};
use tracing::{debug, info};

use crate::columns::{position, CellValue, Column, ColumnKind};
use crate::sheet_names::{raw_sheet_name, SheetNamer, MAIN_SHEET_NAME};

/// Header row of the overselling table on group sheets (row 6)
const TABLE_HEADER_ROW: u32 = 5;

/// Charts are anchored in column L
const CHART_COLUMN: u16 = 11;

const REPORT_TITLE: &str = "Sales Performance Report";
const SECTION_CAPTION: &str = "Top 10 Overselling and Underselling SKUs";
const MAIN_RESULT_TITLE: &str = "Result (Over FC or Under FC)";

/// Excel sales report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Background of highlighted header cells
    pub header_color: u32,
    /// Font color for negative results
    pub negative_color: u32,
    /// Width of numeric columns
    pub column_width: f64,
    /// Blank rows between the overselling and underselling tables
    pub section_gap: u32,
    /// Whether to include the raw data copy sheet
    pub include_raw_copy: bool,
    /// Whether to add charts to group sheets
    pub include_charts: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            header_color: 0xFFC000,
            negative_color: 0xFF0000,
            column_width: 12.0,
            section_gap: 15,
            include_raw_copy: true,
            include_charts: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set highlighted header background (0xRRGGBB)
    pub fn header_color(mut self, color: u32) -> Self {
        self.header_color = color;
        self
    }

    /// Set negative value font color (0xRRGGBB)
    pub fn negative_color(mut self, color: u32) -> Self {
        self.negative_color = color;
        self
    }

    /// Set blank rows between the two ranking tables
    pub fn section_gap(mut self, rows: u32) -> Self {
        self.section_gap = rows;
        self
    }

    /// Skip the raw data copy sheet
    pub fn no_raw_copy(mut self) -> Self {
        self.include_raw_copy = false;
        self
    }

    /// Skip charts on group sheets
    pub fn no_charts(mut self) -> Self {
        self.include_charts = false;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, report: &SalesReport) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats();
        let mut namer = SheetNamer::new();

        if self.include_raw_copy {
            let name = raw_sheet_name(report.date);
            namer.reserve(&name);
            info!(sheet = %name, "Writing raw data sheet");
            self.add_raw_sheet(&mut workbook, &name, &report.raw, &formats)?;
        }

        namer.reserve(MAIN_SHEET_NAME);
        info!(rows = report.records.len(), "Writing full sales report sheet");
        self.add_main_sheet(&mut workbook, &report.records, &formats)?;

        let generated_on = report.date.generated_on();
        for group in &report.groups {
            let name = namer.group_sheet(&group.label);
            info!(group = %group.label, sheet = %name, "Processing Business Unit");
            self.add_group_sheet(&mut workbook, &name, group, &generated_on, &formats)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Render `report` and write the workbook to `path`
    pub fn save(&self, report: &SalesReport, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render(report)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Create reusable formats
    fn create_formats(&self) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let highlight_header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(self.header_color)
            .set_border(FormatBorder::Thin);

        let title = Format::new().set_bold().set_font_size(14);

        let integer = Format::new().set_num_format("#,##0");
        let percent = Format::new().set_num_format("0%");

        let date = Format::new().set_num_format("yyyy-mm-dd");
        let datetime = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

        let negative = Format::new().set_font_color(self.negative_color);

        ExcelFormats {
            header,
            highlight_header,
            title,
            integer,
            percent,
            date,
            datetime,
            negative,
        }
    }

    /// Add the verbatim copy of the source table
    fn add_raw_sheet(
        &self,
        workbook: &mut Workbook,
        name: &str,
        raw: &RawTable,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).map_err(xlsx_err)?;

        for (col, header) in raw.headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            sheet
                .write_string_with_format(0, col as u16, header, &formats.header)
                .map_err(xlsx_err)?;
        }

        for (i, cells) in raw.rows.iter().enumerate() {
            let row = i as u32 + 1;
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                match cell {
                    RawCell::Empty => {}
                    RawCell::Text(s) => {
                        sheet.write_string(row, col, s).map_err(xlsx_err)?;
                    }
                    RawCell::Number(n) => {
                        sheet.write_number(row, col, *n).map_err(xlsx_err)?;
                    }
                    RawCell::Bool(b) => {
                        sheet.write_boolean(row, col, *b).map_err(xlsx_err)?;
                    }
                    RawCell::DateTime(serial) => {
                        let format = if serial.fract() == 0.0 {
                            &formats.date
                        } else {
                            &formats.datetime
                        };
                        sheet
                            .write_number_with_format(row, col, *serial, format)
                            .map_err(xlsx_err)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Add the full enriched data sheet
    fn add_main_sheet(
        &self,
        workbook: &mut Workbook,
        records: &[EnrichedRecord],
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(MAIN_SHEET_NAME).map_err(xlsx_err)?;

        let columns = &Column::REPORT;
        let result_col = column_index(columns, Column::Result)?;

        let written = self.write_table(
            sheet,
            0,
            columns,
            MAIN_RESULT_TITLE,
            records.iter().map(|r| (r, None)),
            formats,
        )?;

        if written > 0 {
            self.highlight_negatives(sheet, 1, written, result_col, formats)?;
        }

        self.set_widths(sheet, columns);
        sheet.set_freeze_panes(1, 0).ok();

        Ok(())
    }

    /// Add one business-unit sheet with both ranking tables
    fn add_group_sheet(
        &self,
        workbook: &mut Workbook,
        name: &str,
        group: &GroupRanking,
        generated_on: &str,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).map_err(xlsx_err)?;

        sheet
            .write_string_with_format(0, 0, REPORT_TITLE, &formats.title)
            .map_err(xlsx_err)?;
        sheet
            .write_string(1, 0, format!("Business Unit (BU): {}", group.label))
            .map_err(xlsx_err)?;
        sheet
            .write_string(2, 0, format!("Generated On: {}", generated_on))
            .map_err(xlsx_err)?;
        sheet
            .write_string(3, 0, SECTION_CAPTION)
            .map_err(xlsx_err)?;

        let columns = &Column::RANKING;
        let sku_col = column_index(columns, Column::Sku)?;
        let result_col = column_index(columns, Column::Result)?;
        let abs_col = column_index(columns, Column::AbsResult)?;

        // Overselling section
        debug!(group = %group.label, rows = group.overselling.len(), "overselling table");
        let over_header = TABLE_HEADER_ROW;
        let n_over = self.write_table(
            sheet,
            over_header,
            columns,
            "Over FC",
            ranked_rows(&group.overselling),
            formats,
        )?;

        if n_over > 0 && self.include_charts {
            let (first, last) = (over_header + 1, over_header + n_over);
            let mut chart = Chart::new(ChartType::Column);
            chart
                .add_series()
                .set_name("Overselling")
                .set_categories((name, first, sku_col, last, sku_col))
                .set_values((name, first, result_col, last, result_col));
            chart.title().set_name("Top 10 Overselling by Result");
            chart.y_axis().set_name("Result");

            sheet
                .insert_chart(last + 2, CHART_COLUMN, &chart)
                .map_err(xlsx_err)?;
        }

        // Underselling section
        debug!(group = %group.label, rows = group.underselling.len(), "underselling table");
        let under_header = over_header + 1 + n_over + self.section_gap + 2;
        let n_under = self.write_table(
            sheet,
            under_header,
            columns,
            "Under FC",
            ranked_rows(&group.underselling),
            formats,
        )?;

        if n_under > 0 {
            let (first, last) = (under_header + 1, under_header + n_under);

            if self.include_charts {
                let mut chart = Chart::new(ChartType::Column);
                chart
                    .add_series()
                    .set_name("Underselling")
                    .set_categories((name, first, sku_col, last, sku_col))
                    .set_values((name, first, abs_col, last, abs_col));
                chart.title().set_name("Top 10 Underselling by Result");

                let y_axis = chart.y_axis().set_name("Absolute Result");
                if let Some(max) = group.max_underselling_magnitude() {
                    y_axis.set_max(max * 1.2);
                }

                chart
                    .x_axis()
                    .set_name("SKU")
                    .set_label_position(ChartAxisLabelPosition::Low)
                    .set_font(&ChartFont::new().set_rotation(45));

                sheet
                    .insert_chart(last + 2, CHART_COLUMN, &chart)
                    .map_err(xlsx_err)?;
            }

            self.highlight_negatives(sheet, first, last, result_col, formats)?;
        }

        self.set_widths(sheet, columns);

        Ok(())
    }

    /// Write a header row at `start_row` followed by one row per record.
    ///
    /// Returns the number of data rows written.
    fn write_table<'a>(
        &self,
        sheet: &mut Worksheet,
        start_row: u32,
        columns: &[Column],
        result_title: &str,
        rows: impl Iterator<Item = (&'a EnrichedRecord, Option<f64>)>,
        formats: &ExcelFormats,
    ) -> Result<u32, RenderError> {
        for (col, column) in columns.iter().enumerate() {
            let title = if *column == Column::Result {
                result_title
            } else {
                column.title()
            };
            let format = if column.is_highlighted() {
                &formats.highlight_header
            } else {
                &formats.header
            };
            sheet
                .write_string_with_format(start_row, col as u16, title, format)
                .map_err(xlsx_err)?;
        }

        let mut written = 0u32;
        for (record, abs_result) in rows {
            written += 1;
            let row = start_row + written;
            for (col, column) in columns.iter().enumerate() {
                let col = col as u16;
                match column.value(record, abs_result) {
                    CellValue::Blank => {}
                    CellValue::Text(s) => {
                        sheet.write_string(row, col, s).map_err(xlsx_err)?;
                    }
                    CellValue::Number(n) => match formats.number_format(column.kind()) {
                        Some(format) => {
                            sheet
                                .write_number_with_format(row, col, n, format)
                                .map_err(xlsx_err)?;
                        }
                        None => {
                            sheet.write_number(row, col, n).map_err(xlsx_err)?;
                        }
                    },
                }
            }
        }

        Ok(written)
    }

    /// Red font for values < 0 in one column
    fn highlight_negatives(
        &self,
        sheet: &mut Worksheet,
        first_row: u32,
        last_row: u32,
        col: u16,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let conditional_format = ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::LessThan(0))
            .set_format(&formats.negative);

        sheet
            .add_conditional_format(first_row, col, last_row, col, &conditional_format)
            .map_err(xlsx_err)?;

        Ok(())
    }

    fn set_widths(&self, sheet: &mut Worksheet, columns: &[Column]) {
        for (col, column) in columns.iter().enumerate() {
            let width = match column.kind() {
                ColumnKind::Text => 16.0,
                _ if column.title().len() > 16 => column.title().len() as f64,
                _ => self.column_width,
            };
            sheet.set_column_width(col as u16, width).ok();
        }
    }
}

/// Reusable Excel formats
struct ExcelFormats {
    header: Format,
    highlight_header: Format,
    title: Format,
    integer: Format,
    percent: Format,
    date: Format,
    datetime: Format,
    // Conditional format for negative results
    negative: Format,
}

impl ExcelFormats {
    fn number_format(&self, kind: ColumnKind) -> Option<&Format> {
        match kind {
            ColumnKind::Integer => Some(&self.integer),
            ColumnKind::Percent => Some(&self.percent),
            ColumnKind::Text | ColumnKind::Number => None,
        }
    }
}

fn ranked_rows(rows: &[RankedRecord]) -> impl Iterator<Item = (&EnrichedRecord, Option<f64>)> {
    rows.iter().map(|r| (&r.record, Some(r.abs_result)))
}

fn column_index(columns: &[Column], column: Column) -> Result<u16, RenderError> {
    position(columns, column)
        .ok_or_else(|| RenderError::InvalidData(format!("column '{}' not in layout", column.title())))
}

fn xlsx_err(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

/// Renderer implementation producing workbook bytes
impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &SalesReport) -> Result<Vec<u8>, RenderError> {
        let grouped: usize = report.groups.iter().map(|g| g.member_count).sum();
        if grouped != report.records.len() {
            return Err(RenderError::InvalidData(format!(
                "{} rows but {} grouped",
                report.records.len(),
                grouped
            )));
        }
        self.render_to_bytes(report)
    }
}
