//! # fcreport-core
//!
//! Core domain model and traits for the fcreport sales report generator.
//!
//! This crate provides:
//! - Domain types: `RawTable`, `SalesRecord`, `EnrichedRecord`, `GroupRanking`, `SalesReport`
//! - The injected report date and the month progress derived from it
//! - Core traits: `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fcreport_core::{MonthProgress, ReportDate, Status};
//!
//! let date = ReportDate::new(NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
//! assert_eq!(date.raw_sheet_suffix(), "7.3.25");
//!
//! let progress = MonthProgress::for_date(date);
//! assert_eq!(progress.percent, 10);
//!
//! assert_eq!(Status::from_result(-4.0), Status::Underselling);
//! ```

pub mod summary;

pub use summary::{GroupSummary, ReportSummary};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases & Constants
// ============================================================================

/// Collapsed business-unit label used to partition the report into sheets
pub type GroupLabel = String;

/// Number of rows kept per ranking table unless configured otherwise
pub const DEFAULT_TOP_N: usize = 10;

// ============================================================================
// Raw Table
// ============================================================================

/// A single cell as read from the source workbook
#[derive(Clone, Debug, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Spreadsheet date serial (1900 date system)
    DateTime(f64),
}

static EMPTY_CELL: RawCell = RawCell::Empty;

impl RawCell {
    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as trimmed text.
    ///
    /// Integral numbers drop their fractional part, so a numeric SKU
    /// `120034.0` becomes `"120034"`.
    pub fn to_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Number(n) | RawCell::DateTime(n) => format_number(*n),
            RawCell::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

impl From<f64> for RawCell {
    fn from(n: f64) -> Self {
        RawCell::Number(n)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// The first worksheet of the source file: one header row plus data rows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    /// Name of the worksheet the table was read from
    pub sheet_name: String,
    /// Header cells exactly as they appear in the source
    pub headers: Vec<String>,
    /// Data rows; rows may be shorter than the header
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            sheet_name: "Sheet1".into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row
    pub fn row(mut self, cells: impl IntoIterator<Item = RawCell>) -> Self {
        self.rows.push(cells.into_iter().collect());
        self
    }

    /// Cell at (row, column), `Empty` when out of range
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Report Date
// ============================================================================

/// The single "current date" of a run.
///
/// Sheet naming, the generation stamp and the month progress are all derived
/// from this value; nothing in the pipeline reads the system clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `M.D.YY` with leading zeros stripped from every component
    pub fn raw_sheet_suffix(&self) -> String {
        format!(
            "{}.{}.{}",
            self.0.month(),
            self.0.day(),
            self.0.year().rem_euclid(100)
        )
    }

    /// Generation stamp, e.g. `03-Jul-2025`
    pub fn generated_on(&self) -> String {
        self.0.format("%d-%b-%Y").to_string()
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| self.0.with_day(day).is_some())
            .unwrap_or(28)
    }
}

impl From<NaiveDate> for ReportDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

impl std::fmt::Display for ReportDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How far through the calendar month the report date is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthProgress {
    pub day: u32,
    pub days_in_month: u32,
    /// Whole-number percentage, rounded
    pub percent: u32,
}

impl MonthProgress {
    pub fn for_date(date: ReportDate) -> Self {
        let day = date.date().day();
        let days_in_month = date.days_in_month();
        let percent = (day as f64 / days_in_month as f64 * 100.0).round() as u32;
        Self {
            day,
            days_in_month,
            percent,
        }
    }

    /// Percentage as a fraction (e.g. 0.58), the form written to the workbook
    pub fn fraction(&self) -> f64 {
        self.percent as f64 / 100.0
    }
}

// ============================================================================
// Records
// ============================================================================

/// What to do with an empty numeric cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingValuePolicy {
    /// Treat the value as zero in every calculation
    #[default]
    Zero,
    /// Fail the load with `LoadError::InvalidData`
    Reject,
}

/// One SKU's forecast and shipment figures after column normalization
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// 1-based row number in the source sheet (header is row 1)
    pub source_row: usize,
    pub forecaster: String,
    pub sku: String,
    pub sales_rep: String,
    /// Business-unit code, upper-cased
    pub bu: String,
    pub starting_forecast: Option<f64>,
    pub lag3_forecast: Option<f64>,
    pub forecast: Option<f64>,
    pub shipped: Option<f64>,
    pub delivery_notes: Option<f64>,
    pub current_allocation: Option<f64>,
    pub open_orders: Option<f64>,
}

impl SalesRecord {
    pub fn new(sku: impl Into<String>, bu: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            bu: bu.into().to_uppercase(),
            ..Default::default()
        }
    }

    pub fn forecast(mut self, value: f64) -> Self {
        self.forecast = Some(value);
        self
    }

    pub fn shipped(mut self, value: f64) -> Self {
        self.shipped = Some(value);
        self
    }

    pub fn delivery_notes(mut self, value: f64) -> Self {
        self.delivery_notes = Some(value);
        self
    }

    pub fn current_allocation(mut self, value: f64) -> Self {
        self.current_allocation = Some(value);
        self
    }

    pub fn open_orders(mut self, value: f64) -> Self {
        self.open_orders = Some(value);
        self
    }
}

/// Business-unit labels derived from the raw BU code
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuLabels {
    /// Sheet partition key; headphone sub-lines collapse to `HEADPHONES`
    pub group: GroupLabel,
    /// Finer label shown in the BU column, e.g. `HEADPHONES - GAMING`
    pub display: String,
}

/// Performance classification of a row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Overselling,
    Underselling,
    OnTarget,
}

impl Status {
    /// Classify a `result` (total - forecast); exactly zero is on target
    pub fn from_result(result: f64) -> Self {
        if result > 0.0 {
            Status::Overselling
        } else if result < 0.0 {
            Status::Underselling
        } else {
            Status::OnTarget
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Overselling => "Overselling",
            Status::Underselling => "Underselling",
            Status::OnTarget => "On Target",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sales record with its derived performance metrics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub record: SalesRecord,
    pub labels: BuLabels,
    /// shipped + delivery notes + current allocation + open orders
    pub total: f64,
    /// total - forecast
    pub result: f64,
    pub percent_of_forecast: f64,
    pub status: Status,
    /// Same value on every row of a run
    pub percent_month_passed: f64,
    pub forecast_consumed_expected: f64,
    pub percent_forecast_consumed: f64,
    pub percent_difference: f64,
}

impl EnrichedRecord {
    pub fn sku(&self) -> &str {
        &self.record.sku
    }

    pub fn group(&self) -> &str {
        &self.labels.group
    }
}

/// A ranked row together with the magnitude used for charting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub record: EnrichedRecord,
    pub abs_result: f64,
}

impl RankedRecord {
    pub fn new(record: EnrichedRecord) -> Self {
        let abs_result = record.result.abs();
        Self { record, abs_result }
    }
}

/// Top overselling and underselling rows of one business-unit group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupRanking {
    pub label: GroupLabel,
    /// Number of rows in the group before ranking
    pub member_count: usize,
    /// Highest result first
    pub overselling: Vec<RankedRecord>,
    /// Most negative result first
    pub underselling: Vec<RankedRecord>,
}

impl GroupRanking {
    /// Largest absolute result among the underselling rows
    pub fn max_underselling_magnitude(&self) -> Option<f64> {
        self.underselling
            .iter()
            .map(|r| r.abs_result)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

/// Everything the rendering phase needs, computed up front
#[derive(Clone, Debug)]
pub struct SalesReport {
    pub date: ReportDate,
    pub progress: MonthProgress,
    /// The source table, copied verbatim into the workbook
    pub raw: RawTable,
    /// Enriched rows in source order
    pub records: Vec<EnrichedRecord>,
    /// Groups in order of first appearance
    pub groups: Vec<GroupRanking>,
}

impl SalesReport {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_report(self)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a computed report to the output format
    fn render(&self, report: &SalesReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while loading and normalizing the source data
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    #[error("Workbook has no worksheet with a header row")]
    EmptyWorkbook,

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumn(Vec<String>),

    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidData {
        row: usize,
        column: String,
        value: String,
    },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
