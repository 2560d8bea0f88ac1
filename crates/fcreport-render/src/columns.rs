//! Report column layout
//!
//! Maps every column of the enriched table to its title, number format and
//! cell value. Rendering code walks these lists; it never reaches into
//! record fields directly.

use fcreport_core::EnrichedRecord;

/// How a column's cells are written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Raw number, General format
    Number,
    /// Thousands-grouped integer (`#,##0`)
    Integer,
    /// Whole-number percentage (`0%`)
    Percent,
}

/// A column of the enriched table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Forecaster,
    Sku,
    SalesRep,
    /// Display label, e.g. `HEADPHONES - GAMING`
    Bu,
    /// Upper-cased BU code as read
    BuCode,
    StartingForecast,
    Lag3Forecast,
    Forecast,
    Shipped,
    DeliveryNotes,
    CurrentAllocation,
    OpenOrders,
    BuGroup,
    Total,
    Result,
    PercentOfForecast,
    Status,
    PercentMonthPassed,
    ForecastConsumedExpected,
    PercentForecastConsumed,
    PercentDifference,
    /// |result|, only on ranking tables
    AbsResult,
}

/// A single cell value ready to be written
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

impl Column {
    /// Columns of the full data sheet, in order
    pub const REPORT: [Column; 21] = [
        Column::Forecaster,
        Column::Sku,
        Column::SalesRep,
        Column::Bu,
        Column::BuCode,
        Column::StartingForecast,
        Column::Lag3Forecast,
        Column::Forecast,
        Column::Shipped,
        Column::DeliveryNotes,
        Column::CurrentAllocation,
        Column::OpenOrders,
        Column::BuGroup,
        Column::Total,
        Column::Result,
        Column::PercentOfForecast,
        Column::Status,
        Column::PercentMonthPassed,
        Column::ForecastConsumedExpected,
        Column::PercentForecastConsumed,
        Column::PercentDifference,
    ];

    /// Columns of the per-group ranking tables
    pub const RANKING: [Column; 22] = [
        Column::Forecaster,
        Column::Sku,
        Column::SalesRep,
        Column::Bu,
        Column::BuCode,
        Column::StartingForecast,
        Column::Lag3Forecast,
        Column::Forecast,
        Column::Shipped,
        Column::DeliveryNotes,
        Column::CurrentAllocation,
        Column::OpenOrders,
        Column::BuGroup,
        Column::Total,
        Column::Result,
        Column::PercentOfForecast,
        Column::Status,
        Column::PercentMonthPassed,
        Column::ForecastConsumedExpected,
        Column::PercentForecastConsumed,
        Column::PercentDifference,
        Column::AbsResult,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Column::Forecaster => "FORECASTER",
            Column::Sku => "SKU",
            Column::SalesRep => "Sales Rep",
            Column::Bu => "BU",
            Column::BuCode => "BU Code",
            Column::StartingForecast => "Starting Forecast",
            Column::Lag3Forecast => "Lag 3 Fcst",
            Column::Forecast => "Forecast",
            Column::Shipped => "Shipped",
            Column::DeliveryNotes => "Delivery Notes",
            Column::CurrentAllocation => "Current Allocation",
            Column::OpenOrders => "Open Orders",
            Column::BuGroup => "BU Group",
            Column::Total => "Total",
            Column::Result => "Result",
            Column::PercentOfForecast => "% of Forecast",
            Column::Status => "Status",
            Column::PercentMonthPassed => "% of Month Passed",
            Column::ForecastConsumedExpected => "Forecast Consumed (Expected)",
            Column::PercentForecastConsumed => "% of Forecast Consumed",
            Column::PercentDifference => "% Difference",
            Column::AbsResult => "Result_Abs",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Forecaster
            | Column::Sku
            | Column::SalesRep
            | Column::Bu
            | Column::BuCode
            | Column::BuGroup
            | Column::Status => ColumnKind::Text,
            Column::Total | Column::Result | Column::ForecastConsumedExpected => {
                ColumnKind::Integer
            }
            Column::PercentOfForecast
            | Column::PercentMonthPassed
            | Column::PercentForecastConsumed
            | Column::PercentDifference => ColumnKind::Percent,
            _ => ColumnKind::Number,
        }
    }

    /// Derived columns whose header gets the highlight style
    pub fn is_highlighted(&self) -> bool {
        matches!(
            self,
            Column::Total
                | Column::Result
                | Column::ForecastConsumedExpected
                | Column::PercentOfForecast
                | Column::Status
                | Column::PercentMonthPassed
                | Column::PercentForecastConsumed
                | Column::PercentDifference
        )
    }

    /// Cell value for `record`; `abs_result` feeds `AbsResult`
    pub fn value<'a>(&self, record: &'a EnrichedRecord, abs_result: Option<f64>) -> CellValue<'a> {
        let rec = &record.record;
        let number = |v: Option<f64>| v.map_or(CellValue::Blank, CellValue::Number);
        match self {
            Column::Forecaster => CellValue::Text(&rec.forecaster),
            Column::Sku => CellValue::Text(&rec.sku),
            Column::SalesRep => CellValue::Text(&rec.sales_rep),
            Column::Bu => CellValue::Text(&record.labels.display),
            Column::BuCode => CellValue::Text(&rec.bu),
            Column::StartingForecast => number(rec.starting_forecast),
            Column::Lag3Forecast => number(rec.lag3_forecast),
            Column::Forecast => number(rec.forecast),
            Column::Shipped => number(rec.shipped),
            Column::DeliveryNotes => number(rec.delivery_notes),
            Column::CurrentAllocation => number(rec.current_allocation),
            Column::OpenOrders => number(rec.open_orders),
            Column::BuGroup => CellValue::Text(&record.labels.group),
            Column::Total => CellValue::Number(record.total),
            Column::Result => CellValue::Number(record.result),
            Column::PercentOfForecast => CellValue::Number(record.percent_of_forecast),
            Column::Status => CellValue::Text(record.status.as_str()),
            Column::PercentMonthPassed => CellValue::Number(record.percent_month_passed),
            Column::ForecastConsumedExpected => {
                CellValue::Number(record.forecast_consumed_expected)
            }
            Column::PercentForecastConsumed => CellValue::Number(record.percent_forecast_consumed),
            Column::PercentDifference => CellValue::Number(record.percent_difference),
            Column::AbsResult => number(abs_result),
        }
    }
}

/// Index of `column` within `columns`
pub fn position(columns: &[Column], column: Column) -> Option<u16> {
    columns.iter().position(|c| *c == column).map(|i| i as u16)
}
