//! Per-row metric derivation
//!
//! Every derived column of the report is computed here, once, from a
//! normalized record and the run's [`MonthProgress`]. Missing numeric inputs
//! count as zero; ratios against a zero forecast are defined as zero.

use fcreport_core::{BuLabels, EnrichedRecord, MonthProgress, SalesRecord, Status};
use fcreport_loader::NormalizedRecord;

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// shipped + delivery notes + current allocation + open orders
pub fn total(record: &SalesRecord) -> f64 {
    [
        record.shipped,
        record.delivery_notes,
        record.current_allocation,
        record.open_orders,
    ]
    .iter()
    .map(|v| v.unwrap_or(0.0))
    .sum()
}

/// Derive all metrics for one row
pub fn enrich(record: SalesRecord, labels: BuLabels, progress: &MonthProgress) -> EnrichedRecord {
    let forecast = record.forecast.unwrap_or(0.0);
    let month_passed = progress.fraction();

    let total = total(&record);
    let result = total - forecast;
    let percent_of_forecast = ratio(total, forecast);
    let percent_forecast_consumed = ratio(total, forecast);

    EnrichedRecord {
        total,
        result,
        percent_of_forecast,
        status: Status::from_result(result),
        percent_month_passed: month_passed,
        forecast_consumed_expected: (forecast * month_passed).round_ties_even(),
        percent_forecast_consumed,
        percent_difference: percent_forecast_consumed - month_passed,
        record,
        labels,
    }
}

/// Enrich every normalized row, keeping source order
pub fn enrich_all(rows: Vec<NormalizedRecord>, progress: &MonthProgress) -> Vec<EnrichedRecord> {
    rows.into_iter()
        .map(|row| enrich(row.record, row.labels, progress))
        .collect()
}
