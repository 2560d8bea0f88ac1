//! Run summary
//!
//! A compact, serializable view of a computed [`SalesReport`], printed by the
//! CLI after the workbook has been written.
//!
//! # Example
//!
//! ```rust
//! use fcreport_core::summary::{GroupSummary, ReportSummary};
//!
//! let summary = ReportSummary {
//!     report_date: "2026-10-18".into(),
//!     percent_month_passed: 58,
//!     total_rows: 3,
//!     overselling_rows: 2,
//!     underselling_rows: 1,
//!     on_target_rows: 0,
//!     groups: vec![GroupSummary {
//!         label: "AUDIO".into(),
//!         rows: 3,
//!         overselling: 2,
//!         underselling: 1,
//!         top_oversell_sku: Some("A-1".into()),
//!         top_undersell_sku: Some("A-2".into()),
//!     }],
//! };
//!
//! assert!(summary.to_text().contains("AUDIO"));
//! ```

use serde::{Deserialize, Serialize};

use crate::{SalesReport, Status};

/// Per-group counts shown in the summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group label
    pub label: String,

    /// Rows in the group
    pub rows: usize,

    /// Rows in the overselling table (after the top-N cut)
    pub overselling: usize,

    /// Rows in the underselling table (after the top-N cut)
    pub underselling: usize,

    /// SKU with the largest positive result
    pub top_oversell_sku: Option<String>,

    /// SKU with the most negative result
    pub top_undersell_sku: Option<String>,
}

/// Aggregated run summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Report date (ISO 8601)
    pub report_date: String,

    /// Whole-number percentage of the month passed
    pub percent_month_passed: u32,

    pub total_rows: usize,
    pub overselling_rows: usize,
    pub underselling_rows: usize,
    pub on_target_rows: usize,

    /// Groups in sheet order
    pub groups: Vec<GroupSummary>,
}

impl ReportSummary {
    pub fn from_report(report: &SalesReport) -> Self {
        let count = |status: Status| report.records.iter().filter(|r| r.status == status).count();

        let groups = report
            .groups
            .iter()
            .map(|g| GroupSummary {
                label: g.label.clone(),
                rows: g.member_count,
                overselling: g.overselling.len(),
                underselling: g.underselling.len(),
                top_oversell_sku: g.overselling.first().map(|r| r.record.sku().to_string()),
                top_undersell_sku: g.underselling.first().map(|r| r.record.sku().to_string()),
            })
            .collect();

        Self {
            report_date: report.date.to_string(),
            percent_month_passed: report.progress.percent,
            total_rows: report.records.len(),
            overselling_rows: count(Status::Overselling),
            underselling_rows: count(Status::Underselling),
            on_target_rows: count(Status::OnTarget),
            groups,
        }
    }

    /// Human-readable multi-line rendering
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "Report date: {} ({}% of month passed)\nRows: {} ({} overselling, {} underselling, {} on target)\n",
            self.report_date,
            self.percent_month_passed,
            self.total_rows,
            self.overselling_rows,
            self.underselling_rows,
            self.on_target_rows,
        );
        for g in &self.groups {
            out.push_str(&format!(
                "  {:<24} {:>5} rows  top over: {:<12} top under: {}\n",
                g.label,
                g.rows,
                g.top_oversell_sku.as_deref().unwrap_or("-"),
                g.top_undersell_sku.as_deref().unwrap_or("-"),
            ));
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BuLabels, EnrichedRecord, GroupRanking, MonthProgress, RankedRecord, RawTable, ReportDate,
        SalesRecord,
    };
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn enriched(sku: &str, result: f64) -> EnrichedRecord {
        EnrichedRecord {
            record: SalesRecord::new(sku, "AUDIO"),
            labels: BuLabels {
                group: "AUDIO".into(),
                display: "AUDIO".into(),
            },
            total: 100.0 + result,
            result,
            percent_of_forecast: 0.0,
            status: Status::from_result(result),
            percent_month_passed: 0.5,
            forecast_consumed_expected: 50.0,
            percent_forecast_consumed: 0.0,
            percent_difference: 0.0,
        }
    }

    fn create_test_report() -> SalesReport {
        let date = ReportDate::new(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        let records = vec![enriched("A-1", 30.0), enriched("A-2", -10.0), enriched("A-3", 0.0)];
        SalesReport {
            date,
            progress: MonthProgress::for_date(date),
            raw: RawTable::default(),
            groups: vec![GroupRanking {
                label: "AUDIO".into(),
                member_count: 3,
                overselling: vec![RankedRecord::new(records[0].clone())],
                underselling: vec![RankedRecord::new(records[1].clone())],
            }],
            records,
        }
    }

    #[test]
    fn summary_counts_statuses() {
        let summary = create_test_report().summary();

        assert_eq!(summary.report_date, "2025-06-15");
        assert_eq!(summary.percent_month_passed, 50);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.overselling_rows, 1);
        assert_eq!(summary.underselling_rows, 1);
        assert_eq!(summary.on_target_rows, 1);
        assert_eq!(
            summary.groups,
            vec![GroupSummary {
                label: "AUDIO".into(),
                rows: 3,
                overselling: 1,
                underselling: 1,
                top_oversell_sku: Some("A-1".into()),
                top_undersell_sku: Some("A-2".into()),
            }]
        );
    }

    #[test]
    fn summary_text_mentions_every_group() {
        let text = create_test_report().summary().to_text();
        assert!(text.starts_with("Report date: 2025-06-15 (50% of month passed)"));
        assert!(text.contains("AUDIO"));
        assert!(text.contains("top over: A-1"));
    }
}
