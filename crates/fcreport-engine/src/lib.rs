//! # fcreport-engine
//!
//! The computation phase of the report: metric derivation and per-group
//! ranking.
//!
//! This crate provides:
//! - Row metrics (total, result, ratios, status, month pacing)
//! - Grouping by business-unit label in first-seen order
//! - Top-N overselling / underselling selection
//! - `ReportBuilder`, which runs normalize → enrich → rank
//!
//! ## Example
//!
//! ```rust,ignore
//! use fcreport_core::{MissingValuePolicy, ReportDate};
//! use fcreport_engine::ReportBuilder;
//!
//! let table = fcreport_loader::load_workbook(path)?;
//! let report = ReportBuilder::new(ReportDate::new(today))
//!     .missing_values(MissingValuePolicy::Zero)
//!     .build(table)?;
//! ```

pub mod metrics;
pub mod ranking;

pub use metrics::{enrich, enrich_all, ratio};
pub use ranking::{group_records, rank_all, rank_group, RankingOptions};

use fcreport_core::{LoadError, MissingValuePolicy, MonthProgress, RawTable, ReportDate, SalesReport};
use tracing::{debug, info};

/// Runs the computation phase for one report date
#[derive(Clone, Debug)]
pub struct ReportBuilder {
    pub date: ReportDate,
    pub missing_values: MissingValuePolicy,
    pub ranking: RankingOptions,
}

impl ReportBuilder {
    pub fn new(date: ReportDate) -> Self {
        Self {
            date,
            missing_values: MissingValuePolicy::default(),
            ranking: RankingOptions::default(),
        }
    }

    /// Set the policy for empty numeric cells
    pub fn missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    /// Set the number of rows kept per ranking table
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.ranking.top_n = top_n;
        self
    }

    /// Normalize, enrich and rank `raw`; the table is kept for the raw-copy sheet
    pub fn build(&self, raw: RawTable) -> Result<SalesReport, LoadError> {
        let rows = fcreport_loader::normalize(&raw, self.missing_values)?;

        let progress = MonthProgress::for_date(self.date);
        info!(
            day = progress.day,
            days_in_month = progress.days_in_month,
            percent = progress.percent,
            "month progress"
        );

        let records = enrich_all(rows, &progress);
        let groups = rank_all(&records, self.ranking);

        for group in &groups {
            debug!(
                group = %group.label,
                rows = group.member_count,
                overselling = group.overselling.len(),
                underselling = group.underselling.len(),
                "ranked group"
            );
        }
        info!(rows = records.len(), groups = groups.len(), "computed report");

        Ok(SalesReport {
            date: self.date,
            progress,
            raw,
            records,
            groups,
        })
    }
}
