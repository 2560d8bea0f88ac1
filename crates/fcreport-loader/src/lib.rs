//! # fcreport-loader
//!
//! Reads the sales forecast extract and normalizes it into typed records.
//!
//! This crate provides:
//! - Workbook reading via calamine (xlsx, xlsm, xls, xlsb, ods)
//! - A fixed required-column schema with case/whitespace-insensitive lookup
//! - Business-unit normalization (group and display labels)
//! - Numeric parsing under an explicit missing-value policy
//!
//! ## Example
//!
//! ```rust
//! use fcreport_core::{MissingValuePolicy, RawCell, RawTable};
//! use fcreport_loader::normalize;
//!
//! let table = RawTable::new([
//!     "Forecaster", "SKU", "Sales Rep", "BU", "Starting Forecast", "Lag 3 Fcst",
//!     "Forecast", "Shipped", "Delivery Notes", "Current Allocation", "Open Orders",
//! ])
//! .row([
//!     "ana".into(), "HP-100".into(), "joe".into(), "gaming-headphones".into(),
//!     100.0.into(), 90.0.into(), 100.0.into(), 40.0.into(), 10.0.into(),
//!     RawCell::Empty, 5.0.into(),
//! ]);
//!
//! let rows = normalize(&table, MissingValuePolicy::Zero).unwrap();
//! assert_eq!(rows[0].labels.group, "HEADPHONES");
//! assert_eq!(rows[0].labels.display, "HEADPHONES - GAMING");
//! ```

pub mod normalize;
pub mod reader;
pub mod schema;

pub use normalize::{bu_labels, display_label, group_label, normalize, NormalizedRecord};
pub use reader::load_workbook;
pub use schema::{normalize_header, ColumnMap, Field};

use fcreport_core::{LoadError, MissingValuePolicy};

/// Load a workbook and normalize its first worksheet in one step
pub fn load_records(
    path: &std::path::Path,
    policy: MissingValuePolicy,
) -> Result<Vec<NormalizedRecord>, LoadError> {
    let table = load_workbook(path)?;
    normalize(&table, policy)
}
