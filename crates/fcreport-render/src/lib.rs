//! # fcreport-render
//!
//! Rendering backend for computed sales reports.
//!
//! This crate provides:
//! - Excel workbook rendering (raw copy, full report, per-group rankings with charts)
//! - Column layout shared by every report table
//! - Worksheet naming within Excel's limits
//!
//! ## Example
//!
//! ```rust,ignore
//! use fcreport_core::Renderer;
//! use fcreport_render::ExcelRenderer;
//!
//! let renderer = ExcelRenderer::new();
//! let xlsx_bytes = renderer.render(&report)?;
//! std::fs::write("Final_Sales_Report_Generated.xlsx", xlsx_bytes)?;
//! ```

pub mod columns;
pub mod excel;
pub mod sheet_names;

pub use columns::{CellValue, Column, ColumnKind};
pub use excel::ExcelRenderer;
pub use sheet_names::{
    group_sheet_name, raw_sheet_name, SheetNamer, MAIN_SHEET_NAME, UNKNOWN_GROUP,
};
