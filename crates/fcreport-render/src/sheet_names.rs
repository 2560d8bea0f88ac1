//! Worksheet naming
//!
//! Excel limits sheet names to 31 characters, forbids `[ ] : * ? / \` and
//! compares names case-insensitively. Group sheets are named
//! `<label>_Report` with the label cut to fit.

use std::collections::HashSet;

use fcreport_core::ReportDate;

pub const MAX_SHEET_NAME_LEN: usize = 31;
pub const GROUP_SHEET_SUFFIX: &str = "_Report";
pub const UNKNOWN_GROUP: &str = "UnknownBU";
pub const MAIN_SHEET_NAME: &str = "Sales Report Generated";
pub const RAW_SHEET_PREFIX: &str = "fc_v_actual_Data_";

const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Longest label prefix that still fits with the suffix
pub const MAX_GROUP_LABEL_LEN: usize = MAX_SHEET_NAME_LEN - GROUP_SHEET_SUFFIX.len();

/// Name of the verbatim raw-data sheet, e.g. `fc_v_actual_Data_7.3.25`
pub fn raw_sheet_name(date: ReportDate) -> String {
    format!("{}{}", RAW_SHEET_PREFIX, date.raw_sheet_suffix())
}

/// Label part of a group sheet name: sanitized, with a placeholder for empty labels
fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .trim_matches('\'')
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
        UNKNOWN_GROUP.to_string()
    } else {
        cleaned
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// `<label>_Report`, at most 31 characters
pub fn group_sheet_name(label: &str) -> String {
    let base = sanitize_label(label);
    format!("{}{}", truncate(&base, MAX_GROUP_LABEL_LEN), GROUP_SHEET_SUFFIX)
}

/// Hands out unique sheet names for one workbook
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name that is already taken
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_lowercase());
    }

    /// Group sheet name that does not collide with any earlier name.
    ///
    /// Collisions get a `~N` marker before the suffix, shortening the label
    /// so the name stays within 31 characters.
    pub fn group_sheet(&mut self, label: &str) -> String {
        let first = group_sheet_name(label);
        if self.used.insert(first.to_lowercase()) {
            return first;
        }

        let base = sanitize_label(label);
        let mut n = 2usize;
        loop {
            let marker = format!("~{}", n);
            let name = format!(
                "{}{}{}",
                truncate(&base, MAX_GROUP_LABEL_LEN - marker.len()),
                marker,
                GROUP_SHEET_SUFFIX
            );
            if self.used.insert(name.to_lowercase()) {
                return name;
            }
            n += 1;
        }
    }
}
