//! Column normalization
//!
//! Turns a [`RawTable`] into typed [`SalesRecord`]s:
//! - required columns are resolved through [`ColumnMap`]
//! - the BU code is upper-cased and mapped to its group and display labels
//! - numeric columns are parsed, with empty cells handled per
//!   [`MissingValuePolicy`]
//!
//! Fully blank rows are skipped.

use fcreport_core::{BuLabels, LoadError, MissingValuePolicy, RawCell, RawTable, SalesRecord};
use tracing::debug;

use crate::schema::{ColumnMap, Field};

/// BU substrings that collapse into the single headphones group
pub const HEADPHONE_SUBLINES: [&str; 3] =
    ["LIFESTYLE-HEADPHONES", "GAMING-HEADPHONES", "SPORT-HEADPHONES"];

/// Group label shared by all headphone sub-lines
pub const HEADPHONES_GROUP: &str = "HEADPHONES";

// Checked in order; the first hit wins.
const DISPLAY_REWRITES: [(&str, &str); 3] = [
    ("LIFESTYLE", "HEADPHONES - LIFESTYLE"),
    ("GAMING", "HEADPHONES - GAMING"),
    ("SPORTS", "HEADPHONES - SPORTS"),
];

/// A normalized row and its business-unit labels
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRecord {
    pub record: SalesRecord,
    pub labels: BuLabels,
}

/// Sheet partition label for a BU code
pub fn group_label(bu: &str) -> String {
    let upper = bu.to_uppercase();
    if HEADPHONE_SUBLINES.iter().any(|sub| upper.contains(sub)) {
        HEADPHONES_GROUP.to_string()
    } else {
        upper
    }
}

/// Display label for a BU code (`HEADPHONES - <SUBLINE>` rewrite)
pub fn display_label(bu: &str) -> String {
    let upper = bu.to_uppercase();
    DISPLAY_REWRITES
        .iter()
        .find(|(needle, _)| upper.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or(upper)
}

pub fn bu_labels(bu: &str) -> BuLabels {
    BuLabels {
        group: group_label(bu),
        display: display_label(bu),
    }
}

/// Normalize every data row of `table`
pub fn normalize(
    table: &RawTable,
    policy: MissingValuePolicy,
) -> Result<Vec<NormalizedRecord>, LoadError> {
    let columns = ColumnMap::resolve(&table.headers)?;
    let mut out = Vec::with_capacity(table.len());

    for idx in 0..table.len() {
        // Header is spreadsheet row 1
        let source_row = idx + 2;

        if Field::ALL
            .iter()
            .all(|f| table.cell(idx, columns.index(*f)).is_blank())
        {
            debug!(row = source_row, "skipping blank row");
            continue;
        }

        let text = |field: Field| table.cell(idx, columns.index(field)).to_text();
        let number = |field: Field| {
            parse_numeric(
                table.cell(idx, columns.index(field)),
                source_row,
                field,
                policy,
            )
        };

        let record = SalesRecord {
            source_row,
            forecaster: text(Field::Forecaster),
            sku: text(Field::Sku),
            sales_rep: text(Field::SalesRep),
            bu: text(Field::Bu).to_uppercase(),
            starting_forecast: number(Field::StartingForecast)?,
            lag3_forecast: number(Field::Lag3Forecast)?,
            forecast: number(Field::Forecast)?,
            shipped: number(Field::Shipped)?,
            delivery_notes: number(Field::DeliveryNotes)?,
            current_allocation: number(Field::CurrentAllocation)?,
            open_orders: number(Field::OpenOrders)?,
        };
        let labels = bu_labels(&record.bu);

        out.push(NormalizedRecord { record, labels });
    }

    debug!(rows = out.len(), "normalized records");
    Ok(out)
}

/// Parse a numeric cell; `Ok(None)` means the value is missing
fn parse_numeric(
    cell: &RawCell,
    row: usize,
    field: Field,
    policy: MissingValuePolicy,
) -> Result<Option<f64>, LoadError> {
    let invalid = |value: String| LoadError::InvalidData {
        row,
        column: field.header().to_string(),
        value,
    };

    let value = match cell {
        RawCell::Number(n) => Some(*n),
        RawCell::Empty => None,
        RawCell::Text(s) => {
            let cleaned = s.trim().replace(',', "");
            if cleaned.is_empty() {
                None
            } else {
                match cleaned.parse::<f64>() {
                    Ok(n) if n.is_finite() => Some(n),
                    _ => return Err(invalid(s.clone())),
                }
            }
        }
        RawCell::Bool(_) | RawCell::DateTime(_) => return Err(invalid(cell.to_text())),
    };

    match (value, policy) {
        (None, MissingValuePolicy::Reject) => Err(invalid(String::new())),
        (value, _) => Ok(value),
    }
}
