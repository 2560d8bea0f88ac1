//! Required-column schema
//!
//! The source extract comes with inconsistent header casing and spacing
//! ("Sales Rep", " sales  rep "). Headers are normalized once and the fixed
//! set of required fields is resolved to column indices up front, so the
//! rest of the pipeline never looks columns up by name.

use fcreport_core::LoadError;

/// A required input column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Forecaster,
    Sku,
    SalesRep,
    Bu,
    StartingForecast,
    Lag3Forecast,
    Forecast,
    Shipped,
    DeliveryNotes,
    CurrentAllocation,
    OpenOrders,
}

impl Field {
    /// All required fields, in source column order
    pub const ALL: [Field; 11] = [
        Field::Forecaster,
        Field::Sku,
        Field::SalesRep,
        Field::Bu,
        Field::StartingForecast,
        Field::Lag3Forecast,
        Field::Forecast,
        Field::Shipped,
        Field::DeliveryNotes,
        Field::CurrentAllocation,
        Field::OpenOrders,
    ];

    /// Normalized header text this field is matched against
    pub fn header(&self) -> &'static str {
        match self {
            Field::Forecaster => "forecaster",
            Field::Sku => "sku",
            Field::SalesRep => "sales rep",
            Field::Bu => "bu",
            Field::StartingForecast => "starting forecast",
            Field::Lag3Forecast => "lag 3 fcst",
            Field::Forecast => "forecast",
            Field::Shipped => "shipped",
            Field::DeliveryNotes => "delivery notes",
            Field::CurrentAllocation => "current allocation",
            Field::OpenOrders => "open orders",
        }
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

/// Trim, lowercase and collapse inner whitespace runs to a single space
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Column index of every required field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [usize; 11],
}

impl ColumnMap {
    /// Resolve every required field against a header row.
    ///
    /// Extra columns are ignored and the first of duplicate headers wins.
    /// All absent fields are reported together.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();

        let mut indices = [0usize; 11];
        let mut missing = Vec::new();
        for field in Field::ALL {
            match normalized.iter().position(|h| h == field.header()) {
                Some(idx) => indices[field.position()] = idx,
                None => missing.push(field.header().to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(LoadError::MissingColumn(missing))
        }
    }

    pub fn index(&self, field: Field) -> usize {
        self.indices[field.position()]
    }
}
