//! Workbook reader
//!
//! Reads the first worksheet of the source file into a [`RawTable`]. The
//! table keeps every cell as found so it can be copied verbatim into the
//! report; typing happens later in [`crate::normalize`].

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use fcreport_core::{LoadError, RawCell, RawTable};
use tracing::debug;

/// Read the first worksheet of an Excel/ODS file
pub fn load_workbook(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| LoadError::Workbook(format!("{}: {}", path.display(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::EmptyWorkbook)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Workbook(format!("sheet '{}': {}", sheet_name, e)))?;

    let (height, width) = range.get_size();
    debug!(sheet = %sheet_name, height, width, "read worksheet");

    table_from_rows(sheet_name, range.rows())
}

/// Build a table from calamine rows; the first row is the header
pub fn table_from_rows<'a>(
    sheet_name: String,
    mut rows: impl Iterator<Item = &'a [Data]>,
) -> Result<RawTable, LoadError> {
    let header = rows.next().ok_or(LoadError::EmptyWorkbook)?;
    let headers = header.iter().map(header_text).collect();

    let mut data: Vec<Vec<RawCell>> = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    while data
        .last()
        .is_some_and(|row| row.iter().all(RawCell::is_blank))
    {
        data.pop();
    }

    Ok(RawTable {
        sheet_name,
        headers,
        rows: data,
    })
}

// Header text is kept untrimmed so the raw copy stays verbatim.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => convert_cell(other).to_text(),
    }
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(n) => RawCell::Number(*n),
        Data::Int(n) => RawCell::Number(*n as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Text(e.to_string()),
    }
}
