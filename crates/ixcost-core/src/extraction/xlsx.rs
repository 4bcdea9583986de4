use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::CostError;
use crate::tabular::{Cell, Sheet, Workbook};

/// Read every worksheet of an `.xlsx`/`.xls` file into a [`Workbook`].
///
/// The first row of each sheet is taken as the header labels.
pub fn load_workbook(id: &str, bytes: &[u8]) -> Result<Workbook, CostError> {
    let mut sheets = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| CostError::Workbook(format!("{id}: {e}")))?;

    let mut out = BTreeMap::new();
    for name in sheets.sheet_names() {
        let range = sheets
            .worksheet_range(&name)
            .map_err(|e| CostError::Workbook(format!("{id}: sheet '{name}': {e}")))?;
        let sheet = range_to_sheet(&range);
        debug!(workbook = id, sheet = %name, rows = sheet.rows.len(), "loaded sheet");
        out.insert(name, sheet);
    }

    Ok(Workbook {
        id: id.to_string(),
        sheets: out,
    })
}

fn range_to_sheet(range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(header_label).collect())
        .unwrap_or_default();
    Sheet {
        headers,
        rows: rows.map(|row| row.iter().map(to_cell).collect()).collect(),
    }
}

/// Header labels are kept verbatim, trailing spaces included.
fn header_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => format!("{other}"),
    }
}

fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(f64_to_decimal(*f)),
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(format!("{other}")),
    }
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...).
fn f64_to_decimal(f: f64) -> Decimal {
    format!("{f}")
        .parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}
