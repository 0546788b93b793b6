//! Border-crossing rows from the analytics spreadsheet export.
//!
//! Values sit at fixed column letters on the `Data` sheet, one crossing per
//! row starting at row 3.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::{Error, Result};
use crate::model::BorderCrossingRow;

/// Sheet holding the crossing table.
pub const DATA_SHEET: &str = "Data";

/// Cell that is always filled in the expected export.
pub const FINGERPRINT_CELL: &str = "AA3";

/// Marker in column A of a cancelled crossing.
pub const CANCELLED: &str = "Скасовано";

const FIRST_ROW: u32 = 3;

/// Address-based cell lookup.
pub trait CellSource {
    /// Display text of a cell, `None` when the cell is empty or absent.
    fn cell_text(&self, column: &str, row: u32) -> Option<String>;
}

impl CellSource for Range<Data> {
    fn cell_text(&self, column: &str, row: u32) -> Option<String> {
        let col = column_index(column)?;
        let row = row.checked_sub(1)?;
        self.get_value((row, col)).and_then(format_cell)
    }
}

/// Zero-based index of a column given by letters ("A" → 0, "AA" → 26).
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Text of a cell the way the export shows it.
pub(crate) fn format_cell(value: &Data) -> Option<String> {
    match value {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => {
                let midnight = datetime.time() == chrono::NaiveTime::MIN;
                let fmt = if midnight {
                    "%d.%m.%Y"
                } else {
                    "%d.%m.%Y %H:%M:%S"
                };
                Some(datetime.format(fmt).to_string())
            }
            None => Some(dt.as_f64().to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}

/// Read crossing rows from a sheet.
///
/// Stops at the first row whose column A is empty. Cancelled rows are
/// skipped and the scan goes on.
pub fn extract_rows<S: CellSource + ?Sized>(sheet: &S) -> Result<Vec<BorderCrossingRow>> {
    if sheet.cell_text(FINGERPRINT_CELL, FIRST_ROW).is_none() {
        return Err(Error::Format(format!(
            "missing {} in the expected table layout",
            FINGERPRINT_CELL
        )));
    }

    let mut rows = Vec::new();
    let mut row = FIRST_ROW;

    while let Some(direction) = sheet.cell_text("A", row) {
        if direction == CANCELLED {
            log::debug!("row {} cancelled, skipping", row);
            row += 1;
            continue;
        }

        let cell = |column: &str| sheet.cell_text(column, row).unwrap_or_default();
        let trimmed = |column: &str| cell(column).trim_end().to_string();

        rows.push(BorderCrossingRow {
            direction,
            citizenship: cell("D"),
            crossing_point: cell("G"),
            driver: cell("I"),
            border_sector: trimmed("J"),
            timestamp: cell("L"),
            name_cyrillic: cell("M"),
            name_latin: cell("N"),
            birth_date: cell("P"),
            document_number: cell("S"),
            crossing_point_type: cell("AB"),
            vehicle_kind: trimmed("AE"),
            vehicle_type: trimmed("AF"),
            vehicle_brand: trimmed("AH"),
            plate_number: cell("AQ"),
            vin: cell("AR"),
            sex: cell("H"),
            children_note: cell("T"),
        });
        row += 1;
    }

    log::debug!("{} crossing rows read", rows.len());
    Ok(rows)
}

/// Read crossing rows from `.xlsx` bytes.
pub fn extract_rows_from_bytes(data: &[u8]) -> Result<Vec<BorderCrossingRow>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))?;

    if !workbook.sheet_names().iter().any(|name| name == DATA_SHEET) {
        return Err(Error::Format(format!("sheet {} not found", DATA_SHEET)));
    }

    let range = workbook.worksheet_range(DATA_SHEET)?;
    extract_rows(&range)
}
