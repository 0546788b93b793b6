//! Vehicle registration facts from pasted text or a registry spreadsheet.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::VehicleRecord;

use super::border::format_cell;

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).expect("valid regex"))
        .collect()
}

static PLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"Державний номер[:\s]*([A-ZА-ЯІЇЄ0-9]+)",
        r"Номерний знак[:\s]*([A-ZА-ЯІЇЄ0-9]+)",
    ])
});

static OWNER: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[r"Власник[:\s]*([A-ZА-ЯІЇЄ\s]+?)\s*(?:\d{2}\.\d{2}\.\d{4}|$)"])
});

static BIRTH_DATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"Дата народження[:\s]*(\d{2}\.\d{2}\.\d{4})",
        r"Власник[:\s]*[A-ZА-ЯІЇЄ\s]+(\d{2}\.\d{2}\.\d{4})",
    ])
});

static TAX_ID: Lazy<Vec<Regex>> =
    Lazy::new(|| patterns(&[r"ІПН[:\s]*(\d+)", r"ІПН/ЄДРПОУ[:\s]*(\d+)"]));

static ADDRESS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"Адреса власника[:\s]*([^\n]+)",
        r"Адреса реєстрації ТЗ[:\s]*([^\n]+)",
    ])
});

static BRAND: Lazy<Vec<Regex>> = Lazy::new(|| patterns(&[r"Марка/модель ТЗ[:\s]*([A-Z]+)"]));

static MODEL: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[r"Марка/модель ТЗ[:\s]*[A-Z]+\s+([A-Z0-9]+(?:\s+[A-Z0-9.]+)?)"])
});

static VIN: Lazy<Vec<Regex>> =
    Lazy::new(|| patterns(&[r"vin ТЗ[:\s]*([A-Z0-9]+)", r"VIN[:\s]*([A-Z0-9]+)"]));

static COLOR: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[r"Колір ТЗ[:\s]*([A-ZА-ЯІЇЄ]+)", r"Колір[:\s]*([A-ZА-ЯІЇЄ]+)"])
});

static MAKE_AND_MODEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Марка/модель ТЗ[:\s]*([^\n]+)").expect("valid regex"));

static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").expect("valid regex"));

/// First capture of the first pattern that matches.
fn first_capture(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Search free text for vehicle facts.
pub fn extract_vehicle(text: &str) -> VehicleRecord {
    let mut record = VehicleRecord {
        plate_number: first_capture(text, &PLATE),
        owner: first_capture(text, &OWNER),
        owner_birth_date: first_capture(text, &BIRTH_DATE),
        tax_id: first_capture(text, &TAX_ID),
        registration_address: first_capture(text, &ADDRESS),
        brand: first_capture(text, &BRAND),
        model: first_capture(text, &MODEL),
        vin: first_capture(text, &VIN),
        color: first_capture(text, &COLOR),
    };

    // Non-Latin brands only show up in the free-form line.
    if record.brand.is_none() {
        if let Some(line) = MAKE_AND_MODEL_LINE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
        {
            let mut parts = line.split_whitespace();
            record.brand = parts.next().map(str::to_string);
            let rest = parts.collect::<Vec<_>>().join(" ");
            if !rest.is_empty() {
                record.model = Some(rest);
            }
        }
    }

    record
}

/// Read vehicle facts from a registry sheet.
///
/// Labels are looked up cell by cell with their value in the next column;
/// whatever is still missing is searched in the sheet's text.
pub fn extract_vehicle_from_range(range: &Range<Data>) -> VehicleRecord {
    let rows: Vec<Vec<Option<String>>> = range
        .rows()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();

    let mut record = VehicleRecord::default();

    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            let text = match cell {
                Some(t) => t.trim(),
                None => continue,
            };
            let next = || {
                row.get(col + 1)
                    .and_then(|c| c.as_deref())
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            if text.to_uppercase().contains("НОМЕРНИЙ ЗНАК") {
                record.plate_number = next().or(record.plate_number.take());
            }
            if text.contains("Власник") && text.contains(':') {
                if let Some(owner) = first_capture(text, &OWNER) {
                    record.owner = Some(owner);
                }
            }
            if text.contains("Дата народження") {
                if let Some(m) = DATE.find(text) {
                    record.owner_birth_date = Some(m.as_str().to_string());
                }
            }
            if text.contains("ІПН") {
                if let Some(id) = first_capture(text, &TAX_ID[..1]) {
                    record.tax_id = Some(id);
                } else if let Some(id) = next().filter(|v| v.chars().all(|c| c.is_ascii_digit())) {
                    record.tax_id = Some(id);
                }
            }
            if let Some(place) = text.split_once("Місце реєстрації").map(|(_, rest)| {
                rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace())
                    .trim()
                    .to_string()
            }) {
                if !place.is_empty() {
                    record.registration_address = Some(place);
                }
            }
            match text {
                "Марка" => record.brand = next().or(record.brand.take()),
                "Модель" => record.model = next().or(record.model.take()),
                "VIN" => record.vin = next().or(record.vin.take()),
                "Колір" => record.color = next().or(record.color.take()),
                _ => {}
            }
        }
    }

    let text = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| c.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    fill_missing(&mut record, extract_vehicle(&text));
    record
}

/// Read vehicle facts from the first sheet of `.xlsx` bytes.
pub fn extract_vehicle_from_bytes(data: &[u8]) -> Result<VehicleRecord> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Format("workbook has no sheets".to_string()))??;
    Ok(extract_vehicle_from_range(&range))
}

fn fill_missing(record: &mut VehicleRecord, from: VehicleRecord) {
    let pairs = [
        (&mut record.plate_number, from.plate_number),
        (&mut record.owner, from.owner),
        (&mut record.owner_birth_date, from.owner_birth_date),
        (&mut record.tax_id, from.tax_id),
        (&mut record.registration_address, from.registration_address),
        (&mut record.brand, from.brand),
        (&mut record.model, from.model),
        (&mut record.vin, from.vin),
        (&mut record.color, from.color),
    ];
    for (slot, value) in pairs {
        if slot.is_none() {
            *slot = value;
        }
    }
}
