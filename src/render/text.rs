//! Plain-text summaries of extracted records, in the wording of the
//! printed reports.

use crate::model::{
    BorderCrossingRow, ContentBlock, DocumentEntry, Encumbrance, InsuranceRecord, PersonRecord,
    PropertyObject, RealEstateRecord, RegistryInfo, TaggedBlock, VehicleRecord, DASH,
};

/// Line shown when an extract lists no property.
pub const NO_PROPERTY: &str = "Немає зареєстрованої нерухомості";

/// Direction value of an entry into the country.
const ENTRY: &str = "В`їзд";

/// Records that have a plain-text form.
pub trait TextSummary {
    fn to_text(&self) -> String;
}

/// Render a list of records separated by blank lines.
pub fn to_text<T: TextSummary>(items: &[T]) -> String {
    items
        .iter()
        .map(TextSummary::to_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl TextSummary for ContentBlock {
    fn to_text(&self) -> String {
        format!("{}\n{}", self.header, self.content)
    }
}

impl TextSummary for TaggedBlock {
    fn to_text(&self) -> String {
        format!("[{} #{}] {}", self.source, self.index + 1, self.block.to_text())
    }
}

impl TextSummary for DocumentEntry {
    fn to_text(&self) -> String {
        match &self.issue_date {
            Some(issued) => format!(
                "{} {} від {} дійсний до: {}",
                self.document_type, self.number, issued, self.expiry_date
            ),
            None => format!(
                "{} {} дійсний до: {}",
                self.document_type, self.number, self.expiry_date
            ),
        }
    }
}

impl TextSummary for PersonRecord {
    fn to_text(&self) -> String {
        let mut lines = vec![
            self.full_name.clone(),
            format!("Дата народження: {}", self.birth_date),
            format!("Місце народження: {}", self.birth_place),
            format!("РНОКПП: {}", self.tax_id),
            format!("УНЗР: {}", self.personal_number),
            format!("Телефон: {}", self.phone),
            format!("Адреса: {}", self.residence_address),
        ];
        lines.extend(self.documents.iter().map(TextSummary::to_text));
        lines.extend(self.extra.iter().map(|(k, v)| format!("{}: {}", k, v)));
        lines.join("\n")
    }
}

/// `Label: value` lines for present values; a bare "так" carries no
/// information and is left out.
fn labeled_lines(fields: &[(&str, Option<&str>)]) -> String {
    fields
        .iter()
        .filter_map(|(label, value)| {
            let value = (*value)?.trim();
            if value.is_empty() || value.to_lowercase() == "так" {
                None
            } else {
                Some(format!("{}: {}", label, value))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl TextSummary for PropertyObject {
    fn to_text(&self) -> String {
        labeled_lines(&[
            ("Тип об'єкта", self.object_type.as_deref()),
            ("Кадастровий номер", self.cadastral_number.as_deref()),
            ("Опис об'єкта", self.description.as_deref()),
            ("Адреса", self.address.as_deref()),
            ("Розмір частки", self.share_size.as_deref()),
            (
                "Дата, час державної реєстрації",
                self.registration_date.as_deref(),
            ),
        ])
    }
}

impl TextSummary for Encumbrance {
    fn to_text(&self) -> String {
        labeled_lines(&[
            ("Вид обтяження", Some(self.encumbrance_type.as_str())),
            ("Підстава внесення запису", Some(self.basis.as_str())),
        ])
    }
}

impl TextSummary for RealEstateRecord {
    fn to_text(&self) -> String {
        match self {
            RealEstateRecord::PropertyObject(p) => p.to_text(),
            RealEstateRecord::Encumbrance(e) => e.to_text(),
        }
    }
}

/// Real-estate records, or the "no property" line for an empty list.
pub fn real_estate_text(records: &[RealEstateRecord]) -> String {
    if records.is_empty() {
        NO_PROPERTY.to_string()
    } else {
        to_text(records)
    }
}

impl TextSummary for BorderCrossingRow {
    fn to_text(&self) -> String {
        self.fields().join(" | ")
    }
}

/// How the person crossed: on foot or by vehicle.
fn crossing_means(row: &BorderCrossingRow) -> String {
    if row.vehicle_kind == "Пішохід" {
        format!(
            "Пішохід п/п {} ділянка {}",
            row.crossing_point, row.border_sector
        )
    } else {
        format!(
            "Заїхав п/п {} ділянка {} на {} {} {}",
            row.crossing_point,
            row.border_sector,
            row.vehicle_type,
            row.vehicle_brand,
            row.plate_number
        )
    }
}

/// Identity header and current status from the latest crossing.
///
/// Rows are newest first, so the status comes from the first row.
pub fn border_status(rows: &[BorderCrossingRow]) -> Option<String> {
    let latest = rows.first()?;

    let identity = format!(
        "{} {}\n({})\nГромадянин {}\nПАСПОРТ - {}",
        latest.name_cyrillic,
        latest.birth_date,
        latest.name_latin,
        latest.citizenship,
        latest.document_number
    );

    let mut status = if latest.direction == ENTRY {
        format!(
            "Знаходиться в Україні з {} \n ({})",
            latest.timestamp,
            crossing_means(latest)
        )
    } else {
        format!(
            "Виїхав з України {} п/п {} ділянка {} на {} {} {}",
            latest.timestamp,
            latest.crossing_point,
            latest.border_sector,
            latest.vehicle_type,
            latest.vehicle_brand,
            latest.plate_number
        )
    };

    if latest.sex == "Чоловіча" && !latest.children_note.is_empty() {
        status.push_str(&format!("\nПідстава для виїзду - {}", latest.children_note));
    }

    Some(format!("{}\n{}", identity, status))
}

/// Status header followed by one line per crossing.
pub fn border_text(rows: &[BorderCrossingRow]) -> String {
    match border_status(rows) {
        Some(status) => format!("{}\n\n1. Перетин кордону\n{}", status, to_lines(rows)),
        None => String::new(),
    }
}

fn to_lines<T: TextSummary>(items: &[T]) -> String {
    items
        .iter()
        .map(TextSummary::to_text)
        .collect::<Vec<_>>()
        .join("\n")
}

impl TextSummary for VehicleRecord {
    fn to_text(&self) -> String {
        let mut parts = Vec::new();

        if let Some(plate) = &self.plate_number {
            parts.push(format!("Номерний знак: {}", plate));
        }
        if let Some(owner) = &self.owner {
            match &self.owner_birth_date {
                Some(date) => parts.push(format!("власник: {} ({})", owner, date)),
                None => parts.push(format!("власник: {}", owner)),
            }
        }
        if let Some(tax_id) = &self.tax_id {
            parts.push(format!("ІПН: {}", tax_id));
        }
        if let Some(address) = &self.registration_address {
            parts.push(format!("місце реєстрації: {}", address));
        }
        if let Some(make) = self.make_and_model() {
            parts.push(format!("марка/модель: {}", make));
        }
        if let Some(vin) = &self.vin {
            parts.push(format!("VIN: {}", vin));
        }
        if let Some(color) = &self.color {
            parts.push(format!("колір: {}", color));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("{}.", parts.join(", "))
        }
    }
}

/// One-line pension-fund summary, with registry details when known.
pub fn insurance_text(record: &InsuranceRecord, info: Option<&RegistryInfo>) -> String {
    let fallback = RegistryInfo {
        name: record
            .company_name
            .clone()
            .unwrap_or_else(|| DASH.to_string()),
        ..RegistryInfo::default()
    };
    let info = info.unwrap_or(&fallback);

    format!(
        "Інформація з ПФУ: Останній страховий внесок був {}. Оплату провів {}, {}: {}, \
         Адреса: {}, Керівник: {}, Вид діяльності: {}, Статус: {}, Email: {}, Телефон: {}",
        record.last_payment_date.as_deref().unwrap_or(DASH),
        info.name,
        record.code_label(),
        record.code.as_deref().unwrap_or(DASH),
        info.address,
        info.manager,
        info.kved,
        info.status,
        info.email.as_deref().unwrap_or(DASH),
        info.phone.as_deref().unwrap_or(DASH),
    )
}

impl TextSummary for InsuranceRecord {
    fn to_text(&self) -> String {
        insurance_text(self, None)
    }
}
