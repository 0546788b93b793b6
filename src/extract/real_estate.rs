//! Real-property registry extracts.
//!
//! The registry prints every record under an "Актуальна інформація про ..."
//! caption and repeats the same field labels in each record, so the text is
//! scanned line by line with one cursor and a label only counts inside the
//! section that contains it.

use crate::error::{Error, Result};
use crate::model::{Encumbrance, PropertyObject, RealEstateRecord};
use crate::render::normalize_apostrophes;

const SECTION_PREFIX: &str = "актуальна інформація про";
const ENCUMBRANCE_HEADER: &str = "актуальна інформація про державну реєстрацію обтяжень";
const OBJECT_HEADER: &str = "актуальна інформація про об'єкт речових прав";
const RIGHT_HEADER: &str = "актуальна інформація про речове право";
const RIGHT_HEADER_TEXT: &str = "Актуальна інформація про речове право";

const BASIS_LABEL: &str = "підстава внесення запису";
const ENCUMBRANCE_TYPE_LABEL: &str = "вид обтяження";
const OBJECT_TYPE_LABEL: &str = "тип об'єкта";
/// Some extracts drop the apostrophe altogether.
const OBJECT_TYPE_LABEL_BARE: &str = "тип обєкта";
const CADASTRAL_LABEL: &str = "кадастровий номер";
const DESCRIPTION_LABEL: &str = "опис об'єкта";
const ADDRESS_LABEL: &str = "адреса";
const SHARE_LABEL: &str = "розмір частки";
const REGISTRATION_DATE_LABEL: &str = "дата, час державної реєстрації";

/// Suffix the registry appends to residential object types.
const OBJECT_TYPE_BOILERPLATE: &str = "житлової нерухомості";

/// Labels that end a description.
const DESCRIPTION_STOPS: &[&str] = &[
    ADDRESS_LABEL,
    CADASTRAL_LABEL,
    SHARE_LABEL,
    "дата, час",
    "номер відомостей",
    "земельні ділянки",
    OBJECT_TYPE_LABEL,
    OBJECT_TYPE_LABEL_BARE,
];

/// Labels that end an address.
const ADDRESS_STOPS: &[&str] = &[
    "опис",
    CADASTRAL_LABEL,
    SHARE_LABEL,
    "дата, час",
    "номер відомостей",
    "земельні ділянки",
    OBJECT_TYPE_LABEL,
    OBJECT_TYPE_LABEL_BARE,
];

/// Labels of an object section; a line starting with one is never a value.
const OBJECT_FIELD_LABELS: &[&str] = &[
    OBJECT_TYPE_LABEL,
    OBJECT_TYPE_LABEL_BARE,
    CADASTRAL_LABEL,
    DESCRIPTION_LABEL,
    ADDRESS_LABEL,
    SHARE_LABEL,
    "дата, час",
    "номер відомостей",
];

/// Minimum count of non-blank characters in a readable extract.
const MIN_TEXT_CHARS: usize = 50;

/// Extract records from full extract text.
///
/// Returns an error when the text is too short to be a registry extract;
/// an extract without records is a successful empty list.
pub fn extract_real_estate_text(text: &str) -> Result<Vec<RealEstateRecord>> {
    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < MIN_TEXT_CHARS {
        return Err(Error::Format("could not read text from extract".to_string()));
    }
    Ok(extract_real_estate(text))
}

/// Extract every encumbrance and property object, in document order.
pub fn extract_real_estate(text: &str) -> Vec<RealEstateRecord> {
    let normalized = normalize_apostrophes(text);
    let lines: Vec<&str> = normalized
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let scanner = SectionScanner { lines: &lines };
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let lower = lines[i].to_lowercase();
        i = if lower.contains(ENCUMBRANCE_HEADER) {
            scanner.read_encumbrances(i + 1, &mut records)
        } else if lower.contains(OBJECT_HEADER) {
            scanner.read_object(i + 1, &mut records)
        } else {
            i + 1
        };
    }

    log::debug!("real estate: {} records", records.len());
    records
}

/// Cursor-based reads over the trimmed, non-empty lines of an extract.
struct SectionScanner<'a> {
    lines: &'a [&'a str],
}

impl<'a> SectionScanner<'a> {
    /// Read an encumbrance section; returns the index of the next section
    /// header so the caller re-enters there.
    fn read_encumbrances(&self, start: usize, out: &mut Vec<RealEstateRecord>) -> usize {
        let mut current = Encumbrance::default();
        let mut i = start;

        while i < self.lines.len() {
            let lower = self.lines[i].to_lowercase();
            if lower.contains(SECTION_PREFIX) {
                break;
            }

            if is_label(&lower, BASIS_LABEL) {
                if !current.basis.is_empty() {
                    push_encumbrance(out, std::mem::take(&mut current));
                }
                current.basis = self.continued_value(i, &[ENCUMBRANCE_TYPE_LABEL]);
            } else if is_label(&lower, ENCUMBRANCE_TYPE_LABEL) {
                current.encumbrance_type = self.single_value(i).unwrap_or_default();
            }
            i += 1;
        }

        push_encumbrance(out, current);
        i
    }

    /// Read one property object section; returns the index of the header
    /// that ended it.
    fn read_object(&self, start: usize, out: &mut Vec<RealEstateRecord>) -> usize {
        let mut object = PropertyObject::default();
        let mut shares: Vec<String> = Vec::new();
        let mut dates: Vec<String> = Vec::new();
        let mut i = start;

        while i < self.lines.len() {
            let lower = self.lines[i].to_lowercase();
            if lower.contains(SECTION_PREFIX) && !lower.contains(RIGHT_HEADER) {
                break;
            }

            if is_label(&lower, OBJECT_TYPE_LABEL) || is_label(&lower, OBJECT_TYPE_LABEL_BARE) {
                if object.object_type.is_none() {
                    object.object_type = self.object_type(i);
                }
            } else if is_label(&lower, CADASTRAL_LABEL) {
                if object.cadastral_number.is_none() {
                    object.cadastral_number = self.cadastral_number(i);
                }
            } else if is_label(&lower, DESCRIPTION_LABEL) {
                if object.description.is_none() {
                    let text = self
                        .continued_value(i, DESCRIPTION_STOPS)
                        .replace(RIGHT_HEADER_TEXT, "");
                    object.description = non_empty(text.trim());
                }
            } else if is_label(&lower, ADDRESS_LABEL) {
                if object.address.is_none() {
                    object.address = non_empty(&self.continued_value(i, ADDRESS_STOPS));
                }
            } else if is_label(&lower, SHARE_LABEL) {
                if let Some(share) = self.single_value(i) {
                    if share != "1/1" && !shares.contains(&share) {
                        shares.push(share);
                    }
                }
            } else if is_label(&lower, REGISTRATION_DATE_LABEL) {
                if let Some(date) = self.single_value(i) {
                    if !dates.contains(&date) {
                        dates.push(date);
                    }
                }
            }
            i += 1;
        }

        if !shares.is_empty() {
            object.share_size = Some(shares.join(", "));
        }
        // A later registration supersedes the earlier ones.
        object.registration_date = dates.pop();

        if object.is_identified() {
            out.push(RealEstateRecord::PropertyObject(object));
        } else {
            log::debug!("skipping property section without fields at line {}", start);
        }
        i
    }

    /// Value after the label's colon, or the next line when the label
    /// stands alone.
    fn single_value(&self, at: usize) -> Option<String> {
        let inline = inline_value(self.lines[at]);
        if !inline.is_empty() {
            return Some(inline.to_string());
        }
        let next = self.lines.get(at + 1)?;
        if is_label_line(next) || next.to_lowercase().contains(SECTION_PREFIX) {
            return None;
        }
        Some(next.to_string())
    }

    /// Cadastral numbers are colon-separated, so a bare label takes the
    /// next line unless that line is another field or a section header.
    fn cadastral_number(&self, at: usize) -> Option<String> {
        let inline = inline_value(self.lines[at]);
        if !inline.is_empty() {
            return Some(inline.to_string());
        }
        let next = self.lines.get(at + 1)?;
        let lower = next.to_lowercase();
        if lower.contains(SECTION_PREFIX)
            || OBJECT_FIELD_LABELS.iter().any(|l| lower.starts_with(l))
        {
            return None;
        }
        Some(next.to_string())
    }

    /// Object type with the residential suffix removed, cut at the first
    /// comma.
    fn object_type(&self, at: usize) -> Option<String> {
        let raw = self.single_value(at)?;
        let cleaned = raw.replace(OBJECT_TYPE_BOILERPLATE, "");
        let cleaned = cleaned.trim().trim_end_matches(',');
        let head = cleaned.split(',').next().unwrap_or_default().trim();
        non_empty(head)
    }

    /// Inline value plus following lines up to a stop label or a section
    /// header. Does not move the cursor.
    fn continued_value(&self, at: usize, stops: &[&str]) -> String {
        let mut parts = vec![inline_value(self.lines[at]).to_string()];

        for line in &self.lines[at + 1..] {
            let lower = line.to_lowercase();
            if lower.contains(SECTION_PREFIX) || stops.iter().any(|s| lower.starts_with(s)) {
                break;
            }
            parts.push(line.to_string());
        }

        parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A line that is the label alone or the label followed by a colon.
fn is_label(lower: &str, label: &str) -> bool {
    lower.replace(':', "").trim() == label
        || lower
            .strip_prefix(label)
            .is_some_and(|rest| rest.trim_start().starts_with(':'))
}

/// Text after the first colon, or nothing when the line has none.
fn inline_value(line: &str) -> &str {
    line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("")
}

/// A line that holds another label rather than a value. Affirmative
/// answers such as "Так: ..." are values.
fn is_label_line(line: &str) -> bool {
    line.contains(':') && !line.to_lowercase().starts_with("так")
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn push_encumbrance(out: &mut Vec<RealEstateRecord>, encumbrance: Encumbrance) {
    if !encumbrance.is_empty() {
        out.push(RealEstateRecord::Encumbrance(encumbrance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(records: &[RealEstateRecord], index: usize) -> &PropertyObject {
        match &records[index] {
            RealEstateRecord::PropertyObject(p) => p,
            other => panic!("expected property object, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_header_yields_nothing() {
        let text = "Актуальна інформація про об\u{2019}єкт речових прав\n";
        assert!(extract_real_estate(text).is_empty());
    }

    #[test]
    fn test_land_parcel_with_rights() {
        let text = "\
Актуальна інформація про об'єкт речових прав
Тип об'єкта:
земельна ділянка
Кадастровий номер: 3222486200:03:001:5001
Опис об'єкта: для будівництва
та обслуговування житлового будинку
Адреса: Київська обл., с. Гатне
Актуальна інформація про речове право
Дата, час державної реєстрації: 01.02.2015 10:00:00
Розмір частки: 1/2
Актуальна інформація про речове право
Дата, час державної реєстрації: 05.06.2020 12:30:00
Розмір частки: 1/2
";
        let records = extract_real_estate(text);
        assert_eq!(records.len(), 1);
        let p = property(&records, 0);
        assert_eq!(p.object_type.as_deref(), Some("земельна ділянка"));
        assert_eq!(p.cadastral_number.as_deref(), Some("3222486200:03:001:5001"));
        assert_eq!(
            p.description.as_deref(),
            Some("для будівництва та обслуговування житлового будинку")
        );
        assert_eq!(p.address.as_deref(), Some("Київська обл., с. Гатне"));
        assert_eq!(p.share_size.as_deref(), Some("1/2"));
        assert_eq!(p.registration_date.as_deref(), Some("05.06.2020 12:30:00"));
    }

    #[test]
    fn test_cadastral_number_on_next_line() {
        let text = "\
Актуальна інформація про об'єкт речових прав
Тип об'єкта: земельна ділянка
Кадастровий номер
3222486200:03:001:5001
Адреса: Київська обл., с. Гатне
";
        let records = extract_real_estate(text);
        let p = property(&records, 0);
        assert_eq!(p.cadastral_number.as_deref(), Some("3222486200:03:001:5001"));
        assert_eq!(p.address.as_deref(), Some("Київська обл., с. Гатне"));
    }

    #[test]
    fn test_bare_cadastral_label_before_next_field() {
        let text = "\
Актуальна інформація про об'єкт речових прав
Тип об'єкта: квартира
Кадастровий номер:
Адреса: м. Київ
";
        let records = extract_real_estate(text);
        assert_eq!(property(&records, 0).cadastral_number, None);
    }

    #[test]
    fn test_object_type_label_without_apostrophe() {
        let text = "\
Актуальна інформація про об'єкт речових прав
Опис об'єкта: двокімнатна
Тип обєкта: квартира
Адреса: м. Одеса
";
        let records = extract_real_estate(text);
        let p = property(&records, 0);
        assert_eq!(p.object_type.as_deref(), Some("квартира"));
        assert_eq!(p.description.as_deref(), Some("двокімнатна"));
    }

    #[test]
    fn test_full_share_ignored() {
        let text = "\
Актуальна інформація про об'єкт речових прав
Тип об'єкта: квартира
Розмір частки: 1/1
";
        let records = extract_real_estate(text);
        assert_eq!(property(&records, 0).share_size, None);
    }

    #[test]
    fn test_object_type_cleanup() {
        let text = "\
Актуальна інформація про об'єкт речових прав
Тип об'єкта: квартира, об'єкт житлової нерухомості
";
        let records = extract_real_estate(text);
        assert_eq!(property(&records, 0).object_type.as_deref(), Some("квартира"));
    }

    #[test]
    fn test_consecutive_objects_both_read() {
        let text = "\
Актуальна інформація про об'єкт речових прав
Тип об'єкта: квартира
Адреса: м. Київ, вул. Хрещатик, 1
Актуальна інформація про об'єкт речових прав
Тип об'єкта: гараж
Адреса: м. Львів
";
        let records = extract_real_estate(text);
        assert_eq!(records.len(), 2);
        assert_eq!(property(&records, 0).address.as_deref(), Some("м. Київ, вул. Хрещатик, 1"));
        assert_eq!(property(&records, 1).object_type.as_deref(), Some("гараж"));
    }

    #[test]
    fn test_encumbrance_section() {
        let text = "\
Актуальна інформація про державну реєстрацію обтяжень
Підстава внесення запису: договір іпотеки
серія та номер: 123
Вид обтяження: іпотека
Актуальна інформація про об'єкт речових прав
Тип об'єкта: квартира
";
        let records = extract_real_estate(text);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            RealEstateRecord::Encumbrance(Encumbrance {
                encumbrance_type: "іпотека".into(),
                basis: "договір іпотеки серія та номер: 123".into(),
            })
        );
        assert!(records[1].is_property());
    }

    #[test]
    fn test_short_text_is_format_error() {
        let err = extract_real_estate_text("   коротко   ").unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_text_without_sections_is_empty() {
        let text = "ВИТЯГ з Державного реєстру речових прав на нерухоме майно про суб'єкта";
        assert_eq!(extract_real_estate_text(text).unwrap(), vec![]);
    }
}
