//! Person records extracted from migration-service documents.

use serde::{Deserialize, Serialize};

/// Placeholder for a field the source does not provide.
pub const UNKNOWN: &str = "невідомо";

/// Identity record of one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Surname, given name and patronymic joined by spaces
    pub full_name: String,
    /// Birth date as printed (dd.mm.yyyy)
    pub birth_date: String,
    pub birth_place: String,
    pub phone: String,
    pub residence_address: String,
    /// Unique demographic register number (УНЗР)
    pub personal_number: String,
    /// Taxpayer card number (РНОКПП)
    pub tax_id: String,
    /// Identity documents, grouped by document type in label order
    pub documents: Vec<DocumentEntry>,
    /// Photo from the first page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    /// Labels without a dedicated field, verbatim and in input order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl Default for PersonRecord {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            birth_date: String::new(),
            birth_place: UNKNOWN.to_string(),
            phone: UNKNOWN.to_string(),
            residence_address: UNKNOWN.to_string(),
            personal_number: UNKNOWN.to_string(),
            tax_id: UNKNOWN.to_string(),
            documents: Vec::new(),
            photo: None,
            extra: Vec::new(),
        }
    }
}

impl PersonRecord {
    /// Create an empty record with placeholder values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from manually entered `Label: value` pairs.
    ///
    /// Known labels fill their fields (a repeated label keeps the last
    /// value); everything else is kept in [`PersonRecord::extra`]. Birth
    /// place defaults to empty here, as manual entries rarely carry it.
    pub fn from_key_values(pairs: &[(String, String)]) -> Self {
        let mut record = Self {
            birth_place: String::new(),
            ..Self::default()
        };

        for (key, value) in pairs {
            let value = value.clone();
            match key.as_str() {
                "Прізвище" => record.full_name = value,
                "Дата народження" => record.birth_date = value,
                "Місце народження" => record.birth_place = value,
                "Телефон" => record.phone = value,
                "Адреса" => record.residence_address = value,
                "УНЗР" => record.personal_number = value,
                "РНОКПП" => record.tax_id = value,
                _ => record.extra.push((key.clone(), value)),
            }
        }

        record
    }

    /// Whether the given field value is the placeholder.
    pub fn is_unknown(value: &str) -> bool {
        value == UNKNOWN
    }
}

/// An identity document listed in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Document label as printed (e.g. "Паспорт громадянина України")
    pub document_type: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    pub expiry_date: String,
}

/// PNG-encoded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(skip_serializing)]
    #[serde(default)]
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    /// MIME type of [`Photo::data`].
    pub fn mime_type(&self) -> &'static str {
        "image/png"
    }

    /// Suggested file name for a photo of the given person.
    pub fn suggested_filename(&self, stem: &str) -> String {
        format!("{}.png", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_uses_placeholders() {
        let record = PersonRecord::new();
        assert_eq!(record.full_name, "");
        assert_eq!(record.birth_date, "");
        assert_eq!(record.phone, UNKNOWN);
        assert_eq!(record.tax_id, UNKNOWN);
        assert!(record.documents.is_empty());
    }

    #[test]
    fn test_photo_file_name() {
        let photo = Photo {
            data: Vec::new(),
            width: 1,
            height: 1,
        };
        assert_eq!(photo.mime_type(), "image/png");
        assert_eq!(photo.suggested_filename("dms_petrenko"), "dms_petrenko.png");
    }

    #[test]
    fn test_from_key_values() {
        let record = PersonRecord::from_key_values(&pairs(&[
            ("Прізвище", "Петренко Іван Петрович"),
            ("Телефон", "+380501234567"),
            ("Професія", "інженер"),
            ("Телефон", "+380671112233"),
        ]));
        assert_eq!(record.full_name, "Петренко Іван Петрович");
        assert_eq!(record.phone, "+380671112233");
        assert_eq!(record.birth_place, "");
        assert_eq!(record.residence_address, UNKNOWN);
        assert_eq!(
            record.extra,
            vec![("Професія".to_string(), "інженер".to_string())]
        );
    }

    #[test]
    fn test_photo_skips_bytes_in_json() {
        let photo = Photo {
            data: vec![1, 2, 3],
            width: 2,
            height: 3,
        };
        let json = serde_json::to_string(&photo).unwrap();
        assert!(!json.contains("data"));
        assert_eq!(photo.suggested_filename("person_1"), "person_1.png");
    }
}
