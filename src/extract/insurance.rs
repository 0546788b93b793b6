//! Pension-fund register lines and insurer registry responses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{InsuranceRecord, RegistryInfo, DASH};

/// Column captions that precede the data in a copied register line.
pub const HEADER_KEYWORDS: &[&str] = &[
    "Назва юридичної особи",
    "страхувальника",
    "Код ЄДРПОУ",
    "РНОКПП",
    "Дата доходу",
];

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2}\.\d{2}\.\d{4})\b").expect("valid regex"));

static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{10}|\d{8})\b").expect("valid regex"));

static PHONE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d\-()+]").expect("valid regex"));

/// Drop everything up to the end of the last header caption.
pub fn strip_header(text: &str) -> &str {
    let end = HEADER_KEYWORDS
        .iter()
        .filter_map(|kw| text.rfind(kw).map(|idx| idx + kw.len()))
        .max()
        .unwrap_or(0);
    text[end..].trim()
}

/// Parse a copied register line.
pub fn extract_insurance(text: &str) -> InsuranceRecord {
    let data = strip_header(text);

    let last_payment_date = DATE
        .captures(data)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let code = CODE.captures(data).and_then(|c| c.get(1));
    let company_name = code.and_then(|m| {
        let name = data[..m.start()]
            .trim()
            .trim_matches(|c| c == '-' || c == '–')
            .trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    });

    InsuranceRecord {
        company_name,
        code: code.map(|m| m.as_str().to_string()),
        last_payment_date,
    }
}

impl RegistryInfo {
    /// Read insurer details from a registry response.
    ///
    /// Details live in `edrfullinfo[0]` of the `result` object (or of the
    /// root when there is no `result`).
    pub fn from_response(response: &Value) -> Result<Self> {
        let result = response.get("result").unwrap_or(response);
        if let Some(message) = result.as_str() {
            return Err(Error::Enrichment(format!("registry returned text: {}", message)));
        }

        let record = match result
            .get("edrfullinfo")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
        {
            Some(record) => record,
            None => {
                let reason = text_field(response, "errormessage")
                    .or_else(|| text_field(response, "message"))
                    .unwrap_or_default();
                return Err(Error::Enrichment(
                    format!("record not found in registry. {}", reason)
                        .trim()
                        .to_string(),
                ));
            }
        };

        let (email, phone) = parse_contacts(record.get("contacts"));
        let is_entrepreneur = record.get("type").and_then(Value::as_f64) == Some(0.0);
        let name = text_field(record, "name");
        let manager = text_field(record, "manager").or_else(|| {
            if is_entrepreneur {
                name.clone()
            } else {
                None
            }
        });

        let or_dash = |v: Option<String>| v.unwrap_or_else(|| DASH.to_string());

        Ok(RegistryInfo {
            name: or_dash(name.or_else(|| text_field(record, "shortname"))),
            address: or_dash(text_field(record, "address")),
            manager: or_dash(manager),
            kved: or_dash(text_field(record, "kved")),
            status: or_dash(text_field(record, "stan").or_else(|| text_field(record, "state"))),
            email,
            phone,
        })
    }
}

/// Email and phone from a `;`-separated string or a `{type, value}` list.
/// A later entry replaces an earlier one.
pub fn parse_contacts(contacts: Option<&Value>) -> (Option<String>, Option<String>) {
    let mut email = None;
    let mut phone = None;

    match contacts {
        Some(Value::String(raw)) => {
            for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                if part.contains('@') {
                    email = Some(part.to_string());
                } else if PHONE_CHARS.is_match(part) {
                    phone = Some(part.to_string());
                }
            }
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                let kind = text_field(entry, "type").unwrap_or_default().to_lowercase();
                let value = text_field(entry, "value").unwrap_or_default();
                if kind.contains("email") || value.contains('@') {
                    email = Some(value);
                } else if kind.contains("телефон") || kind.contains("phone") {
                    phone = Some(value);
                }
            }
        }
        _ => {}
    }

    (email, phone)
}

/// Non-empty text of a field; numbers are rendered as text.
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
