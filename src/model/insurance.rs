//! Pension-fund insurance facts and insurer registry details.

use serde::{Deserialize, Serialize};

/// Value shown for a registry detail that is not present.
pub const DASH: &str = "—";

/// Last insurer payment parsed from a pension-fund register line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsuranceRecord {
    pub company_name: Option<String>,
    /// 8-digit company code or 10-digit individual tax number
    pub code: Option<String>,
    pub last_payment_date: Option<String>,
}

impl InsuranceRecord {
    /// Label of the insurer code: individual tax number or company code.
    pub fn code_label(&self) -> &'static str {
        match &self.code {
            Some(code) if code.len() == 10 => "РНОКПП",
            _ => "ЄДРПОУ",
        }
    }
}

/// Insurer details from the business registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub name: String,
    pub address: String,
    pub manager: String,
    /// Main activity code and title
    pub kved: String,
    pub status: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Default for RegistryInfo {
    fn default() -> Self {
        Self {
            name: DASH.to_string(),
            address: DASH.to_string(),
            manager: DASH.to_string(),
            kved: DASH.to_string(),
            status: DASH.to_string(),
            email: None,
            phone: None,
        }
    }
}
