//! Vehicle registration facts.

use serde::{Deserialize, Serialize};

/// Facts found in a vehicle registration snippet. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub plate_number: Option<String>,
    pub owner: Option<String>,
    pub owner_birth_date: Option<String>,
    pub tax_id: Option<String>,
    pub registration_address: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub vin: Option<String>,
    pub color: Option<String>,
}

impl VehicleRecord {
    /// Whether nothing was recognised.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// "BRAND MODEL", or whichever part is known.
    pub fn make_and_model(&self) -> Option<String> {
        match (&self.brand, &self.model) {
            (Some(b), Some(m)) => Some(format!("{} {}", b, m)),
            (Some(b), None) => Some(b.clone()),
            (None, Some(m)) => Some(m.clone()),
            (None, None) => None,
        }
    }
}
