//! Records from state real-estate registry extracts.

use serde::{Deserialize, Serialize};

/// One record of a registry extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RealEstateRecord {
    /// A property object with its right-in-rem details.
    PropertyObject(PropertyObject),
    /// A registered encumbrance (mortgage, arrest, ban on alienation).
    Encumbrance(Encumbrance),
}

impl RealEstateRecord {
    /// Whether this is a property object record.
    pub fn is_property(&self) -> bool {
        matches!(self, RealEstateRecord::PropertyObject(_))
    }

    /// Whether this is an encumbrance record.
    pub fn is_encumbrance(&self) -> bool {
        matches!(self, RealEstateRecord::Encumbrance(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyObject {
    pub object_type: Option<String>,
    pub cadastral_number: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    /// Distinct share sizes joined by ", " (a whole share "1/1" is omitted)
    pub share_size: Option<String>,
    pub registration_date: Option<String>,
}

impl PropertyObject {
    /// An object is worth reporting once it can be identified.
    pub fn is_identified(&self) -> bool {
        [
            &self.object_type,
            &self.cadastral_number,
            &self.address,
            &self.description,
        ]
        .iter()
        .any(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Encumbrance {
    pub encumbrance_type: String,
    /// Grounds for the registry entry (court ruling, contract, ...)
    pub basis: String,
}

impl Encumbrance {
    pub fn is_empty(&self) -> bool {
        self.encumbrance_type.is_empty() && self.basis.is_empty()
    }
}
