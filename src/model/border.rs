//! Border-crossing rows read from the `Data` sheet of an analytics export.

use serde::{Deserialize, Serialize};

/// One crossing event. Field order matches the positional hand-off order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BorderCrossingRow {
    /// Entry or exit (column A)
    pub direction: String,
    /// Column D
    pub citizenship: String,
    /// Column G
    pub crossing_point: String,
    /// Driver flag (column I)
    pub driver: String,
    /// Column J
    pub border_sector: String,
    /// Date and time of crossing (column L)
    pub timestamp: String,
    /// Column M
    pub name_cyrillic: String,
    /// Column N
    pub name_latin: String,
    /// Column P
    pub birth_date: String,
    /// Column S
    pub document_number: String,
    /// Column AB
    pub crossing_point_type: String,
    /// Column AE
    pub vehicle_kind: String,
    /// Column AF
    pub vehicle_type: String,
    /// Column AH
    pub vehicle_brand: String,
    /// Column AQ
    pub plate_number: String,
    /// Column AR
    pub vin: String,
    /// Column H
    pub sex: String,
    /// Accompanying children (column T)
    pub children_note: String,
}

impl BorderCrossingRow {
    /// Number of positional fields.
    pub const FIELD_COUNT: usize = 18;

    /// Fields in positional order.
    pub fn fields(&self) -> [&str; Self::FIELD_COUNT] {
        [
            &self.direction,
            &self.citizenship,
            &self.crossing_point,
            &self.driver,
            &self.border_sector,
            &self.timestamp,
            &self.name_cyrillic,
            &self.name_latin,
            &self.birth_date,
            &self.document_number,
            &self.crossing_point_type,
            &self.vehicle_kind,
            &self.vehicle_type,
            &self.vehicle_brand,
            &self.plate_number,
            &self.vin,
            &self.sex,
            &self.children_note,
        ]
    }
}
