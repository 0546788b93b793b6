//! Record extractors, one per source document kind.

pub mod border;
pub mod insurance;
pub mod key_value;
pub mod person;
pub mod real_estate;
pub mod segment;
mod tokens;
pub mod vehicle;

pub use border::{extract_rows, extract_rows_from_bytes, CellSource};
pub use insurance::{extract_insurance, parse_contacts, strip_header};
pub use key_value::{extract_manual_person, parse_key_values};
pub use person::{extract_person, photo_from_image, DocumentPattern, PersonExtractor, PersonLayout};
pub use real_estate::{extract_real_estate, extract_real_estate_text};
pub use segment::{SegmentOptions, Segmenter};
pub use tokens::TokenWindow;
pub use vehicle::{extract_vehicle, extract_vehicle_from_bytes, extract_vehicle_from_range};
