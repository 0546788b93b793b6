//! Record types produced by the extractors.
//!
//! These are the hand-off types: every record is serde-serializable and
//! immutable once an extractor returns it.

mod block;
mod border;
mod insurance;
mod person;
mod real_estate;
mod resource;
mod vehicle;

pub use block::{order_for_report, ContentBlock, TaggedBlock, ADDRESS_HEADER, START_OF_DOCUMENT};
pub use border::BorderCrossingRow;
pub use insurance::{InsuranceRecord, RegistryInfo, DASH};
pub use person::{DocumentEntry, PersonRecord, Photo, UNKNOWN};
pub use real_estate::{Encumbrance, PropertyObject, RealEstateRecord};
pub use resource::{components_for_color_space, ImageFilter, ImageResource};
pub use vehicle::VehicleRecord;
