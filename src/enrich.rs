//! Optional lookups against external registries.
//!
//! Extraction never depends on these: a lookup that fails is logged and
//! the record is reported without the extra details.

use crate::error::Result;
use crate::model::{InsuranceRecord, RegistryInfo};

/// Insurer details for a parsed pension-fund line.
pub trait RegistryLookup {
    fn lookup(&self, record: &InsuranceRecord) -> Result<RegistryInfo>;
}

/// Entrepreneur registration status for a taxpayer number.
pub trait EntrepreneurLookup {
    /// A short status line, or `None` when the person is not registered.
    fn status(&self, tax_id: &str) -> Result<Option<String>>;
}

/// Run a lookup, turning a failure into a warning.
pub fn best_effort<T>(service: &str, call: impl FnOnce() -> Result<T>) -> Option<T> {
    match call() {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{} lookup failed: {}", service, e);
            None
        }
    }
}

/// Insurer details, if the registry answers.
pub fn registry_details(
    lookup: &dyn RegistryLookup,
    record: &InsuranceRecord,
) -> Option<RegistryInfo> {
    if record.code.is_none() && record.company_name.is_none() {
        return None;
    }
    best_effort("registry", || lookup.lookup(record))
}

/// Entrepreneur status, if the lookup answers and the person is registered.
pub fn entrepreneur_status(lookup: &dyn EntrepreneurLookup, tax_id: &str) -> Option<String> {
    if crate::model::PersonRecord::is_unknown(tax_id) || tax_id.is_empty() {
        return None;
    }
    best_effort("entrepreneur", || lookup.status(tax_id)).flatten()
}
