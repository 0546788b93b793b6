//! Output for extracted records: text cleanup, JSON and plain-text summaries.

mod cleanup;
mod json;
mod text;

pub use cleanup::{
    collapse_spaces, normalize_apostrophes, CleanupOptions, CleanupPipeline, DEFAULT_BOILERPLATE,
};
pub use json::{to_json, JsonFormat};
pub use text::{
    border_status, border_text, insurance_text, real_estate_text, to_text, TextSummary,
    NO_PROPERTY,
};
