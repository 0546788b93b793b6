//! Text cleanup for extracted block content and registry text.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Footers printed on every page of the analytical reports.
pub const DEFAULT_BOILERPLATE: &[&str] = &[
    "© Департамент інформаційно-аналітичної підтримки - ІПНП",
    "© Департамент інформаційно-аналітичної підтримки",
    "(cid:127)",
];

/// Apostrophe look-alikes that registries mix freely.
const APOSTROPHES: &[char] = &['\u{2019}', '\u{2018}', '\u{201B}', '\u{02BC}'];

static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").expect("valid regex"));

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Strings removed wherever they occur, longest first
    pub boilerplate: Vec<String>,

    /// Replace newlines with spaces
    pub flatten_newlines: bool,

    /// Collapse runs of spaces and trim
    pub normalize_whitespace: bool,
}

impl CleanupOptions {
    /// Options that leave line structure intact.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            boilerplate: Vec::new(),
            flatten_newlines: false,
            normalize_whitespace: false,
        }
    }

    /// Options for segmented block text: boilerplate removed, one line.
    pub fn block_text() -> Self {
        Self {
            normalize_unicode: true,
            boilerplate: DEFAULT_BOILERPLATE.iter().map(|s| s.to_string()).collect(),
            flatten_newlines: true,
            normalize_whitespace: true,
        }
    }

    /// Add a boilerplate string.
    pub fn with_boilerplate(mut self, text: impl Into<String>) -> Self {
        self.boilerplate.push(text.into());
        self
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::block_text()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(mut options: CleanupOptions) -> Self {
        // A longer footer must go before its own prefix.
        options
            .boilerplate
            .sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        Self { options }
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        for phrase in &self.options.boilerplate {
            result = result.replace(phrase.as_str(), "");
        }

        if self.options.flatten_newlines {
            result = result.replace("\r\n", " ").replace(['\n', '\r'], " ");
        }

        if self.options.normalize_whitespace {
            result = collapse_spaces(&result);
        }

        result
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

/// Collapse runs of spaces and tabs into one space and trim.
pub fn collapse_spaces(text: &str) -> String {
    SPACES.replace_all(text, " ").trim().to_string()
}

/// Replace typographic apostrophes with `'`.
pub fn normalize_apostrophes(text: &str) -> String {
    text.replace(APOSTROPHES, "'")
}
