//! Parsing options and configuration.

/// Options for reading PDF documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Same-line runs closer than this many font sizes form one token
    pub token_merge_gap: f32,

    /// Pages to read (1-based); `None` reads all pages
    pub pages: Option<Vec<u32>>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the token merge gap, in font sizes.
    pub fn with_token_merge_gap(mut self, gap: f32) -> Self {
        self.token_merge_gap = gap;
        self
    }

    /// Restrict reading to the given pages.
    pub fn with_pages(mut self, pages: Vec<u32>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Whether a page is selected.
    pub fn includes(&self, page: u32) -> bool {
        match &self.pages {
            Some(pages) => pages.contains(&page),
            None => true,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            token_merge_gap: 1.5,
            pages: None,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid pages and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .lenient()
            .with_token_merge_gap(2.0)
            .with_pages(vec![1, 3]);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.token_merge_gap, 2.0);
        assert!(options.includes(3));
        assert!(!options.includes(2));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.includes(42));
    }
}
