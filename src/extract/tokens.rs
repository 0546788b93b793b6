//! Anchor-relative reads over a flat token stream.

/// A read-only view over the tokens of one document.
///
/// Fields in the migration-service layout sit at fixed offsets from a label
/// token. Every read is bounds-checked and returns `None` when the anchor or
/// the offset is missing.
#[derive(Debug, Clone, Copy)]
pub struct TokenWindow<'a> {
    tokens: &'a [String],
}

impl<'a> TokenWindow<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at an absolute index.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Index of the first token equal to `anchor`.
    pub fn find(&self, anchor: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == anchor)
    }

    /// Whether any token equals `anchor`.
    pub fn contains(&self, anchor: &str) -> bool {
        self.find(anchor).is_some()
    }

    /// Token `offset` positions after the first occurrence of `anchor`.
    pub fn after(&self, anchor: &str, offset: usize) -> Option<&'a str> {
        let index = self.find(anchor)?;
        self.get(index + offset)
    }

    /// Tokens strictly between two indices.
    pub fn between(&self, start: usize, end: usize) -> &'a [String] {
        if start + 1 >= end || end > self.tokens.len() {
            return &[];
        }
        &self.tokens[start + 1..end]
    }
}
