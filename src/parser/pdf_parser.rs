//! PDF document reader producing page layouts, text and images.

use std::path::Path;

use crate::detect::{detect_format_from_path, InputFormat};
use crate::error::{Error, Result};
use crate::model::ImageResource;

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::{LayoutAnalyzer, PageLayout};
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        match detect_format_from_path(path)? {
            InputFormat::Pdf { .. } => {}
            _ => return Err(Error::UnknownFormat),
        }

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self { backend, options })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self { backend, options })
    }

    /// Interpret every selected page.
    ///
    /// In lenient mode a page that fails is logged and skipped.
    pub fn layouts(&self) -> Result<Vec<PageLayout>> {
        let analyzer = LayoutAnalyzer::new(&self.backend);
        let mut layouts = Vec::new();

        for page_num in self.backend.pages().keys().copied() {
            if !self.options.includes(page_num) {
                continue;
            }

            match analyzer.analyze_page(page_num) {
                Ok(layout) => layouts.push(layout),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to read page {}: {}", page_num, e);
                }
            }
        }

        Ok(layouts)
    }

    /// Token stream over all selected pages.
    pub fn tokens(&self) -> Result<Vec<String>> {
        let gap = self.options.token_merge_gap;
        Ok(self
            .layouts()?
            .iter()
            .flat_map(|page| page.tokens(gap))
            .collect())
    }

    /// Reading-order text of each selected page.
    pub fn page_texts(&self) -> Result<Vec<String>> {
        Ok(self.layouts()?.iter().map(PageLayout::text).collect())
    }

    /// Image XObjects of one page (1-based).
    pub fn page_images(&self, page_num: u32) -> Result<Vec<ImageResource>> {
        let pages = self.backend.pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.backend.page_images(*page_id)
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(PdfParser::from_bytes(b"not a pdf at all").is_err());
    }

    #[test]
    fn test_open_rejects_non_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Прізвище: Петренко").unwrap();
        assert!(matches!(PdfParser::open(&path), Err(Error::UnknownFormat)));
    }
}
