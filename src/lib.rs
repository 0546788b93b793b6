//! # dossier
//!
//! Structured record extraction from the semi-structured documents an
//! investigator collects about a person: analytical PDF reports, migration
//! service extracts, real-estate registry extracts, border-crossing
//! spreadsheets and short registry text snippets.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dossier::{render, segment_file};
//!
//! fn main() -> dossier::Result<()> {
//!     // Split an analytical report into captioned blocks
//!     let blocks = segment_file("report.pdf")?;
//!
//!     // Hand them off as JSON
//!     let json = render::to_json(&blocks, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reading**: positioned text runs and filled rectangles per page
//! - **Banner segmentation**: header/content blocks from colored caption strips
//! - **Fixed-template fields**: person records from migration-service extracts
//! - **Sectioned fields**: property objects and encumbrances from registry extracts
//! - **Spreadsheet rows**: border crossings by fixed column letters
//! - **Batch processing**: one failing file never stops the others

pub mod batch;
pub mod detect;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{process_batch, BatchReport, FileError, FileOutput};
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use extract::{
    extract_insurance, extract_manual_person, extract_person, extract_real_estate,
    extract_vehicle, PersonExtractor, PersonLayout, SegmentOptions, Segmenter,
};
pub use model::{
    BorderCrossingRow, ContentBlock, DocumentEntry, Encumbrance, InsuranceRecord, PersonRecord,
    Photo, PropertyObject, RealEstateRecord, RegistryInfo, TaggedBlock, VehicleRecord,
};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use render::{JsonFormat, TextSummary};

use std::path::Path;

/// Split an analytical report into header/content blocks.
///
/// # Example
///
/// ```no_run
/// use dossier::segment_file;
///
/// for block in segment_file("report.pdf").unwrap() {
///     println!("{}: {}", block.header, block.content);
/// }
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<Vec<ContentBlock>> {
    Dossier::new().segment_file(path)
}

/// Split an analytical report given as bytes.
pub fn segment_bytes(data: &[u8]) -> Result<Vec<ContentBlock>> {
    Dossier::new().segment_bytes(data)
}

/// Extract a person record, photo included, from a migration-service PDF.
///
/// # Example
///
/// ```no_run
/// use dossier::extract_person_file;
///
/// let person = extract_person_file("dms.pdf").unwrap();
/// println!("{} {}", person.full_name, person.birth_date);
/// ```
pub fn extract_person_file<P: AsRef<Path>>(path: P) -> Result<PersonRecord> {
    Dossier::new().person_file(path)
}

/// Extract a person record from migration-service PDF bytes.
pub fn extract_person_bytes(data: &[u8]) -> Result<PersonRecord> {
    Dossier::new().person_bytes(data)
}

/// Extract property objects and encumbrances from a registry PDF.
pub fn extract_real_estate_file<P: AsRef<Path>>(path: P) -> Result<Vec<RealEstateRecord>> {
    Dossier::new().real_estate_file(path)
}

/// Extract property objects and encumbrances from registry PDF bytes.
pub fn extract_real_estate_bytes(data: &[u8]) -> Result<Vec<RealEstateRecord>> {
    Dossier::new().real_estate_bytes(data)
}

/// Read border-crossing rows from an `.xlsx` export.
///
/// # Example
///
/// ```no_run
/// use dossier::extract_border_crossings_file;
///
/// let rows = extract_border_crossings_file("crossings.xlsx").unwrap();
/// println!("{} crossings", rows.len());
/// ```
pub fn extract_border_crossings_file<P: AsRef<Path>>(path: P) -> Result<Vec<BorderCrossingRow>> {
    let data = std::fs::read(path)?;
    extract_border_crossings_bytes(&data)
}

/// Read border-crossing rows from `.xlsx` bytes.
pub fn extract_border_crossings_bytes(data: &[u8]) -> Result<Vec<BorderCrossingRow>> {
    if !detect::is_spreadsheet_bytes(data) {
        return Err(Error::UnknownFormat);
    }
    extract::extract_rows_from_bytes(data)
}

/// Vehicle facts from a text snippet or a registry spreadsheet.
pub fn extract_vehicle_file<P: AsRef<Path>>(path: P) -> Result<VehicleRecord> {
    let data = std::fs::read(path)?;
    match detect_format_from_bytes(&data)? {
        InputFormat::Spreadsheet => extract::extract_vehicle_from_bytes(&data),
        InputFormat::Text => Ok(extract_vehicle(&String::from_utf8_lossy(&data))),
        InputFormat::Pdf { .. } => Err(Error::UnknownFormat),
    }
}

/// Insurance facts from a copied pension-fund register line.
pub fn extract_insurance_file<P: AsRef<Path>>(path: P) -> Result<InsuranceRecord> {
    let text = read_text(path)?;
    Ok(extract_insurance(&text))
}

/// Person record from a file of `Label: value` lines.
pub fn extract_manual_person_file<P: AsRef<Path>>(path: P) -> Result<PersonRecord> {
    let text = read_text(path)?;
    extract_manual_person(&text)
}

fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let data = std::fs::read(path)?;
    match detect_format_from_bytes(&data)? {
        InputFormat::Text => Ok(String::from_utf8_lossy(&data).into_owned()),
        _ => Err(Error::UnknownFormat),
    }
}

/// Builder for reading PDF sources with shared options.
///
/// # Example
///
/// ```no_run
/// use dossier::{Dossier, SegmentOptions};
///
/// let blocks = Dossier::new()
///     .lenient()
///     .with_segment_options(SegmentOptions::new().with_min_width_ratio(0.5))
///     .segment_file("report.pdf")?;
/// # Ok::<(), dossier::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dossier {
    parse_options: ParseOptions,
    segment_options: SegmentOptions,
    person_layout: PersonLayout,
}

impl Dossier {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip pages that fail to parse instead of failing the document.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Read only the given pages (1-based).
    pub fn with_pages(mut self, pages: Vec<u32>) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set banner segmentation options.
    pub fn with_segment_options(mut self, options: SegmentOptions) -> Self {
        self.segment_options = options;
        self
    }

    /// Set the migration-service template layout.
    pub fn with_person_layout(mut self, layout: PersonLayout) -> Self {
        self.person_layout = layout;
        self
    }

    fn open<P: AsRef<Path>>(&self, path: P) -> Result<PdfParser> {
        PdfParser::open_with_options(path, self.parse_options.clone())
    }

    fn load(&self, data: &[u8]) -> Result<PdfParser> {
        if !detect::is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        PdfParser::from_bytes_with_options(data, self.parse_options.clone())
    }

    /// Segment a report file.
    pub fn segment_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ContentBlock>> {
        self.segment(&self.open(path)?)
    }

    /// Segment report bytes.
    pub fn segment_bytes(&self, data: &[u8]) -> Result<Vec<ContentBlock>> {
        self.segment(&self.load(data)?)
    }

    fn segment(&self, parser: &PdfParser) -> Result<Vec<ContentBlock>> {
        let layouts = parser.layouts()?;
        let blocks = Segmenter::new(self.segment_options.clone()).segment(&layouts);
        log::info!("{} pages segmented into {} blocks", layouts.len(), blocks.len());
        Ok(blocks)
    }

    /// Extract a person from a migration-service file.
    pub fn person_file<P: AsRef<Path>>(&self, path: P) -> Result<PersonRecord> {
        self.person(&self.open(path)?)
    }

    /// Extract a person from migration-service bytes.
    pub fn person_bytes(&self, data: &[u8]) -> Result<PersonRecord> {
        self.person(&self.load(data)?)
    }

    fn person(&self, parser: &PdfParser) -> Result<PersonRecord> {
        PersonExtractor::new(self.person_layout.clone()).extract_pdf(parser)
    }

    /// Extract registry records from a real-estate extract file.
    pub fn real_estate_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RealEstateRecord>> {
        self.real_estate(&self.open(path)?)
    }

    /// Extract registry records from real-estate extract bytes.
    pub fn real_estate_bytes(&self, data: &[u8]) -> Result<Vec<RealEstateRecord>> {
        self.real_estate(&self.load(data)?)
    }

    fn real_estate(&self, parser: &PdfParser) -> Result<Vec<RealEstateRecord>> {
        let text = parser.page_texts()?.join("\n");
        extract::extract_real_estate_text(&text)
    }
}
