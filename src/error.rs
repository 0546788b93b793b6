//! Error types for dossier library.

use std::io;
use thiserror::Error;

/// Result type alias for dossier operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading and extracting source documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is none of the supported formats.
    #[error("Unknown file format: not a PDF, spreadsheet or text")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error decoding or encoding an embedded image.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error reading a workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The input does not look like the expected document template.
    #[error("Format error: {0}")]
    Format(String),

    /// A marker that identifies the document template is absent.
    #[error("Marker not found: {0}")]
    MissingMarker(&'static str),

    /// An external lookup failed.
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error means "this file is not the expected kind of document".
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::Format(_) | Error::MissingMarker(_) | Error::UnknownFormat
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<calamine::XlsxError> for Error {
    fn from(err: calamine::XlsxError) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageExtract(err.to_string())
    }
}
