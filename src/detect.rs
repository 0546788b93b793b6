//! Input format detection by magic bytes.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Kind of input recognised from its first bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFormat {
    /// A PDF document with its header version (e.g. "1.7").
    Pdf { version: String },
    /// An Office Open XML workbook (zip container).
    Spreadsheet,
    /// UTF-8 text.
    Text,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Pdf { version } => write!(f, "PDF {}", version),
            InputFormat::Spreadsheet => write!(f, "XLSX"),
            InputFormat::Text => write!(f, "text"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Zip local file header, the container of .xlsx workbooks.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Detect the input format of a file.
///
/// # Example
/// ```no_run
/// use dossier::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.pdf").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut header = Vec::with_capacity(512);
    reader.take(512).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the input format from the leading bytes of a file.
///
/// Returns `Err(Error::UnknownFormat)` for binary data that is neither a PDF
/// nor a zip container.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if data.starts_with(PDF_MAGIC) {
        if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
            return Err(Error::UnknownFormat);
        }
        let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
        let version = String::from_utf8_lossy(version_bytes).to_string();
        if !is_valid_version(&version) {
            return Err(Error::UnsupportedVersion(version));
        }
        return Ok(InputFormat::Pdf { version });
    }

    if data.starts_with(ZIP_MAGIC) {
        return Ok(InputFormat::Spreadsheet);
    }

    if looks_like_text(data) {
        return Ok(InputFormat::Text);
    }

    Err(Error::UnknownFormat)
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    if version.len() != 3 {
        return false;
    }

    let chars: Vec<char> = version.chars().collect();
    chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

fn looks_like_text(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }
    // A multi-byte sequence may be cut at the sniff boundary.
    let valid = match std::str::from_utf8(data) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    };
    valid && !data.contains(&0)
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(InputFormat::Pdf { .. }))
}

/// Check if bytes look like an .xlsx workbook.
pub fn is_spreadsheet_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(InputFormat::Spreadsheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(
            format,
            InputFormat::Pdf {
                version: "1.7".to_string()
            }
        );
    }

    #[test]
    fn test_detect_truncated_pdf_header() {
        let result = detect_format_from_bytes(b"%PDF-1");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_bad_pdf_version() {
        let result = detect_format_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_detect_spreadsheet() {
        let data = b"PK\x03\x04\x14\x00\x06\x00";
        assert_eq!(
            detect_format_from_bytes(data).unwrap(),
            InputFormat::Spreadsheet
        );
        assert!(is_spreadsheet_bytes(data));
        assert!(!is_pdf_bytes(data));
    }

    #[test]
    fn test_detect_text() {
        let data = "Прізвище: Петренко\nТелефон: 0501234567".as_bytes();
        assert_eq!(detect_format_from_bytes(data).unwrap(), InputFormat::Text);
    }

    #[test]
    fn test_detect_text_cut_mid_character() {
        let data = "Прізвище".as_bytes();
        assert_eq!(
            detect_format_from_bytes(&data[..3]).unwrap(),
            InputFormat::Text
        );
    }

    #[test]
    fn test_detect_binary() {
        let result = detect_format_from_bytes(&[0x00, 0xFF, 0x10, 0x80]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
        assert!(matches!(
            detect_format_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("abc"));
    }
}
