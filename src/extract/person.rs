//! Person records from migration-service (DMS) PDFs.
//!
//! The DMS export prints each value a fixed number of lines after its
//! label, so extraction works on the flat token stream: one token per text
//! line, in content-stream order.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

use crate::error::{Error, Result};
use crate::model::{DocumentEntry, ImageFilter, ImageResource, PersonRecord, Photo, UNKNOWN};
use crate::parser::PdfParser;

use super::tokens::TokenWindow;

/// Token that identifies a DMS person extract.
pub const PERSON_MARKER: &str = "ІНФОРМАЦІЯ ПРО ОСОБУ";

/// Document section labels, in reporting order.
pub const DOCUMENT_LABELS: &[&str] = &[
    "Паспорт громадянина України",
    "Паспорт(и) громадянина України для виїзду за кордон",
    "Свідоцтво про народження",
];

/// Administrative abbreviations kept lowercase in addresses.
const ADDRESS_ABBREVIATIONS: &[&str] = &[
    "М.", "Вулиця", "Район", "Смт", "Кв.", "Буд.", "Область", "С.", "Вул.", " М ", "Пров.",
    "Проспект.", "М-Н", "С-Ще", "Площа", "Просп.",
];

/// Labels and offsets of the DMS template.
#[derive(Debug, Clone)]
pub struct PersonLayout {
    pub name_anchor: String,
    /// Offsets of surname, given name and patronymic after the name anchor
    pub name_offsets: [usize; 3],
    /// Offset of the birth date line after the name anchor
    pub birth_date_offset: usize,
    /// Space-separated component of the birth date line holding the date
    pub birth_date_component: usize,
    pub phone_anchor: String,
    pub personal_number_anchor: String,
    pub tax_id_anchor: String,
    /// Residence address lies between these anchors
    pub residence_span: (String, String),
    /// Birth place lies between these anchors
    pub birth_place_span: (String, String),
    pub document_labels: Vec<String>,
    pub number_anchor: String,
    pub valid_until_label: String,
    pub issue_date_label: String,
}

impl Default for PersonLayout {
    fn default() -> Self {
        Self {
            name_anchor: "Прізвище".into(),
            name_offsets: [1, 3, 5],
            birth_date_offset: 6,
            birth_date_component: 2,
            phone_anchor: "Телефон".into(),
            personal_number_anchor: "УНЗР".into(),
            tax_id_anchor: "РНОКПП".into(),
            residence_span: ("перебування".into(), "Номер".into()),
            birth_place_span: ("Місце народження".into(), "перебування".into()),
            document_labels: DOCUMENT_LABELS.iter().map(|s| s.to_string()).collect(),
            number_anchor: "Номер".into(),
            valid_until_label: "Дійсний до:".into(),
            issue_date_label: "Дата видачі:".into(),
        }
    }
}

/// Token shapes that follow a document "Номер" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPattern {
    /// number at +1, "Дійсний до:" at +3, expiry at +4
    WithoutIssueDate,
    /// number at +1, issue date at +3, expiry at +5
    WithIssueDate,
}

impl DocumentPattern {
    /// Patterns in the order they are tried.
    pub const ALL: [DocumentPattern; 2] = [
        DocumentPattern::WithoutIssueDate,
        DocumentPattern::WithIssueDate,
    ];

    /// Read a document at the "Номер" token with index `at`.
    fn read(
        self,
        window: &TokenWindow<'_>,
        at: usize,
        layout: &PersonLayout,
        document_type: &str,
    ) -> Option<DocumentEntry> {
        let entry = |number: &str, issue: Option<&str>, expiry: &str| DocumentEntry {
            document_type: document_type.to_string(),
            number: number.to_string(),
            issue_date: issue.map(str::to_string),
            expiry_date: expiry.to_string(),
        };

        match self {
            DocumentPattern::WithoutIssueDate => {
                if at + 4 < window.len() && window.get(at + 3)? == layout.valid_until_label {
                    Some(entry(window.get(at + 1)?, None, window.get(at + 4)?))
                } else {
                    None
                }
            }
            DocumentPattern::WithIssueDate => {
                if at + 5 < window.len() && window.get(at + 1)? != layout.issue_date_label {
                    Some(entry(
                        window.get(at + 1)?,
                        window.get(at + 3),
                        window.get(at + 5)?,
                    ))
                } else {
                    None
                }
            }
        }
    }
}

/// Extracts [`PersonRecord`]s from DMS token streams.
#[derive(Debug, Clone, Default)]
pub struct PersonExtractor {
    layout: PersonLayout,
}

impl PersonExtractor {
    pub fn new(layout: PersonLayout) -> Self {
        Self { layout }
    }

    /// Extract a record from a token stream.
    ///
    /// Fails only when [`PERSON_MARKER`] is absent; every other field falls
    /// back to its default on its own.
    pub fn extract(&self, tokens: &[String]) -> Result<PersonRecord> {
        let window = TokenWindow::new(tokens);
        if !window.contains(PERSON_MARKER) {
            return Err(Error::MissingMarker(PERSON_MARKER));
        }

        let l = &self.layout;
        let mut record = PersonRecord::new();

        if let Some(i) = window.find(&l.name_anchor) {
            record.full_name = l
                .name_offsets
                .iter()
                .filter_map(|off| window.get(i + off))
                .collect::<Vec<_>>()
                .join(" ");

            record.birth_date = window
                .get(i + l.birth_date_offset)
                .and_then(|line| line.split(' ').nth(l.birth_date_component))
                .unwrap_or_default()
                .to_string();
        }

        let single = |anchor: &str| {
            window
                .after(anchor, 1)
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN.to_string())
        };
        record.phone = single(&l.phone_anchor);
        record.personal_number = single(&l.personal_number_anchor);
        record.tax_id = single(&l.tax_id_anchor);

        record.residence_address = address_between(&window, &l.residence_span);
        record.birth_place = address_between(&window, &l.birth_place_span);

        record.documents = l
            .document_labels
            .iter()
            .flat_map(|label| self.documents_for(&window, label))
            .collect();

        log::debug!(
            "person extracted: {} documents, tax id {}",
            record.documents.len(),
            if PersonRecord::is_unknown(&record.tax_id) {
                "absent"
            } else {
                "present"
            }
        );
        Ok(record)
    }

    /// Extract a record and the first-page photo from a parsed PDF.
    pub fn extract_pdf(&self, parser: &PdfParser) -> Result<PersonRecord> {
        let tokens = parser.tokens()?;
        let mut record = self.extract(&tokens)?;
        record.photo = first_page_photo(parser);
        Ok(record)
    }

    /// Entries of one document section, scanned from its label up to the
    /// next section label.
    fn documents_for(&self, window: &TokenWindow<'_>, label: &str) -> Vec<DocumentEntry> {
        let l = &self.layout;
        let start = match window.find(label) {
            Some(i) => i,
            None => return Vec::new(),
        };

        let mut entries = Vec::new();
        for w in start..window.len() {
            let token = match window.get(w) {
                Some(t) => t,
                None => break,
            };
            if token != label && l.document_labels.iter().any(|other| other == token) {
                break;
            }
            if token == l.number_anchor {
                if let Some(entry) = DocumentPattern::ALL
                    .iter()
                    .find_map(|p| p.read(window, w, l, label))
                {
                    entries.push(entry);
                }
            }
        }
        entries
    }
}

/// Extract a person from a token stream with the default layout.
pub fn extract_person(tokens: &[String]) -> Result<PersonRecord> {
    PersonExtractor::default().extract(tokens)
}

/// Address text between two anchors, or the placeholder.
fn address_between(window: &TokenWindow<'_>, span: &(String, String)) -> String {
    let (start, end) = match (window.find(&span.0), window.find(&span.1)) {
        (Some(s), Some(e)) => (s, e),
        _ => return UNKNOWN.to_string(),
    };

    // The line right before the end anchor is its caption, not address.
    let parts = window.between(start, end.saturating_sub(1));
    let address = format_address(parts);
    if address.is_empty() {
        UNKNOWN.to_string()
    } else {
        address
    }
}

/// Title-case the address, drop postal codes, lowercase abbreviations.
pub fn format_address(parts: &[String]) -> String {
    let joined = title_case(&parts.join(" "));
    let words: Vec<&str> = joined
        .split_whitespace()
        .filter(|w| !has_five_digits(w))
        .collect();

    let mut address = format!("{} ", words.join(" "));
    for abbreviation in ADDRESS_ABBREVIATIONS {
        address = address.replace(abbreviation, &abbreviation.to_lowercase());
    }
    address.replace('/', ", ").trim().to_string()
}

/// Uppercase letters that follow a non-letter, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for ch in text.chars() {
        if prev_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_letter = ch.is_alphabetic();
    }
    out
}

fn has_five_digits(word: &str) -> bool {
    let mut run = 0;
    for ch in word.chars() {
        if ch.is_ascii_digit() {
            run += 1;
            if run == 5 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// The first image of page 1 as a PNG photo, if it decodes.
fn first_page_photo(parser: &PdfParser) -> Option<Photo> {
    let images = match parser.page_images(1) {
        Ok(images) => images,
        Err(e) => {
            log::warn!("Could not list images on page 1: {}", e);
            return None;
        }
    };

    let resource = images.first()?;
    match photo_from_image(resource) {
        Ok(photo) => Some(photo),
        Err(e) => {
            log::warn!("Skipping photo {}: {}", resource.name, e);
            None
        }
    }
}

/// Decode an embedded image and re-encode it as PNG.
///
/// Images with four or more color components are converted to RGB.
pub fn photo_from_image(resource: &ImageResource) -> Result<Photo> {
    let decoded = match resource.filter {
        ImageFilter::Jpeg => image::load_from_memory_with_format(&resource.data, ImageFormat::Jpeg)?,
        ImageFilter::Raw => decode_raw_samples(resource)?,
        ImageFilter::Jpeg2000 | ImageFilter::Unsupported => {
            return Err(Error::ImageExtract(format!(
                "unsupported image filter {:?}",
                resource.filter
            )))
        }
    };

    let decoded = match decoded {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => decoded,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let mut data = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)?;

    Ok(Photo {
        data,
        width: decoded.width(),
        height: decoded.height(),
    })
}

fn decode_raw_samples(resource: &ImageResource) -> Result<DynamicImage> {
    if resource.bits_per_component != 8 {
        return Err(Error::ImageExtract(format!(
            "unsupported bit depth {}",
            resource.bits_per_component
        )));
    }
    let expected = resource.raw_len();
    if expected == 0 || resource.data.len() < expected {
        return Err(Error::ImageExtract(format!(
            "expected {} sample bytes, found {}",
            expected,
            resource.data.len()
        )));
    }
    let samples = &resource.data[..expected];
    let (w, h) = (resource.width, resource.height);
    let short = || Error::ImageExtract("sample buffer does not match dimensions".to_string());

    match resource.components {
        1 => GrayImage::from_raw(w, h, samples.to_vec())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(short),
        3 => RgbImage::from_raw(w, h, samples.to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(short),
        n if n >= 4 => {
            let n = n as usize;
            let rgb: Vec<u8> = samples
                .chunks_exact(n)
                .flat_map(|px| cmyk_to_rgb(px[0], px[1], px[2], px[3]))
                .collect();
            RgbImage::from_raw(w, h, rgb)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(short)
        }
        n => Err(Error::ImageExtract(format!(
            "unsupported component count {}",
            n
        ))),
    }
}

fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let k = 255 - k as u16;
    let ch = |v: u8| ((255 - v as u16) * k / 255) as u8;
    [ch(c), ch(m), ch(y)]
}
