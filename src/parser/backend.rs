//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the layout interpreter.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{components_for_color_space, ImageFilter, ImageResource};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter, used when a page has no readable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Page tree levels searched for inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, content stream decoding, text
/// decoding and image lookup without exposing any concrete PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Page width and height in points.
    fn page_size(&self, page: PageId) -> (f32, f32);

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Image XObjects of a page, in resource dictionary order.
    fn page_images(&self, page: PageId) -> Result<Vec<ImageResource>>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    // Try UTF-8
    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(r) => self.doc.get_object(*r).ok(),
            other => Some(other),
        }
    }

    /// Page attribute, taken from the nearest `/Pages` ancestor when the
    /// page itself does not carry it.
    fn inherited(&self, page: PageId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.doc.get_dictionary(page).ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Read one image XObject; `None` when the object is not an image.
    fn image_xobject(&self, name: &str, obj_ref: lopdf::ObjectId) -> Result<Option<ImageResource>> {
        let object = self
            .doc
            .get_object(obj_ref)
            .map_err(|e| Error::ImageExtract(e.to_string()))?;

        let stream = match object {
            Object::Stream(stream) => stream,
            _ => return Ok(None),
        };
        let dict = &stream.dict;

        match dict.get(b"Subtype").and_then(|s| s.as_name_str()) {
            Ok("Image") => {}
            _ => return Ok(None),
        }

        let width = dict
            .get(b"Width")
            .ok()
            .and_then(|w| w.as_i64().ok())
            .unwrap_or(0) as u32;
        let height = dict
            .get(b"Height")
            .ok()
            .and_then(|h| h.as_i64().ok())
            .unwrap_or(0) as u32;
        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|b| b.as_i64().ok())
            .unwrap_or(8) as u8;

        // With a filter chain the last entry decides the final encoding.
        let filter_name = match dict.get(b"Filter") {
            Ok(Object::Name(n)) => String::from_utf8_lossy(n).to_string(),
            Ok(Object::Array(arr)) => arr
                .last()
                .and_then(|o| o.as_name_str().ok())
                .unwrap_or("")
                .to_string(),
            _ => String::new(),
        };
        let filter = ImageFilter::from_name(&filter_name);

        let data = match filter {
            ImageFilter::Raw => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            _ => stream.content.clone(),
        };

        let mut image = ImageResource::new(name, data, filter)
            .with_dimensions(width, height)
            .with_bits_per_component(bits);

        if let Ok(cs) = dict.get(b"ColorSpace") {
            if let Some((cs_name, components)) = self.color_space(cs) {
                image = image.with_color_space(cs_name, components);
            }
        }

        Ok(Some(image))
    }

    fn color_space(&self, cs: &Object) -> Option<(String, u8)> {
        match cs {
            Object::Name(n) => {
                let name = String::from_utf8_lossy(n).to_string();
                let components = components_for_color_space(&name);
                Some((name, components))
            }
            Object::Array(arr) => {
                let name = arr.first().and_then(|o| o.as_name_str().ok())?.to_string();
                let components = if name == "ICCBased" {
                    arr.get(1)
                        .and_then(|o| o.as_reference().ok())
                        .and_then(|r| self.doc.get_object(r).ok())
                        .and_then(|o| o.as_stream().ok())
                        .and_then(|s| s.dict.get(b"N").ok())
                        .and_then(|n| n.as_i64().ok())
                        .map(|n| n as u8)
                        .unwrap_or(3)
                } else {
                    components_for_color_space(&name)
                };
                Some((name, components))
            }
            Object::Reference(r) => {
                let resolved = self.doc.get_object(*r).ok()?;
                self.color_space(resolved)
            }
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_size(&self, page: PageId) -> (f32, f32) {
        let media_box = self
            .inherited(page, b"MediaBox")
            .and_then(|b| self.resolve(b))
            .and_then(|b| b.as_array().ok());

        match media_box {
            Some(array) if array.len() >= 4 => {
                let x0 = array[0].as_float().unwrap_or(0.0);
                let y0 = array[1].as_float().unwrap_or(0.0);
                let x1 = array[2].as_float().unwrap_or(DEFAULT_PAGE_SIZE.0);
                let y1 = array[3].as_float().unwrap_or(DEFAULT_PAGE_SIZE.1);
                ((x1 - x0).abs(), (y1 - y0).abs())
            }
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream is blank.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return Ok(s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn page_images(&self, page: PageId) -> Result<Vec<ImageResource>> {
        let mut images = Vec::new();

        self.doc
            .get_dictionary(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let res_dict = self
            .inherited(page, b"Resources")
            .and_then(|res| self.resolve_dict(res));
        let xobj_dict = res_dict
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|x| self.resolve_dict(x));

        if let Some(xobj_dict) = xobj_dict {
            for (name, obj) in xobj_dict.iter() {
                if let Ok(obj_ref) = obj.as_reference() {
                    let name_str = String::from_utf8_lossy(name).to_string();
                    match self.image_xobject(&name_str, obj_ref) {
                        Ok(Some(image)) => images.push(image),
                        Ok(None) => {}
                        Err(e) => log::warn!("Skipping XObject {}: {}", name_str, e),
                    }
                }
            }
        }

        Ok(images)
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}
