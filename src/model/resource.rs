//! Raster images embedded in a PDF page.

use serde::{Deserialize, Serialize};

/// Stream filter of an embedded image, which decides how its bytes decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFilter {
    /// JPEG (DCTDecode): data is a complete JPEG file
    Jpeg,
    /// JPEG 2000 (JPXDecode)
    Jpeg2000,
    /// Raw samples, already decompressed (FlateDecode, LZWDecode or none)
    Raw,
    /// Anything else (CCITT, JBIG2, ...)
    Unsupported,
}

impl ImageFilter {
    /// Map a PDF filter name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "DCTDecode" => ImageFilter::Jpeg,
            "JPXDecode" => ImageFilter::Jpeg2000,
            "FlateDecode" | "LZWDecode" | "" => ImageFilter::Raw,
            _ => ImageFilter::Unsupported,
        }
    }
}

/// An image XObject found in a page's resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResource {
    /// Resource name in the page's XObject dictionary
    pub name: String,

    /// Image bytes: encoded for JPEG, decompressed samples for raw images
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    pub filter: ImageFilter,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Bits per component (e.g., 8)
    pub bits_per_component: u8,

    /// Color components per pixel: 1 gray, 3 RGB, 4 CMYK
    pub components: u8,

    /// Color space name (e.g., "DeviceRGB", "ICCBased")
    pub color_space: Option<String>,
}

impl ImageResource {
    /// Create a new image resource with 8-bit RGB defaults.
    pub fn new(name: impl Into<String>, data: Vec<u8>, filter: ImageFilter) -> Self {
        Self {
            name: name.into(),
            data,
            filter,
            width: 0,
            height: 0,
            bits_per_component: 8,
            components: 3,
            color_space: None,
        }
    }

    /// Set image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set bits per component.
    pub fn with_bits_per_component(mut self, bits: u8) -> Self {
        self.bits_per_component = bits;
        self
    }

    /// Set color space name and the matching component count.
    pub fn with_color_space(mut self, color_space: impl Into<String>, components: u8) -> Self {
        self.color_space = Some(color_space.into());
        self.components = components;
        self
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether pixels carry four or more channels (CMYK and friends).
    pub fn is_cmyk_like(&self) -> bool {
        self.components >= 4
    }

    /// Expected byte length of raw 8-bit samples.
    pub fn raw_len(&self) -> usize {
        self.width as usize * self.height as usize * self.components as usize
    }
}

/// Component count implied by a color space name.
pub fn components_for_color_space(name: &str) -> u8 {
    match name {
        "DeviceGray" | "CalGray" | "G" => 1,
        "DeviceCMYK" | "CMYK" => 4,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_name() {
        assert_eq!(ImageFilter::from_name("DCTDecode"), ImageFilter::Jpeg);
        assert_eq!(ImageFilter::from_name("FlateDecode"), ImageFilter::Raw);
        assert_eq!(ImageFilter::from_name(""), ImageFilter::Raw);
        assert_eq!(ImageFilter::from_name("JBIG2Decode"), ImageFilter::Unsupported);
    }

    #[test]
    fn test_image_builder() {
        let image = ImageResource::new("Im1", vec![0; 24], ImageFilter::Raw)
            .with_dimensions(2, 3)
            .with_color_space("DeviceCMYK", 4);
        assert!(image.is_cmyk_like());
        assert_eq!(image.raw_len(), 24);
        assert_eq!(image.size(), 24);
    }

    #[test]
    fn test_components_for_color_space() {
        assert_eq!(components_for_color_space("DeviceGray"), 1);
        assert_eq!(components_for_color_space("DeviceRGB"), 3);
        assert_eq!(components_for_color_space("DeviceCMYK"), 4);
    }
}
