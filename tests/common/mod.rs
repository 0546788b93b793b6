//! In-memory PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const PAGE_WIDTH: i64 = 595;
pub const PAGE_HEIGHT: i64 = 842;

/// One page worth of drawing operations.
#[derive(Default)]
pub struct PageBuilder {
    ops: Vec<Operation>,
    image: Option<Stream>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` with its baseline at `(x, y)` in PDF coordinates.
    pub fn text(mut self, x: f32, y: f32, text: &str) -> Self {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(10)]),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
        self
    }

    /// One line per entry, top down from `y` with a fixed step.
    pub fn lines(mut self, x: f32, y: f32, lines: &[&str]) -> Self {
        for (i, line) in lines.iter().enumerate() {
            self = self.text(x, y - i as f32 * 14.0, line);
        }
        self
    }

    /// A filled colored strip with its lower-left corner at `(x, y)`.
    pub fn banner(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", vec![Object::Real(0.2), Object::Real(0.4), Object::Real(0.8)]),
            Operation::new(
                "re",
                vec![
                    Object::Real(x),
                    Object::Real(y),
                    Object::Real(width),
                    Object::Real(height),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
        self
    }

    /// Attach a raw DeviceCMYK image XObject.
    pub fn cmyk_image(mut self, width: i64, height: i64, samples: Vec<u8>) -> Self {
        self.image = Some(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "BitsPerComponent" => 8,
                "ColorSpace" => "DeviceCMYK",
            },
            samples,
        ));
        self
    }
}

/// Serialize pages into a PDF file.
pub fn build_pdf(pages: Vec<PageBuilder>) -> Vec<u8> {
    build(pages, false)
}

/// Like [`build_pdf`], but `MediaBox` and the first image's `Resources` sit
/// on the `/Pages` node and every page inherits them.
pub fn build_pdf_inherited(pages: Vec<PageBuilder>) -> Vec<u8> {
    build(pages, true)
}

fn build(pages: Vec<PageBuilder>, inherit: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(PAGE_WIDTH),
        Object::Integer(PAGE_HEIGHT),
    ];

    let mut kids = Vec::new();
    let mut shared_resources = None;
    for page in pages {
        let content = Content {
            operations: page.ops,
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encodable content"),
        ));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !inherit {
            page_dict.set("MediaBox", media_box.clone());
        }
        if let Some(image) = page.image {
            let image_id = doc.add_object(image);
            let resources = dictionary! { "XObject" => dictionary! { "Im1" => image_id } };
            if inherit {
                shared_resources.get_or_insert(resources);
            } else {
                page_dict.set("Resources", resources);
            }
        }
        kids.push(Object::Reference(doc.add_object(page_dict)));
    }

    let count = kids.len() as i64;
    let mut pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
    };
    if inherit {
        pages_dict.set("MediaBox", media_box);
        if let Some(resources) = shared_resources {
            let resources_id = doc.add_object(resources);
            pages_dict.set("Resources", resources_id);
        }
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serializable document");
    buffer
}
