//! Labeled content blocks produced by banner segmentation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Header given to text that precedes the first banner of a document.
pub const START_OF_DOCUMENT: &str = "Початок документа";

/// Header of the address block, which sorts right after the document start.
pub const ADDRESS_HEADER: &str = "Адреса";

/// A header/content pair delimited by colored banner strips.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Banner caption
    pub header: String,
    /// Text between this banner and the next one
    pub content: String,
}

impl ContentBlock {
    /// Create a new block.
    pub fn new(header: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            content: content.into(),
        }
    }

    /// Create a block for text found before any banner.
    pub fn start_of_document(content: impl Into<String>) -> Self {
        Self::new(START_OF_DOCUMENT, content)
    }

    /// Whether this block holds the leading headerless text.
    pub fn is_start_of_document(&self) -> bool {
        self.header == START_OF_DOCUMENT
    }

    /// Whether both header and content are blank.
    pub fn is_blank(&self) -> bool {
        self.header.trim().is_empty() && self.content.trim().is_empty()
    }

    /// Append text to the content, separated by a newline.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.content.is_empty() {
            self.content.push('\n');
        }
        self.content.push_str(text);
    }
}

/// A block tagged with the file it came from and its position there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedBlock {
    /// Source file name
    pub source: String,
    /// Zero-based index of the block within its source
    pub index: usize,
    /// The block itself
    #[serde(flatten)]
    pub block: ContentBlock,
}

impl TaggedBlock {
    /// Tag every block of one source, in order.
    pub fn tag_all(source: &str, blocks: &[ContentBlock]) -> Vec<TaggedBlock> {
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| TaggedBlock {
                source: source.to_string(),
                index,
                block: block.clone(),
            })
            .collect()
    }
}

fn rank(header: &str) -> u8 {
    if header == START_OF_DOCUMENT {
        0
    } else if header == ADDRESS_HEADER {
        1
    } else {
        2
    }
}

/// Order blocks for a merged report.
///
/// The document start comes first, then the address block, then the rest by
/// lowercase header. The sort is stable, so equal headers keep source order.
pub fn order_for_report(blocks: &mut [TaggedBlock]) {
    blocks.sort_by(|a, b| {
        let (ha, hb) = (&a.block.header, &b.block.header);
        match rank(ha).cmp(&rank(hb)) {
            Ordering::Equal => ha.to_lowercase().cmp(&hb.to_lowercase()),
            other => other,
        }
    });
}
