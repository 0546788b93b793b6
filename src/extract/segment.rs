//! Banner-based segmentation of analytical reports.
//!
//! Reports print each section caption on a wide, short colored strip. The
//! strips are found among the page rectangles and the page text is split
//! into header/content blocks around them.

use crate::model::ContentBlock;
use crate::parser::{group_runs_into_lines, PageLayout, PositionedRect, PositionedRun};
use crate::render::{CleanupOptions, CleanupPipeline};

/// Thresholds that decide which rectangles are banners.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Minimum banner width as a share of the page width (exclusive)
    pub min_width_ratio: f32,
    /// Banner height bounds in points (both exclusive)
    pub min_height: f32,
    pub max_height: f32,
    /// Padding around a banner when collecting its caption
    pub header_padding: f32,
    /// Cleanup applied to every block
    pub cleanup: CleanupOptions,
}

impl SegmentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum width ratio.
    pub fn with_min_width_ratio(mut self, ratio: f32) -> Self {
        self.min_width_ratio = ratio;
        self
    }

    /// Set the banner height bounds.
    pub fn with_height_range(mut self, min: f32, max: f32) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    /// Set caption padding.
    pub fn with_header_padding(mut self, padding: f32) -> Self {
        self.header_padding = padding;
        self
    }

    /// Set block cleanup.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            min_width_ratio: 0.4,
            min_height: 8.0,
            max_height: 40.0,
            header_padding: 2.0,
            cleanup: CleanupOptions::block_text(),
        }
    }
}

/// Splits page layouts into labeled blocks.
pub struct Segmenter {
    options: SegmentOptions,
}

/// Where a run lands on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    BeforeFirstBanner,
    Header(usize),
    Content(usize),
}

impl Segmenter {
    pub fn new(options: SegmentOptions) -> Self {
        Self { options }
    }

    /// Segment a whole document.
    pub fn segment(&self, pages: &[PageLayout]) -> Vec<ContentBlock> {
        let mut blocks: Vec<ContentBlock> = Vec::new();

        for page in pages {
            self.segment_page(page, &mut blocks);
        }

        let pipeline = CleanupPipeline::new(self.options.cleanup.clone());
        blocks
            .into_iter()
            .map(|b| ContentBlock::new(pipeline.process(&b.header), pipeline.process(&b.content)))
            .filter(|b| !b.is_blank())
            .collect()
    }

    /// Banner candidates of a page, top to bottom, near-duplicates removed.
    pub fn banners<'a>(&self, page: &'a PageLayout) -> Vec<&'a PositionedRect> {
        let o = &self.options;
        let mut banners: Vec<&PositionedRect> = page
            .rects
            .iter()
            .filter(|r| {
                r.width() > page.width * o.min_width_ratio
                    && r.height() > o.min_height
                    && r.height() < o.max_height
            })
            .collect();

        banners.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal));

        // Fill and stroke of one strip often come as two rectangles.
        banners.dedup_by(|b, a| {
            (a.top - b.top).abs() < 1.0
                && (a.bottom - b.bottom).abs() < 1.0
                && (a.x0 - b.x0).abs() < 1.0
                && (a.x1 - b.x1).abs() < 1.0
        });

        log::debug!("page {}: {} banners", page.number, banners.len());
        banners
    }

    fn segment_page(&self, page: &PageLayout, blocks: &mut Vec<ContentBlock>) {
        let banners = self.banners(page);

        let mut before: Vec<&PositionedRun> = Vec::new();
        let mut headers: Vec<Vec<&PositionedRun>> = vec![Vec::new(); banners.len()];
        let mut contents: Vec<Vec<&PositionedRun>> = vec![Vec::new(); banners.len()];

        for run in &page.runs {
            match self.region_of(run, &banners) {
                Region::BeforeFirstBanner => before.push(run),
                Region::Header(i) => headers[i].push(run),
                Region::Content(i) => contents[i].push(run),
            }
        }

        append_headerless(blocks, &region_text(&before));

        for (header_runs, content_runs) in headers.iter().zip(&contents) {
            let header = region_text(header_runs);
            let content = region_text(content_runs);
            if header.trim().is_empty() {
                append_headerless(blocks, &content);
            } else {
                blocks.push(ContentBlock::new(header, content));
            }
        }
    }

    /// Assign a run to exactly one region by its center point.
    fn region_of(&self, run: &PositionedRun, banners: &[&PositionedRect]) -> Region {
        let pad = self.options.header_padding;
        let (cx, cy) = (run.center_x(), run.center_y());

        let index = banners.iter().rposition(|b| cy >= b.top - pad);
        match index {
            None => Region::BeforeFirstBanner,
            Some(i) => {
                let b = banners[i];
                let in_band = cy <= b.bottom + pad;
                let in_span = cx >= b.x0 - pad && cx <= b.x1 + pad;
                if in_band && in_span {
                    Region::Header(i)
                } else {
                    Region::Content(i)
                }
            }
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmentOptions::default())
    }
}

/// Lines of a region, top to bottom.
fn region_text(runs: &[&PositionedRun]) -> String {
    group_runs_into_lines(runs.iter().copied())
        .iter()
        .map(|l| l.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text without a caption of its own continues the previous block.
fn append_headerless(blocks: &mut Vec<ContentBlock>, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    match blocks.last_mut() {
        Some(last) => last.append(text),
        None => blocks.push(ContentBlock::start_of_document(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::START_OF_DOCUMENT;
    use crate::parser::Color;

    fn run(text: &str, x0: f32, baseline: f32) -> PositionedRun {
        PositionedRun {
            text: text.to_string(),
            x0,
            top: baseline - 8.0,
            x1: x0 + text.chars().count() as f32 * 5.0,
            bottom: baseline + 2.0,
            baseline,
            font_size: 10.0,
            page: 1,
        }
    }

    fn rect(x0: f32, top: f32, x1: f32, bottom: f32) -> PositionedRect {
        PositionedRect {
            x0,
            top,
            x1,
            bottom,
            fill_color: Color::rgb(0.2, 0.4, 0.8),
            filled: true,
            stroked: false,
            page: 1,
        }
    }

    fn page(runs: Vec<PositionedRun>, rects: Vec<PositionedRect>) -> PageLayout {
        PageLayout {
            number: 1,
            width: 600.0,
            height: 800.0,
            runs,
            rects,
        }
    }

    #[test]
    fn test_banner_filter() {
        let p = page(
            vec![],
            vec![
                rect(50.0, 100.0, 550.0, 120.0), // banner
                rect(50.0, 200.0, 200.0, 220.0), // too narrow
                rect(50.0, 300.0, 550.0, 305.0), // too thin
                rect(50.0, 400.0, 550.0, 460.0), // too tall
                rect(50.0, 100.0, 550.0, 120.0), // duplicate stroke
            ],
        );
        let seg = Segmenter::default();
        let banners = seg.banners(&p);
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].top, 100.0);
    }

    #[test]
    fn test_two_banners() {
        let p = page(
            vec![
                run("Intro", 50.0, 50.0),
                run("Header A", 60.0, 115.0),
                run("alpha one", 50.0, 150.0),
                run("alpha two", 50.0, 170.0),
                run("Header B", 60.0, 315.0),
                run("beta", 50.0, 350.0),
            ],
            vec![
                rect(50.0, 300.0, 550.0, 320.0),
                rect(50.0, 100.0, 550.0, 120.0),
            ],
        );
        let blocks = Segmenter::default().segment(&[p]);
        assert_eq!(
            blocks,
            vec![
                ContentBlock::new(START_OF_DOCUMENT, "Intro"),
                ContentBlock::new("Header A", "alpha one alpha two"),
                ContentBlock::new("Header B", "beta"),
            ]
        );
    }

    #[test]
    fn test_page_without_banners_continues_last_block() {
        let first = page(
            vec![run("Caption", 60.0, 115.0), run("one", 50.0, 150.0)],
            vec![rect(50.0, 100.0, 550.0, 120.0)],
        );
        let mut second = page(vec![run("two", 50.0, 60.0)], vec![]);
        second.number = 2;
        let blocks = Segmenter::default().segment(&[first, second]);
        assert_eq!(blocks, vec![ContentBlock::new("Caption", "one two")]);
    }

    #[test]
    fn test_no_banners_gives_single_start_block() {
        let first = page(vec![run("first page", 50.0, 60.0)], vec![]);
        let second = page(vec![run("second page", 50.0, 60.0)], vec![]);
        let blocks = Segmenter::default().segment(&[first, second]);
        assert_eq!(
            blocks,
            vec![ContentBlock::start_of_document("first page second page")]
        );
    }

    #[test]
    fn test_empty_caption_folds_into_previous_block() {
        let p = page(
            vec![
                run("Caption", 60.0, 115.0),
                run("one", 50.0, 150.0),
                run("two", 50.0, 250.0),
            ],
            vec![
                rect(50.0, 100.0, 550.0, 120.0),
                rect(50.0, 200.0, 550.0, 220.0),
            ],
        );
        let blocks = Segmenter::default().segment(&[p]);
        assert_eq!(blocks, vec![ContentBlock::new("Caption", "one two")]);
    }

    #[test]
    fn test_each_run_lands_once() {
        // A run straddling the banner bottom edge belongs to the caption only.
        let p = page(
            vec![run("Edge", 60.0, 119.0), run("body", 50.0, 140.0)],
            vec![rect(50.0, 100.0, 550.0, 120.0)],
        );
        let blocks = Segmenter::default().segment(&[p]);
        assert_eq!(blocks, vec![ContentBlock::new("Edge", "body")]);
    }

    #[test]
    fn test_custom_thresholds() {
        let p = page(
            vec![
                run("Tall caption", 60.0, 130.0),
                run("first", 50.0, 180.0),
                run("second", 50.0, 200.0),
            ],
            vec![rect(50.0, 100.0, 550.0, 150.0)],
        );
        assert!(Segmenter::default().segment(&[p.clone()])[0].is_start_of_document());

        let options = SegmentOptions::new()
            .with_height_range(8.0, 60.0)
            .with_header_padding(0.0)
            .with_cleanup(CleanupOptions::minimal());
        let blocks = Segmenter::new(options).segment(&[p]);
        assert_eq!(blocks, vec![ContentBlock::new("Tall caption", "first\nsecond")]);
    }

    #[test]
    fn test_blank_blocks_dropped() {
        let p = page(vec![], vec![rect(50.0, 100.0, 550.0, 120.0)]);
        assert!(Segmenter::default().segment(&[p]).is_empty());
    }
}
