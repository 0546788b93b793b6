//! Positional layout extraction for PDF pages.
//!
//! Interprets page content streams into positioned text runs and filled or
//! stroked rectangles, both in top-left page coordinates, and groups runs
//! into visual lines for reading-order text and token streams.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};

/// Ascent and descent as a share of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// Average glyph advance as a share of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// TJ adjustment (thousandths of an em) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A run of text with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedRun {
    pub text: String,
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
    /// Baseline in top-left coordinates
    pub baseline: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// 1-based page number
    pub page: u32,
}

impl PositionedRun {
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn gray(g: f32) -> Self {
        Self { r: g, g, b: g }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self {
            r: (1.0 - c) * (1.0 - k),
            g: (1.0 - m) * (1.0 - k),
            b: (1.0 - y) * (1.0 - k),
        }
    }

    /// Whether the color is (near) white.
    pub fn is_white(&self) -> bool {
        self.r > 0.95 && self.g > 0.95 && self.b > 0.95
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A painted axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedRect {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
    pub fill_color: Color,
    pub filled: bool,
    pub stroked: bool,
    pub page: u32,
}

impl PositionedRect {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Everything the interpreter found on one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// 1-based page number
    pub number: u32,
    pub width: f32,
    pub height: f32,
    /// Text runs in content-stream order
    pub runs: Vec<PositionedRun>,
    pub rects: Vec<PositionedRect>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            runs: Vec::new(),
            rects: Vec::new(),
        }
    }

    /// Reading-order text: lines top to bottom joined by newlines.
    pub fn text(&self) -> String {
        group_runs_into_lines(self.runs.iter())
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One token per visual text fragment, in content-stream order.
    pub fn tokens(&self, merge_gap: f32) -> Vec<String> {
        tokens_from_runs(&self.runs, merge_gap)
    }
}

/// A text line composed of runs on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine<'a> {
    /// The runs in this line, sorted by X position
    pub runs: Vec<&'a PositionedRun>,
    /// Baseline (top-left coordinates)
    pub baseline: f32,
}

impl<'a> TextLine<'a> {
    /// Create a new text line from runs.
    pub fn from_runs(mut runs: Vec<&'a PositionedRun>) -> Self {
        runs.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
        let baseline = runs.first().map(|r| r.baseline).unwrap_or(0.0);
        Self { runs, baseline }
    }

    /// Get the combined text of all runs with appropriate spacing.
    ///
    /// Inserts a space between runs whose horizontal gap exceeds a fifth of
    /// the average character width.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, run) in self.runs.iter().enumerate() {
            if i == 0 {
                result.push_str(&run.text);
                continue;
            }

            let prev = self.runs[i - 1];
            let gap = run.x0 - prev.x1;

            let char_count = run.text.chars().count();
            let avg_char_width = if char_count > 0 && run.width() > 0.0 {
                run.width() / char_count as f32
            } else {
                run.font_size * AVG_CHAR_WIDTH
            };

            let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
            let curr_starts_with_space = run.text.starts_with(' ') || run.text.starts_with('\u{00A0}');

            if gap > avg_char_width * 0.2 && !prev_ends_with_space && !curr_starts_with_space {
                result.push(' ');
            }

            result.push_str(&run.text);
        }

        result
    }
}

/// Group runs into lines, top to bottom.
///
/// Runs whose baselines differ by at most 30% of the font size share a line.
pub fn group_runs_into_lines<'a, I>(runs: I) -> Vec<TextLine<'a>>
where
    I: IntoIterator<Item = &'a PositionedRun>,
{
    let mut runs: Vec<&PositionedRun> = runs.into_iter().collect();
    if runs.is_empty() {
        return vec![];
    }

    runs.sort_by(|a, b| {
        let y_cmp = a
            .baseline
            .partial_cmp(&b.baseline)
            .unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines = Vec::new();
    let mut current: Vec<&PositionedRun> = Vec::new();
    let mut current_y: Option<f32> = None;

    for run in runs {
        let y_tolerance = run.font_size * 0.3;

        match current_y {
            Some(y) if (run.baseline - y).abs() <= y_tolerance => current.push(run),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_runs(std::mem::take(&mut current)));
                }
                current_y = Some(run.baseline);
                current.push(run);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_runs(current));
    }

    lines
}

/// Build a token stream from runs in content-stream order.
///
/// Consecutive runs on the same baseline are merged when the horizontal gap
/// between them is under `merge_gap` times the font size; every token is
/// trimmed and empty tokens are dropped.
pub fn tokens_from_runs(runs: &[PositionedRun], merge_gap: f32) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut group: Vec<&PositionedRun> = Vec::new();

    let flush = |group: &mut Vec<&PositionedRun>, tokens: &mut Vec<String>| {
        if group.is_empty() {
            return;
        }
        let text = TextLine::from_runs(std::mem::take(group)).text();
        let text = text.trim();
        if !text.is_empty() {
            tokens.push(text.to_string());
        }
    };

    for run in runs {
        if let Some(prev) = group.last() {
            let same_line = (run.baseline - prev.baseline).abs() <= run.font_size * 0.3;
            let gap = run.x0 - prev.x1;
            let adjacent = gap > -run.font_size && gap < run.font_size * merge_gap;
            if !(same_line && adjacent) {
                flush(&mut group, &mut tokens);
            }
        }
        group.push(run);
    }
    flush(&mut group, &mut tokens);

    tokens
}

/// Affine matrix `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// `self × other`: apply `self` first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text matrix and text line matrix for tracking position in a text object.
#[derive(Debug, Clone)]
struct TextMatrix {
    m: Matrix,
    line: Matrix,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            m: Matrix::IDENTITY,
            line: Matrix::IDENTITY,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    /// Start a new text object, keeping the leading.
    fn reset(&mut self) {
        self.m = Matrix::IDENTITY;
        self.line = Matrix::IDENTITY;
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.m = Matrix { a, b, c, d, e, f };
        self.line = self.m;
    }

    /// Move to the start of the next line offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        let l = &mut self.line;
        l.e += tx * l.a + ty * l.c;
        l.f += tx * l.b + ty * l.d;
        self.m = *l;
    }

    fn next_line(&mut self) {
        let leading = if self.leading > 0.0 { self.leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    /// Advance the current position along the line (text space units).
    fn advance(&mut self, tx: f32) {
        self.m.e += tx * self.m.a;
        self.m.f += tx * self.m.b;
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Matrix,
    fill: Color,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            fill: Color::BLACK,
        }
    }
}

/// Layout interpreter over any [`PdfBackend`].
pub struct LayoutAnalyzer<'a> {
    backend: &'a dyn PdfBackend,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self { backend }
    }

    /// Interpret one page (1-based number).
    pub fn analyze_page(&self, page_num: u32) -> Result<PageLayout> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let (width, height) = self.backend.page_size(page_id);
        let content = self.backend.page_content(page_id)?;
        let ops = self
            .backend
            .decode_content(&content)
            .map_err(|e| Error::TextExtract(format!("page {}: {}", page_num, e)))?;

        let mut page = PageLayout::new(page_num, width, height);
        Interpreter::new(self.backend, page_id, &mut page).run(&ops);

        log::debug!(
            "page {}: {} runs, {} rects",
            page_num,
            page.runs.len(),
            page.rects.len()
        );
        Ok(page)
    }
}

/// Path state between construction and painting.
#[derive(Debug, Default)]
struct PathBuilder {
    subpaths: Vec<Vec<(f32, f32)>>,
}

impl PathBuilder {
    fn move_to(&mut self, p: (f32, f32)) {
        self.subpaths.push(vec![p]);
    }

    fn line_to(&mut self, p: (f32, f32)) {
        match self.subpaths.last_mut() {
            Some(sp) => sp.push(p),
            None => self.subpaths.push(vec![p]),
        }
    }

    fn close(&mut self) {
        if let Some(sp) = self.subpaths.last_mut() {
            if let Some(&first) = sp.first() {
                sp.push(first);
            }
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.subpaths.push(vec![
            (x, y),
            (x + w, y),
            (x + w, y + h),
            (x, y + h),
            (x, y),
        ]);
    }

    fn take(&mut self) -> Vec<Vec<(f32, f32)>> {
        std::mem::take(&mut self.subpaths)
    }
}

/// Bounding box of an axis-aligned 4-vertex polygon (closing point optional).
fn axis_aligned_box(points: &[(f32, f32)]) -> Option<(f32, f32, f32, f32)> {
    let mut pts: Vec<(f32, f32)> = points.to_vec();
    if pts.len() == 5 && close_enough(pts[0], pts[4]) {
        pts.pop();
    }
    if pts.len() != 4 {
        return None;
    }

    let eps = 0.5;
    for i in 0..4 {
        let (p, q) = (pts[i], pts[(i + 1) % 4]);
        let horizontal = (p.1 - q.1).abs() < eps;
        let vertical = (p.0 - q.0).abs() < eps;
        if !(horizontal || vertical) {
            return None;
        }
    }

    let min_x = pts.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let max_x = pts.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    let min_y = pts.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_y = pts.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
    Some((min_x, min_y, max_x, max_y))
}

fn close_enough(p: (f32, f32), q: (f32, f32)) -> bool {
    (p.0 - q.0).abs() < 0.5 && (p.1 - q.1).abs() < 0.5
}

struct Interpreter<'a, 'p> {
    backend: &'a dyn PdfBackend,
    page_id: PageId,
    page: &'p mut PageLayout,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text: TextMatrix,
    font_name: Vec<u8>,
    font_size: f32,
    in_text: bool,
    path: PathBuilder,
}

impl<'a, 'p> Interpreter<'a, 'p> {
    fn new(backend: &'a dyn PdfBackend, page_id: PageId, page: &'p mut PageLayout) -> Self {
        Self {
            backend,
            page_id,
            page,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text: TextMatrix::default(),
            font_name: Vec::new(),
            font_size: 12.0,
            in_text: false,
            path: PathBuilder::default(),
        }
    }

    fn run(&mut self, ops: &[ContentOp]) {
        for op in ops {
            self.step(op);
        }
    }

    fn step(&mut self, op: &ContentOp) {
        let nums: Vec<f32> = op.operands.iter().filter_map(get_number_from_value).collect();

        match op.operator.as_str() {
            // Graphics state
            "q" => self.stack.push(self.state),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" if nums.len() >= 6 => {
                let m = Matrix {
                    a: nums[0],
                    b: nums[1],
                    c: nums[2],
                    d: nums[3],
                    e: nums[4],
                    f: nums[5],
                };
                self.state.ctm = m.multiply(&self.state.ctm);
            }

            // Fill color
            "g" if !nums.is_empty() => self.state.fill = Color::gray(nums[0]),
            "rg" if nums.len() >= 3 => self.state.fill = Color::rgb(nums[0], nums[1], nums[2]),
            "k" if nums.len() >= 4 => {
                self.state.fill = Color::cmyk(nums[0], nums[1], nums[2], nums[3])
            }
            "sc" | "scn" => match nums.len() {
                1 => self.state.fill = Color::gray(nums[0]),
                3 => self.state.fill = Color::rgb(nums[0], nums[1], nums[2]),
                4 => self.state.fill = Color::cmyk(nums[0], nums[1], nums[2], nums[3]),
                _ => {}
            },

            // Path construction
            "re" if nums.len() >= 4 => self.path.rect(nums[0], nums[1], nums[2], nums[3]),
            "m" if nums.len() >= 2 => self.path.move_to((nums[0], nums[1])),
            "l" if nums.len() >= 2 => self.path.line_to((nums[0], nums[1])),
            "h" => self.path.close(),

            // Path painting
            "f" | "F" | "f*" => self.paint(true, false),
            "S" => self.paint(false, true),
            "s" => {
                self.path.close();
                self.paint(false, true);
            }
            "B" | "B*" => self.paint(true, true),
            "b" | "b*" => {
                self.path.close();
                self.paint(true, true);
            }
            "n" => {
                self.path.take();
            }

            // Text objects
            "BT" => {
                self.in_text = true;
                self.text.reset();
            }
            "ET" => self.in_text = false,
            "Tf" if op.operands.len() >= 2 => {
                if let PdfValue::Name(name) = &op.operands[0] {
                    self.font_name = name.clone();
                }
                self.font_size = get_number_from_value(&op.operands[1]).unwrap_or(12.0);
            }
            "TL" if !nums.is_empty() => self.text.leading = nums[0],
            "Td" if nums.len() >= 2 => self.text.translate(nums[0], nums[1]),
            "TD" if nums.len() >= 2 => {
                self.text.leading = -nums[1];
                self.text.translate(nums[0], nums[1]);
            }
            "Tm" if nums.len() >= 6 => {
                self.text
                    .set(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5])
            }
            "T*" => self.text.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let (text, adjust) = self.decode_tj(items);
                    self.show(text, adjust);
                }
            }
            "'" => {
                self.text.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "\"" => {
                self.text.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            _ => {}
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.backend.decode_text(self.page_id, &self.font_name, bytes)
    }

    /// Decode a TJ array; large negative adjustments become spaces.
    /// Returns the text and the total adjustment in text space units.
    fn decode_tj(&self, items: &[PdfValue]) -> (String, f32) {
        let mut combined = String::new();
        let mut adjust = 0.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(bytes)),
                other => {
                    if let Some(n) = get_number_from_value(other) {
                        adjust += -n / 1000.0 * self.font_size;
                        if -n > TJ_SPACE_THRESHOLD
                            && !combined.is_empty()
                            && !combined.ends_with(' ')
                            && !combined.ends_with('\u{00A0}')
                        {
                            combined.push(' ');
                        }
                    }
                }
            }
        }

        (combined, adjust)
    }

    fn show(&mut self, text: String, adjust: f32) {
        let advance = text.chars().count() as f32 * self.font_size * AVG_CHAR_WIDTH + adjust;

        if self.in_text && !text.trim().is_empty() {
            let trm = self.text.m.multiply(&self.state.ctm);
            let (x, y) = trm.apply(0.0, 0.0);
            let size = self.font_size * trm.vertical_scale();
            let width = advance * trm.a.hypot(trm.b);
            let h = self.page.height;

            self.page.runs.push(PositionedRun {
                text,
                x0: x,
                top: h - (y + size * ASCENT),
                x1: x + width.max(0.0),
                bottom: h - (y - size * DESCENT),
                baseline: h - y,
                font_size: size,
                page: self.page.number,
            });
        }

        self.text.advance(advance);
    }

    fn paint(&mut self, filled: bool, stroked: bool) {
        let ctm = self.state.ctm;
        let h = self.page.height;

        for subpath in self.path.take() {
            let points: Vec<(f32, f32)> = subpath.iter().map(|&(x, y)| ctm.apply(x, y)).collect();
            if let Some((x0, y0, x1, y1)) = axis_aligned_box(&points) {
                self.page.rects.push(PositionedRect {
                    x0,
                    top: h - y1,
                    x1,
                    bottom: h - y0,
                    fill_color: self.state.fill,
                    filled,
                    stroked,
                    page: self.page.number,
                });
            }
        }
    }
}
