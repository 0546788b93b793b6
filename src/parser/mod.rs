//! PDF parsing module.

pub mod backend;
mod layout;
mod options;
mod pdf_parser;

pub use layout::{
    group_runs_into_lines, tokens_from_runs, Color, LayoutAnalyzer, PageLayout, PositionedRect,
    PositionedRun, TextLine,
};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
