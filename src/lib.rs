//! # pdfannots
//!
//! Extract reviewer annotations from PDF documents and attribute each one
//! to the section heading it falls under.
//!
//! Headings come from the document outline when one is declared. Otherwise
//! they are inferred from font styles: text set larger than the body text,
//! or bold where the body is not. Every comment, highlight, underline,
//! squiggly and strike-out is then paired with the nearest heading above
//! it, looking back to earlier pages when its own page has none.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfannots::{extract_file, render};
//!
//! fn main() -> pdfannots::Result<()> {
//!     let extraction = extract_file("paper.pdf")?;
//!
//!     if extraction.is_empty() {
//!         println!("No text annotations or highlights were found");
//!     } else {
//!         println!("{}", render::to_table(&extraction.records));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline or style headings**: declared bookmarks first, font-size
//!   heuristic as a fallback
//! - **Cross-page attribution**: annotations above the first heading of a
//!   page belong to the last heading of an earlier page
//! - **Covered text recovery**: markup annotations report the text under them
//! - **Output formats**: aligned table, CSV, JSON

pub mod analysis;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod sample;

// Re-export commonly used types
pub use analysis::{HeadingIndex, HeadingOutline, Resolution};
pub use detect::{
    detect_format_from_bytes, detect_format_from_path, ensure_readable, is_pdf_bytes, PdfFormat,
};
pub use error::{Error, Result};
pub use extract::{Extraction, Extractor, NO_ANNOTATIONS_NOTE};
pub use model::{
    Annotation, AnnotationKind, Heading, HeadingSource, OutlineEntry, RawAnnotation, Record,
    Rect, StyleKey, TextSpan, NO_HEADING_LEVEL, NO_HEADING_TEXT,
};
pub use parser::{
    DocumentSource, ErrorMode, ExtractOptions, HeadingStrategy, LopdfSource, MemorySource,
    PageSelection,
};
pub use render::{JsonFormat, OutputFormat};

use std::io::Read;
use std::path::Path;

/// Extract annotations from a PDF file.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
///
/// # Example
///
/// ```no_run
/// use pdfannots::extract_file;
///
/// let extraction = extract_file("paper.pdf").unwrap();
/// for record in &extraction.records {
///     println!("p.{} [{}] {}", record.page, record.heading, record.comment);
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    extract_file_with_options(path, ExtractOptions::default())
}

/// Extract annotations from a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfannots::{extract_file_with_options, ExtractOptions, HeadingStrategy, PageSelection};
///
/// let options = ExtractOptions::new()
///     .lenient()
///     .with_heading_strategy(HeadingStrategy::Style)
///     .with_pages(PageSelection::Range(1..=10));
/// let extraction = extract_file_with_options("paper.pdf", options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Extraction> {
    Extractor::open_with_options(path, options)?.run()
}

/// Extract annotations from PDF bytes.
pub fn extract_bytes(data: &[u8]) -> Result<Extraction> {
    extract_bytes_with_options(data, ExtractOptions::default())
}

/// Extract annotations from PDF bytes with custom options.
pub fn extract_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Extraction> {
    let source = LopdfSource::from_bytes(data)?;
    Extractor::with_options(source, options).run()
}

/// Extract annotations from a reader.
pub fn extract_reader<R: Read>(reader: R) -> Result<Extraction> {
    let source = LopdfSource::from_reader(reader)?;
    Extractor::new(source).run()
}

/// Detect the heading outline of a PDF file without collecting annotations.
///
/// # Example
///
/// ```no_run
/// use pdfannots::{detect_headings, ExtractOptions};
///
/// let outline = detect_headings("paper.pdf", &ExtractOptions::default()).unwrap();
/// for heading in &outline.headings {
///     println!("{} (page {})", heading.text, heading.page + 1);
/// }
/// ```
pub fn detect_headings<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<HeadingOutline> {
    Extractor::open_with_options(path, options.clone())?.headings()
}
