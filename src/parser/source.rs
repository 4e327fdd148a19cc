//! Document engine abstraction.
//!
//! The analysis stages only see a [`DocumentSource`]: outline entries,
//! positioned text spans and annotation objects per page. [`LopdfSource`]
//! is the lopdf-backed implementation; [`MemorySource`] holds geometry that
//! was produced elsewhere.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::{detect_format_from_bytes, ensure_readable};
use crate::error::{Error, Result};
use crate::model::{OutlineEntry, RawAnnotation, Rect, TextSpan};

use super::annots::read_page_annotations;
use super::content::extract_page_spans;
use super::outline::read_outline;

/// Gap (in em of the smaller span) that reads as a word break between spans.
const VISIBLE_GAP_EM: f32 = 0.15;

/// Access to the geometry of one open document. Pages are 0-indexed.
pub trait DocumentSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Declared outline in document order; empty when there is none.
    fn outline(&self) -> Result<Vec<OutlineEntry>>;

    /// Text spans of a page in content order.
    fn page_spans(&self, page: usize) -> Result<Cow<'_, [TextSpan]>>;

    /// Annotation objects of a page in declaration order.
    fn page_annotations(&self, page: usize) -> Result<Vec<RawAnnotation>>;

    /// Case-insensitive literal search on a page.
    ///
    /// Matches inside a single span are found first, then matches that
    /// cross span boundaries within a reconstructed line. Hits are returned
    /// top-to-bottom, left-to-right.
    fn search_text(&self, page: usize, needle: &str) -> Result<Vec<Rect>> {
        let needle: Vec<char> = needle.trim().chars().map(fold_case).collect();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let spans = self.page_spans(page)?;
        let mut hits = Vec::new();

        for span in spans.iter() {
            let glyphs: Vec<Glyph> = span_glyphs(span, 0).collect();
            hits.extend(find_all(&glyphs, &needle).map(|(_, rect)| rect));
        }

        for line in group_lines(&spans) {
            let glyphs = line_glyphs(&line);
            hits.extend(
                find_all(&glyphs, &needle)
                    .filter(|(crosses, _)| *crosses)
                    .map(|(_, rect)| rect),
            );
        }

        hits.sort_by(|a, b| a.y0.total_cmp(&b.y0).then_with(|| a.x0.total_cmp(&b.x0)));
        Ok(hits)
    }

    /// Text of a page clipped to `rect`.
    ///
    /// A span contributes when at least half of its height lies inside the
    /// rectangle, and only its characters whose estimated center falls
    /// inside. Lines are joined with `\n`.
    fn text_in_rect(&self, page: usize, rect: &Rect) -> Result<String> {
        let spans = self.page_spans(page)?;
        let mut lines = Vec::new();

        for line in group_lines(&spans) {
            let mut text = String::new();
            let mut previous: Option<&TextSpan> = None;
            for span in line {
                let Some(piece) = span.clip(rect) else {
                    continue;
                };
                if let Some(prev) = previous {
                    if needs_space(prev, span, &text, &piece) {
                        text.push(' ');
                    }
                }
                text.push_str(&piece);
                previous = Some(span);
            }
            if !text.is_empty() {
                lines.push(text);
            }
        }

        Ok(lines.join("\n"))
    }
}

/// A character with its estimated box; `span` is `None` for inserted spaces.
#[derive(Clone, Copy)]
struct Glyph {
    ch: char,
    span: Option<usize>,
    rect: Rect,
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn span_glyphs(span: &TextSpan, index: usize) -> impl Iterator<Item = Glyph> + '_ {
    let count = span.text.chars().count().max(1);
    let advance = span.bbox.width() / count as f32;
    span.text.chars().enumerate().map(move |(i, ch)| {
        let x0 = span.bbox.x0 + advance * i as f32;
        Glyph {
            ch: fold_case(ch),
            span: Some(index),
            rect: Rect::new(x0, span.bbox.y0, x0 + advance, span.bbox.y1),
        }
    })
}

fn line_glyphs(line: &[&TextSpan]) -> Vec<Glyph> {
    let mut glyphs: Vec<Glyph> = Vec::new();
    for (index, span) in line.iter().enumerate() {
        if index > 0 && needs_space(line[index - 1], span, "", "") {
            let prev = line[index - 1];
            glyphs.push(Glyph {
                ch: ' ',
                span: None,
                rect: Rect::new(prev.bbox.x1, prev.bbox.y0, span.bbox.x0, prev.bbox.y1),
            });
        }
        glyphs.extend(span_glyphs(span, index));
    }
    glyphs
}

/// Non-overlapping matches of `needle`, with whether each crosses spans.
fn find_all<'a>(glyphs: &'a [Glyph], needle: &'a [char]) -> impl Iterator<Item = (bool, Rect)> + 'a {
    let mut start = 0;
    std::iter::from_fn(move || {
        while start + needle.len() <= glyphs.len() {
            let window = &glyphs[start..start + needle.len()];
            if window.iter().zip(needle).all(|(g, c)| g.ch == *c) {
                start += needle.len();
                let first = window[0].span;
                let crosses = window.iter().any(|g| g.span != first);
                let rect = window[1..]
                    .iter()
                    .fold(window[0].rect, |acc, g| acc.union(&g.rect));
                return Some((crosses, rect));
            }
            start += 1;
        }
        None
    })
}

/// Group spans into visual lines, top-to-bottom, each sorted left-to-right.
fn group_lines(spans: &[TextSpan]) -> Vec<Vec<&TextSpan>> {
    let mut lines: Vec<Vec<&TextSpan>> = Vec::new();

    for span in spans {
        let height = span.bbox.height();
        let line = lines.iter_mut().find(|line| {
            line.iter().any(|other| {
                let min_height = height.min(other.bbox.height());
                min_height > 0.0 && span.bbox.vertical_overlap(&other.bbox) >= min_height * 0.5
            })
        });
        match line {
            Some(line) => line.push(span),
            None => lines.push(vec![span]),
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    lines.sort_by(|a, b| a[0].bbox.y0.total_cmp(&b[0].bbox.y0));
    lines
}

fn needs_space(prev: &TextSpan, next: &TextSpan, left: &str, right: &str) -> bool {
    if left.ends_with(char::is_whitespace)
        || right.starts_with(char::is_whitespace)
        || prev.text.ends_with(char::is_whitespace)
        || next.text.starts_with(char::is_whitespace)
    {
        return false;
    }
    let em = prev.font_size.min(next.font_size).abs();
    next.bbox.x0 - prev.bbox.x1 > em * VISIBLE_GAP_EM
}

/// A document opened with lopdf.
///
/// Spans are interpreted once per page and cached, so profiling, heading
/// search and clipping share one pass over each content stream.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    spans: Vec<OnceCell<Vec<TextSpan>>>,
}

impl LopdfSource {
    /// Open a PDF file.
    ///
    /// Fails with [`Error::NotFound`] before any parsing when the path does
    /// not name a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        ensure_readable(path)?;

        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text and annotations may be unreadable");
        }
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let spans = pages.iter().map(|_| OnceCell::new()).collect();
        Self { doc, pages, spans }
    }

    /// PDF version from the header.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        self.pages
            .get(page)
            .copied()
            .ok_or(Error::PageOutOfRange(page + 1, self.pages.len()))
    }
}

impl DocumentSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        read_outline(&self.doc)
    }

    fn page_spans(&self, page: usize) -> Result<Cow<'_, [TextSpan]>> {
        let page_id = self.page_id(page)?;
        let cell = &self.spans[page];
        if let Some(spans) = cell.get() {
            return Ok(Cow::Borrowed(spans));
        }

        let spans = extract_page_spans(&self.doc, page_id, page)?;
        log::debug!("Page {}: {} text spans", page + 1, spans.len());
        Ok(Cow::Borrowed(cell.get_or_init(|| spans)))
    }

    fn page_annotations(&self, page: usize) -> Result<Vec<RawAnnotation>> {
        read_page_annotations(&self.doc, self.page_id(page)?)
    }
}

/// Geometry held in memory, for documents parsed by another engine.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    outline: Vec<OutlineEntry>,
    spans: Vec<Vec<TextSpan>>,
    annotations: Vec<Vec<RawAnnotation>>,
}

impl MemorySource {
    /// Create an empty document with `page_count` blank pages.
    pub fn new(page_count: usize) -> Self {
        Self {
            outline: Vec::new(),
            spans: vec![Vec::new(); page_count],
            annotations: vec![Vec::new(); page_count],
        }
    }

    /// Set the declared outline.
    pub fn with_outline(mut self, outline: Vec<OutlineEntry>) -> Self {
        self.outline = outline;
        self
    }

    /// Add a span to the page named by `span.page`, growing the document
    /// if needed.
    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.ensure_pages(span.page + 1);
        self.spans[span.page].push(span);
        self
    }

    /// Add an annotation to a page, growing the document if needed.
    pub fn with_annotation(mut self, page: usize, annotation: RawAnnotation) -> Self {
        self.ensure_pages(page + 1);
        self.annotations[page].push(annotation);
        self
    }

    fn ensure_pages(&mut self, count: usize) {
        if self.spans.len() < count {
            self.spans.resize_with(count, Vec::new);
            self.annotations.resize_with(count, Vec::new);
        }
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page < self.spans.len() {
            Ok(())
        } else {
            Err(Error::PageOutOfRange(page + 1, self.spans.len()))
        }
    }
}

impl DocumentSource for MemorySource {
    fn page_count(&self) -> usize {
        self.spans.len()
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.outline.clone())
    }

    fn page_spans(&self, page: usize) -> Result<Cow<'_, [TextSpan]>> {
        self.check_page(page)?;
        Ok(Cow::Borrowed(&self.spans[page]))
    }

    fn page_annotations(&self, page: usize) -> Result<Vec<RawAnnotation>> {
        self.check_page(page)?;
        Ok(self.annotations[page].clone())
    }
}
