//! Annotation collection and classification.

use crate::error::Result;
use crate::model::{Annotation, AnnotationKind, RawAnnotation, NOT_AVAILABLE};
use crate::parser::{DocumentSource, ExtractOptions};

use super::recover_page;

/// Gathers the reportable annotations of a document.
pub struct AnnotationCollector<'a, S: DocumentSource + ?Sized> {
    source: &'a S,
    options: &'a ExtractOptions,
}

impl<'a, S: DocumentSource + ?Sized> AnnotationCollector<'a, S> {
    pub fn new(source: &'a S, options: &'a ExtractOptions) -> Self {
        Self { source, options }
    }

    /// Annotations of every selected page, in page order then top-to-bottom.
    pub fn collect(&self) -> Result<Vec<Annotation>> {
        let mut all = Vec::new();
        for page in 0..self.source.page_count() {
            if !self.options.pages.includes_index(page) {
                continue;
            }
            let collected = recover_page(self.options.error_mode, page, self.collect_page(page))?;
            all.extend(collected.unwrap_or_default());
        }
        Ok(all)
    }

    /// Annotations of one page that carry a comment or covered text,
    /// sorted top-to-bottom.
    pub fn collect_page(&self, page: usize) -> Result<Vec<Annotation>> {
        let raw = self.source.page_annotations(page)?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let mut kept = Vec::with_capacity(raw.len());
        for raw in &raw {
            let mut annotation = classify(raw, page);
            if annotation.kind.is_markup() {
                annotation.highlighted_text =
                    self.source.text_in_rect(page, &raw.rect)?.trim().to_string();
            }

            if annotation.has_payload() {
                kept.push(annotation);
            } else {
                log::debug!(
                    "Page {}: dropping {} annotation without text",
                    page + 1,
                    raw.subtype
                );
            }
        }

        kept.sort_by(|a, b| a.top_y.total_cmp(&b.top_y));
        log::debug!(
            "Page {}: kept {} of {} annotations",
            page + 1,
            kept.len(),
            raw.len()
        );
        Ok(kept)
    }
}

/// Classify an annotation and normalize its info fields.
///
/// The covered text of markup kinds is left empty; recovering it needs the
/// page text.
pub fn classify(raw: &RawAnnotation, page: usize) -> Annotation {
    let author = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(NOT_AVAILABLE);
    let created_at = raw
        .creation_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NOT_AVAILABLE);

    Annotation {
        kind: AnnotationKind::from_subtype(&raw.subtype),
        page,
        top_y: raw.rect.top(),
        comment: raw.content.as_deref().unwrap_or_default().trim().to_string(),
        author: author.to_string(),
        created_at: created_at.to_string(),
        highlighted_text: String::new(),
    }
}
