//! Heading detection: declared outline first, font styles otherwise.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{sort_by_position, Heading, HeadingSource, OutlineEntry, TextSpan};
use crate::parser::{DocumentSource, ExtractOptions, HeadingStrategy};

use super::recover_page;
use super::style::StyleProfile;

/// Headings of a document, sorted by `(page, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingOutline {
    pub headings: Vec<Heading>,
    pub source: HeadingSource,
    /// Diagnostics about degraded detection (no outline, no styles, ...)
    pub notes: Vec<String>,
}

impl HeadingOutline {
    fn new(source: HeadingSource) -> Self {
        Self {
            headings: Vec::new(),
            source,
            notes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}

/// Builds the heading list of one document.
pub struct HeadingExtractor<'a, S: DocumentSource + ?Sized> {
    source: &'a S,
    options: &'a ExtractOptions,
}

impl<'a, S: DocumentSource + ?Sized> HeadingExtractor<'a, S> {
    pub fn new(source: &'a S, options: &'a ExtractOptions) -> Self {
        Self { source, options }
    }

    /// Detect headings with the configured strategy.
    ///
    /// Finding nothing is not an error: the outline comes back empty with a
    /// note explaining why.
    pub fn extract(&self) -> Result<HeadingOutline> {
        let outline = match self.options.heading_strategy {
            HeadingStrategy::Style => self.style_headings()?,
            HeadingStrategy::Outline => {
                let entries = self.source.outline()?;
                if entries.is_empty() {
                    let mut outline = HeadingOutline::new(HeadingSource::None);
                    outline.notes.push("Document declares no outline".to_string());
                    outline
                } else {
                    self.outline_headings(&entries)?
                }
            }
            HeadingStrategy::Auto => {
                let entries = self.source.outline()?;
                if entries.is_empty() {
                    log::info!("No outline found, using font style heuristic");
                    let mut outline = self.style_headings()?;
                    outline
                        .notes
                        .insert(0, "No outline found, using font style heuristic".to_string());
                    outline
                } else {
                    self.outline_headings(&entries)?
                }
            }
        };

        log::info!(
            "Detected {} headings ({})",
            outline.headings.len(),
            outline.source
        );
        Ok(outline)
    }

    /// One heading per outline entry, positioned where its title appears.
    fn outline_headings(&self, entries: &[OutlineEntry]) -> Result<HeadingOutline> {
        let mut outline = HeadingOutline::new(HeadingSource::Outline);
        let mut unplaced = 0;

        for entry in entries {
            let title = entry.title.trim();
            let hits = recover_page(
                self.options.error_mode,
                entry.page,
                self.source.search_text(entry.page, title),
            )?
            .unwrap_or_default();

            let y = match hits.first() {
                Some(rect) => rect.top(),
                None => {
                    log::debug!(
                        "Outline title {:?} not found on page {}, using top of page",
                        title,
                        entry.page + 1
                    );
                    unplaced += 1;
                    0.0
                }
            };
            outline
                .headings
                .push(Heading::new(entry.level, title, entry.page, y));
        }

        if unplaced > 0 {
            outline.notes.push(format!(
                "{unplaced} outline titles were not found on their page and sit at the top of it"
            ));
        }
        sort_by_position(&mut outline.headings);
        Ok(outline)
    }

    /// Spans set larger or bolder than body text.
    fn style_headings(&self) -> Result<HeadingOutline> {
        let mut outline = HeadingOutline::new(HeadingSource::Style);

        let mut pages: Vec<Cow<'_, [TextSpan]>> = Vec::with_capacity(self.source.page_count());
        for page in 0..self.source.page_count() {
            let spans = self.source.page_spans(page);
            if let Some(spans) = recover_page(self.options.error_mode, page, spans)? {
                pages.push(spans);
            }
        }

        let profile = StyleProfile::from_spans(pages.iter().flat_map(|spans| spans.iter()));
        let Some(body) = profile.body_style() else {
            log::warn!("No text styles found, heading detection skipped");
            outline.source = HeadingSource::None;
            outline.notes.push("No text styles found".to_string());
            return Ok(outline);
        };
        log::debug!(
            "Body style {} ({} of {} spans)",
            body,
            profile.count(body),
            profile.total()
        );

        let mut candidates: Vec<Heading> = pages
            .iter()
            .flat_map(|spans| spans.iter())
            .filter(|span| {
                span.rounded_size() > body.size || (span.is_bold && !body.bold)
            })
            .filter_map(|span| {
                let text = span.text.trim();
                if text.is_empty() || self.is_caption(text) {
                    return None;
                }
                Some(Heading::new(span.rounded_size(), text, span.page, span.top()))
            })
            .collect();

        sort_by_position(&mut candidates);
        outline.headings = dedup_headings(candidates, self.options.dedup_tolerance);

        if outline.headings.is_empty() {
            outline.source = HeadingSource::None;
            outline.notes.push("No headings identified".to_string());
        }
        Ok(outline)
    }

    fn is_caption(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.options
            .caption_prefixes
            .iter()
            .any(|prefix| lower.starts_with(&prefix.to_lowercase()))
    }
}

/// Drop headings that repeat the previously kept one: same text, same page,
/// and less than `tolerance` apart vertically. Input must be sorted.
pub fn dedup_headings(headings: Vec<Heading>, tolerance: f32) -> Vec<Heading> {
    let mut kept: Vec<Heading> = Vec::with_capacity(headings.len());
    for heading in headings {
        if let Some(last) = kept.last() {
            if last.text == heading.text
                && last.page == heading.page
                && (heading.y - last.y).abs() < tolerance
            {
                log::debug!("Dropping duplicate heading {:?}", heading.text);
                continue;
            }
        }
        kept.push(heading);
    }
    kept
}
