//! The extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{
    assemble, AnnotationCollector, HeadingExtractor, HeadingIndex, HeadingOutline,
};
use crate::error::Result;
use crate::model::{Heading, HeadingSource, Record};
use crate::parser::{DocumentSource, ExtractOptions, LopdfSource};

/// Message recorded when a document has nothing to report.
pub const NO_ANNOTATIONS_NOTE: &str = "No text annotations or highlights were found";

/// Outcome of one extraction run.
///
/// An empty `records` list is a valid result, distinct from the `Err` of a
/// document that could not be read; `notes` explains degraded detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub page_count: usize,
    pub heading_source: HeadingSource,
    pub headings: Vec<Heading>,
    pub records: Vec<Record>,
    pub notes: Vec<String>,
}

impl Extraction {
    /// True when no annotation qualified for the report.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Runs heading detection and annotation attribution over one document.
///
/// The extractor owns its source; the open document is released when the
/// run ends, whichever way it ends.
pub struct Extractor<S: DocumentSource> {
    source: S,
    options: ExtractOptions,
}

impl Extractor<LopdfSource> {
    /// Open a PDF file for extraction.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let source = LopdfSource::open(path)?;
        Ok(Self::with_options(source, options))
    }
}

impl<S: DocumentSource> Extractor<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ExtractOptions::default())
    }

    pub fn with_options(source: S, options: ExtractOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Detect headings only.
    pub fn headings(&self) -> Result<HeadingOutline> {
        HeadingExtractor::new(&self.source, &self.options).extract()
    }

    /// Run the whole pipeline, consuming the extractor.
    pub fn run(self) -> Result<Extraction> {
        let page_count = self.source.page_count();
        log::info!("Extracting annotations from {} pages", page_count);

        let outline = self.headings()?;
        let annotations = AnnotationCollector::new(&self.source, &self.options).collect()?;
        log::info!("Collected {} annotations", annotations.len());

        let index = HeadingIndex::new(&outline.headings);
        let records = assemble(&annotations, &index);

        let mut notes = outline.notes;
        if records.is_empty() {
            notes.push(NO_ANNOTATIONS_NOTE.to_string());
        }

        Ok(Extraction {
            page_count,
            heading_source: outline.source,
            headings: outline.headings,
            records,
            notes,
        })
    }
}
