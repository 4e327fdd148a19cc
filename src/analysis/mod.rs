//! Heading detection and annotation attribution.
//!
//! The stages run in order, each on values built by the previous one:
//! [`StyleProfile`] feeds [`HeadingExtractor`]'s style path,
//! [`AnnotationCollector`] gathers annotations, [`HeadingIndex`] resolves
//! their headings and [`assemble`] produces the records.

mod assemble;
mod assign;
mod collect;
mod headings;
mod style;

pub use assemble::assemble;
pub use assign::{HeadingIndex, Resolution};
pub use collect::{classify, AnnotationCollector};
pub use headings::{dedup_headings, HeadingExtractor, HeadingOutline};
pub use style::StyleProfile;

use crate::error::Result;
use crate::parser::ErrorMode;

/// Apply the error mode to a per-page result.
///
/// Strict mode propagates the error; lenient mode logs it and yields `None`
/// so the page is treated as empty.
pub(crate) fn recover_page<T>(mode: ErrorMode, page: usize, result: Result<T>) -> Result<Option<T>> {
    match (result, mode) {
        (Ok(value), _) => Ok(Some(value)),
        (Err(e), ErrorMode::Strict) => Err(e),
        (Err(e), ErrorMode::Lenient) => {
            log::warn!("Skipping page {}: {}", page + 1, e);
            Ok(None)
        }
    }
}
