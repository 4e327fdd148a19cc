//! Data model shared by the engine, the analysis stages and the renderers.
//!
//! Everything here is built once per extraction run and never mutated
//! afterwards.

mod annotation;
mod geometry;
mod heading;
mod record;
mod span;

pub use annotation::{Annotation, AnnotationKind, RawAnnotation, NOT_AVAILABLE};
pub use geometry::Rect;
pub use heading::{
    sort_by_position, Heading, HeadingSource, OutlineEntry, NO_HEADING_LEVEL, NO_HEADING_TEXT,
};
pub use record::Record;
pub use span::{round_font_size, StyleKey, TextSpan};
