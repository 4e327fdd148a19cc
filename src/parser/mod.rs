//! PDF parsing module.
//!
//! Everything that touches lopdf lives here; the rest of the crate works
//! against [`DocumentSource`].

mod annots;
mod content;
mod options;
mod outline;
mod source;
pub mod text;

pub use content::is_bold_font_name;
pub use options::{ErrorMode, ExtractOptions, HeadingStrategy, PageSelection};
pub use source::{DocumentSource, LopdfSource, MemorySource};
