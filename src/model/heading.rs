//! Section headings and declared outline entries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Heading text reported for annotations that no heading governs.
pub const NO_HEADING_TEXT: &str = "No Associated Heading";

/// Heading level reported together with [`NO_HEADING_TEXT`].
pub const NO_HEADING_LEVEL: u32 = 0;

/// A section heading located on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Outline depth (outline path) or rounded font size (style path).
    /// Informational only; ordering never looks at it.
    pub level: u32,
    /// Trimmed heading text
    pub text: String,
    /// Page index (0-based)
    pub page: usize,
    /// Top edge in top-down page space
    pub y: f32,
}

impl Heading {
    pub fn new(level: u32, text: impl Into<String>, page: usize, y: f32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            y,
        }
    }

    /// Document order: page first, then top-to-bottom.
    pub fn position_cmp(&self, other: &Heading) -> Ordering {
        self.page
            .cmp(&other.page)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    /// Whether this heading sits strictly above `(page, y)` in document order.
    pub fn precedes(&self, page: usize, y: f32) -> bool {
        self.page < page || (self.page == page && self.y < y)
    }
}

/// Stable sort by `(page, y)`.
pub fn sort_by_position(headings: &mut [Heading]) {
    headings.sort_by(Heading::position_cmp);
}

/// Which detection path produced the heading list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingSource {
    /// The document's declared outline (bookmarks)
    Outline,
    /// The font-style heuristic
    Style,
    /// Nothing usable was found
    None,
}

impl std::fmt::Display for HeadingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingSource::Outline => write!(f, "outline"),
            HeadingSource::Style => write!(f, "font style heuristic"),
            HeadingSource::None => write!(f, "none"),
        }
    }
}

/// One entry of a declared outline, flattened in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting depth, 1 for top-level entries
    pub level: u32,
    /// Title as declared (untrimmed)
    pub title: String,
    /// Target page index (0-based)
    pub page: usize,
}

impl OutlineEntry {
    pub fn new(level: u32, title: impl Into<String>, page: usize) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}
