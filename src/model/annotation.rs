//! Reviewer annotations, raw and classified.

use serde::{Deserialize, Serialize};

use super::Rect;

/// Placeholder for a missing author or creation date.
pub const NOT_AVAILABLE: &str = "N/A";

/// Classified annotation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Free-floating sticky note
    Comment,
    Highlight,
    Underline,
    Squiggly,
    StrikeOut,
    /// Anything outside the table above
    Other,
}

impl AnnotationKind {
    /// Classify an annotation by its `/Subtype` name.
    pub fn from_subtype(subtype: &str) -> Self {
        match subtype {
            "Text" => AnnotationKind::Comment,
            "Highlight" => AnnotationKind::Highlight,
            "Underline" => AnnotationKind::Underline,
            "Squiggly" => AnnotationKind::Squiggly,
            "StrikeOut" => AnnotationKind::StrikeOut,
            _ => AnnotationKind::Other,
        }
    }

    /// Markup kinds cover existing text, which is recovered from the page.
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Highlight
                | AnnotationKind::Underline
                | AnnotationKind::Squiggly
                | AnnotationKind::StrikeOut
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Comment => "Comment",
            AnnotationKind::Highlight => "Highlight",
            AnnotationKind::Underline => "Underline",
            AnnotationKind::Squiggly => "Squiggly",
            AnnotationKind::StrikeOut => "StrikeOut",
            AnnotationKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotation object as the engine reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnnotation {
    /// Type code (`/Subtype` name, e.g. "Highlight")
    pub subtype: String,
    /// Annotation rectangle in top-down page space
    pub rect: Rect,
    /// `/Contents`
    pub content: Option<String>,
    /// `/T`, usually the author
    pub title: Option<String>,
    /// `/CreationDate`, unparsed
    pub creation_date: Option<String>,
}

impl RawAnnotation {
    pub fn new(subtype: impl Into<String>, rect: Rect) -> Self {
        Self {
            subtype: subtype.into(),
            rect,
            content: None,
            title: None,
            creation_date: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_creation_date(mut self, date: impl Into<String>) -> Self {
        self.creation_date = Some(date.into());
        self
    }
}

/// A retained annotation with its textual payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Page index (0-based)
    pub page: usize,
    /// Top edge of the annotation rectangle
    pub top_y: f32,
    /// Trimmed comment, possibly empty
    pub comment: String,
    /// Trimmed author, "N/A" when absent
    pub author: String,
    /// Raw creation timestamp, "N/A" when absent
    pub created_at: String,
    /// Text covered by a markup annotation, empty for other kinds
    pub highlighted_text: String,
}

impl Annotation {
    /// Whether the annotation carries anything worth reporting.
    pub fn has_payload(&self) -> bool {
        !self.comment.is_empty() || !self.highlighted_text.is_empty()
    }
}
