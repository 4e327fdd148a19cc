//! Output records: one annotation joined with its governing heading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AnnotationKind;

/// A reportable annotation with its heading attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Governing heading text, or "No Associated Heading"
    pub heading: String,
    /// Governing heading level, 0 when there is none
    pub heading_level: u32,
    /// Page number (1-indexed)
    pub page: u32,
    pub annotation_type: AnnotationKind,
    pub highlighted_text: String,
    pub comment: String,
    pub author: String,
    /// Raw creation timestamp as stored in the document
    pub created_at: String,
    /// Parsed creation timestamp, when `created_at` is a valid PDF date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Record {
    /// Column titles shared by the table and CSV renderers.
    pub const COLUMNS: [&'static str; 7] = [
        "Heading",
        "Page",
        "Annotation Type",
        "Highlighted Text",
        "Comment",
        "Author",
        "Created At",
    ];
}
