//! JSON rendering of extraction results.

use crate::analysis::HeadingOutline;
use crate::error::{Error, Result};
use crate::extract::Extraction;
use crate::model::Record;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize the whole extraction: headings, notes and records.
pub fn to_json(extraction: &Extraction, format: JsonFormat) -> Result<String> {
    serialize(extraction, format)
}

/// Serialize only the records.
pub fn records_to_json(records: &[Record], format: JsonFormat) -> Result<String> {
    serialize(records, format)
}

/// Serialize a detected heading outline.
pub fn headings_to_json(outline: &HeadingOutline, format: JsonFormat) -> Result<String> {
    serialize(outline, format)
}

fn serialize<T: serde::Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
