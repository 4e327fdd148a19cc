//! Rendering module for turning extraction results into output formats.

mod csv;
mod json;
mod table;

pub use self::csv::{default_csv_path, to_csv, write_csv};
pub use json::{headings_to_json, records_to_json, to_json, JsonFormat};
pub use table::{build_table, to_table};

use crate::error::Result;
use crate::extract::Extraction;

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,

    /// Comma-separated values
    Csv,

    /// JSON structure
    Json,
}

impl OutputFormat {
    /// Customary file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Render an extraction in the given format.
pub fn render(extraction: &Extraction, format: OutputFormat, json: JsonFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(to_table(&extraction.records)),
        OutputFormat::Csv => to_csv(&extraction.records),
        OutputFormat::Json => to_json(extraction, json),
    }
}
