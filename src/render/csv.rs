//! CSV rendering of records.

use std::path::{Path, PathBuf};

use prettytable::{Cell, Row, Table};

use crate::error::{Error, Result};
use crate::model::Record;

/// Render records as CSV: a header row, then one row per record.
pub fn to_csv(records: &[Record]) -> Result<String> {
    let mut table = Table::new();
    table.add_row(Row::new(
        Record::COLUMNS.iter().map(|title| Cell::new(title)).collect(),
    ));
    for record in records {
        table.add_row(Row::new(vec![
            Cell::new(&record.heading),
            Cell::new(&record.page.to_string()),
            Cell::new(record.annotation_type.as_str()),
            Cell::new(&record.highlighted_text),
            Cell::new(&record.comment),
            Cell::new(&record.author),
            Cell::new(&record.created_at),
        ]));
    }

    let writer = table
        .to_csv(Vec::new())
        .map_err(|e| Error::Render(format!("CSV error: {}", e)))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Render(format!("CSV error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("CSV error: {}", e)))
}

/// Write records as CSV to `path`.
pub fn write_csv<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    std::fs::write(path, to_csv(records)?)?;
    Ok(())
}

/// `report.pdf` → `report_annotations.csv`, next to the input.
pub fn default_csv_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{stem}_annotations.csv"))
}
