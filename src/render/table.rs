//! Aligned text table rendering.

use prettytable::{format, Cell, Row, Table};

use crate::model::Record;

/// Columns shown in the terminal table; the timestamp is left to CSV.
const TABLE_COLUMNS: usize = 6;

/// Longest cell text before it is cut with an ellipsis.
const MAX_CELL_CHARS: usize = 60;

/// Build the display table: Heading, Page, Annotation Type, Highlighted
/// Text, Comment, Author.
pub fn build_table(records: &[Record]) -> Table {
    let mut table = Table::new();
    let format = format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separators(
            &[format::LinePosition::Top, format::LinePosition::Bottom],
            format::LineSeparator::new('-', '+', '+', '+'),
        )
        .separator(
            format::LinePosition::Title,
            format::LineSeparator::new('=', '+', '+', '+'),
        )
        .padding(1, 1)
        .build();
    table.set_format(format);

    table.set_titles(Row::new(
        Record::COLUMNS[..TABLE_COLUMNS]
            .iter()
            .map(|title| Cell::new(title).style_spec("b"))
            .collect(),
    ));

    for record in records {
        table.add_row(Row::new(vec![
            Cell::new(&truncate(&record.heading)),
            Cell::new(&record.page.to_string()).style_spec("r"),
            Cell::new(record.annotation_type.as_str()),
            Cell::new(&truncate(&record.highlighted_text)),
            Cell::new(&truncate(&record.comment)),
            Cell::new(&truncate(&record.author)),
        ]));
    }

    table
}

/// Render records as an aligned text table.
pub fn to_table(records: &[Record]) -> String {
    build_table(records).to_string()
}

/// Flatten line breaks and cut long text so rows stay on one line.
fn truncate(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_CHARS - 1).collect();
    cut.push('…');
    cut
}
