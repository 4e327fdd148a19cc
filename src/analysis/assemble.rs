//! Final record assembly.

use crate::model::{Annotation, Record};
use crate::parser::text::parse_pdf_date;

use super::assign::HeadingIndex;

/// Join each annotation with its governing heading.
///
/// Records come out in page order, then top-to-bottom within a page, with
/// 1-indexed page numbers.
pub fn assemble(annotations: &[Annotation], index: &HeadingIndex<'_>) -> Vec<Record> {
    let mut ordered: Vec<&Annotation> = annotations.iter().collect();
    ordered.sort_by(|a, b| a.page.cmp(&b.page).then_with(|| a.top_y.total_cmp(&b.top_y)));

    ordered
        .into_iter()
        .map(|annotation| {
            let resolution = index.resolve(annotation.page, annotation.top_y);
            Record {
                heading: resolution.text().to_string(),
                heading_level: resolution.level(),
                page: u32::try_from(annotation.page + 1).unwrap_or(u32::MAX),
                annotation_type: annotation.kind,
                highlighted_text: annotation.highlighted_text.clone(),
                comment: annotation.comment.clone(),
                author: annotation.author.clone(),
                created_at: annotation.created_at.clone(),
                created: parse_pdf_date(&annotation.created_at),
            }
        })
        .collect()
}
