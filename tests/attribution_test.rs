//! Heading attribution over in-memory page geometry.

mod common;

use common::{body, span};
use pdfannots::analysis::{dedup_headings, HeadingExtractor};
use pdfannots::{
    AnnotationKind, ErrorMode, ExtractOptions, Extractor, Heading, HeadingIndex, HeadingSource,
    MemorySource, OutlineEntry, RawAnnotation, Rect, Resolution, NO_HEADING_TEXT,
};

fn comment(top: f32, text: &str) -> RawAnnotation {
    RawAnnotation::new("Text", Rect::new(300.0, top, 320.0, top + 20.0)).with_content(text)
}

#[test]
fn test_repeated_heading_is_deduplicated() {
    // The title is drawn twice a few points apart (fake bold).
    let source = MemorySource::new(1)
        .with_span(span("Abstract", 0, 80.0, 14.0, true))
        .with_span(span("Abstract", 0, 82.0, 14.0, true))
        .with_span(body(0, 110.0))
        .with_span(body(0, 125.0))
        .with_span(body(0, 140.0));

    let options = ExtractOptions::default();
    let outline = HeadingExtractor::new(&source, &options).extract().unwrap();
    assert_eq!(outline.source, HeadingSource::Style);
    assert_eq!(outline.headings.len(), 1);
    assert_eq!(outline.headings[0].y, 80.0);
    assert_eq!(outline.headings[0].level, 14);
}

#[test]
fn test_distant_repeats_are_kept() {
    let headings = vec![
        Heading::new(14, "Notes", 0, 100.0),
        Heading::new(14, "Notes", 0, 400.0),
        Heading::new(14, "Notes", 1, 100.0),
    ];
    assert_eq!(dedup_headings(headings, 10.0).len(), 3);
}

#[test]
fn test_captions_are_not_headings() {
    let source = MemorySource::new(1)
        .with_span(span("Figure 1: Overview", 0, 300.0, 11.0, true))
        .with_span(span("Table 2: Scores", 0, 360.0, 11.0, true))
        .with_span(body(0, 320.0))
        .with_span(body(0, 335.0))
        .with_span(body(0, 350.0));

    let options = ExtractOptions::default();
    let outline = HeadingExtractor::new(&source, &options).extract().unwrap();
    let texts: Vec<_> = outline.headings.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["Table 2: Scores"]);

    let options = ExtractOptions::default().with_caption_prefixes(["figure", "table"]);
    let outline = HeadingExtractor::new(&source, &options).extract().unwrap();
    assert_eq!(outline.source, HeadingSource::None);
}

#[test]
fn test_annotation_above_first_heading_is_unassigned() {
    let source = MemorySource::new(1)
        .with_span(span("Methods", 0, 300.0, 16.0, true))
        .with_span(body(0, 330.0))
        .with_span(body(0, 345.0))
        .with_annotation(0, comment(50.0, "Title page remark"))
        .with_annotation(0, comment(400.0, "Methods remark"));

    let extraction = Extractor::new(source).run().unwrap();
    assert_eq!(extraction.len(), 2);
    assert_eq!(extraction.records[0].heading, NO_HEADING_TEXT);
    assert_eq!(extraction.records[0].heading_level, 0);
    assert_eq!(extraction.records[1].heading, "Methods");
    assert_eq!(extraction.records[1].heading_level, 16);
}

#[test]
fn test_annotation_level_with_heading_is_not_governed_by_it() {
    let source = MemorySource::new(1)
        .with_outline(vec![OutlineEntry::new(1, "Scope", 0)])
        .with_span(span("Scope", 0, 200.0, 16.0, true))
        .with_annotation(0, comment(200.0, "Same line"))
        .with_annotation(0, comment(200.5, "Just below"));

    let extraction = Extractor::new(source).run().unwrap();
    assert_eq!(extraction.heading_source, HeadingSource::Outline);
    assert_eq!(extraction.records[0].heading, NO_HEADING_TEXT);
    assert_eq!(extraction.records[1].heading, "Scope");
}

#[test]
fn test_empty_annotations_are_dropped() {
    let source = MemorySource::new(1)
        .with_span(span("Results", 0, 100.0, 16.0, true))
        .with_span(body(0, 130.0))
        .with_span(body(0, 145.0))
        .with_annotation(
            0,
            RawAnnotation::new("Text", Rect::new(300.0, 150.0, 320.0, 170.0)),
        )
        .with_annotation(
            0,
            RawAnnotation::new("Highlight", Rect::new(48.0, 128.0, 200.0, 142.0)),
        )
        .with_annotation(
            0,
            RawAnnotation::new("Underline", Rect::new(48.0, 600.0, 200.0, 612.0))
                .with_title("Nobody"),
        );

    let extraction = Extractor::new(source).run().unwrap();
    assert_eq!(extraction.len(), 1);

    let record = &extraction.records[0];
    assert_eq!(record.annotation_type, AnnotationKind::Highlight);
    assert_eq!(record.highlighted_text, "Ordinary paragraph text.");
    assert_eq!(record.comment, "");
    assert_eq!(record.author, "N/A");
}

#[test]
fn test_unknown_subtypes_are_reported_as_other() {
    let source = MemorySource::new(1).with_annotation(
        0,
        RawAnnotation::new("FreeText", Rect::new(10.0, 10.0, 90.0, 30.0))
            .with_content("Typed on the page"),
    );

    let extraction = Extractor::new(source).run().unwrap();
    assert_eq!(extraction.records[0].annotation_type, AnnotationKind::Other);
    assert_eq!(extraction.records[0].highlighted_text, "");
}

#[test]
fn test_index_matches_linear_scan_across_pages() {
    let headings = vec![
        Heading::new(1, "One", 0, 100.0),
        Heading::new(1, "Two", 0, 500.0),
        Heading::new(1, "Three", 2, 300.0),
    ];
    let index = HeadingIndex::new(&headings);

    let cases = [
        (0, 50.0, None),
        (0, 100.0, None),
        (0, 101.0, Some("One")),
        (1, 10.0, Some("Two")),
        (2, 299.0, Some("Two")),
        (2, 301.0, Some("Three")),
        (7, 0.0, Some("Three")),
    ];
    for (page, y, expected) in cases {
        let resolution = index.resolve(page, y);
        assert_eq!(
            resolution.heading().map(|h| h.text.as_str()),
            expected,
            "page {page} y {y}"
        );
    }
    assert!(matches!(index.resolve(1, 10.0), Resolution::EarlierPage(_)));
    assert!(matches!(index.resolve(0, 101.0), Resolution::SamePage(_)));
}

#[test]
fn test_lenient_mode_is_accepted_by_memory_source() {
    let source = MemorySource::new(3)
        .with_span(span("Intro", 0, 100.0, 16.0, true))
        .with_span(body(0, 130.0))
        .with_span(body(0, 145.0))
        .with_annotation(2, comment(10.0, "Late remark"));

    let options = ExtractOptions::default().with_error_mode(ErrorMode::Lenient);
    let extraction = Extractor::with_options(source, options).run().unwrap();
    assert_eq!(extraction.page_count, 3);
    assert_eq!(extraction.records[0].heading, "Intro");
    assert_eq!(extraction.records[0].page, 3);
}
