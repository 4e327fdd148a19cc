//! Sample annotated document.
//!
//! A one-page Letter document with two numbered headings, a few body
//! lines, a highlight carrying a reviewer comment and a sticky note. Useful
//! for trying the tool and as a test fixture.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::Result;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

const HEADING_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LEFT: f32 = 50.0;

/// Highlight over the first body line, `[x0, top, x1, bottom]` top-down.
const HIGHLIGHT_RECT: [f32; 4] = [48.0, 110.0, 320.0, 124.0];

/// (top-down baseline, bold, text)
const LINES: &[(f32, bool, &str)] = &[
    (100.0, true, "1. Introduction"),
    (120.0, false, "This is the first sentence of the introduction."),
    (135.0, false, "It motivates the study and states the main claim."),
    (150.0, false, "Prior work is summarized briefly below."),
    (200.0, true, "2. Methodology"),
    (240.0, false, "Participants were recruited from three sites."),
    (255.0, false, "Each session lasted roughly forty minutes."),
    (270.0, false, "Responses were coded by two annotators."),
];

/// Comment attached to the highlight.
pub const SAMPLE_HIGHLIGHT_COMMENT: &str = "This needs a citation.";
/// Author of the highlight.
pub const SAMPLE_HIGHLIGHT_AUTHOR: &str = "Reviewer A";
/// Text of the sticky note.
pub const SAMPLE_NOTE_COMMENT: &str = "The methodology section is unclear.";

/// Build the sample document in memory.
pub fn sample_document() -> Result<LopdfDocument> {
    let mut doc = LopdfDocument::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut operations = Vec::new();
    for &(baseline, is_bold, text) in LINES {
        let (font, size) = if is_bold {
            ("F2", HEADING_SIZE)
        } else {
            ("F1", BODY_SIZE)
        };
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            Operation::new("Td", vec![LEFT.into(), (PAGE_HEIGHT - baseline).into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
    }
    let content = Content { operations }.encode()?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources,
    });

    let mut highlight = annotation("Highlight", HIGHLIGHT_RECT, SAMPLE_HIGHLIGHT_COMMENT);
    highlight.set("T", Object::string_literal(SAMPLE_HIGHLIGHT_AUTHOR));
    highlight.set("CreationDate", Object::string_literal("D:20240115103045Z"));
    highlight.set(
        "C",
        vec![Object::Real(1.0), Object::Real(1.0), Object::Real(0.0)],
    );
    let [x0, y0, x1, y1] = to_pdf_rect(HIGHLIGHT_RECT);
    highlight.set(
        "QuadPoints",
        [x0, y1, x1, y1, x0, y0, x1, y0]
            .iter()
            .map(|&v| Object::Real(v))
            .collect::<Vec<_>>(),
    );

    let mut note = annotation("Text", [LEFT, 220.0, LEFT + 20.0, 240.0], SAMPLE_NOTE_COMMENT);
    note.set("Name", "Note");
    note.set("Open", false);

    let annots: Vec<Object> = [highlight, note]
        .into_iter()
        .map(|a| Object::Reference(doc.add_object(a)))
        .collect();
    add_annotations(&mut doc, page_id, annots);

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Serialize the sample document.
pub fn sample_bytes() -> Result<Vec<u8>> {
    let mut doc = sample_document()?;
    let mut data = Vec::new();
    doc.save_to(&mut data)?;
    Ok(data)
}

/// Write the sample document to `path`.
pub fn write_sample<P: AsRef<Path>>(path: P) -> Result<()> {
    std::fs::write(path, sample_bytes()?)?;
    Ok(())
}

/// `[x0, top, x1, bottom]` in top-down space to a PDF `/Rect`.
fn to_pdf_rect([x0, top, x1, bottom]: [f32; 4]) -> [f32; 4] {
    [x0, PAGE_HEIGHT - bottom, x1, PAGE_HEIGHT - top]
}

fn annotation(subtype: &str, rect: [f32; 4], contents: &str) -> Dictionary {
    let rect = to_pdf_rect(rect);
    dictionary! {
        "Type" => "Annot",
        "Subtype" => Object::Name(subtype.as_bytes().to_vec()),
        "Rect" => rect.iter().map(|&v| Object::Real(v)).collect::<Vec<_>>(),
        "Contents" => Object::string_literal(contents),
        "F" => 4,
    }
}

fn add_annotations(doc: &mut LopdfDocument, page_id: ObjectId, annots: Vec<Object>) {
    if let Ok(page) = doc.get_dictionary_mut(page_id) {
        page.set("Annots", annots);
    }
}
