//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use pdfannots::{Rect, TextSpan};

pub const PAGE_HEIGHT: f32 = 792.0;

/// One line of text: top-down baseline, font size, bold, text.
pub type Line = (f32, f32, bool, &'static str);

/// An annotation: page index, subtype, `[x0, top, x1, bottom]` top-down,
/// contents, author.
pub type Annot = (usize, &'static str, [f32; 4], &'static str, &'static str);

/// Builds small multi-page PDFs with text, annotations and an outline.
#[derive(Default)]
pub struct PdfBuilder {
    pages: Vec<Vec<Line>>,
    annots: Vec<Annot>,
    outline: Vec<(&'static str, usize)>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, lines: &[Line]) -> Self {
        self.pages.push(lines.to_vec());
        self
    }

    pub fn annot(mut self, annot: Annot) -> Self {
        self.annots.push(annot);
        self
    }

    /// Flat outline entry pointing at a page index.
    pub fn bookmark(mut self, title: &'static str, page: usize) -> Self {
        self.outline.push((title, page));
        self
    }

    pub fn build(self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => regular, "F2" => bold },
        });

        let mut page_ids = Vec::new();
        for lines in &self.pages {
            let mut operations = Vec::new();
            for &(baseline, size, is_bold, text) in lines {
                let font = if is_bold { "F2" } else { "F1" };
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![font.into(), size.into()]),
                    Operation::new("Td", vec![50.into(), (PAGE_HEIGHT - baseline).into()]),
                    Operation::new("Tj", vec![Object::string_literal(text)]),
                    Operation::new("ET", vec![]),
                ]);
            }
            let content = Content { operations }.encode().unwrap();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            page_ids.push(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources,
            }));
        }

        for (page, subtype, [x0, top, x1, bottom], contents, author) in &self.annots {
            let annot = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => Object::Name(subtype.as_bytes().to_vec()),
                "Rect" => vec![
                    Object::Real(*x0),
                    Object::Real(PAGE_HEIGHT - bottom),
                    Object::Real(*x1),
                    Object::Real(PAGE_HEIGHT - top),
                ],
                "Contents" => Object::string_literal(*contents),
                "T" => Object::string_literal(*author),
            });
            let page_dict = doc.get_dictionary_mut(page_ids[*page]).unwrap();
            let mut annots = page_dict
                .get(b"Annots")
                .and_then(Object::as_array)
                .cloned()
                .unwrap_or_default();
            annots.push(Object::Reference(annot));
            page_dict.set("Annots", annots);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(outlines) = add_outline(&mut doc, &self.outline, &page_ids) {
            catalog.set("Outlines", outlines);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        doc
    }

    pub fn bytes(self) -> Vec<u8> {
        let mut doc = self.build();
        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }
}

fn add_outline(
    doc: &mut Document,
    entries: &[(&'static str, usize)],
    page_ids: &[ObjectId],
) -> Option<ObjectId> {
    if entries.is_empty() {
        return None;
    }
    let root = doc.new_object_id();
    let ids: Vec<ObjectId> = entries.iter().map(|_| doc.new_object_id()).collect();

    for (i, (title, page)) in entries.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
            "Parent" => root,
        };
        // Pages past the end are written as bare page numbers.
        let target = match page_ids.get(*page) {
            Some(id) => Object::Reference(*id),
            None => Object::Integer(*page as i64),
        };
        item.set("Dest", vec![target, "Fit".into()]);
        if i > 0 {
            item.set("Prev", ids[i - 1]);
        }
        if let Some(next) = ids.get(i + 1) {
            item.set("Next", *next);
        }
        doc.objects.insert(ids[i], Object::Dictionary(item));
    }

    doc.objects.insert(
        root,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => ids[0],
            "Last" => ids[ids.len() - 1],
            "Count" => ids.len() as i64,
        }),
    );
    Some(root)
}

/// A span for in-memory sources, half an em per character.
pub fn span(text: &str, page: usize, top: f32, size: f32, bold: bool) -> TextSpan {
    let width = text.chars().count() as f32 * size * 0.5;
    TextSpan::new(
        text,
        page,
        Rect::new(50.0, top, 50.0 + width, top + size),
        size,
        if bold { "Helvetica-Bold" } else { "Helvetica" },
        bold,
    )
}

pub fn body(page: usize, top: f32) -> TextSpan {
    span("Ordinary paragraph text.", page, top, 11.0, false)
}
