//! Page annotation walking.

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{RawAnnotation, Rect};

use super::content::page_media_box;
use super::text::{number, resolve, string_from_dict};

/// Subtypes that are navigation or form plumbing, not reviewer annotations.
const SKIPPED_SUBTYPES: &[&[u8]] = &[b"Link", b"Widget", b"Popup"];

/// Read the annotations of one page in `/Annots` order.
///
/// Rectangles are converted to top-down page space. Entries that are not
/// dictionaries, lack a `/Subtype` or carry an unusable `/Rect` are skipped.
pub(crate) fn read_page_annotations(
    doc: &LopdfDocument,
    page_id: ObjectId,
) -> Result<Vec<RawAnnotation>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(format!("failed to get page dictionary: {e}")))?;

    let annots = match page_dict.get(b"Annots") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };
    let annots = resolve(doc, annots)
        .ok_or_else(|| Error::PdfParse("failed to resolve /Annots".to_string()))?
        .as_array()
        .map_err(|e| Error::PdfParse(format!("/Annots is not an array: {e}")))?;

    let [llx, _, _, ury] = page_media_box(doc, page_id);

    let mut annotations = Vec::new();
    for entry in annots {
        let Some(dict) = resolve(doc, entry).and_then(|o| o.as_dict().ok()) else {
            continue;
        };
        let Ok(subtype) = dict.get(b"Subtype").and_then(|o| o.as_name()) else {
            continue;
        };
        if SKIPPED_SUBTYPES.contains(&subtype) {
            continue;
        }
        let Some([x0, y0, x1, y1]) = annotation_rect(doc, dict) else {
            log::debug!(
                "Skipping {} annotation without a usable /Rect",
                String::from_utf8_lossy(subtype)
            );
            continue;
        };

        let rect = Rect::new(x0 - llx, ury - y0, x1 - llx, ury - y1);
        let mut annotation = RawAnnotation::new(String::from_utf8_lossy(subtype), rect);
        annotation.content = string_from_dict(doc, dict, b"Contents");
        annotation.title = string_from_dict(doc, dict, b"T");
        annotation.creation_date = string_from_dict(doc, dict, b"CreationDate");
        annotations.push(annotation);
    }

    Ok(annotations)
}

fn annotation_rect(doc: &LopdfDocument, dict: &Dictionary) -> Option<[f32; 4]> {
    let arr = resolve(doc, dict.get(b"Rect").ok()?)?.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, obj) in values.iter_mut().zip(arr) {
        *slot = resolve(doc, obj).and_then(number)?;
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn doc_with_annots(annots: Vec<Object>) -> (LopdfDocument, ObjectId) {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let annot_refs: Vec<Object> = annots
            .into_iter()
            .map(|a| Object::Reference(doc.add_object(a)))
            .collect();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Annots" => annot_refs,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        (doc, page_id)
    }

    #[test]
    fn test_reads_info_and_converts_rect() {
        let (doc, page_id) = doc_with_annots(vec![Object::Dictionary(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Highlight",
            "Rect" => vec![48.into(), 669.into(), 320.into(), 681.into()],
            "Contents" => Object::string_literal("This needs a citation."),
            "T" => Object::string_literal("Reviewer A"),
            "CreationDate" => Object::string_literal("D:20240115103045Z"),
        })]);

        let annots = read_page_annotations(&doc, page_id).unwrap();
        assert_eq!(annots.len(), 1);

        let a = &annots[0];
        assert_eq!(a.subtype, "Highlight");
        assert_eq!(a.rect, Rect::new(48.0, 111.0, 320.0, 123.0));
        assert_eq!(a.content.as_deref(), Some("This needs a citation."));
        assert_eq!(a.title.as_deref(), Some("Reviewer A"));
        assert_eq!(a.creation_date.as_deref(), Some("D:20240115103045Z"));
    }

    #[test]
    fn test_skips_links_and_malformed_entries() {
        let (doc, page_id) = doc_with_annots(vec![
            Object::Dictionary(dictionary! {
                "Subtype" => "Link",
                "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
            }),
            Object::Dictionary(dictionary! {
                "Subtype" => "Text",
                "Rect" => vec![0.into(), 0.into()],
            }),
            Object::Dictionary(dictionary! {
                "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
            }),
            Object::Dictionary(dictionary! {
                "Subtype" => "Text",
                "Rect" => vec![50.into(), 552.into(), 70.into(), 572.into()],
            }),
        ]);

        let annots = read_page_annotations(&doc, page_id).unwrap();
        assert_eq!(annots.len(), 1);
        assert_eq!(annots[0].subtype, "Text");
        assert_eq!(annots[0].rect.top(), 220.0);
        assert!(annots[0].content.is_none());
    }

    #[test]
    fn test_page_without_annots() {
        let (doc, page_id) = doc_with_annots(Vec::new());
        assert!(read_page_annotations(&doc, page_id).unwrap().is_empty());
    }
}
