//! Document outline (bookmarks) extraction.

use std::collections::{HashMap, HashSet};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::Result;
use crate::model::OutlineEntry;

use super::text::{decode_pdf_string, resolve, string_from_dict};

/// Name trees deeper than this are treated as malformed.
const MAX_NAME_TREE_DEPTH: usize = 32;

/// Flatten the outline into document order (depth-first, parents first).
///
/// Entries whose destination does not resolve to a page of this document
/// are skipped.
pub(crate) fn read_outline(doc: &LopdfDocument) -> Result<Vec<OutlineEntry>> {
    let Some(first) = outline_root(doc).and_then(|root| first_child(root)) else {
        return Ok(Vec::new());
    };

    let page_index: HashMap<ObjectId, usize> = doc
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number as usize - 1))
        .collect();
    let resolver = DestResolver {
        doc,
        page_index: &page_index,
    };

    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    // (item, level); siblings are pushed after children so children come first.
    let mut stack = vec![(first, 1u32)];

    while let Some((item_id, level)) = stack.pop() {
        if !visited.insert(item_id) {
            log::debug!("Outline cycle at {:?}, stopping this branch", item_id);
            continue;
        }
        let Ok(item) = doc.get_dictionary(item_id) else {
            continue;
        };

        if let Some(next) = reference(item, b"Next") {
            stack.push((next, level));
        }
        if let Some(child) = first_child(item) {
            stack.push((child, level + 1));
        }

        let title = string_from_dict(doc, item, b"Title").unwrap_or_default();
        match resolver.item_page(item) {
            Some(page) => entries.push(OutlineEntry::new(level, title, page)),
            None => log::debug!("Outline entry {:?} has no resolvable page", title),
        }
    }

    Ok(entries)
}

fn outline_root(doc: &LopdfDocument) -> Option<&Dictionary> {
    let catalog = doc.catalog().ok()?;
    resolve(doc, catalog.get(b"Outlines").ok()?)?.as_dict().ok()
}

fn first_child(dict: &Dictionary) -> Option<ObjectId> {
    reference(dict, b"First")
}

fn reference(dict: &Dictionary, key: &[u8]) -> Option<ObjectId> {
    dict.get(key).ok()?.as_reference().ok()
}

struct DestResolver<'a> {
    doc: &'a LopdfDocument,
    page_index: &'a HashMap<ObjectId, usize>,
}

impl DestResolver<'_> {
    /// Target page of an outline item, from `/Dest` or a GoTo `/A` action.
    fn item_page(&self, item: &Dictionary) -> Option<usize> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.dest_page(dest, 0);
        }

        let action = resolve(self.doc, item.get(b"A").ok()?)?.as_dict().ok()?;
        match action.get(b"S").ok().and_then(|s| s.as_name().ok()) {
            Some(b"GoTo") | None => self.dest_page(action.get(b"D").ok()?, 0),
            _ => None,
        }
    }

    fn dest_page(&self, dest: &Object, depth: usize) -> Option<usize> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }
        match resolve(self.doc, dest)? {
            Object::Array(arr) => match arr.first()? {
                Object::Reference(page_ref) => self.page_index.get(page_ref).copied(),
                // Some producers write a page number instead of a reference.
                Object::Integer(n) => usize::try_from(*n)
                    .ok()
                    .filter(|page| *page < self.page_index.len()),
                _ => None,
            },
            Object::Dictionary(d) => self.dest_page(d.get(b"D").ok()?, depth + 1),
            Object::String(bytes, _) => self.named_page(&decode_pdf_string(bytes), depth),
            Object::Name(name) => self.named_page(&String::from_utf8_lossy(name), depth),
            _ => None,
        }
    }

    /// Look up a named destination in `/Names → /Dests`, then in `/Dests`.
    fn named_page(&self, name: &str, depth: usize) -> Option<usize> {
        let catalog = self.doc.catalog().ok()?;

        let from_tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|n| resolve(self.doc, n))
            .and_then(|n| n.as_dict().ok())
            .and_then(|names| names.get(b"Dests").ok())
            .and_then(|d| resolve(self.doc, d))
            .and_then(|d| d.as_dict().ok())
            .and_then(|tree| self.lookup_name_tree(tree, name, 0))
            .and_then(|dest| self.dest_page(dest, depth + 1));
        if from_tree.is_some() {
            return from_tree;
        }

        let dests = resolve(self.doc, catalog.get(b"Dests").ok()?)?
            .as_dict()
            .ok()?;
        self.dest_page(dests.get(name.as_bytes()).ok()?, depth + 1)
    }

    fn lookup_name_tree<'d>(
        &'d self,
        node: &'d Dictionary,
        name: &str,
        depth: usize,
    ) -> Option<&'d Object> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }

        if let Some(pairs) = node
            .get(b"Names")
            .ok()
            .and_then(|n| resolve(self.doc, n))
            .and_then(|n| n.as_array().ok())
        {
            for pair in pairs.chunks_exact(2) {
                if let Some(Object::String(key, _)) = resolve(self.doc, &pair[0]) {
                    if decode_pdf_string(key) == name {
                        return Some(&pair[1]);
                    }
                }
            }
        }

        let kids = resolve(self.doc, node.get(b"Kids").ok()?)?.as_array().ok()?;
        kids.iter()
            .filter_map(|kid| resolve(self.doc, kid)?.as_dict().ok())
            .find_map(|kid| self.lookup_name_tree(kid, name, depth + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, StringFormat};

    /// Two pages plus an outline built by `build(doc, pages_ids)`.
    fn doc_with_outline(
        build: impl FnOnce(&mut LopdfDocument, &[ObjectId]) -> Option<ObjectId>,
    ) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_ids: Vec<ObjectId> = (0..2)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                })
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
                "Count" => 2,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(outlines) = build(&mut doc, &page_ids) {
            catalog.set("Outlines", outlines);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn title(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    }

    #[test]
    fn test_no_outline() {
        let doc = doc_with_outline(|_, _| None);
        assert!(read_outline(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_nested_outline_in_document_order() {
        let doc = doc_with_outline(|doc, pages| {
            let root = doc.new_object_id();
            let intro = doc.new_object_id();
            let child = doc.new_object_id();
            let methods = doc.new_object_id();
            doc.objects.insert(
                child,
                Object::Dictionary(dictionary! {
                    "Title" => title("1.1 Background"),
                    "Parent" => intro,
                    "Dest" => vec![pages[0].into(), "XYZ".into(), 0.into(), 400.into(), Object::Null],
                }),
            );
            doc.objects.insert(
                intro,
                Object::Dictionary(dictionary! {
                    "Title" => title(" 1 Introduction "),
                    "Parent" => root,
                    "First" => child,
                    "Last" => child,
                    "Next" => methods,
                    "Dest" => vec![pages[0].into(), "Fit".into()],
                }),
            );
            doc.objects.insert(
                methods,
                Object::Dictionary(dictionary! {
                    "Title" => title("2 Methods"),
                    "Parent" => root,
                    "Prev" => intro,
                    "A" => dictionary! {
                        "S" => "GoTo",
                        "D" => vec![pages[1].into(), "Fit".into()],
                    },
                }),
            );
            doc.objects.insert(
                root,
                Object::Dictionary(dictionary! {
                    "Type" => "Outlines",
                    "First" => intro,
                    "Last" => methods,
                }),
            );
            Some(root)
        });

        let entries = read_outline(&doc).unwrap();
        assert_eq!(
            entries,
            vec![
                OutlineEntry::new(1, " 1 Introduction ", 0),
                OutlineEntry::new(2, "1.1 Background", 0),
                OutlineEntry::new(1, "2 Methods", 1),
            ]
        );
    }

    #[test]
    fn test_named_destination_via_dests_dictionary() {
        let mut doc = doc_with_outline(|doc, pages| {
            let root = doc.new_object_id();
            let item = doc.new_object_id();
            doc.objects.insert(
                item,
                Object::Dictionary(dictionary! {
                    "Title" => title("Results"),
                    "Parent" => root,
                    "Dest" => "results",
                }),
            );
            doc.objects.insert(
                root,
                Object::Dictionary(dictionary! { "First" => item, "Last" => item }),
            );
            let _ = pages;
            Some(root)
        });

        let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        let dests = doc.add_object(dictionary! {
            "results" => vec![pages[1].into(), "Fit".into()],
        });
        let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
        doc.get_dictionary_mut(catalog_id)
            .unwrap()
            .set("Dests", dests);

        let entries = read_outline(&doc).unwrap();
        assert_eq!(entries, vec![OutlineEntry::new(1, "Results", 1)]);
    }

    #[test]
    fn test_unresolvable_entries_are_skipped() {
        let doc = doc_with_outline(|doc, _| {
            let root = doc.new_object_id();
            let item = doc.new_object_id();
            doc.objects.insert(
                item,
                Object::Dictionary(dictionary! {
                    "Title" => title("External"),
                    "Parent" => root,
                    "A" => dictionary! { "S" => "URI", "URI" => title("https://example.com") },
                }),
            );
            doc.objects.insert(
                root,
                Object::Dictionary(dictionary! { "First" => item, "Last" => item }),
            );
            Some(root)
        });

        assert!(read_outline(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_page_number_past_last_page_is_skipped() {
        let doc = doc_with_outline(|doc, _| {
            let root = doc.new_object_id();
            let ghost = doc.new_object_id();
            let kept = doc.new_object_id();
            doc.objects.insert(
                ghost,
                Object::Dictionary(dictionary! {
                    "Title" => title("Ghost"),
                    "Parent" => root,
                    "Next" => kept,
                    "Dest" => vec![Object::Integer(7), Object::Name(b"Fit".to_vec())],
                }),
            );
            doc.objects.insert(
                kept,
                Object::Dictionary(dictionary! {
                    "Title" => title("Summary"),
                    "Parent" => root,
                    "Prev" => ghost,
                    "Dest" => vec![Object::Integer(1), Object::Name(b"Fit".to_vec())],
                }),
            );
            doc.objects.insert(
                root,
                Object::Dictionary(dictionary! { "First" => ghost, "Last" => kept }),
            );
            Some(root)
        });

        let entries = read_outline(&doc).unwrap();
        assert_eq!(entries, vec![OutlineEntry::new(1, "Summary", 1)]);
    }
}
