//! Hyperlink extraction from `/Link` annotations.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::model::{Link, LinkKind};

use super::layout::PageFrame;
use super::text::{dict_string, number, object_string, resolve, resolve_dict};

/// Extract every `/Link` annotation on a page.
///
/// Annotations that cannot be read (bad `/Rect`, dangling references) are
/// skipped; a link without a recognizable target is kept as
/// [`LinkKind::Other`].
pub(crate) fn extract_page_links(
    doc: &Document,
    page_id: ObjectId,
    pages: &BTreeMap<u32, ObjectId>,
    frame: PageFrame,
) -> Vec<Link> {
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let Some(annots) = page_dict
        .get(b"Annots")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_array().ok())
    else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for entry in annots {
        let Some(annot) = resolve_dict(doc, entry) else {
            continue;
        };

        match annot.get(b"Subtype") {
            Ok(Object::Name(name)) if name.as_slice() == b"Link" => {}
            _ => continue,
        }

        let Some(rect) = annot
            .get(b"Rect")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_array().ok())
            .and_then(|arr| read_rect(arr))
        else {
            continue;
        };

        let [x0, y0, x1, y1] = rect;
        links.push(Link {
            rect: frame.flip(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)),
            kind: resolve_link_kind(doc, annot, pages),
        });
    }

    log::debug!("page {:?}: {} links", page_id, links.len());
    links
}

fn read_rect(arr: &[Object]) -> Option<[f32; 4]> {
    if arr.len() < 4 {
        return None;
    }
    Some([
        number(&arr[0])?,
        number(&arr[1])?,
        number(&arr[2])?,
        number(&arr[3])?,
    ])
}

/// Resolve the target of a Link annotation: `/A` action first, then `/Dest`.
fn resolve_link_kind(
    doc: &Document,
    annot: &Dictionary,
    pages: &BTreeMap<u32, ObjectId>,
) -> LinkKind {
    if let Some(action) = annot.get(b"A").ok().and_then(|a| resolve_dict(doc, a)) {
        let action_type = action
            .get(b"S")
            .ok()
            .and_then(|s| s.as_name_str().ok())
            .unwrap_or("")
            .to_string();

        return match action_type.as_str() {
            "URI" => LinkKind::Uri(dict_string(doc, action, b"URI").unwrap_or_default()),
            "GoTo" => match action.get(b"D") {
                Ok(dest) => resolve_destination(doc, dest, pages),
                Err(_) => LinkKind::GoTo {
                    page: None,
                    name: None,
                },
            },
            "GoToR" => LinkKind::RemoteGoTo(file_spec(doc, action).unwrap_or_default()),
            "Launch" => LinkKind::Launch(file_spec(doc, action).unwrap_or_default()),
            "Named" => LinkKind::Named(dict_string(doc, action, b"N").unwrap_or_default()),
            other => LinkKind::Other(other.to_string()),
        };
    }

    match annot.get(b"Dest") {
        Ok(dest) => resolve_destination(doc, dest, pages),
        Err(_) => LinkKind::Other(String::new()),
    }
}

/// Resolve an explicit `[page /Fit ...]` or named destination.
fn resolve_destination(
    doc: &Document,
    dest: &Object,
    pages: &BTreeMap<u32, ObjectId>,
) -> LinkKind {
    let Some(dest) = resolve(doc, dest) else {
        return LinkKind::GoTo {
            page: None,
            name: None,
        };
    };

    match dest {
        Object::Array(arr) => {
            let page = match arr.first() {
                Some(Object::Reference(page_ref)) => pages
                    .iter()
                    .find(|(_, id)| *id == page_ref)
                    .map(|(num, _)| *num),
                // Remote-style destinations carry a 0-based page index
                Some(Object::Integer(index)) => u32::try_from(*index).ok().map(|i| i + 1),
                _ => None,
            };
            LinkKind::GoTo { page, name: None }
        }
        other => LinkKind::GoTo {
            page: None,
            name: object_string(other),
        },
    }
}

/// Read `/F` as a plain string or a file specification dictionary.
fn file_spec(doc: &Document, action: &Dictionary) -> Option<String> {
    let spec = resolve(doc, action.get(b"F").ok()?)?;
    match spec {
        Object::Dictionary(dict) => {
            dict_string(doc, dict, b"UF").or_else(|| dict_string(doc, dict, b"F"))
        }
        other => object_string(other),
    }
}
