//! Reading finished PDFs back in, to check what the external tools made

use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::collections::HashSet;
use std::path::Path;

/// Load a PDF document from a file
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let bytes = tokio::fs::read(path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Width and height in points of every page, in page order
pub async fn page_sizes(path: impl AsRef<Path>) -> Result<Vec<(f32, f32)>> {
    let doc = load_pdf(path).await?;
    doc.get_pages()
        .values()
        .map(|&page_id| media_box_size(&doc, page_id))
        .collect()
}

/// Size of the first page
pub async fn page_size(path: impl AsRef<Path>) -> Result<(f32, f32)> {
    let path = path.as_ref();
    page_sizes(path).await?.first().copied().ok_or_else(|| {
        BookError::Config(format!("{} has no pages", path.display()))
    })
}

/// Page size from the MediaBox, which may be inherited from the page tree
pub fn media_box_size(doc: &Document, page_id: ObjectId) -> Result<(f32, f32)> {
    let mut visited = HashSet::new();
    let mut id = page_id;
    while visited.insert(id) {
        let dict = doc.get_dictionary(id)?;
        if let Ok(media_box) = dict.get(b"MediaBox") {
            return box_size(doc, media_box);
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => id = parent_id,
            Err(_) => break,
        }
    }
    Err(BookError::Config(format!(
        "no MediaBox for page {} {}",
        page_id.0, page_id.1
    )))
}

fn box_size(doc: &Document, media_box: &Object) -> Result<(f32, f32)> {
    let media_box = match media_box {
        Object::Reference(id) => doc.get_object(*id)?,
        other => other,
    };
    let corners = media_box
        .as_array()?
        .iter()
        .map(number)
        .collect::<Option<Vec<f32>>>();
    match corners.as_deref() {
        Some(&[x1, y1, x2, y2]) => Ok(((x2 - x1).abs(), (y2 - y1).abs())),
        _ => Err(BookError::Config(format!("malformed MediaBox {media_box:?}"))),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Dictionary;

    fn doc_with_box(media_box: Vec<Object>, on_page: bool) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
        ]);
        let mut pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(1)),
        ]);
        if on_page {
            page.set("MediaBox", Object::Array(media_box));
        } else {
            pages.set("MediaBox", Object::Array(media_box));
        }
        let page_id = doc.add_object(page);
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        (doc, page_id)
    }

    #[test]
    fn test_media_box_on_page() {
        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(420.0),
            Object::Integer(595),
        ];
        let (doc, page_id) = doc_with_box(media_box, true);
        assert_eq!(media_box_size(&doc, page_id).unwrap(), (420.0, 595.0));
    }

    #[test]
    fn test_media_box_inherited_from_page_tree() {
        let media_box = vec![
            Object::Integer(10),
            Object::Integer(10),
            Object::Integer(622),
            Object::Integer(802),
        ];
        let (doc, page_id) = doc_with_box(media_box, false);
        assert_eq!(media_box_size(&doc, page_id).unwrap(), (612.0, 792.0));
    }

    #[test]
    fn test_missing_media_box_is_an_error() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(Dictionary::from_iter(vec![(
            "Type",
            Object::Name(b"Page".to_vec()),
        )]));
        assert!(matches!(
            media_box_size(&doc, page_id),
            Err(BookError::Config(msg)) if msg.contains("no MediaBox")
        ));
    }

    #[test]
    fn test_parent_cycle_without_media_box_ends() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.new_object_id();
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            page_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
            ])),
        );
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Parent", Object::Reference(page_id)),
            ])),
        );
        assert!(matches!(
            media_box_size(&doc, page_id),
            Err(BookError::Config(msg)) if msg.contains("no MediaBox")
        ));
    }
}
