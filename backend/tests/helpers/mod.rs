use std::path::PathBuf;

use roxmltree::{Document, Node};

use sab_contents_backend::scope::is_item;

#[allow(dead_code)]
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

#[allow(dead_code)]
pub fn contents_dir() -> PathBuf {
    data_dir().join("contents")
}

#[allow(dead_code)]
pub fn read_contents_xml() -> String {
    std::fs::read_to_string(data_dir().join("contents.xml")).expect("Failed to read tests/data/contents.xml")
}

/// Every `contents-item` in document order, nested ones included.
#[allow(dead_code)]
pub fn all_items<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    doc.descendants().filter(|n| is_item(*n)).collect()
}

/// First item, in document order, whose own `id` attribute is `id`.
#[allow(dead_code)]
pub fn item_by_id<'a, 'input>(doc: &'a Document<'input>, id: &str) -> Node<'a, 'input> {
    all_items(doc)
        .into_iter()
        .find(|n| n.attribute("id") == Some(id))
        .unwrap_or_else(|| panic!("No contents-item with id {}", id))
}

/// Element carrying the test-only marker attribute `id="pick-me"` on a non-item tag.
#[allow(dead_code)]
pub fn pick_me<'a, 'input>(doc: &'a Document<'input>) -> Node<'a, 'input> {
    doc.descendants()
        .find(|n| n.is_element() && !is_item(*n) && n.attribute("id") == Some("pick-me"))
        .expect("No pick-me element")
}
