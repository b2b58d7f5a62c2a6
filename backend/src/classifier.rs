use roxmltree::Node;

use crate::extractors::{parse_item_id, parse_item_type};
use crate::logger::warn;
use crate::scope::tag_has_inner_nested_items;
use crate::types::ItemKind;

/// Final kind of an item, consistent with whether it owns nested items.
///
/// Grids and carousels always own nested items and nothing else does: a
/// declared container with no nested items becomes `Single`, and any other
/// kind that has nested items becomes `Grid`. Both corrections are warned.
pub fn classify_item(item: Option<Node>) -> Option<ItemKind> {
    let has_nested = tag_has_inner_nested_items(item);
    let kind = parse_item_type(item, has_nested)?;
    Some(reconcile_kind(kind, has_nested, parse_item_id(item)))
}

pub fn reconcile_kind(kind: ItemKind, has_nested: bool, id: i64) -> ItemKind {
    match (kind.is_container(), has_nested) {
        (true, false) => {
            warn(&format!("Item {} is declared '{}' but has no nested items, using 'single'", id, kind));
            ItemKind::Single
        }
        (false, true) => {
            warn(&format!("Item {} is declared '{}' but has nested items, using 'grid'", id, kind));
            ItemKind::Grid
        }
        _ => kind,
    }
}
