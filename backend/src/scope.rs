//! Ownership of tags inside `contents.xml`.
//!
//! The export reuses the same tag names (`title`, `link`, `features`, ...)
//! and even the same `id` values at every nesting depth, so a plain
//! descendant search from a grid item would also return the fields of its
//! nested items. Every lookup here decides ownership by the position of the
//! node in the tree: a tag belongs to the nearest `contents-item` above it,
//! compared by node identity.

use roxmltree::Node;

pub const TAG_CONTENTS: &str = "contents";
pub const TAG_ITEMS: &str = "contents-items";
pub const TAG_ITEM: &str = "contents-item";

pub fn is_item(node: Node) -> bool {
    node.is_element() && node.has_tag_name(TAG_ITEM)
}

/// The nearest strict ancestor `contents-item` of `node`.
pub fn owning_item<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.ancestors().skip(1).find(|n| is_item(*n))
}

/// True if `candidate` is owned by `item` and not by one of its nested items.
pub fn belongs_to_item(candidate: Node, item: Node) -> bool {
    owning_item(candidate).is_some_and(|owner| owner == item)
}

/// Elements named `tag` that belong to `item` itself, in document order.
pub fn scoped_children<'a, 'input>(item: Node<'a, 'input>, tag: &str) -> Vec<Node<'a, 'input>> {
    item.descendants()
        .filter(|n| n.is_element() && n.has_tag_name(tag))
        .filter(|n| belongs_to_item(*n, item))
        .collect()
}

/// First element named `tag` belonging to `item`.
pub fn scoped_first<'a, 'input>(item: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    item.descendants()
        .filter(|n| n.is_element() && n.has_tag_name(tag))
        .find(|n| belongs_to_item(*n, item))
}

/// Direct element children of `node` named `tag`.
pub fn child_elements<'a, 'input>(node: Node<'a, 'input>, tag: &'a str) -> impl Iterator<Item = Node<'a, 'input>> + 'a
where
    'input: 'a,
{
    node.children().filter(move |n| n.is_element() && n.has_tag_name(tag))
}

/// Number of `contents-item` elements on the path from the root to `node`,
/// counting `node` itself.
pub fn item_depth(node: Node) -> usize {
    node.ancestors().filter(|n| is_item(*n)).count()
}

/// True if `candidate` sits inside an item that is itself nested in another
/// item. Fields of a top-level item, the `contents` root and `None` are all
/// false.
pub fn is_tag_inner_nested_item(candidate: Option<Node>) -> bool {
    match candidate {
        Some(node) => item_depth(node) >= 2,
        None => false,
    }
}

/// True if `item` has a `contents-items` child holding at least one
/// `contents-item`.
pub fn tag_has_inner_nested_items(item: Option<Node>) -> bool {
    let Some(item) = item else {
        return false;
    };
    child_elements(item, TAG_ITEMS).any(|wrapper| child_elements(wrapper, TAG_ITEM).next().is_some())
}

/// The items directly nested under `item` through its `contents-items` wrappers.
pub fn nested_items<'a, 'input>(item: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    child_elements(item, TAG_ITEMS)
        .flat_map(|wrapper| wrapper.children().filter(|n| is_item(*n)))
        .collect()
}

/// Concatenated text content of an element, trimmed.
pub fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Attribute lookup with a case-insensitive name.
pub fn attribute_ci<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name().eq_ignore_ascii_case(name))
        .map(|a| a.value())
}

/// Trimmed, non-empty attribute value.
pub fn non_empty_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).map(str::trim).filter(|v| !v.is_empty())
}
