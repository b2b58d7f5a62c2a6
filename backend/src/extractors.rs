//! Per-field extraction from a single `contents-item`.
//!
//! Every extractor accepts an optional node and degrades to the empty value
//! of its result type when the node is missing or is not an element. That
//! guard lives in [`with_item`] and nowhere else.

use roxmltree::Node;

use crate::assets::AssetContext;
use crate::lang_container::{build_lang_container, build_lang_container_with};
use crate::logger::warn;
use crate::scope::{child_elements, non_empty_attribute, scoped_children, scoped_first, text_content};
use crate::types::{Features, ItemKind, LangContainer};

pub const TAG_TITLE: &str = "title";
pub const TAG_SUBTITLE: &str = "subtitle";
pub const TAG_FEATURES: &str = "features";
pub const TAG_FEATURE: &str = "feature";
pub const TAG_IMAGE_FILENAME: &str = "image-filename";
pub const TAG_AUDIO: &str = "audio";
pub const TAG_FILENAME: &str = "filename";
pub const TAG_LAYOUT: &str = "layout";
pub const TAG_LAYOUT_COLLECTION: &str = "layout-collection";

/// Runs `f` on the item if it is present and is an element, otherwise
/// returns the default value of `T`.
pub fn with_item<'a, 'input, T, F>(item: Option<Node<'a, 'input>>, f: F) -> T
where
    T: Default,
    F: FnOnce(Node<'a, 'input>) -> T,
{
    match item {
        Some(node) if node.is_element() => f(node),
        _ => T::default(),
    }
}

/// Integer `id` attribute, `0` when absent or not a number.
pub fn parse_item_id(item: Option<Node>) -> i64 {
    with_item(item, |node| {
        node.attribute("id")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0)
    })
}

/// The item's own titles keyed by language.
///
/// Titles of nested items are always skipped, however the nesting is
/// spelled, so the flag only documents what the caller already knows.
pub fn parse_item_title(item: Option<Node>, _has_inner_nested_items: bool) -> LangContainer {
    with_item(item, |node| build_lang_container(scoped_children(node, TAG_TITLE)))
}

pub fn parse_item_subtitle(item: Option<Node>) -> LangContainer {
    with_item(item, |node| build_lang_container(scoped_children(node, TAG_SUBTITLE)))
}

/// Declared or inferred kind of the item.
///
/// An explicit `type` attribute wins, unknown values pass through. Without
/// one the item is a grid if it has nested items and a single otherwise.
pub fn parse_item_type(item: Option<Node>, has_inner_nested_items: bool) -> Option<ItemKind> {
    with_item(item, |node| {
        let kind = match non_empty_attribute(node, "type") {
            Some(t) => ItemKind::from(t),
            None if has_inner_nested_items => ItemKind::Grid,
            None => ItemKind::Single,
        };
        Some(kind)
    })
}

/// `name → value` pairs of the item's `features` blocks. Pairs with an empty
/// side are skipped.
pub fn parse_item_features(item: Option<Node>) -> Features {
    with_item(item, |node| {
        let mut features = Features::new();
        for block in scoped_children(node, TAG_FEATURES) {
            collect_features(block, &mut features);
        }
        features
    })
}

/// Reads the `feature` children of one `features` block into `features`.
pub fn collect_features(block: Node, features: &mut Features) {
    for feature in child_elements(block, TAG_FEATURE) {
        let name = non_empty_attribute(feature, "name");
        let value = non_empty_attribute(feature, "value");
        if let (Some(name), Some(value)) = (name, value) {
            features.insert(name.to_string(), value.to_string());
        }
    }
}

/// Path of the item's image under the contents asset directory.
///
/// `None` when the item has no image, the asset directory is missing or the
/// file itself is missing. A missing file is reported as a warning.
pub fn parse_item_image(item: Option<Node>, assets: &AssetContext) -> Option<String> {
    with_item(item, |node| {
        let filename = scoped_first(node, TAG_IMAGE_FILENAME)
            .map(text_content)
            .filter(|f| !f.is_empty())?;

        if !assets.has_contents_dir() {
            return None;
        }

        if !assets.source_exists(&filename) {
            warn(&format!(
                "Image {} for item {} not found in {}",
                filename,
                parse_item_id(Some(node)),
                assets.contents_dir.display()
            ));
            return None;
        }

        Some(crate::assets::path_to_string(&assets.source_path(&filename)))
    })
}

/// Destination paths of the item's audio files, keyed by language.
///
/// Empty when there is no contents asset directory or no destination.
/// Languages whose source file is missing are dropped with a warning.
pub fn parse_item_audio(item: Option<Node>, assets: &AssetContext) -> LangContainer {
    with_item(item, |node| {
        if !assets.has_contents_dir() || assets.dest().is_none() {
            return LangContainer::default();
        }

        let filenames: Vec<Node> = scoped_children(node, TAG_AUDIO)
            .into_iter()
            .flat_map(|audio| child_elements(audio, TAG_FILENAME))
            .collect();

        build_lang_container_with(filenames, |filename| {
            if !assets.source_exists(filename) {
                warn(&format!(
                    "Audio {} for item {} not found in {}",
                    filename,
                    parse_item_id(Some(node)),
                    assets.contents_dir.display()
                ));
                return None;
            }
            assets.dest_path(filename)
        })
    })
}

/// `mode` attribute of the item's `layout` element.
pub fn parse_item_layout_mode(item: Option<Node>) -> Option<String> {
    with_item(item, |node| {
        scoped_first(node, TAG_LAYOUT)
            .and_then(|layout| non_empty_attribute(layout, "mode"))
            .map(str::to_string)
    })
}

/// Ordered layout collection ids of the item, `None` rather than an empty list.
///
/// Each `layout-collection` contributes its text, or its `id` attribute when
/// the text is blank.
pub fn parse_item_layout_collection(item: Option<Node>) -> Option<Vec<String>> {
    with_item(item, |node| {
        let collection: Vec<String> = scoped_children(node, TAG_LAYOUT)
            .into_iter()
            .flat_map(|layout| child_elements(layout, TAG_LAYOUT_COLLECTION))
            .filter_map(|c| {
                let text = text_content(c);
                if !text.is_empty() {
                    Some(text)
                } else {
                    non_empty_attribute(c, "id").map(str::to_string)
                }
            })
            .collect();

        if collection.is_empty() { None } else { Some(collection) }
    })
}
