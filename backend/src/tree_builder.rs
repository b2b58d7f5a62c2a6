//! Builds the typed contents tree from a parsed `contents.xml`.

use std::collections::HashSet;

use roxmltree::{Document, Node};

use crate::assets::AssetContext;
use crate::classifier::classify_item;
use crate::config::ScriptureConfig;
use crate::error::{ContentsError, Result};
use crate::extractors::{
    collect_features, parse_item_audio, parse_item_features, parse_item_id, parse_item_image,
    parse_item_layout_collection, parse_item_layout_mode, parse_item_subtitle, parse_item_title,
    TAG_FEATURES, TAG_TITLE,
};
use crate::lang_container::build_lang_container;
use crate::link::{parse_item_link, validate_link, LinkError};
use crate::logger::{debug, warn};
use crate::scope::{child_elements, is_item, nested_items, tag_has_inner_nested_items, TAG_CONTENTS, TAG_ITEMS};
use crate::types::{ContentItem, ContentsData, ContentsScreen, Features, ItemKind, LinkType};

pub const TAG_SCREENS: &str = "screens";
pub const TAG_SCREEN: &str = "screen";
pub const TAG_SCREEN_ITEMS: &str = "items";
pub const TAG_SCREEN_ITEM: &str = "item";

/// Builds one item and, for grids and carousels, its nested items.
pub fn build_item(node: Node, assets: &AssetContext, config: Option<&ScriptureConfig>) -> ContentItem {
    let has_nested = tag_has_inner_nested_items(Some(node));
    let id = parse_item_id(Some(node));

    if id == 0 {
        warn(&format!("contents-item without a valid id: {:?}", node.attribute("id")));
    }

    // classify_item only returns None for a missing item
    let kind = classify_item(Some(node)).unwrap_or(ItemKind::Single);

    let children = if kind.is_container() {
        nested_items(node)
            .into_iter()
            .map(|child| build_item(child, assets, config))
            .collect()
    } else {
        Vec::new()
    };

    debug(&format!("Built item {} ({}) with {} children", id, kind, children.len()));

    ContentItem {
        id,
        kind,
        title: parse_item_title(Some(node), has_nested),
        subtitle: parse_item_subtitle(Some(node)),
        features: parse_item_features(Some(node)),
        image: parse_item_image(Some(node), assets),
        audio: parse_item_audio(Some(node), assets),
        link: parse_item_link(Some(node), config),
        layout_mode: parse_item_layout_mode(Some(node)),
        layout_collection: parse_item_layout_collection(Some(node)),
        children,
    }
}

/// Builds every item of a `contents-items` list, in order.
pub fn build_items(items: Node, assets: &AssetContext, config: Option<&ScriptureConfig>) -> Vec<ContentItem> {
    items
        .children()
        .filter(|n| is_item(*n))
        .map(|n| build_item(n, assets, config))
        .collect()
}

fn build_screen(node: Node) -> ContentsScreen {
    let id = node.attribute("id")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0);

    let items = child_elements(node, TAG_SCREEN_ITEMS)
        .flat_map(|list| child_elements(list, TAG_SCREEN_ITEM))
        .filter_map(|item| item.attribute("id").and_then(|v| v.trim().parse::<i64>().ok()))
        .filter(|id| *id != 0)
        .collect();

    ContentsScreen {
        id,
        title: build_lang_container(child_elements(node, TAG_TITLE)),
        items,
    }
}

/// Builds the whole contents tree from the `<contents>` root.
pub fn build_contents(doc: &Document, assets: &AssetContext, config: Option<&ScriptureConfig>) -> Result<ContentsData> {
    let root = doc.root_element();
    if !root.has_tag_name(TAG_CONTENTS) {
        return Err(ContentsError::MissingRoot(root.tag_name().name().to_string()));
    }

    let mut features = Features::new();
    for block in child_elements(root, TAG_FEATURES) {
        collect_features(block, &mut features);
    }

    let items = child_elements(root, TAG_ITEMS)
        .flat_map(|list| build_items(list, assets, config))
        .collect();

    let screens = child_elements(root, TAG_SCREENS)
        .flat_map(|list| child_elements(list, TAG_SCREEN))
        .map(build_screen)
        .collect();

    Ok(ContentsData {
        title: build_lang_container(child_elements(root, TAG_TITLE)),
        features,
        items,
        screens,
    })
}

/// A link problem found after the tree is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkIssue {
    pub item_id: i64,
    pub message: String,
}

/// Validates every link in the tree. Screen links must also point at a
/// declared screen when the export has any screens. Each issue is warned.
pub fn check_links(data: &ContentsData, config: Option<&ScriptureConfig>) -> Vec<LinkIssue> {
    let screen_ids: HashSet<i64> = data.screens.iter().map(|s| s.id).collect();
    let mut issues = Vec::new();

    for item in data.all_items() {
        let message = match validate_link(&item.link, config) {
            Err(e) => Some(e.to_string()),
            Ok(()) if item.link.link_type == Some(LinkType::Screen) && !screen_ids.is_empty() => {
                let target = item.link.link_target.as_deref().unwrap_or("");
                match target.parse::<i64>() {
                    Ok(id) if screen_ids.contains(&id) => None,
                    _ => Some(LinkError::UnknownScreen(target.to_string()).to_string()),
                }
            }
            Ok(()) => None,
        };

        if let Some(message) = message {
            warn(&format!("Item {}: {}", item.id, message));
            issues.push(LinkIssue { item_id: item.id, message });
        }
    }

    issues
}
