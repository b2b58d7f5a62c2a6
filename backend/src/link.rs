use lazy_static::lazy_static;
use regex::Regex;
use roxmltree::Node;
use thiserror::Error;

use crate::config::ScriptureConfig;
use crate::extractors::with_item;
use crate::logger::warn;
use crate::scope::{non_empty_attribute, scoped_first};
use crate::types::{LinkMeta, LinkType};

pub const TAG_LINK: &str = "link";

lazy_static! {
    // MRK.1.1, mat.5.3
    static ref RE_REFERENCE_TARGET: Regex = Regex::new(r"(?i)^([A-Z]{3})\.(\d+)\.(\d+)$").unwrap();
    // Screen targets are screen ids.
    static ref RE_SCREEN_TARGET: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Navigation descriptor of the item's own `link` tag.
///
/// Empty when there is no link, when `type` is blank, or when a type other
/// than `none` comes without a target. The target shape is not checked
/// here, see [`validate_link`]. `config` is accepted for target resolution
/// and currently not consulted.
pub fn parse_item_link(item: Option<Node>, _config: Option<&ScriptureConfig>) -> LinkMeta {
    with_item(item, |node| {
        let Some(link) = scoped_first(node, TAG_LINK) else {
            return LinkMeta::default();
        };
        let Some(link_type) = non_empty_attribute(link, "type").map(LinkType::from) else {
            return LinkMeta::default();
        };
        let link_target = non_empty_attribute(link, "target").map(str::to_string);

        if link_type != LinkType::None && link_target.is_none() {
            warn(&format!(
                "Link of type '{}' without a target on item {}",
                link_type,
                node.attribute("id").unwrap_or("?")
            ));
            return LinkMeta::default();
        }

        LinkMeta {
            link_type: Some(link_type),
            link_target,
            link_location: non_empty_attribute(link, "location").map(str::to_string),
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTargetShape {
    /// `BOOK.chapter.verse`
    Reference,
    /// Numeric screen id.
    Screen,
    Unknown,
}

pub fn link_target_shape(target: &str) -> LinkTargetShape {
    if RE_REFERENCE_TARGET.is_match(target) {
        LinkTargetShape::Reference
    } else if RE_SCREEN_TARGET.is_match(target) {
        LinkTargetShape::Screen
    } else {
        LinkTargetShape::Unknown
    }
}

/// A scripture reference split from a `reference` link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTarget {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

pub fn parse_reference_target(target: &str) -> Option<ReferenceTarget> {
    let caps = RE_REFERENCE_TARGET.captures(target)?;
    Some(ReferenceTarget {
        book: caps[1].to_uppercase(),
        chapter: caps[2].parse().ok()?,
        verse: caps[3].parse().ok()?,
    })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("link of type '{0}' has no target")]
    MissingTarget(String),
    #[error("reference target '{0}' is not BOOK.chapter.verse")]
    BadReference(String),
    #[error("screen target '{0}' is not a screen id")]
    BadScreen(String),
    #[error("screen target '{0}' does not match any screen")]
    UnknownScreen(String),
    #[error("reference target '{target}' names unknown book '{book}'")]
    UnknownBook { target: String, book: String },
}

/// Checks that a link's target has the shape its type requires.
///
/// `url`, `none` and unrecognised types are not shape-checked. When the
/// config lists books, a reference must name one of them.
pub fn validate_link(link: &LinkMeta, config: Option<&ScriptureConfig>) -> Result<(), LinkError> {
    let Some(link_type) = &link.link_type else {
        return Ok(());
    };
    if *link_type == LinkType::None {
        return Ok(());
    }
    let target = link.link_target.as_deref().unwrap_or("");
    if target.is_empty() {
        return Err(LinkError::MissingTarget(link_type.to_string()));
    }

    match link_type {
        LinkType::Reference => {
            let reference = parse_reference_target(target)
                .ok_or_else(|| LinkError::BadReference(target.to_string()))?;
            if let Some(config) = config.filter(|c| c.has_books()) {
                if !config.has_book(&reference.book) {
                    return Err(LinkError::UnknownBook {
                        target: target.to_string(),
                        book: reference.book,
                    });
                }
            }
            Ok(())
        }
        LinkType::Screen => {
            if link_target_shape(target) == LinkTargetShape::Screen {
                Ok(())
            } else {
                Err(LinkError::BadScreen(target.to_string()))
            }
        }
        _ => Ok(()),
    }
}
