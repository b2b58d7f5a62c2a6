use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Language code used when a tag carries no `lang` attribute.
pub const DEFAULT_LANG: &str = "default";

/// Language-keyed values of one text or asset field.
///
/// Keys are lower-cased language codes, values are never empty. An empty
/// container is the same observable state as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LangContainer(BTreeMap<String, String>);

impl LangContainer {
    pub fn new() -> Self {
        LangContainer(BTreeMap::new())
    }

    /// Inserts the value unless it is blank or the language is already set.
    /// Returns true if the value was stored.
    pub fn insert(&mut self, lang: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let lang = normalize_lang(Some(lang));
        if self.0.contains_key(&lang) {
            return false;
        }
        self.0.insert(lang, value.to_string());
        true
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(&lang.to_lowercase()).map(|s| s.as_str())
    }

    pub fn default_value(&self) -> Option<&str> {
        self.get(DEFAULT_LANG)
    }

    /// Value for `lang`, falling back to the `"default"` entry.
    pub fn get_or_default(&self, lang: &str) -> Option<&str> {
        self.get(lang).or_else(|| self.default_value())
    }

    pub fn contains_lang(&self, lang: &str) -> bool {
        self.0.contains_key(&lang.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn langs(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Lower-cases and trims a `lang` value, mapping absent or blank to `"default"`.
pub fn normalize_lang(lang: Option<&str>) -> String {
    match lang.map(str::trim) {
        Some(l) if !l.is_empty() => l.to_lowercase(),
        _ => DEFAULT_LANG.to_string(),
    }
}

/// Arbitrary `name → value` pairs from a `features` block.
pub type Features = BTreeMap<String, String>;

/// Semantic category of a contents item.
///
/// The authoring tool may add new kinds, those are carried in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Single,
    Heading,
    Carousel,
    Grid,
    Other(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Single => "single",
            ItemKind::Heading => "heading",
            ItemKind::Carousel => "carousel",
            ItemKind::Grid => "grid",
            ItemKind::Other(s) => s.as_str(),
        }
    }

    /// Carousels and grids are the only kinds that own nested items.
    pub fn is_container(&self) -> bool {
        matches!(self, ItemKind::Carousel | ItemKind::Grid)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ItemKind::Other(_))
    }
}

impl From<&str> for ItemKind {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "single" => ItemKind::Single,
            "heading" => ItemKind::Heading,
            "carousel" => ItemKind::Carousel,
            "grid" => ItemKind::Grid,
            _ => ItemKind::Other(s.trim().to_string()),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ItemKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ItemKind::from(s.as_str()))
    }
}

/// Navigation type of a link. Unknown values pass through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkType {
    None,
    Reference,
    Screen,
    Url,
    Other(String),
}

impl LinkType {
    pub fn as_str(&self) -> &str {
        match self {
            LinkType::None => "none",
            LinkType::Reference => "reference",
            LinkType::Screen => "screen",
            LinkType::Url => "url",
            LinkType::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for LinkType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "none" => LinkType::None,
            "reference" => LinkType::Reference,
            "screen" => LinkType::Screen,
            "url" => LinkType::Url,
            _ => LinkType::Other(s.trim().to_string()),
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for LinkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LinkType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LinkType::from(s.as_str()))
    }
}

/// Navigation descriptor of an item.
///
/// All fields `None` means the item has no link, which is not the same as
/// `link_type == Some(LinkType::None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_location: Option<String>,
}

impl LinkMeta {
    pub fn is_empty(&self) -> bool {
        self.link_type.is_none() && self.link_target.is_none() && self.link_location.is_none()
    }

    pub fn is_navigable(&self) -> bool {
        matches!(&self.link_type, Some(t) if *t != LinkType::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "LangContainer::is_empty")]
    pub title: LangContainer,
    #[serde(default, skip_serializing_if = "LangContainer::is_empty")]
    pub subtitle: LangContainer,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: Features,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "LangContainer::is_empty")]
    pub audio: LangContainer,
    #[serde(default, skip_serializing_if = "LinkMeta::is_empty")]
    pub link: LinkMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_collection: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentItem>,
}

impl ContentItem {
    /// Depth-first iterator over this item and all of its descendants.
    pub fn walk(&self) -> Vec<&ContentItem> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// A page of the contents menu, referring to items by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsScreen {
    pub id: i64,
    #[serde(default, skip_serializing_if = "LangContainer::is_empty")]
    pub title: LangContainer,
    #[serde(default)]
    pub items: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsData {
    #[serde(default, skip_serializing_if = "LangContainer::is_empty")]
    pub title: LangContainer,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: Features,
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub screens: Vec<ContentsScreen>,
}

impl ContentsData {
    /// All items of the tree in depth-first order.
    pub fn all_items(&self) -> Vec<&ContentItem> {
        self.items.iter().flat_map(|i| i.walk()).collect()
    }

    pub fn screen(&self, id: i64) -> Option<&ContentsScreen> {
        self.screens.iter().find(|s| s.id == id)
    }
}
