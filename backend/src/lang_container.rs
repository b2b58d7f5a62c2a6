use roxmltree::Node;

use crate::logger::debug;
use crate::scope::{attribute_ci, text_content};
use crate::types::{normalize_lang, LangContainer};

/// Language of a tag: its `lang` attribute (any case) lower-cased, or `"default"`.
pub fn tag_lang(node: Node) -> String {
    normalize_lang(attribute_ci(node, "lang"))
}

/// Folds same-named tags into a language container, keyed by their `lang`
/// attribute. Blank tags are skipped and the first value for a language wins.
pub fn build_lang_container<'a, 'input, I>(elements: I) -> LangContainer
where
    'input: 'a,
    I: IntoIterator<Item = Node<'a, 'input>>,
{
    build_lang_container_with(elements, |text| Some(text.to_string()))
}

/// Like [`build_lang_container`], passing each text value through `map`.
/// A `None` from `map` drops that language.
pub fn build_lang_container_with<'a, 'input, I, F>(elements: I, mut map: F) -> LangContainer
where
    'input: 'a,
    I: IntoIterator<Item = Node<'a, 'input>>,
    F: FnMut(&str) -> Option<String>,
{
    let mut container = LangContainer::new();

    for el in elements {
        let text = text_content(el);
        if text.is_empty() {
            continue;
        }
        let lang = tag_lang(el);
        if container.contains_lang(&lang) {
            debug(&format!("Ignoring repeated <{}> for lang '{}'", el.tag_name().name(), lang));
            continue;
        }
        if let Some(value) = map(&text) {
            container.insert(&lang, &value);
        }
    }

    container
}
