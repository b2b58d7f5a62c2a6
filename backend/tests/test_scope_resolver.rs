mod helpers;

use roxmltree::Document;

use sab_contents_backend::extractors::parse_item_title;
use sab_contents_backend::scope::{
    is_tag_inner_nested_item, owning_item, scoped_children, tag_has_inner_nested_items, text_content,
};
use helpers::{all_items, item_by_id, pick_me, read_contents_xml};

const PICK_TOP_TITLE: &str = r#"
    <contents>
        <contents-items>
            <contents-item id="1" type="grid">
                <title id="pick-me" lang="default">Correct Title</title>
                <contents-items>
                    <contents-item id="1">
                        <title lang="default">Too Low</title>
                    </contents-item>
                </contents-items>
            </contents-item>
        </contents-items>
    </contents>"#;

const PICK_NESTED_TITLE: &str = r#"
    <contents>
        <contents-items>
            <contents-item id="1" type="grid">
                <title lang="default">Too high</title>
                <contents-items>
                    <contents-item id="1">
                        <title id="pick-me" lang="default">Correct Title</title>
                    </contents-item>
                </contents-items>
            </contents-item>
        </contents-items>
    </contents>"#;

#[test]
fn test_is_tag_inner_nested_item_none() {
    assert!(!is_tag_inner_nested_item(None));
}

#[test]
fn test_is_tag_inner_nested_item_top_level_contents() {
    let doc = Document::parse("<contents></contents>").unwrap();
    assert!(!is_tag_inner_nested_item(Some(doc.root_element())));
}

#[test]
fn test_is_tag_inner_nested_item_false_for_container_title() {
    let doc = Document::parse(PICK_TOP_TITLE).unwrap();
    let title = pick_me(&doc);
    assert_eq!(text_content(title), "Correct Title");
    assert!(!is_tag_inner_nested_item(Some(title)));
}

#[test]
fn test_is_tag_inner_nested_item_true_for_nested_title() {
    let doc = Document::parse(PICK_NESTED_TITLE).unwrap();
    let title = pick_me(&doc);
    assert_eq!(text_content(title), "Correct Title");
    assert!(is_tag_inner_nested_item(Some(title)));
}

#[test]
fn test_tag_has_inner_nested_items_none() {
    assert!(!tag_has_inner_nested_items(None));
}

#[test]
fn test_tag_has_inner_nested_items_for_grid_parent() {
    let doc = Document::parse(PICK_TOP_TITLE).unwrap();
    let grid = pick_me(&doc).parent_element();
    assert!(tag_has_inner_nested_items(grid));
}

#[test]
fn test_tag_has_inner_nested_items_false_for_nested_parent() {
    let doc = Document::parse(PICK_NESTED_TITLE).unwrap();
    let nested = pick_me(&doc).parent_element();
    assert!(!tag_has_inner_nested_items(nested));
}

#[test]
fn test_container_title_is_its_own_despite_repeated_id() {
    let doc = Document::parse(PICK_NESTED_TITLE).unwrap();
    let items = all_items(&doc);
    let (grid, nested) = (items[0], items[1]);
    assert_eq!(grid.attribute("id"), nested.attribute("id"));

    let title = parse_item_title(Some(grid), tag_has_inner_nested_items(Some(grid)));
    assert_eq!(title.default_value(), Some("Too high"));

    let nested_title = parse_item_title(Some(nested), tag_has_inner_nested_items(Some(nested)));
    assert_eq!(nested_title.default_value(), Some("Correct Title"));

    assert_eq!(owning_item(pick_me(&doc)), Some(nested));
}

#[test]
fn test_has_inner_nested_items_matches_descendant_items() {
    let xml = read_contents_xml();
    let doc = Document::parse(&xml).unwrap();

    for item in all_items(&doc) {
        let has_descendant_items = item.descendants().skip(1).any(|n| n.has_tag_name("contents-item"));
        assert_eq!(
            has_descendant_items,
            tag_has_inner_nested_items(Some(item)),
            "Item {:?} nested-item detection disagrees with descendant search",
            item.attribute("id")
        );
    }
}

#[test]
fn test_scoped_features_do_not_leak_from_nested_items() {
    let xml = read_contents_xml();
    let doc = Document::parse(&xml).unwrap();
    let grid = item_by_id(&doc, "3");

    let blocks = scoped_children(grid, "features");
    assert_eq!(blocks.len(), 1);

    let links = scoped_children(grid, "link");
    assert!(links.is_empty(), "Grid must not own the links of its nested items");
}
