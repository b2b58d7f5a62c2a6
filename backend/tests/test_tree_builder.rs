mod helpers;

use std::path::PathBuf;

use roxmltree::Document;

use sab_contents_backend::assets::{AssetContext, LocalFs, MemoryFs};
use sab_contents_backend::classifier::classify_item;
use sab_contents_backend::config::{BookCollection, BookConfig, ScriptureConfig};
use sab_contents_backend::tree_builder::{build_contents, check_links};
use sab_contents_backend::types::{ContentsData, ItemKind, LinkType};
use sab_contents_backend::ContentsError;
use helpers::{contents_dir, read_contents_xml};

fn build_fixture() -> ContentsData {
    let xml = read_contents_xml();
    let doc = Document::parse(&xml).unwrap();
    let dir = contents_dir();
    let dest = PathBuf::from("static/contents");
    let assets = AssetContext::new(&dir, Some(dest.as_path()), &LocalFs);
    build_contents(&doc, &assets, None).unwrap()
}

#[test]
fn test_top_level_items_in_order() {
    let data = build_fixture();
    let ids: Vec<i64> = data.items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let kinds: Vec<&ItemKind> = data.items.iter().map(|i| &i.kind).collect();
    assert_eq!(
        kinds,
        vec![&ItemKind::Heading, &ItemKind::Single, &ItemKind::Grid, &ItemKind::Carousel, &ItemKind::Single]
    );
}

#[test]
fn test_containers_own_children_and_nothing_else_does() {
    let data = build_fixture();
    for item in data.all_items() {
        assert_eq!(
            item.kind.is_container(),
            !item.children.is_empty(),
            "Item {} ({}) has {} children",
            item.id,
            item.kind,
            item.children.len()
        );
    }

    let grid = &data.items[2];
    let child_titles: Vec<&str> = grid.children.iter().filter_map(|c| c.title.default_value()).collect();
    assert_eq!(child_titles, vec!["Matthew", "Mark"]);
    assert_eq!(grid.title.default_value(), Some("Gospels Grid"));
    assert!(grid.link.is_empty());
}

#[test]
fn test_nested_item_fields_are_resolved() {
    let data = build_fixture();
    let grid = &data.items[2];
    let matthew = &grid.children[0];
    assert_eq!(matthew.id, 1);
    assert_eq!(matthew.link.link_type, Some(LinkType::Reference));
    assert_eq!(matthew.link.link_target.as_deref(), Some("MAT.1.1"));
    assert!(matthew.image.as_deref().is_some_and(|p| p.ends_with("matthew.jpg")));

    // Image file missing on disk
    let mark = &grid.children[1];
    assert_eq!(mark.image, None);
}

#[test]
fn test_document_level_data() {
    let data = build_fixture();
    assert_eq!(data.title.default_value(), Some("Contents"));
    assert_eq!(data.title.get("tpi"), Some("Ol Samting"));
    assert_eq!(data.features.get("show-titles").map(String::as_str), Some("true"));

    assert_eq!(data.screens.len(), 2);
    assert_eq!(data.screens[0].items, vec![1, 2, 3, 4]);
    assert_eq!(data.screen(2).and_then(|s| s.title.default_value()), Some("Gospels"));
}

#[test]
fn test_classifier_corrects_inconsistent_kinds() {
    let doc = Document::parse(
        r#"<contents>
            <contents-items>
                <contents-item id="1" type="grid"><title>Empty grid</title></contents-item>
                <contents-item id="2" type="heading">
                    <contents-items><contents-item id="3"/></contents-items>
                </contents-item>
                <contents-item id="4"/>
            </contents-items>
        </contents>"#,
    ).unwrap();
    let items: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("contents-item")).collect();

    assert_eq!(classify_item(Some(items[0])), Some(ItemKind::Single));
    assert_eq!(classify_item(Some(items[1])), Some(ItemKind::Grid));
    assert_eq!(classify_item(Some(items[3])), Some(ItemKind::Single));
    assert_eq!(classify_item(None), None);

    let fs = MemoryFs::new();
    let dir = PathBuf::from("data/contents");
    let assets = AssetContext::new(&dir, None, &fs);
    let data = build_contents(&doc, &assets, None).unwrap();
    assert!(data.items[0].children.is_empty());
    assert_eq!(data.items[1].children.len(), 1);
    assert_eq!(data.items[1].children[0].id, 3);
}

#[test]
fn test_wrong_root_is_an_error() {
    let doc = Document::parse("<menu/>").unwrap();
    let fs = MemoryFs::new();
    let dir = PathBuf::from("data/contents");
    let assets = AssetContext::new(&dir, None, &fs);
    match build_contents(&doc, &assets, None) {
        Err(ContentsError::MissingRoot(name)) => assert_eq!(name, "menu"),
        other => panic!("Expected MissingRoot, got {:?}", other),
    }
}

#[test]
fn test_check_links_fixture_is_clean() {
    let data = build_fixture();
    let issues = check_links(&data, None);
    assert!(issues.is_empty(), "Unexpected link issues: {:?}", issues);
}

#[test]
fn test_check_links_reports_unknown_books_and_screens() {
    let doc = Document::parse(
        r#"<contents>
            <screens><screen id="1"><title>Main</title></screen></screens>
            <contents-items>
                <contents-item id="1"><link type="reference" target="JHN.3.16"/></contents-item>
                <contents-item id="2"><link type="screen" target="9"/></contents-item>
                <contents-item id="3"><link type="reference" target="MRK.1.1"/></contents-item>
                <contents-item id="4"><link type="reference" target="Mark 1"/></contents-item>
            </contents-items>
        </contents>"#,
    ).unwrap();
    let fs = MemoryFs::new();
    let dir = PathBuf::from("data/contents");
    let assets = AssetContext::new(&dir, None, &fs);
    let data = build_contents(&doc, &assets, None).unwrap();

    let config = ScriptureConfig {
        name: None,
        book_collections: vec![BookCollection {
            id: "C01".to_string(),
            books: vec![BookConfig { id: "MRK".to_string(), name: None }],
        }],
    };

    let issues = check_links(&data, Some(&config));
    let ids: Vec<i64> = issues.iter().map(|i| i.item_id).collect();
    assert_eq!(ids, vec![1, 2, 4]);

    // Without a config, book ids are not checked.
    let ids: Vec<i64> = check_links(&data, None).iter().map(|i| i.item_id).collect();
    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn test_json_output_shape() {
    let data = build_fixture();
    let json = serde_json::to_value(&data).unwrap();

    let single = &json["items"][1];
    assert_eq!(single["type"], "single");
    assert_eq!(single["title"]["default"], "Single Item 2");
    assert_eq!(single["link"]["linkType"], "screen");
    assert_eq!(single["audio"]["tpi"], "static/contents/welcome-tpi.mp3");

    let heading = &json["items"][0];
    assert_eq!(heading["layoutCollection"][1], "C02");
    assert!(heading.get("link").is_none());
    assert!(heading.get("children").is_none());

    let none_link = &json["items"][3]["children"][1]["link"];
    assert_eq!(none_link, &serde_json::json!({"linkType": "none"}));
}
