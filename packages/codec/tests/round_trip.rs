//! Export/import stability over whole documents

use folio_codec::{export_string, import, import_tree, load};
use folio_document::{DocumentTree, NodeKind};

const RICH_DOCUMENT: &str = r#"{"root":{"children":[
    {"type":"heading","version":1,"tag":"h1","children":[{"type":"text","version":1,"text":"Trip notes","format":0}]},
    {"type":"paragraph","version":1,"children":[
        {"type":"text","version":1,"text":"Day ","format":1},
        {"type":"link","version":1,"url":"https://example.com/day-one","children":[
            {"type":"text","version":1,"text":"one","format":2}
        ]},
        {"type":"linebreak","version":1}
    ]},
    {"type":"image","version":1,"src":"/beach.jpg","altText":"Beach","width":300,"height":200,"showCaption":true,"caption":"Sunset"},
    {"type":"list","version":1,"listType":"bullet","start":1,"children":[
        {"type":"listitem","version":1,"children":[{"type":"text","version":1,"text":"Sunscreen","format":0}]}
    ]},
    {"type":"poll","version":4,"question":"Again?","options":["yes","no"]},
    {"type":"video","version":1,"src":"/waves.mp4","altText":"","width":"auto","height":"auto","showCaption":false,"caption":""}
]}}"#;

#[test]
fn test_export_is_a_fixed_point_after_one_import() {
    let first = export_string(&import_tree(RICH_DOCUMENT));
    let second = export_string(&import_tree(&first));
    assert_eq!(first, second);
}

#[test]
fn test_unknown_node_survives_verbatim() {
    let exported = export_string(&import_tree(RICH_DOCUMENT));
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let poll = &value["root"]["children"][4];

    assert_eq!(poll["type"], "poll");
    assert_eq!(poll["version"], 4);
    assert_eq!(poll["question"], "Again?");
    assert_eq!(poll["options"], serde_json::json!(["yes", "no"]));
    assert!(poll.get("children").is_none());
}

#[test]
fn test_list_alias_is_normalized_on_export() {
    let exported = export_string(&import_tree(RICH_DOCUMENT));
    assert!(exported.contains(r#""listType":"unordered""#));
    assert!(!exported.contains("bullet"));
}

#[test]
fn test_key_assignment_does_not_affect_export() {
    let mut tree = DocumentTree::new();
    let paragraph = tree.children(tree.root())[0];
    {
        let mut txn = tree.begin();
        txn.remove(paragraph).unwrap();
        txn.replace_contents(import(RICH_DOCUMENT));
        txn.commit();
    }

    assert_eq!(export_string(&tree), export_string(&import_tree(RICH_DOCUMENT)));
}

#[test]
fn test_legacy_text_loads_as_single_paragraph() {
    let tree = DocumentTree::from_fragments(load("Plain old note"));
    let paragraph = tree.children(tree.root())[0];

    assert_eq!(tree.get(paragraph).unwrap().kind, NodeKind::Paragraph);
    assert_eq!(tree.text_content(), "Plain old note");
}
