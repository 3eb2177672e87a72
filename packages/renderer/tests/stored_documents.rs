//! Rendering documents produced by the codec

use folio_codec::{export_string, import_tree};
use folio_document::{
    Dimension, DocumentTree, Fragment, HeadingLevel, ListType, MediaAttributes, TextFormat,
};
use folio_renderer::render;

#[test]
fn test_render_is_independent_of_construction_order() {
    let direct = DocumentTree::from_fragments(vec![
        Fragment::heading(HeadingLevel::H1, vec![Fragment::text("Title")]),
        Fragment::paragraph(vec![Fragment::formatted_text("bold", TextFormat::Bold.into())]),
    ]);

    let mut built = DocumentTree::new();
    let first = built.children(built.root())[0];
    {
        let mut txn = built.begin();
        let heading = txn
            .insert_before(
                first,
                Fragment::heading(HeadingLevel::H1, vec![Fragment::text("Title")]),
            )
            .unwrap();
        txn.insert_after(
            heading,
            Fragment::paragraph(vec![Fragment::formatted_text("bold", TextFormat::Bold.into())]),
        )
        .unwrap();
        txn.remove(first).unwrap();
        txn.commit();
    }

    let html = render(&export_string(&direct));
    assert_eq!(html, render(&export_string(&built)));
    assert_eq!(html, "<h1>Title</h1><p><strong>bold</strong></p>");
}

#[test]
fn test_render_after_round_trip() {
    let tree = DocumentTree::from_fragments(vec![
        Fragment::list(
            ListType::Ordered,
            vec![
                Fragment::list_item(vec![Fragment::text("one")]),
                Fragment::list_item(vec![Fragment::text("two")]),
            ],
        ),
        Fragment::image(
            MediaAttributes::new("/p.png")
                .with_alt_text("Photo")
                .with_size(Dimension::Px(120.0), Dimension::Px(80.0)),
        ),
    ]);
    let stored = export_string(&import_tree(&export_string(&tree)));

    assert_eq!(
        render(&stored),
        r#"<ol><li>one</li><li>two</li></ol><img src="/p.png" alt="Photo" width="120" height="80" />"#
    );
}
