//! Load, export, listeners and history through the editor handle

use folio_codec::CANONICAL_EMPTY_DOCUMENT;
use folio_document::{Fragment, MediaKind, Selection};
use folio_editor::{Command, Editor, EditorConfig, EditorError};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_malformed_input_loads_minimum_document() {
    let mut editor = Editor::default();
    for input in ["", "{not json", r#"{"root":"nope"}"#] {
        editor.load(input);
        assert_eq!(editor.export(), CANONICAL_EMPTY_DOCUMENT, "input: {input:?}");
    }
}

#[test]
fn test_legacy_plain_text_loads_as_paragraph() {
    let mut editor = Editor::default();
    editor.load("Remember the milk");

    assert_eq!(
        editor.export(),
        r#"{"root":{"children":[{"type":"paragraph","version":1,"children":[{"type":"text","version":1,"text":"Remember the milk","format":0}]}]}}"#
    );
}

#[test]
fn test_unknown_nodes_survive_editing() -> anyhow::Result<()> {
    let stored = r#"{"root":{"children":[{"type":"futureWidget","version":3,"mode":"compact","children":[{"type":"text","version":1,"text":"x","format":0}]}]}}"#;
    let mut editor = Editor::default();
    editor.try_load(stored)?;

    assert!(editor.insert_media(MediaKind::Image, "/after.png"));
    assert!(editor.dispatch(Command::Undo));

    assert_eq!(editor.export(), stored);
    Ok(())
}

#[test]
fn test_try_load_reports_codec_errors() {
    let mut editor = Editor::default();
    let result = editor.try_load("{]");
    assert!(matches!(result, Err(EditorError::Codec(_))));
    assert_eq!(editor.export(), CANONICAL_EMPTY_DOCUMENT);
}

#[test]
fn test_change_listener_receives_exported_json() {
    let mut editor = Editor::default();
    let received = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = received.clone();
    editor.set_change_listener(move |json| sink.borrow_mut().push(json.to_string()));

    editor.insert_media(MediaKind::Video, "/clip.mp4");

    let received = received.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], editor.export());
    assert!(received[0].contains(r#""type":"video""#));
}

#[test]
fn test_update_listener_once_per_transaction() {
    let mut editor = Editor::default();
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    let id = editor.register_update_listener(move |tree, commit| {
        assert!(!tree.children(tree.root()).is_empty());
        if commit.changed {
            *counter.borrow_mut() += 1;
        }
    });

    editor.update(|txn| {
        for i in 0..5 {
            txn.append_to_root(Fragment::paragraph(vec![Fragment::text(format!("{}", i))]))
                .unwrap();
        }
    });
    assert_eq!(*calls.borrow(), 1);

    assert!(editor.remove_listener(id));
    editor.update(|txn| {
        txn.append_to_root(Fragment::line_break()).unwrap();
    });
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_selection_listener_fires_on_selection_change_only() {
    let mut editor = Editor::default();
    let seen = Rc::new(RefCell::new(Vec::<Option<Selection>>::new()));
    let sink = seen.clone();
    editor.register_selection_listener(move |selection| sink.borrow_mut().push(selection));

    editor.update(|txn| {
        txn.append_to_root(Fragment::line_break()).unwrap();
    });
    assert!(seen.borrow().is_empty());

    editor.insert_media(MediaKind::Image, "/a.png");
    let image = editor.tree().children(editor.tree().root())[2];
    assert_eq!(*seen.borrow(), vec![Some(Selection::node(image))]);
}

#[test]
fn test_undo_redo_and_history_limits() {
    let mut editor = Editor::new(EditorConfig {
        history_max_levels: 2,
        ..Default::default()
    });
    let empty = editor.export();

    for src in ["/1.png", "/2.png", "/3.png"] {
        assert!(editor.insert_media(MediaKind::Image, src));
    }
    assert_eq!(editor.context().history().undo_levels(), 2);
    let full = editor.export();

    assert!(editor.dispatch(Command::Undo));
    assert!(editor.dispatch(Command::Undo));
    assert!(!editor.dispatch(Command::Undo));
    assert_ne!(editor.export(), empty);
    assert!(!editor.export().contains("/2.png"));

    assert!(editor.dispatch(Command::Redo));
    assert!(editor.dispatch(Command::Redo));
    assert!(!editor.dispatch(Command::Redo));
    assert_eq!(editor.export(), full);
}

#[test]
fn test_new_edit_after_undo_clears_redo() {
    let mut editor = Editor::default();
    editor.insert_media(MediaKind::Image, "/a.png");
    editor.dispatch(Command::Undo);
    assert!(editor.context().history().can_redo());

    editor.insert_media(MediaKind::Image, "/b.png");
    assert!(!editor.context().history().can_redo());
}

#[test]
fn test_load_resets_history() {
    let mut editor = Editor::default();
    editor.insert_media(MediaKind::Image, "/a.png");
    editor.load(CANONICAL_EMPTY_DOCUMENT);

    assert!(!editor.dispatch(Command::Undo));
    assert_eq!(editor.export(), CANONICAL_EMPTY_DOCUMENT);
}

#[test]
fn test_editors_do_not_share_state() {
    let mut first = Editor::default();
    let second = Editor::default();
    first.insert_media(MediaKind::Image, "/a.png");

    assert_ne!(first.export(), second.export());
    assert_eq!(second.export(), CANONICAL_EMPTY_DOCUMENT);
}
