//! Built-in command handlers

use crate::commands::{
    BlockType, Command, CommandDispatcher, FORMAT_TEXT, INSERT_IMAGE, INSERT_LIST, INSERT_VIDEO,
    REDO, REMOVE_SELECTED, SET_BLOCK_TYPE, UNDO,
};
use crate::context::EditorContext;
use folio_document::{
    Attribute, Fragment, ListType, MediaKind, NodeKey, NodeKind, Point, Selection, TextFormat,
    Transaction,
};
use tracing::debug;

/// Register every built-in handler at `priority`
pub fn register_builtin_commands(dispatcher: &mut CommandDispatcher, priority: u32) {
    dispatcher.register(INSERT_IMAGE, priority, insert_media);
    dispatcher.register(INSERT_VIDEO, priority, insert_media);
    dispatcher.register(FORMAT_TEXT, priority, |ctx, command| match command {
        Command::FormatText(format) => format_text(ctx, *format),
        _ => false,
    });
    dispatcher.register(SET_BLOCK_TYPE, priority, |ctx, command| match command {
        Command::SetBlockType(block_type) => set_block_type(ctx, *block_type),
        _ => false,
    });
    dispatcher.register(INSERT_LIST, priority, |ctx, command| match command {
        Command::InsertList(list_type) => insert_list(ctx, *list_type),
        _ => false,
    });
    dispatcher.register(REMOVE_SELECTED, priority, |ctx, _| remove_selected(ctx));
    dispatcher.register(UNDO, priority, |ctx, _| ctx.undo());
    dispatcher.register(REDO, priority, |ctx, _| ctx.redo());
}

fn insert_media(ctx: &mut EditorContext, command: &Command) -> bool {
    let (kind, media) = match command {
        Command::InsertImage(media) => (MediaKind::Image, media),
        Command::InsertVideo(media) => (MediaKind::Video, media),
        _ => return false,
    };
    if media.src.trim().is_empty() {
        debug!(command = command.id(), "Ignoring media insert without src");
        return false;
    }

    let fragment = Fragment::media(kind, media.clone());
    ctx.update(|txn| txn.insert_at_selection(fragment).is_ok())
}

/// What a format command applies to
#[derive(Clone, Copy)]
enum FormatTarget {
    Range(Point, Point),
    Subtree(NodeKey),
}

fn format_text(ctx: &mut EditorContext, format: TextFormat) -> bool {
    let target = match ctx.selection() {
        Some(Selection::Range { anchor, focus }) if anchor != focus => {
            FormatTarget::Range(anchor, focus)
        }
        Some(Selection::Node { key }) => FormatTarget::Subtree(key),
        _ => return false,
    };

    ctx.update(|txn| {
        let nodes = match target {
            FormatTarget::Range(anchor, focus) => split_range(txn, anchor, focus),
            FormatTarget::Subtree(key) => txn.tree().text_nodes_between(key, key),
        };
        if nodes.is_empty() {
            return false;
        }

        let masks: Vec<_> = nodes
            .iter()
            .map(|key| txn.tree().get(*key).and_then(|node| node.format()).unwrap_or_default())
            .collect();
        let clear = masks.iter().all(|mask| mask.has(format));

        let mut applied = false;
        for (key, mask) in nodes.iter().zip(masks) {
            let next = if clear {
                mask.without(format)
            } else {
                mask.with(format)
            };
            applied |= txn.set_attribute(*key, Attribute::Format(next)).is_ok();
        }
        if !applied {
            return false;
        }

        if let (FormatTarget::Range(..), Some(first), Some(last)) =
            (target, nodes.first(), nodes.last())
        {
            let end = text_len(txn, *last);
            txn.set_selection(Some(Selection::range(
                Point::new(*first, 0),
                Point::new(*last, end),
            )));
        }
        true
    })
}

fn text_len(txn: &Transaction<'_>, key: NodeKey) -> usize {
    txn.tree()
        .get(key)
        .and_then(|node| node.text())
        .map_or(0, |text| text.chars().count())
}

/// Split the text nodes at both range ends and return the fully covered
/// text nodes in document order
fn split_range(txn: &mut Transaction<'_>, anchor: Point, focus: Point) -> Vec<NodeKey> {
    let order = txn.tree().text_nodes();
    let position = |point: Point| order.iter().position(|key| *key == point.key);
    let (Some(a), Some(b)) = (position(anchor), position(focus)) else {
        debug!("Range endpoints are not text nodes");
        return Vec::new();
    };
    let (start, end) = if (a, anchor.offset) <= (b, focus.offset) {
        (anchor, focus)
    } else {
        (focus, anchor)
    };

    // End first, so the start key keeps pointing at the left part
    let end_len = text_len(txn, end.key);
    if end.offset > 0 && end.offset < end_len {
        let _ = txn.split_text(end.key, end.offset);
    }

    let start_len = text_len(txn, start.key);
    let include_start = start.offset < start_len;
    let mut first = start.key;
    if start.offset > 0 && start.offset < start_len {
        if let Ok(right) = txn.split_text(start.key, start.offset) {
            first = right;
        }
    }

    if start.key == end.key {
        return if include_start { vec![first] } else { Vec::new() };
    }

    let mut nodes = txn.tree().text_nodes_between(first, end.key);
    if !include_start {
        nodes.retain(|key| *key != start.key);
    }
    if end.offset == 0 {
        nodes.retain(|key| *key != end.key);
    }
    nodes
}

/// Top-level block the selection sits in
fn selected_block(ctx: &EditorContext) -> Option<NodeKey> {
    let selection = ctx.selection()?;
    ctx.tree().top_level_block(selection.focus_key())
}

fn set_block_type(ctx: &mut EditorContext, block_type: BlockType) -> bool {
    let Some(block) = selected_block(ctx) else {
        return false;
    };
    let Some(current) = ctx.tree().get(block).map(|node| node.kind.clone()) else {
        return false;
    };
    if !current.is_text_block() {
        return false;
    }

    let kind = match block_type {
        BlockType::Paragraph => NodeKind::Paragraph,
        BlockType::Heading(level) => NodeKind::Heading(level),
    };
    if kind == current {
        return true;
    }

    ctx.update(|txn| txn.replace_block(block, kind).is_ok())
}

fn insert_list(ctx: &mut EditorContext, list_type: ListType) -> bool {
    let Some(block) = selected_block(ctx) else {
        return false;
    };
    let Some(current) = ctx.tree().get(block).map(|node| node.kind.clone()) else {
        return false;
    };

    match current {
        NodeKind::List { list_type: existing, .. } if existing == list_type => {
            ctx.update(|txn| txn.unwrap_list(block).is_ok())
        }
        NodeKind::List { .. } => {
            ctx.update(|txn| txn.set_attribute(block, Attribute::ListType(list_type)).is_ok())
        }
        kind if kind.is_text_block() => ctx.update(|txn| txn.wrap_in_list(block, list_type).is_ok()),
        _ => false,
    }
}

fn remove_selected(ctx: &mut EditorContext) -> bool {
    let Some(Selection::Node { key }) = ctx.selection() else {
        return false;
    };
    if key == ctx.tree().root() {
        return false;
    }
    ctx.update(|txn| txn.remove(key).is_ok())
}
