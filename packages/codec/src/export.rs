//! Tree → serialized form

use crate::format::{SerializedDocument, SerializedNode, CANONICAL_EMPTY_DOCUMENT};
use folio_document::{Dimension, DocumentTree, MediaAttributes, NodeKey, NodeKind};
use serde_json::Value;
use tracing::error;

/// Serialize the live tree
///
/// Output is deterministic: the same tree contents always produce the same
/// document, independent of node keys.
pub fn export(tree: &DocumentTree) -> SerializedDocument {
    let children = tree
        .children(tree.root())
        .iter()
        .filter_map(|key| export_node(tree, *key))
        .collect();
    SerializedDocument::new(children)
}

pub fn export_string(tree: &DocumentTree) -> String {
    render_json(export(tree).to_json())
}

pub fn export_pretty(tree: &DocumentTree) -> String {
    render_json(export(tree).to_json_pretty())
}

fn render_json(result: Result<String, crate::CodecError>) -> String {
    result.unwrap_or_else(|err| {
        error!(error = %err, "Export failed, writing the minimum document");
        CANONICAL_EMPTY_DOCUMENT.to_string()
    })
}

fn export_node(tree: &DocumentTree, key: NodeKey) -> Option<SerializedNode> {
    let node = tree.get(key)?;

    let serialized = match &node.kind {
        NodeKind::Root => return None,
        NodeKind::Paragraph | NodeKind::ListItem => SerializedNode::new(node.kind.type_name()),
        NodeKind::Heading(level) => SerializedNode::new("heading").with_field("tag", level.tag()),
        NodeKind::List { list_type, start } => SerializedNode::new("list")
            .with_field("listType", list_type.as_str())
            .with_field("start", *start),
        NodeKind::Text { content, format } => {
            return Some(
                SerializedNode::new("text")
                    .with_field("text", content.as_str())
                    .with_field("format", format.bits()),
            )
        }
        NodeKind::Link { url } => SerializedNode::new("link").with_field("url", url.as_str()),
        NodeKind::Image(media) => return Some(media_node("image", media)),
        NodeKind::Video(media) => return Some(media_node("video", media)),
        NodeKind::LineBreak => return Some(SerializedNode::new("linebreak")),
        NodeKind::Opaque(opaque) => {
            let mut serialized = SerializedNode::new(opaque.type_name.as_str());
            serialized.version = opaque.version;
            serialized.fields = opaque.fields.clone();
            if !opaque.has_children && node.children().is_empty() {
                return Some(serialized);
            }
            serialized
        }
    };

    let children = node
        .children()
        .iter()
        .filter_map(|child| export_node(tree, *child))
        .collect();
    Some(serialized.with_children(children))
}

fn media_node(node_type: &str, media: &MediaAttributes) -> SerializedNode {
    SerializedNode::new(node_type)
        .with_field("src", media.src.as_str())
        .with_field("altText", media.alt_text.as_str())
        .with_field("width", dimension_value(media.width))
        .with_field("height", dimension_value(media.height))
        .with_field("showCaption", media.show_caption)
        .with_field("caption", media.caption.as_str())
}

fn dimension_value(dimension: Dimension) -> Value {
    match dimension {
        Dimension::Px(px) if px.is_finite() && px.fract() == 0.0 && px.abs() < 1e15 => {
            Value::from(px as i64)
        }
        Dimension::Px(px) if px.is_finite() => Value::from(px),
        _ => Value::from("auto"),
    }
}
