//! Serialized form → tree
//!
//! Import never fails from the caller's point of view. Input that cannot be
//! read as a document becomes the minimum document, nodes of unknown type
//! are carried as opaque nodes, and malformed nodes are dropped where they
//! stand.

use crate::format::{SerializedDocument, SerializedNode};
use crate::CodecError;
use folio_document::{
    Dimension, DocumentTree, FormatMask, Fragment, HeadingLevel, ListType, MediaAttributes,
    MediaKind, NodeKind, OpaqueNode,
};
use tracing::{debug, warn};

/// Parse a serialized document into fragments, falling back to the minimum
/// document on any envelope error
pub fn import(input: &str) -> Vec<Fragment> {
    match try_import(input) {
        Ok(fragments) => fragments,
        Err(err) => {
            warn!(error = %err, "Unreadable document, starting from an empty one");
            minimum_fragments()
        }
    }
}

/// Like [`import`], but reports why the envelope could not be read
pub fn try_import(input: &str) -> Result<Vec<Fragment>, CodecError> {
    let document = SerializedDocument::parse(input)?;
    Ok(import_document(&document))
}

/// Convert an already-parsed document
pub fn import_document(document: &SerializedDocument) -> Vec<Fragment> {
    let fragments: Vec<Fragment> = document
        .root
        .children
        .iter()
        .filter_map(import_node)
        .collect();

    if fragments.is_empty() {
        return minimum_fragments();
    }
    fragments
}

/// Build a fresh tree from serialized input
pub fn import_tree(input: &str) -> DocumentTree {
    DocumentTree::from_fragments(import(input))
}

/// Read stored content that may predate the JSON format
///
/// Empty input is the minimum document. Input starting with `{` is parsed
/// as JSON; anything else is legacy plain text and becomes one paragraph.
pub fn load(input: &str) -> Vec<Fragment> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return minimum_fragments();
    }
    if trimmed.starts_with('{') {
        return import(input);
    }

    debug!(len = input.len(), "Loading legacy plain text");
    vec![Fragment::paragraph(vec![Fragment::text(input)])]
}

fn minimum_fragments() -> Vec<Fragment> {
    vec![Fragment::empty_paragraph()]
}

fn import_node(node: &SerializedNode) -> Option<Fragment> {
    let kind = match node.node_type.as_str() {
        "paragraph" => NodeKind::Paragraph,
        "heading" => NodeKind::Heading(heading_level(node)),
        "list" => NodeKind::List {
            list_type: node
                .field_str("listType")
                .and_then(ListType::parse)
                .unwrap_or(ListType::Unordered),
            start: node
                .field_u64("start")
                .map(|start| u32::try_from(start).unwrap_or(u32::MAX))
                .unwrap_or(1),
        },
        "listitem" => NodeKind::ListItem,
        "text" => NodeKind::Text {
            content: node.field_str("text").unwrap_or_default().to_string(),
            format: FormatMask::from_bits(
                node.field_u64("format")
                    .and_then(|bits| u32::try_from(bits).ok())
                    .unwrap_or(0),
            ),
        },
        "link" => NodeKind::Link {
            url: node.field_str("url").unwrap_or_default().to_string(),
        },
        "image" => media_kind(node, MediaKind::Image)?,
        "video" => media_kind(node, MediaKind::Video)?,
        "linebreak" => NodeKind::LineBreak,
        _ => {
            debug!(node_type = %node.node_type, "Keeping unknown node as opaque");
            NodeKind::Opaque(OpaqueNode {
                type_name: node.node_type.clone(),
                version: node.version,
                fields: node.fields.clone(),
                has_children: node.children.is_some(),
            })
        }
    };

    if kind.is_leaf() {
        if !node.children().is_empty() {
            debug!(node_type = %node.node_type, "Dropping children of a leaf node");
        }
        return Some(Fragment::leaf(kind));
    }

    let children = node.children().iter().filter_map(import_node).collect();
    Some(Fragment::new(kind, children))
}

fn heading_level(node: &SerializedNode) -> HeadingLevel {
    node.field_str("tag")
        .and_then(|tag| tag.strip_prefix('h'))
        .and_then(|level| level.parse::<u64>().ok())
        .map(HeadingLevel::from_level)
        .unwrap_or(HeadingLevel::H1)
}

fn media_kind(node: &SerializedNode, kind: MediaKind) -> Option<NodeKind> {
    let src = node.field_str("src").unwrap_or_default();
    if src.trim().is_empty() {
        warn!(node_type = %node.node_type, "Dropping media node without src");
        return None;
    }

    let dimension = |name: &str| {
        node.field(name)
            .map(Dimension::from_json)
            .unwrap_or(Dimension::Auto)
    };
    let media = MediaAttributes {
        src: src.to_string(),
        alt_text: node.field_str("altText").unwrap_or_default().to_string(),
        width: dimension("width"),
        height: dimension("height"),
        show_caption: node.field_bool("showCaption").unwrap_or(false),
        caption: node.field_str("caption").unwrap_or_default().to_string(),
    };

    Some(match kind {
        MediaKind::Image => NodeKind::Image(media),
        MediaKind::Video => NodeKind::Video(media),
    })
}
