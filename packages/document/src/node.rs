//! # Node Model
//!
//! Tagged-variant node types and their attributes. Nodes carry data and
//! identity only; every structural rule lives in [`crate::DocumentTree`].

use crate::NodeKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Inline text style bit field
///
/// Bits: 1 = bold, 2 = italic, 4 = strikethrough, 8 = underline, 16 = code.
/// Unknown bits are kept so masks written by newer clients survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatMask(u32);

impl FormatMask {
    pub const NONE: FormatMask = FormatMask(0);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn has(self, format: TextFormat) -> bool {
        self.0 & format.bit() != 0
    }

    pub fn with(self, format: TextFormat) -> Self {
        Self(self.0 | format.bit())
    }

    pub fn without(self, format: TextFormat) -> Self {
        Self(self.0 & !format.bit())
    }

    pub fn toggled(self, format: TextFormat) -> Self {
        Self(self.0 ^ format.bit())
    }
}

impl From<TextFormat> for FormatMask {
    fn from(format: TextFormat) -> Self {
        FormatMask(format.bit())
    }
}

impl std::ops::BitOr<TextFormat> for FormatMask {
    type Output = FormatMask;

    fn bitor(self, rhs: TextFormat) -> FormatMask {
        self.with(rhs)
    }
}

/// A single inline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Bold,
    Italic,
    Strikethrough,
    Underline,
    Code,
}

impl TextFormat {
    pub fn bit(self) -> u32 {
        match self {
            TextFormat::Bold => 1,
            TextFormat::Italic => 2,
            TextFormat::Strikethrough => 4,
            TextFormat::Underline => 8,
            TextFormat::Code => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextFormat::Bold => "bold",
            TextFormat::Italic => "italic",
            TextFormat::Strikethrough => "strikethrough",
            TextFormat::Underline => "underline",
            TextFormat::Code => "code",
        }
    }
}

impl std::ops::BitOr for TextFormat {
    type Output = FormatMask;

    fn bitor(self, rhs: TextFormat) -> FormatMask {
        FormatMask::from(self).with(rhs)
    }
}

/// Heading level (only h1-h3 are supported)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Clamp any numeric level into the supported range
    pub fn from_level(level: u64) -> Self {
        match level {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Ordered,
    Unordered,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Ordered => "ordered",
            ListType::Unordered => "unordered",
        }
    }

    /// Accepts both the native names and the `number`/`bullet` aliases
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ordered" | "number" => Some(ListType::Ordered),
            "unordered" | "bullet" => Some(ListType::Unordered),
            _ => None,
        }
    }
}

/// Width or height of a media node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Px(f64),
}

impl Dimension {
    pub fn as_px(self) -> Option<f64> {
        match self {
            Dimension::Auto => None,
            Dimension::Px(value) => Some(value),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Auto => f.write_str("auto"),
            Dimension::Px(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Px(value) if value.is_finite() => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    serializer.serialize_i64(*value as i64)
                } else {
                    serializer.serialize_f64(*value)
                }
            }
            _ => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Dimension::from_json(&value))
    }
}

impl Dimension {
    /// Lenient conversion: numbers (and numeric strings) become pixels,
    /// anything else is `Auto`
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(Dimension::Px)
                .unwrap_or(Dimension::Auto),
            Value::String(s) => s
                .trim()
                .trim_end_matches("px")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(Dimension::Px)
                .unwrap_or(Dimension::Auto),
            _ => Dimension::Auto,
        }
    }
}

/// Attributes shared by image and video nodes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaAttributes {
    pub src: String,
    pub alt_text: String,
    pub width: Dimension,
    pub height: Dimension,
    pub show_caption: bool,
    pub caption: String,
}

impl MediaAttributes {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Default::default()
        }
    }

    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }

    pub fn with_size(mut self, width: Dimension, height: Dimension) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Which media node an insertion produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A node whose serialized `type` was not recognized on import
///
/// Everything except the children is kept verbatim so the node exports
/// exactly as it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueNode {
    pub type_name: String,
    pub version: u64,
    pub fields: Map<String, Value>,
    /// Whether the source carried a `children` array
    pub has_children: bool,
}

/// Node variant with its kind-specific data
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading(HeadingLevel),
    List { list_type: ListType, start: u32 },
    ListItem,
    Text { content: String, format: FormatMask },
    Link { url: String },
    Image(MediaAttributes),
    Video(MediaAttributes),
    LineBreak,
    Opaque(OpaqueNode),
}

impl NodeKind {
    pub fn text(content: impl Into<String>) -> Self {
        NodeKind::Text {
            content: content.into(),
            format: FormatMask::NONE,
        }
    }

    pub fn list(list_type: ListType) -> Self {
        NodeKind::List {
            list_type,
            start: 1,
        }
    }

    /// Leaves never own children
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Text { .. } | NodeKind::Image(_) | NodeKind::Video(_) | NodeKind::LineBreak
        )
    }

    pub fn is_media(&self) -> bool {
        matches!(self, NodeKind::Image(_) | NodeKind::Video(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text { .. })
    }

    /// Paragraph-like blocks whose wrapper can be swapped
    pub fn is_text_block(&self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::Heading(_))
    }

    pub fn media(&self) -> Option<&MediaAttributes> {
        match self {
            NodeKind::Image(media) | NodeKind::Video(media) => Some(media),
            _ => None,
        }
    }

    pub fn media_mut(&mut self) -> Option<&mut MediaAttributes> {
        match self {
            NodeKind::Image(media) | NodeKind::Video(media) => Some(media),
            _ => None,
        }
    }

    /// Serialized `type` tag
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading(_) => "heading",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem => "listitem",
            NodeKind::Text { .. } => "text",
            NodeKind::Link { .. } => "link",
            NodeKind::Image(_) => "image",
            NodeKind::Video(_) => "video",
            NodeKind::LineBreak => "linebreak",
            NodeKind::Opaque(opaque) => &opaque.type_name,
        }
    }
}

/// A node stored in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: NodeKey,
    pub kind: NodeKind,
    pub(crate) children: Vec<NodeKey>,
}

impl Node {
    pub(crate) fn new(key: NodeKey, kind: NodeKind) -> Self {
        Self {
            key,
            kind,
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn format(&self) -> Option<FormatMask> {
        match &self.kind {
            NodeKind::Text { format, .. } => Some(*format),
            _ => None,
        }
    }
}

/// A single attribute write targeting a media, text, link or list node
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Src(String),
    AltText(String),
    Width(Dimension),
    Height(Dimension),
    ShowCaption(bool),
    Caption(String),
    Text(String),
    Format(FormatMask),
    Url(String),
    ListType(ListType),
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Src(_) => "src",
            Attribute::AltText(_) => "altText",
            Attribute::Width(_) => "width",
            Attribute::Height(_) => "height",
            Attribute::ShowCaption(_) => "showCaption",
            Attribute::Caption(_) => "caption",
            Attribute::Text(_) => "text",
            Attribute::Format(_) => "format",
            Attribute::Url(_) => "url",
            Attribute::ListType(_) => "listType",
        }
    }

    /// Write the value into `kind`; returns false when the kind has no such field
    pub(crate) fn apply_to(self, kind: &mut NodeKind) -> bool {
        match (self, kind) {
            (Attribute::Src(v), NodeKind::Image(m) | NodeKind::Video(m)) => m.src = v,
            (Attribute::AltText(v), NodeKind::Image(m) | NodeKind::Video(m)) => m.alt_text = v,
            (Attribute::Width(v), NodeKind::Image(m) | NodeKind::Video(m)) => m.width = v,
            (Attribute::Height(v), NodeKind::Image(m) | NodeKind::Video(m)) => m.height = v,
            (Attribute::ShowCaption(v), NodeKind::Image(m) | NodeKind::Video(m)) => {
                m.show_caption = v
            }
            (Attribute::Caption(v), NodeKind::Image(m) | NodeKind::Video(m)) => m.caption = v,
            (Attribute::Text(v), NodeKind::Text { content, .. }) => *content = v,
            (Attribute::Format(v), NodeKind::Text { format, .. }) => *format = v,
            (Attribute::Url(v), NodeKind::Link { url }) => *url = v,
            (Attribute::ListType(v), NodeKind::List { list_type, .. }) => *list_type = v,
            _ => return false,
        }
        true
    }
}

/// A detached, keyless subtree waiting to be inserted
///
/// Keys are assigned by the tree at insertion time, never by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub kind: NodeKind,
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(kind: NodeKind, children: Vec<Fragment>) -> Self {
        Self { kind, children }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn paragraph(children: Vec<Fragment>) -> Self {
        Self::new(NodeKind::Paragraph, children)
    }

    pub fn empty_paragraph() -> Self {
        Self::paragraph(Vec::new())
    }

    pub fn heading(level: HeadingLevel, children: Vec<Fragment>) -> Self {
        Self::new(NodeKind::Heading(level), children)
    }

    pub fn list(list_type: ListType, items: Vec<Fragment>) -> Self {
        Self::new(NodeKind::list(list_type), items)
    }

    pub fn list_item(children: Vec<Fragment>) -> Self {
        Self::new(NodeKind::ListItem, children)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::leaf(NodeKind::text(content))
    }

    pub fn formatted_text(content: impl Into<String>, format: FormatMask) -> Self {
        Self::leaf(NodeKind::Text {
            content: content.into(),
            format,
        })
    }

    pub fn link(url: impl Into<String>, children: Vec<Fragment>) -> Self {
        Self::new(NodeKind::Link { url: url.into() }, children)
    }

    pub fn image(media: MediaAttributes) -> Self {
        Self::leaf(NodeKind::Image(media))
    }

    pub fn video(media: MediaAttributes) -> Self {
        Self::leaf(NodeKind::Video(media))
    }

    pub fn media(kind: MediaKind, media: MediaAttributes) -> Self {
        match kind {
            MediaKind::Image => Self::image(media),
            MediaKind::Video => Self::video(media),
        }
    }

    pub fn line_break() -> Self {
        Self::leaf(NodeKind::LineBreak)
    }

    /// Number of nodes in this fragment, itself included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Fragment::size).sum::<usize>()
    }
}
