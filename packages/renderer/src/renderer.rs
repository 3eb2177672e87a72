use crate::url::safe_url;
use folio_codec::{SerializedDocument, SerializedNode};
use folio_document::{Dimension, FormatMask, HeadingLevel, ListType, TextFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Markup emitted for the minimum document
pub const EMPTY_DOCUMENT_MARKUP: &str = "<p><br /></p>";

/// Inline wrappers, innermost first
const FORMAT_TAGS: [(TextFormat, &str); 5] = [
    (TextFormat::Bold, "strong"),
    (TextFormat::Italic, "em"),
    (TextFormat::Underline, "u"),
    (TextFormat::Strikethrough, "s"),
    (TextFormat::Code, "code"),
];

/// Options for markup rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Put block elements on their own indented lines
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

struct Context<'o> {
    options: &'o RenderOptions,
    depth: usize,
    /// Open elements that only admit phrasing content (`p`, `hN`)
    phrasing: usize,
    buffer: String,
}

impl<'o> Context<'o> {
    fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            depth: 0,
            phrasing: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn at_line_start(&self) -> bool {
        self.buffer.is_empty() || self.buffer.ends_with('\n')
    }

    fn break_line(&mut self) {
        if self.options.pretty && !self.at_line_start() {
            self.add("\n");
        }
    }

    fn open_block(&mut self, open: &str) {
        if self.options.pretty {
            self.break_line();
            self.add_indent();
        }
        self.add(open);
        self.indent();
    }

    fn close_block(&mut self, close: &str) {
        self.dedent();
        if self.options.pretty && self.at_line_start() {
            self.add_indent();
        }
        self.add(close);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render a stored document string with default options
///
/// Accepts the full envelope or a single bare node. Input that is not a
/// document renders as the minimum document.
pub fn render(serialized: &str) -> String {
    render_with_options(serialized, &RenderOptions::default())
}

pub fn render_with_options(serialized: &str, options: &RenderOptions) -> String {
    match parse_input(serialized) {
        Some(document) => render_document(&document, options),
        None => {
            warn!("Unreadable document, rendering the minimum document");
            render_document(&SerializedDocument::minimum(), options)
        }
    }
}

fn parse_input(serialized: &str) -> Option<SerializedDocument> {
    let value: Value = serde_json::from_str(serialized).ok()?;
    if value.get("root").is_some() {
        return SerializedDocument::from_value(&value).ok();
    }
    SerializedNode::from_value(&value).map(|node| SerializedDocument::new(vec![node]))
}

/// Render an already-parsed document
pub fn render_document(document: &SerializedDocument, options: &RenderOptions) -> String {
    if document.root.children.is_empty() {
        return render_document(&SerializedDocument::minimum(), options);
    }
    debug!(blocks = document.root.children.len(), "Rendering document");

    let mut ctx = Context::new(options);
    for node in &document.root.children {
        render_node(node, &mut ctx);
        ctx.break_line();
    }
    ctx.get_output()
}

fn render_node(node: &SerializedNode, ctx: &mut Context) {
    match node.node_type.as_str() {
        "paragraph" => render_block("p", "", node, ctx),
        "heading" => {
            let level = node
                .field_str("tag")
                .and_then(|tag| tag.strip_prefix('h'))
                .and_then(|level| level.parse::<u64>().ok())
                .map(HeadingLevel::from_level)
                .unwrap_or(HeadingLevel::H1);
            render_block(level.tag(), "", node, ctx);
        }
        "list" => render_list(node, ctx),
        "listitem" => render_block("li", "", node, ctx),
        "text" => render_text(node, ctx),
        "link" => render_link(node, ctx),
        "image" | "video" => render_media(node, ctx),
        "linebreak" => ctx.add("<br />"),
        other => {
            debug!(node_type = %other, "Rendering children of unknown node");
            render_children(node, ctx);
        }
    }
}

fn render_children(node: &SerializedNode, ctx: &mut Context) {
    for child in node.children() {
        render_node(child, ctx);
    }
}

fn render_block(tag: &str, attributes: &str, node: &SerializedNode, ctx: &mut Context) {
    let phrasing = tag == "p" || tag.starts_with('h');
    ctx.open_block(&format!("<{}{}>", tag, attributes));
    if phrasing {
        ctx.phrasing += 1;
    }

    let before = ctx.buffer.len();
    render_children(node, ctx);
    if tag == "p" && ctx.buffer.len() == before {
        ctx.add("<br />");
    }

    if phrasing {
        ctx.phrasing -= 1;
    }
    ctx.close_block(&format!("</{}>", tag));
}

fn render_list(node: &SerializedNode, ctx: &mut Context) {
    let list_type = node
        .field_str("listType")
        .and_then(ListType::parse)
        .unwrap_or(ListType::Unordered);
    let tag = match list_type {
        ListType::Ordered => "ol",
        ListType::Unordered => "ul",
    };

    let attributes = match node.field_u64("start") {
        Some(start) if start != 1 && list_type == ListType::Ordered => {
            format!(" start=\"{}\"", start)
        }
        _ => String::new(),
    };

    render_block(tag, &attributes, node, ctx);
}

fn render_text(node: &SerializedNode, ctx: &mut Context) {
    let format = FormatMask::from_bits(
        node.field_u64("format")
            .and_then(|bits| u32::try_from(bits).ok())
            .unwrap_or(0),
    );

    let mut html = escape_html(node.field_str("text").unwrap_or_default());
    for (style, tag) in FORMAT_TAGS {
        if format.has(style) {
            html = format!("<{tag}>{html}</{tag}>");
        }
    }
    ctx.add(&html);
}

fn render_link(node: &SerializedNode, ctx: &mut Context) {
    let href = safe_url(node.field_str("url").unwrap_or_default());
    ctx.add(&format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
        escape_html(href)
    ));
    render_children(node, ctx);
    ctx.add("</a>");
}

fn render_media(node: &SerializedNode, ctx: &mut Context) {
    let src = escape_html(safe_url(node.field_str("src").unwrap_or_default()));
    let mut size = String::new();
    for name in ["width", "height"] {
        if let Some(px) = node.field(name).map(Dimension::from_json).and_then(Dimension::as_px) {
            size.push_str(&format!(" {}=\"{}\"", name, px));
        }
    }

    let element = if node.node_type == "video" {
        format!(
            "<video controls{}><source src=\"{}\" /></video>",
            size, src
        )
    } else {
        let alt = escape_html(node.field_str("altText").unwrap_or_default());
        format!("<img src=\"{}\" alt=\"{}\"{} />", src, alt, size)
    };

    let caption = node.field_str("caption").unwrap_or_default();
    let captioned = node.field_bool("showCaption").unwrap_or(false) && !caption.trim().is_empty();
    if captioned && ctx.phrasing > 0 {
        ctx.add(&format!(
            "<span>{}<small>{}</small></span>",
            element,
            escape_html(caption)
        ));
    } else if captioned {
        ctx.open_block("<figure>");
        ctx.add(&element);
        ctx.add(&format!("<figcaption>{}</figcaption>", escape_html(caption)));
        ctx.close_block("</figure>");
    } else {
        ctx.add(&element);
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
