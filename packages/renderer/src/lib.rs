//! # Folio Renderer
//!
//! Turns a stored document string into display markup without a live editor.
//! Only a fixed set of tags and attributes is ever emitted; text and
//! attribute values are escaped and URLs are filtered by scheme.
//!
//! ```rust
//! let html = folio_renderer::render(
//!     r#"{"root":{"children":[{"type":"paragraph","version":1,"children":[
//!         {"type":"text","version":1,"text":"Hi","format":1}
//!     ]}]}}"#,
//! );
//! assert_eq!(html, "<p><strong>Hi</strong></p>");
//! ```

mod renderer;
mod url;

pub use renderer::{
    render, render_document, render_with_options, RenderOptions, EMPTY_DOCUMENT_MARKUP,
};
pub use url::safe_url;

#[cfg(test)]
mod tests;
