//! # Interactive Media Controller
//!
//! Transient selection and resize state for image/video nodes, kept outside
//! the tree and keyed by node key.
//!
//! ```text
//! Idle ──click──▶ Selected ──begin_resize──▶ Resizing
//!  ▲                 │  ▲                       │ pointer_move (commit per frame)
//!  └──click/deselect─┘  └──────end_resize───────┘
//! ```
//!
//! Every resize frame is committed in its own transaction. All frames of
//! one drag share a history tag, so the whole drag undoes in one step.

use crate::context::EditorContext;
use crate::errors::EditorError;
use folio_document::{Attribute, Dimension, MediaAttributes, NodeKey, Selection, TreeError};
use tracing::debug;

/// Resize handle being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Direction each pointer axis grows the node in
    fn signs(self) -> (f64, f64) {
        match self {
            Corner::TopLeft => (-1.0, -1.0),
            Corner::TopRight => (1.0, -1.0),
            Corner::BottomLeft => (-1.0, 1.0),
            Corner::BottomRight => (1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaState {
    Idle,
    Selected,
    Resizing,
}

#[derive(Debug, Clone)]
struct ResizeSession {
    key: NodeKey,
    corner: Corner,
    origin: Position,
    start: Size,
    tag: String,
}

#[derive(Debug, Default)]
pub struct MediaController {
    selected: Option<NodeKey>,
    resize: Option<ResizeSession>,
    drags: u64,
}

impl MediaController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: NodeKey) -> MediaState {
        match (&self.resize, self.selected) {
            (Some(session), _) if session.key == key => MediaState::Resizing,
            (_, Some(selected)) if selected == key => MediaState::Selected,
            _ => MediaState::Idle,
        }
    }

    pub fn selected(&self) -> Option<NodeKey> {
        self.selected
    }

    /// Toggle selection of `key`; selecting one node deselects any other
    ///
    /// Returns false (and resets) when `key` is not a media node.
    pub fn click(&mut self, ctx: &mut EditorContext, key: NodeKey) -> bool {
        if media_of(ctx, key).is_none() {
            debug!(key = %key, "Click on missing or non-media node");
            self.deselect();
            return false;
        }

        if self.selected == Some(key) {
            self.deselect();
            ctx.update(|txn| txn.set_selection(None));
        } else {
            self.resize = None;
            self.selected = Some(key);
            ctx.update(|txn| txn.set_selection(Some(Selection::node(key))));
        }
        true
    }

    /// Start dragging `corner` of `key`
    ///
    /// The starting size is the node's numeric width/height, falling back to
    /// `rendered` for `auto` dimensions.
    pub fn begin_resize(
        &mut self,
        ctx: &mut EditorContext,
        key: NodeKey,
        corner: Corner,
        pointer: Position,
        rendered: Size,
    ) -> Result<(), EditorError> {
        let media = self.checked_media(ctx, key)?;
        let start = Size::new(
            media.width.as_px().unwrap_or(rendered.width),
            media.height.as_px().unwrap_or(rendered.height),
        );

        if self.selected != Some(key) {
            self.selected = Some(key);
            ctx.update(|txn| txn.set_selection(Some(Selection::node(key))));
        }

        self.drags += 1;
        debug!(key = %key, ?corner, width = start.width, height = start.height, "Resize started");
        self.resize = Some(ResizeSession {
            key,
            corner,
            origin: pointer,
            start,
            tag: format!("media-resize:{}:{}", key, self.drags),
        });
        Ok(())
    }

    /// Apply one pointer frame of the active drag, returning the committed size
    pub fn pointer_move(&mut self, ctx: &mut EditorContext, pointer: Position) -> Option<Size> {
        let session = self.resize.clone()?;
        if media_of(ctx, session.key).is_none() {
            debug!(key = %session.key, "Resized node disappeared");
            self.deselect();
            return None;
        }

        let (sx, sy) = session.corner.signs();
        let min = ctx.config().media_min_size;
        let size = Size::new(
            (session.start.width + sx * (pointer.x - session.origin.x)).max(min),
            (session.start.height + sy * (pointer.y - session.origin.y)).max(min),
        );

        let written = ctx.update(|txn| {
            txn.set_history_tag(session.tag.as_str());
            txn.set_attribute(session.key, Attribute::Width(Dimension::Px(size.width)))
                .and_then(|_| {
                    txn.set_attribute(session.key, Attribute::Height(Dimension::Px(size.height)))
                })
        });
        match written {
            Ok(()) => Some(size),
            Err(err) => {
                debug!(key = %session.key, error = %err, "Resize frame rejected");
                None
            }
        }
    }

    /// Finish the drag; the node stays selected
    pub fn end_resize(&mut self) -> bool {
        self.resize.take().is_some()
    }

    /// Flip caption visibility, returning the new value
    pub fn toggle_caption(
        &mut self,
        ctx: &mut EditorContext,
        key: NodeKey,
    ) -> Result<bool, EditorError> {
        let media = self.checked_media(ctx, key)?;
        let show = !media.show_caption;
        ctx.update(|txn| txn.set_attribute(key, Attribute::ShowCaption(show)))?;
        Ok(show)
    }

    /// Keyboard deletion of the selected media node
    pub fn delete_selected(&mut self, ctx: &mut EditorContext) -> bool {
        let Some(key) = self.selected else {
            return false;
        };
        self.deselect();
        if media_of(ctx, key).is_none() {
            return false;
        }
        ctx.update(|txn| txn.remove(key).is_ok())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.resize = None;
    }

    /// Resets the controller when `key` is stale or not media
    fn checked_media(
        &mut self,
        ctx: &EditorContext,
        key: NodeKey,
    ) -> Result<MediaAttributes, EditorError> {
        if !ctx.tree().contains(key) {
            self.deselect();
            return Err(TreeError::NoSelectionTarget(key).into());
        }
        media_of(ctx, key).ok_or_else(|| {
            self.deselect();
            EditorError::NotMedia(key)
        })
    }
}

fn media_of(ctx: &EditorContext, key: NodeKey) -> Option<MediaAttributes> {
    ctx.tree()
        .get(key)
        .and_then(|node| node.kind.media())
        .cloned()
}
