//! # Command Dispatch
//!
//! Commands are routed to handlers registered against the command's id.
//! Handlers run in priority order (lower first, 0 highest; ties in
//! registration order) until one returns `true`. A command nobody handles
//! is dropped.

use crate::context::EditorContext;
use folio_document::{HeadingLevel, ListType, MediaAttributes, TextFormat};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub const INSERT_IMAGE: &str = "insertImage";
pub const INSERT_VIDEO: &str = "insertVideo";
pub const FORMAT_TEXT: &str = "formatText";
pub const SET_BLOCK_TYPE: &str = "setBlockType";
pub const INSERT_LIST: &str = "insertList";
pub const REMOVE_SELECTED: &str = "removeSelected";
pub const UNDO: &str = "undo";
pub const REDO: &str = "redo";

/// Block wrapper targeted by [`Command::SetBlockType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Paragraph,
    Heading(HeadingLevel),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    InsertImage(MediaAttributes),
    InsertVideo(MediaAttributes),
    FormatText(TextFormat),
    SetBlockType(BlockType),
    InsertList(ListType),
    RemoveSelected,
    Undo,
    Redo,
    /// Collaborator-defined command
    Custom { id: String, payload: Value },
}

impl Command {
    pub fn id(&self) -> &str {
        match self {
            Command::InsertImage(_) => INSERT_IMAGE,
            Command::InsertVideo(_) => INSERT_VIDEO,
            Command::FormatText(_) => FORMAT_TEXT,
            Command::SetBlockType(_) => SET_BLOCK_TYPE,
            Command::InsertList(_) => INSERT_LIST,
            Command::RemoveSelected => REMOVE_SELECTED,
            Command::Undo => UNDO,
            Command::Redo => REDO,
            Command::Custom { id, .. } => id,
        }
    }

    pub fn custom(id: impl Into<String>, payload: Value) -> Self {
        Command::Custom {
            id: id.into(),
            payload,
        }
    }
}

pub type CommandHandler = Box<dyn Fn(&mut EditorContext, &Command) -> bool>;

/// Handle returned by [`CommandDispatcher::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registration {
    id: HandlerId,
    priority: u32,
    handler: CommandHandler,
}

#[derive(Default)]
pub struct CommandDispatcher {
    handlers: HashMap<String, Vec<Registration>>,
    next_id: u64,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        command_id: impl Into<String>,
        priority: u32,
        handler: impl Fn(&mut EditorContext, &Command) -> bool + 'static,
    ) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);

        let registrations = self.handlers.entry(command_id.into()).or_default();
        let position = registrations
            .iter()
            .position(|existing| existing.priority > priority)
            .unwrap_or(registrations.len());
        registrations.insert(
            position,
            Registration {
                id,
                priority,
                handler: Box::new(handler),
            },
        );
        id
    }

    pub fn unregister(&mut self, id: HandlerId) -> bool {
        for registrations in self.handlers.values_mut() {
            if let Some(position) = registrations.iter().position(|r| r.id == id) {
                registrations.remove(position);
                return true;
            }
        }
        false
    }

    /// Run handlers for `command` until one handles it
    pub fn dispatch(&self, ctx: &mut EditorContext, command: &Command) -> bool {
        let Some(registrations) = self.handlers.get(command.id()) else {
            debug!(command = command.id(), "No handlers registered");
            return false;
        };

        for registration in registrations {
            if (registration.handler)(ctx, command) {
                debug!(
                    command = command.id(),
                    priority = registration.priority,
                    "Command handled"
                );
                return true;
            }
        }

        debug!(command = command.id(), "Command not handled");
        false
    }

    pub fn handler_count(&self, command_id: &str) -> usize {
        self.handlers.get(command_id).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(id, registrations)| (id.as_str(), registrations.len()))
            .collect();
        f.debug_struct("CommandDispatcher")
            .field("handlers", &counts)
            .finish()
    }
}
