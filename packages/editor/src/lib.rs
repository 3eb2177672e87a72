//! # Folio Editor
//!
//! Editing engine for Folio documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec: stored JSON ⇄ fragments              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: document lifecycle + commands       │
//! │  - Load/export documents                    │
//! │  - Dispatch commands by priority            │
//! │  - Commit transactions, notify listeners    │
//! │  - Snapshot undo/redo                       │
//! │  - Media selection and resize               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: tree, transactions, selection     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: stored JSON and markup are derived
//! 2. **One mutation path**: every change runs in a transaction
//! 3. **Malformed input never aborts**: it degrades to the minimum document
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{Command, Editor, EditorConfig};
//! use folio_document::{MediaAttributes, MediaKind};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! editor.load("");
//!
//! // An upload finished
//! assert!(editor.insert_media(MediaKind::Image, "/uploads/cat.png"));
//!
//! // Empty sources are not handled
//! assert!(!editor.dispatch(Command::InsertVideo(MediaAttributes::new(" "))));
//!
//! assert!(editor.export().contains(r#""src":"/uploads/cat.png""#));
//! assert!(editor.dispatch(Command::Undo));
//! ```

mod builtins;
pub mod commands;
mod config;
mod context;
mod editor;
mod errors;
mod history;
mod listeners;
pub mod media;

pub use commands::{BlockType, Command, CommandDispatcher, CommandHandler, HandlerId};
pub use config::{ConfigError, EditorConfig};
pub use context::{EditorContext, TxnState};
pub use editor::Editor;
pub use errors::EditorError;
pub use history::{History, HistoryEntry};
pub use listeners::{ChangeListener, ListenerId, SelectionListener, UpdateListener};
pub use media::{Corner, MediaController, MediaState, Position, Size};

// Re-export the document types handlers work with
pub use folio_document::{DocumentTree, Selection, Transaction};
