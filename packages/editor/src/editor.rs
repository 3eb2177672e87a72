use crate::builtins::register_builtin_commands;
use crate::commands::{Command, CommandDispatcher, HandlerId};
use crate::config::EditorConfig;
use crate::context::EditorContext;
use crate::errors::EditorError;
use crate::listeners::ListenerId;
use folio_document::{Commit, DocumentTree, MediaAttributes, MediaKind, Selection, Transaction};
use tracing::debug;

/// One editable document: its context plus the command dispatcher
#[derive(Debug)]
pub struct Editor {
    context: EditorContext,
    commands: CommandDispatcher,
}

impl Editor {
    /// Create an editor holding the minimum document, with the built-in
    /// commands registered at `config.builtin_command_priority`
    pub fn new(config: EditorConfig) -> Self {
        let mut commands = CommandDispatcher::new();
        register_builtin_commands(&mut commands, config.builtin_command_priority);
        Self {
            context: EditorContext::new(config),
            commands,
        }
    }

    pub fn load(&mut self, input: &str) {
        self.context.load(input);
    }

    pub fn try_load(&mut self, input: &str) -> Result<(), EditorError> {
        self.context.try_load(input)
    }

    pub fn export(&self) -> String {
        self.context.export()
    }

    pub fn update<R>(&mut self, f: impl FnOnce(&mut Transaction<'_>) -> R) -> R {
        self.context.update(f)
    }

    pub fn dispatch(&mut self, command: Command) -> bool {
        debug!(command = command.id(), "Dispatching command");
        self.commands.dispatch(&mut self.context, &command)
    }

    pub fn register_command(
        &mut self,
        command_id: impl Into<String>,
        priority: u32,
        handler: impl Fn(&mut EditorContext, &Command) -> bool + 'static,
    ) -> HandlerId {
        self.commands.register(command_id, priority, handler)
    }

    pub fn unregister_command(&mut self, id: HandlerId) -> bool {
        self.commands.unregister(id)
    }

    pub fn register_update_listener(
        &mut self,
        listener: impl Fn(&DocumentTree, &Commit) + 'static,
    ) -> ListenerId {
        self.context.register_update_listener(listener)
    }

    pub fn register_selection_listener(
        &mut self,
        listener: impl Fn(Option<Selection>) + 'static,
    ) -> ListenerId {
        self.context.register_selection_listener(listener)
    }

    pub fn set_change_listener(&mut self, listener: impl Fn(&str) + 'static) -> ListenerId {
        self.context.set_change_listener(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.context.remove_listener(id)
    }

    /// Insert media whose upload finished at `src`
    pub fn insert_media(&mut self, kind: MediaKind, src: impl Into<String>) -> bool {
        let media = MediaAttributes::new(src);
        let command = match kind {
            MediaKind::Image => Command::InsertImage(media),
            MediaKind::Video => Command::InsertVideo(media),
        };
        self.dispatch(command)
    }

    pub fn tree(&self) -> &DocumentTree {
        self.context.tree()
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.context
    }

    pub fn config(&self) -> &EditorConfig {
        self.context.config()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
