// src/exec/editor.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::EditorSection;
use crate::errors::{Result, SketchError};
use crate::exec::runner::{CommandRunner, CommandStatus};
use crate::exec::render_with_path;
use crate::sketch::Sketch;

/// A command that is either a fixed program string or computed from its
/// input at launch time.
///
/// For the editor the input is the sketch path; for the terminal it is the
/// already-composed editor command line.
pub enum CommandTemplate<T: ?Sized> {
    Fixed(String),
    Derived(Arc<dyn Fn(&T) -> String + Send + Sync>),
}

impl<T: ?Sized> CommandTemplate<T> {
    pub fn derived(f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        CommandTemplate::Derived(Arc::new(f))
    }
}

impl<T: ?Sized> Clone for CommandTemplate<T> {
    fn clone(&self) -> Self {
        match self {
            CommandTemplate::Fixed(s) => CommandTemplate::Fixed(s.clone()),
            CommandTemplate::Derived(f) => CommandTemplate::Derived(Arc::clone(f)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for CommandTemplate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandTemplate::Fixed(s) => f.debug_tuple("Fixed").field(s).finish(),
            CommandTemplate::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl CommandTemplate<Path> {
    /// `Fixed("vim")` becomes `vim '<path>'`; a `{path}` placeholder is
    /// honoured.
    pub fn compose(&self, path: &Path) -> String {
        match self {
            CommandTemplate::Fixed(program) => render_with_path(program, path),
            CommandTemplate::Derived(f) => f(path),
        }
    }
}

impl CommandTemplate<str> {
    /// Wrap an editor command line in a terminal launcher.
    pub fn compose(&self, inner: &str) -> String {
        match self {
            CommandTemplate::Fixed(program) => format!("{} {}", program.trim_end(), inner),
            CommandTemplate::Derived(f) => f(inner),
        }
    }
}

/// How `edit` should launch the editor.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub editor: Option<CommandTemplate<Path>>,
    pub terminal: Option<CommandTemplate<str>>,
    /// Spawn and return immediately instead of waiting for the editor.
    pub background: bool,
    /// After a foreground editor exits, reload the sketch.
    pub reload_on_quit: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            editor: None,
            terminal: None,
            background: false,
            reload_on_quit: true,
        }
    }
}

impl EditorSettings {
    /// Settings from the `[editor]` config section, falling back to
    /// `$VISUAL` / `$EDITOR` when no program is configured.
    pub fn from_config(section: &EditorSection) -> Self {
        let editor = section
            .program
            .clone()
            .or_else(editor_from_env)
            .map(CommandTemplate::Fixed);
        Self {
            editor,
            terminal: section.terminal.clone().map(CommandTemplate::Fixed),
            background: section.background,
            reload_on_quit: section.reload_on_quit,
        }
    }

    pub fn with_editor(mut self, editor: CommandTemplate<Path>) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn with_terminal(mut self, terminal: CommandTemplate<str>) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    pub fn reload_on_quit(mut self, reload: bool) -> Self {
        self.reload_on_quit = reload;
        self
    }
}

fn editor_from_env() -> Option<String> {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.trim().is_empty())
}

/// What `edit` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The editor was started in the background; nothing was reloaded.
    Spawned { command: String },
    /// The editor ran in the foreground and exited.
    ///
    /// `reloaded` is `None` when reloading after quit is disabled.
    Finished {
        command: String,
        status: CommandStatus,
        reloaded: Option<bool>,
    },
}

/// Launches an editor on a sketch's backing file.
#[derive(Clone)]
pub struct EditorLauncher {
    settings: EditorSettings,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for EditorLauncher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorLauncher")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl EditorLauncher {
    pub fn new(settings: EditorSettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self { settings, runner }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Compose the full command line for editing `path`.
    pub fn command_line(&self, path: &Path) -> Result<String> {
        let editor = self
            .settings
            .editor
            .as_ref()
            .ok_or(SketchError::EditorNotDefined)?;
        let cmd = editor.compose(path);
        Ok(match &self.settings.terminal {
            Some(terminal) => terminal.compose(&cmd),
            None => cmd,
        })
    }

    pub fn edit(&self, sketch: &Sketch) -> Result<EditOutcome> {
        let command = self.command_line(sketch.path())?;

        if self.settings.background {
            self.runner.spawn(&command)?;
            info!(sketch = %sketch.id(), cmd = %command, "editor started in background");
            return Ok(EditOutcome::Spawned { command });
        }

        let status = self.runner.run(&command)?;
        if !status.success() {
            warn!(sketch = %sketch.id(), exit_code = ?status.code, "editor exited unsuccessfully");
        }

        let reloaded = if self.settings.reload_on_quit {
            Some(sketch.reload()?)
        } else {
            None
        };

        Ok(EditOutcome::Finished {
            command,
            status,
            reloaded,
        })
    }
}
