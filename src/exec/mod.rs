// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] provides the `CommandRunner` trait the editor launcher talks
//!   to, and `ShellRunner`, the production implementation.
//! - [`editor`] composes editor/terminal command lines and decides between
//!   foreground and background launches.

pub mod editor;
pub mod runner;

use std::path::Path;
use std::process::Command;

pub use editor::{CommandTemplate, EditOutcome, EditorLauncher, EditorSettings};
pub use runner::{CommandRunner, CommandStatus, ShellRunner};

/// Build a shell command appropriate for the platform.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Quote `s` as a single POSIX shell word.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Substitute `{path}` in `template`, or append the path if there is no
/// placeholder.
pub fn render_with_path(template: &str, path: &Path) -> String {
    let quoted = shell_quote(&path.to_string_lossy());
    if template.contains("{path}") {
        template.replace("{path}", &quoted)
    } else {
        format!("{} {}", template.trim_end(), quoted)
    }
}
