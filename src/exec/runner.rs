// src/exec/runner.rs

//! Pluggable command runner.
//!
//! The editor launcher talks to a `CommandRunner` instead of spawning
//! processes itself, so tests can record the composed command lines without
//! starting anything.

use std::thread;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::shell_command;

/// Exit status of a foreground command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait abstracting how shell command lines are executed.
pub trait CommandRunner: Send + Sync {
    /// Run `cmd` to completion, inheriting the terminal.
    fn run(&self, cmd: &str) -> Result<CommandStatus>;

    /// Start `cmd` and return immediately. Nothing waits on the result.
    fn spawn(&self, cmd: &str) -> Result<()>;
}

/// Runs commands through `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, cmd: &str) -> Result<CommandStatus> {
        info!(cmd = %cmd, "running command");
        let status = shell_command(cmd)
            .status()
            .with_context(|| format!("running command '{}'", cmd))?;

        let status = CommandStatus {
            code: status.code(),
        };
        info!(cmd = %cmd, exit_code = ?status.code, "command exited");
        Ok(status)
    }

    fn spawn(&self, cmd: &str) -> Result<()> {
        info!(cmd = %cmd, "spawning background command");
        let mut child = shell_command(cmd)
            .spawn()
            .with_context(|| format!("spawning command '{}'", cmd))?;

        // Reap the child so it does not linger as a zombie.
        let cmd = cmd.to_string();
        thread::Builder::new()
            .name("sketchpad-reaper".into())
            .spawn(move || match child.wait() {
                Ok(status) => debug!(cmd = %cmd, exit_code = ?status.code(), "background command exited"),
                Err(err) => warn!(cmd = %cmd, error = %err, "failed to wait on background command"),
            })
            .context("starting reaper thread")?;
        Ok(())
    }
}
