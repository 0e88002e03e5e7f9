// src/load/shell.rs

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, anyhow};
use tracing::{debug, info};

use crate::exec::{render_with_path, shell_command};
use crate::load::{LoadError, LoadGateway};

/// Loads a sketch by running a shell command over it.
///
/// `{path}` in the template is replaced by the quoted path; without the
/// placeholder the path is appended. A non-zero exit means the content did
/// not resolve. Failing to start the command, or the command dying from a
/// signal, is fatal.
#[derive(Debug, Clone)]
pub struct ShellLoader {
    template: String,
}

impl ShellLoader {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn command_for(&self, path: &Path) -> String {
        render_with_path(&self.template, path)
    }
}

impl LoadGateway for ShellLoader {
    fn load(&self, path: &Path) -> Result<bool, LoadError> {
        let cmd = self.command_for(path);
        info!(cmd = %cmd, "running load command");

        let output = shell_command(&cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("spawning load command '{}'", cmd))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            debug!(cmd = %cmd, "stderr: {}", line);
        }

        match output.status.code() {
            Some(0) => Ok(true),
            Some(code) => {
                let reason = stderr
                    .lines()
                    .rev()
                    .find(|l| !l.trim().is_empty())
                    .map(|l| l.trim().to_string())
                    .unwrap_or_else(|| format!("load command exited with code {code}"));
                Err(LoadError::Unresolved(reason))
            }
            None => Err(LoadError::Fatal(anyhow!(
                "load command '{}' was terminated by a signal",
                cmd
            ))),
        }
    }
}
