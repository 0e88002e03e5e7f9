// src/config/validate.rs

use crate::config::model::RawConfigFile;
use crate::errors::{Result, SketchError};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks that every string option that is present is non-empty and
/// that scratch affixes cannot escape the temp directory. It does **not**
/// check that configured programs exist on `PATH`.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    non_empty("editor.program", cfg.editor.program.as_deref())?;
    non_empty("editor.terminal", cfg.editor.terminal.as_deref())?;
    non_empty("load.cmd", cfg.load.cmd.as_deref())?;
    validate_scratch(cfg)?;
    Ok(())
}

fn non_empty(key: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v.trim().is_empty() => Err(SketchError::ConfigError(format!(
            "`{key}` must not be empty when set"
        ))),
        _ => Ok(()),
    }
}

fn validate_scratch(cfg: &RawConfigFile) -> Result<()> {
    for (key, value) in [
        ("scratch.prefix", &cfg.scratch.prefix),
        ("scratch.suffix", &cfg.scratch.suffix),
    ] {
        if value.contains('/') || value.contains('\\') {
            return Err(SketchError::ConfigError(format!(
                "`{key}` must not contain path separators (got {value:?})"
            )));
        }
    }
    Ok(())
}
