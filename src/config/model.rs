// src/config/model.rs

use serde::Deserialize;

use crate::config::validate::validate_config;
use crate::errors::SketchError;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [editor]
/// program = "vim"
/// terminal = "xterm -e"
/// background = false
/// reload_on_quit = true
///
/// [load]
/// cmd = "ruby -c {path}"
///
/// [watch]
/// poll_interval_ms = 1000
///
/// [scratch]
/// prefix = "sketch-"
/// suffix = ".rb"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub editor: EditorSection,

    #[serde(default)]
    pub load: LoadSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub scratch: ScratchSection,
}

/// Validated configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub editor: EditorSection,
    pub load: LoadSection,
    pub watch: WatchSection,
    pub scratch: ScratchSection,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SketchError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile {
            editor: raw.editor,
            load: raw.load,
            watch: raw.watch,
            scratch: raw.scratch,
        })
    }
}

/// `[editor]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorSection {
    /// Editor program. When absent, `$VISUAL` then `$EDITOR` are used.
    #[serde(default)]
    pub program: Option<String>,

    /// Optional terminal launcher the editor command is appended to,
    /// e.g. `"xterm -e"`.
    #[serde(default)]
    pub terminal: Option<String>,

    /// Start the editor without waiting for it.
    #[serde(default)]
    pub background: bool,

    /// Reload the sketch once a foreground editor exits.
    #[serde(default = "default_reload_on_quit")]
    pub reload_on_quit: bool,
}

fn default_reload_on_quit() -> bool {
    true
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            program: None,
            terminal: None,
            background: false,
            reload_on_quit: default_reload_on_quit(),
        }
    }
}

/// `[load]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoadSection {
    /// Shell command that loads a sketch. `{path}` is replaced by the quoted
    /// path; otherwise the path is appended.
    #[serde(default)]
    pub cmd: Option<String>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// How often the watch loop re-checks staleness on its own, in
    /// milliseconds. `0` disables polling and relies on file events only.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// `[scratch]` section: naming of auto-allocated sketch files.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScratchSection {
    #[serde(default = "default_scratch_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,
}

fn default_scratch_prefix() -> String {
    "sketch-".to_string()
}

impl Default for ScratchSection {
    fn default() -> Self {
        Self {
            prefix: default_scratch_prefix(),
            suffix: String::new(),
        }
    }
}
