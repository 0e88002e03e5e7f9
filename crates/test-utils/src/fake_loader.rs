use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::anyhow;
use sketchpad::load::{LoadError, LoadGateway};

/// What the next `load` call should report.
#[derive(Debug, Clone)]
pub enum Scripted {
    Loaded(bool),
    Unresolved(String),
    Fatal(String),
}

/// A load gateway that:
/// - records every path it was asked to load
/// - answers from a script, then `Loaded(true)` once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedLoader {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<PathBuf>>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, next: Scripted) {
        self.script.lock().unwrap().push_back(next);
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl LoadGateway for ScriptedLoader {
    fn load(&self, path: &Path) -> Result<bool, LoadError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted::Loaded(true));
        match next {
            Scripted::Loaded(ok) => Ok(ok),
            Scripted::Unresolved(msg) => Err(LoadError::Unresolved(msg)),
            Scripted::Fatal(msg) => Err(LoadError::Fatal(anyhow!(msg))),
        }
    }
}
