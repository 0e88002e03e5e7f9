#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sketchpad::config::{ConfigFile, RawConfigFile};
use tempfile::TempDir;

/// A sketch file inside its own temporary directory.
///
/// The directory (and the file) are removed when this value is dropped.
pub struct SketchFile {
    dir: TempDir,
    path: PathBuf,
}

impl SketchFile {
    /// Reserve `name` in a fresh directory without creating the file.
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("creating temp dir");
        let path = dir.path().join(name);
        Self { dir, path }
    }

    /// Create `name` with `content`, stamped with `mtime`.
    pub fn with_content(name: &str, content: &str, mtime: SystemTime) -> Self {
        let file = Self::new(name);
        file.write_at(content, mtime);
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Rewrite the file and stamp it with `mtime`.
    pub fn write_at(&self, content: &str, mtime: SystemTime) {
        fs::write(&self.path, content).expect("writing sketch file");
        self.set_mtime(mtime);
    }

    /// Rewrite the file without touching the resulting mtime.
    pub fn write_keep_mtime(&self, content: &str) {
        let before = self.mtime();
        self.write_at(content, before);
    }

    pub fn set_mtime(&self, mtime: SystemTime) {
        File::options()
            .write(true)
            .open(&self.path)
            .and_then(|f| f.set_modified(mtime))
            .expect("setting mtime");
    }

    pub fn mtime(&self) -> SystemTime {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .expect("reading mtime")
    }

    pub fn remove(&self) {
        fs::remove_file(&self.path).expect("removing sketch file");
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn editor(mut self, program: &str) -> Self {
        self.config.editor.program = Some(program.to_string());
        self
    }

    pub fn terminal(mut self, program: &str) -> Self {
        self.config.editor.terminal = Some(program.to_string());
        self
    }

    pub fn background(mut self, val: bool) -> Self {
        self.config.editor.background = val;
        self
    }

    pub fn reload_on_quit(mut self, val: bool) -> Self {
        self.config.editor.reload_on_quit = val;
        self
    }

    pub fn load_cmd(mut self, cmd: &str) -> Self {
        self.config.load.cmd = Some(cmd.to_string());
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.watch.poll_interval_ms = ms;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
