// src/fs/mock.rs

use super::{FileSystem, ScratchFile};
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Vec<u8>,
    pub mtime: SystemTime,
}

/// In-memory filesystem with explicit modification times.
///
/// Clones share the same storage, so a test can keep one handle and give
/// another to the sketch under test.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    reads: Arc<Mutex<HashMap<PathBuf, usize>>>,
    scratch_counter: Arc<AtomicUsize>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file, stamping it with the current time.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.add_file_with_mtime(path, content, SystemTime::now());
    }

    pub fn add_file_with_mtime(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        mtime: SystemTime,
    ) {
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.as_ref().to_path_buf(),
            MockEntry {
                content: content.into(),
                mtime,
            },
        );
    }

    /// Change the modification time without touching the content.
    pub fn set_mtime(&self, path: impl AsRef<Path>, mtime: SystemTime) {
        let mut files = self.files.lock().unwrap();
        if let Some(entry) = files.get_mut(path.as_ref()) {
            entry.mtime = mtime;
        }
    }

    /// Move the modification time forward by `by`.
    pub fn advance_mtime(&self, path: impl AsRef<Path>, by: Duration) {
        let mut files = self.files.lock().unwrap();
        if let Some(entry) = files.get_mut(path.as_ref()) {
            entry.mtime += by;
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap();
        files.get(path.as_ref()).map(|e| e.content.clone())
    }

    /// How many times `path` was opened for a streaming read.
    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        let reads = self.reads.lock().unwrap();
        reads.get(path.as_ref()).copied().unwrap_or(0)
    }

    fn entry(&self, path: &Path) -> Result<MockEntry> {
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }
}

impl FileSystem for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        Ok(self.entry(path)?.mtime)
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let entry = self.entry(path)?;
        *self
            .reads
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;
        Ok(Box::new(Cursor::new(entry.content)))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entry = self.entry(path)?;
        String::from_utf8(entry.content).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
    }

    /// Lexical only: the mock has no symlinks.
    fn same_file(&self, a: &Path, b: &Path) -> bool {
        let a = normalize(a);
        self.is_file(&a) && a == normalize(b)
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<u64> {
        let entry = self.entry(src)?;
        let len = entry.content.len() as u64;
        self.add_file(dst, entry.content);
        Ok(len)
    }

    fn create_scratch(&self, prefix: &str, suffix: &str) -> Result<ScratchFile> {
        let n = self.scratch_counter.fetch_add(1, Ordering::SeqCst);
        let path = PathBuf::from(format!("/tmp/{prefix}{n}{suffix}"));
        self.add_file(&path, Vec::new());
        Ok(ScratchFile::new(path, None))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
