// src/fs/mod.rs

//! Filesystem collaborator used by [`Sketch`](crate::sketch::Sketch).
//!
//! Everything a sketch needs from the disk goes through [`FileSystem`]:
//! metadata probes, streaming reads for the checksum, the copy behind
//! `save`, and scratch-file allocation. Tests swap in [`mock::MockFileSystem`]
//! to control modification times exactly.

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tempfile::TempPath;

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// True if `path` currently exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    fn modified(&self, path: &Path) -> Result<SystemTime>;

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// True if `a` and `b` name the same existing file, through `..`
    /// segments or symlinks.
    fn same_file(&self, a: &Path, b: &Path) -> bool;

    /// Copy `src` to `dst`, returning the number of bytes copied.
    fn copy(&self, src: &Path, dst: &Path) -> Result<u64>;

    /// Allocate a fresh, empty regular file that lives as long as the
    /// returned [`ScratchFile`].
    fn create_scratch(&self, prefix: &str, suffix: &str) -> Result<ScratchFile>;
}

/// A scratch file handed out by [`FileSystem::create_scratch`].
///
/// For the real filesystem the file is removed when this value is dropped.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    _guard: Option<TempPath>,
}

impl ScratchFile {
    pub fn new(path: PathBuf, guard: Option<TempPath>) -> Self {
        Self {
            path,
            _guard: guard,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Implementation that uses `std::fs` and `tempfile`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("reading modification time of {:?}", path))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        Ok(Box::new(file))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn same_file(&self, a: &Path, b: &Path) -> bool {
        if a == b {
            return true;
        }
        match (a.canonicalize(), b.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<u64> {
        fs::copy(src, dst).with_context(|| format!("copying {:?} to {:?}", src, dst))
    }

    fn create_scratch(&self, prefix: &str, suffix: &str) -> Result<ScratchFile> {
        let temp = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile()
            .context("creating scratch file")?
            .into_temp_path();
        Ok(ScratchFile::new(temp.to_path_buf(), Some(temp)))
    }
}
