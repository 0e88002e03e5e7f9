// src/sketch/mod.rs

//! The sketch aggregate.
//!
//! A [`Sketch`] tracks one externally edited file. Its content belongs to
//! whatever editor has it open; the sketch only owns the decision of when
//! to pull that content back into the process:
//!
//! - [`staleness`] compares the file against the stored [`Baseline`],
//! - `reload` replaces the baseline and hands the path to the
//!   [`LoadGateway`],
//! - both run under one mutex, which callers can also hold across several
//!   steps via [`Sketch::synchronize`].

pub mod checksum;
pub mod render;
pub mod staleness;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::SystemTime;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::errors::{Result, SketchError};
use crate::exec::{EditOutcome, EditorLauncher};
use crate::fs::{FileSystem, RealFileSystem, ScratchFile};
use crate::load::{LoadError, LoadGateway};
use crate::types::SketchId;

pub use checksum::{checksum_bytes, checksum_file, checksum_reader};
pub use staleness::Baseline;

const DEFAULT_SCRATCH_PREFIX: &str = "sketch-";

/// A live, reloadable unit of externally edited source.
pub struct Sketch {
    id: SketchId,
    name: RwLock<Option<String>>,
    path: PathBuf,
    baseline: Mutex<Baseline>,
    fs: Arc<dyn FileSystem>,
    loader: Arc<dyn LoadGateway>,
    // Keeps an auto-allocated backing file alive for the sketch's lifetime.
    scratch: Option<ScratchFile>,
}

impl fmt::Debug for Sketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sketch")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("path", &self.path)
            .field("baseline", &self.baseline.try_lock().ok().map(|b| *b))
            .finish_non_exhaustive()
    }
}

impl Sketch {
    pub fn builder(id: impl Into<SketchId>) -> SketchBuilder {
        SketchBuilder::new(id.into())
    }

    pub fn id(&self) -> &SketchId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<String> {
        self.name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_name(&self, name: Option<String>) {
        *self.name.write().unwrap_or_else(PoisonError::into_inner) = name;
    }

    /// True if the sketch is backed by a scratch file it allocated itself.
    pub fn is_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    /// Snapshot of the last observed `(mtime, checksum)` pair.
    pub fn baseline(&self) -> Baseline {
        *self.lock()
    }

    /// Has the backing file changed since the last reload?
    pub fn is_stale(&self) -> Result<bool> {
        self.synchronize(|s| s.is_stale())
    }

    /// Re-read the backing file and load it.
    ///
    /// Returns `Ok(false)` when the file is missing (nothing is touched) or
    /// when the loader reports that the content did not resolve.
    pub fn reload(&self) -> Result<bool> {
        self.synchronize(|s| s.reload())
    }

    /// Check staleness and reload as one step under the lock.
    ///
    /// Returns `None` when the sketch was not stale.
    pub fn reload_if_stale(&self) -> Result<Option<bool>> {
        self.synchronize(|s| {
            if s.is_stale()? {
                s.reload().map(Some)
            } else {
                Ok(None)
            }
        })
    }

    /// Run `work` while holding the sketch's lock.
    ///
    /// The lock is released when `work` returns or unwinds. The guard's
    /// `is_stale`/`reload` operate on the held lock, so calling
    /// [`Sketch::reload`] from inside `work` would deadlock.
    pub fn synchronize<R>(&self, work: impl FnOnce(&mut SketchGuard<'_>) -> R) -> R {
        let mut guard = SketchGuard {
            sketch: self,
            baseline: self.lock(),
        };
        work(&mut guard)
    }

    /// Copy the backing file to `dest`.
    ///
    /// Returns `false` without copying when the backing file is missing or
    /// `dest` names the backing file itself, under any alias.
    pub fn save(&self, dest: impl AsRef<Path>) -> Result<bool> {
        let dest = std::path::absolute(dest.as_ref())
            .with_context(|| format!("resolving destination {:?}", dest.as_ref()))?;

        if !self.fs.is_file(&self.path) || self.fs.same_file(&dest, &self.path) {
            debug!(sketch = %self.id, dest = ?dest, "save skipped");
            return Ok(false);
        }

        let bytes = self.fs.copy(&self.path, &dest)?;
        info!(sketch = %self.id, dest = ?dest, bytes, "sketch saved");
        Ok(true)
    }

    /// Open the sketch in an editor via `launcher`.
    pub fn edit(&self, launcher: &EditorLauncher) -> Result<EditOutcome> {
        launcher.edit(self)
    }

    /// Textual preview: header, then at most four lines unless `verbose`.
    pub fn render(&self, verbose: bool) -> Result<String> {
        let content = if self.fs.is_file(&self.path) {
            Some(self.fs.read_to_string(&self.path)?)
        } else {
            None
        };
        Ok(render::render_preview(
            &self.id,
            self.name().as_deref(),
            content.as_deref(),
            verbose,
        ))
    }

    fn lock(&self) -> MutexGuard<'_, Baseline> {
        // The baseline is only ever assigned whole, so a panic elsewhere
        // cannot leave it half-written.
        self.baseline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for Sketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = self.render(false).map_err(|_| fmt::Error)?;
        f.write_str(&preview)
    }
}

/// Access to a sketch while its lock is held. See [`Sketch::synchronize`].
pub struct SketchGuard<'a> {
    sketch: &'a Sketch,
    baseline: MutexGuard<'a, Baseline>,
}

impl SketchGuard<'_> {
    pub fn sketch(&self) -> &Sketch {
        self.sketch
    }

    pub fn baseline(&self) -> Baseline {
        *self.baseline
    }

    pub fn is_stale(&self) -> Result<bool> {
        let s = self.sketch;
        Ok(staleness::is_stale(s.fs.as_ref(), &s.path, &self.baseline)?)
    }

    pub fn reload(&mut self) -> Result<bool> {
        let s = self.sketch;
        let Some(current) = staleness::probe(s.fs.as_ref(), &s.path)? else {
            debug!(sketch = %s.id, path = ?s.path, "reload skipped: file missing");
            return Ok(false);
        };

        // Advance the baseline before loading so a broken file is not
        // retried as if it were new.
        *self.baseline = current;

        match s.loader.load(&s.path) {
            Ok(loaded) => {
                info!(
                    sketch = %s.id,
                    checksum = %format!("{:08x}", current.checksum),
                    loaded,
                    "sketch reloaded"
                );
                Ok(loaded)
            }
            Err(LoadError::Unresolved(reason)) => {
                warn!(sketch = %s.id, path = ?s.path, %reason, "sketch did not resolve");
                Ok(false)
            }
            Err(LoadError::Fatal(source)) => Err(SketchError::LoadFailed {
                path: s.path.clone(),
                source,
            }),
        }
    }
}

/// Constructs a [`Sketch`].
///
/// Without an explicit path a scratch file is allocated through the
/// filesystem and owned by the sketch.
pub struct SketchBuilder {
    id: SketchId,
    path: Option<PathBuf>,
    name: Option<String>,
    fs: Arc<dyn FileSystem>,
    scratch_prefix: String,
    scratch_suffix: String,
}

impl SketchBuilder {
    fn new(id: SketchId) -> Self {
        Self {
            id,
            path: None,
            name: None,
            fs: Arc::new(RealFileSystem),
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            scratch_suffix: String::new(),
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn scratch_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.scratch_prefix = prefix.into();
        self.scratch_suffix = suffix.into();
        self
    }

    /// Build the sketch and, if its file exists, run the initial reload.
    ///
    /// A resolution failure during that reload still yields a sketch; a
    /// fatal load error or an I/O error does not.
    pub fn build(self, loader: Arc<dyn LoadGateway>) -> Result<Sketch> {
        let (path, scratch) = match self.path {
            Some(p) => {
                let abs = std::path::absolute(&p)
                    .with_context(|| format!("resolving sketch path {:?}", p))?;
                (abs, None)
            }
            None => {
                let scratch = self
                    .fs
                    .create_scratch(&self.scratch_prefix, &self.scratch_suffix)?;
                (scratch.path().to_path_buf(), Some(scratch))
            }
        };

        let name = self.name.or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        });

        let sketch = Sketch {
            id: self.id,
            name: RwLock::new(name),
            path,
            baseline: Mutex::new(Baseline::initial(SystemTime::now())),
            fs: self.fs,
            loader,
            scratch,
        };

        debug!(sketch = %sketch.id, path = ?sketch.path, scratch = sketch.is_scratch(), "sketch created");

        if sketch.fs.is_file(&sketch.path) {
            sketch.reload()?;
        }
        Ok(sketch)
    }
}
