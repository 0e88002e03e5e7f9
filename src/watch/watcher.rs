// src/watch/watcher.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::watch::session::WatchEvent;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher for a single sketch file.
///
/// The parent directory is watched (non-recursively) rather than the file
/// itself: many editors save by writing a new file and renaming it over the
/// old one, which would detach a watch placed on the original inode. Every
/// event that names the sketch's file becomes a `WatchEvent::FileChanged`.
pub fn spawn_watcher(
    path: &Path,
    session_tx: mpsc::Sender<WatchEvent>,
) -> Result<WatcherHandle> {
    let file_name: OsString = path
        .file_name()
        .ok_or_else(|| anyhow!("sketch path {:?} has no file name", path))?
        .to_os_string();
    let dir: PathBuf = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("sketchpad: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("sketchpad: file watch error: {err}");
            }
        },
        Config::default(),
    )
    .context("creating file watcher")?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching directory {:?}", dir))?;

    info!("file watcher started on {:?} for {:?}", dir, file_name);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            if !names_file(&event, &file_name) {
                continue;
            }

            debug!(kind = ?event.kind, "sketch file event");
            if let Err(err) = session_tx.send(WatchEvent::FileChanged).await {
                warn!("failed to forward file change: {err}");
                // The session is gone; no point keeping the loop alive.
                return;
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn names_file(event: &Event, file_name: &OsString) -> bool {
    event
        .paths
        .iter()
        .any(|p| p.file_name().is_some_and(|n| n == file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn matches_events_by_file_name_only() {
        let target = OsString::from("demo.rb");

        let hit = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/work/demo.rb"));
        let miss = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/work/.demo.rb.swp"));

        assert!(names_file(&hit, &target));
        assert!(!names_file(&miss, &target));
    }
}
