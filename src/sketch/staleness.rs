// src/sketch/staleness.rs

//! Two-tier change detection.
//!
//! The modification time is the gate: only when it has moved strictly past
//! the stored value do we pay for a full read to compare checksums. A
//! content change that leaves the mtime where it was is therefore never
//! reported.

use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;
use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::sketch::checksum::checksum_file;

/// Last observed state of a sketch's backing file.
///
/// Always replaced as a whole so `mtime` and `checksum` describe the same
/// read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Baseline {
    pub mtime: SystemTime,
    pub checksum: u32,
}

impl Baseline {
    /// Baseline for a sketch that has not been loaded yet.
    pub fn initial(now: SystemTime) -> Self {
        Self {
            mtime: now,
            checksum: 0,
        }
    }
}

/// Read the file's current `(mtime, checksum)`.
///
/// Returns `None` if `path` is not a regular file.
pub fn probe(fs: &dyn FileSystem, path: &Path) -> Result<Option<Baseline>> {
    if !fs.is_file(path) {
        return Ok(None);
    }
    let mtime = fs.modified(path)?;
    let checksum = checksum_file(fs, path)?;
    Ok(Some(Baseline { mtime, checksum }))
}

/// Decide whether the file at `path` has changed since `baseline`.
pub fn is_stale(fs: &dyn FileSystem, path: &Path, baseline: &Baseline) -> Result<bool> {
    if !fs.is_file(path) {
        trace!(path = ?path, "not a regular file; not stale");
        return Ok(false);
    }

    let mtime = fs.modified(path)?;
    if mtime <= baseline.mtime {
        trace!(path = ?path, "mtime not advanced; not stale");
        return Ok(false);
    }

    let checksum = checksum_file(fs, path)?;
    let stale = checksum != baseline.checksum;
    debug!(
        path = ?path,
        stale,
        "mtime advanced; checksum comparison decided staleness"
    );
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::sketch::checksum::checksum_bytes;
    use std::time::Duration;

    fn t(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn missing_file_is_never_stale() {
        let fs = MockFileSystem::new();
        let baseline = Baseline::initial(t(0));
        assert!(!is_stale(&fs, Path::new("/nope"), &baseline).unwrap());
    }

    #[test]
    fn equal_mtime_short_circuits_without_reading() {
        let fs = MockFileSystem::new();
        fs.add_file_with_mtime("/a", "changed", t(10));
        let baseline = Baseline {
            mtime: t(10),
            checksum: checksum_bytes(b"original"),
        };

        assert!(!is_stale(&fs, Path::new("/a"), &baseline).unwrap());
        assert_eq!(fs.read_count("/a"), 0);
    }

    #[test]
    fn later_mtime_with_same_content_is_not_stale() {
        let fs = MockFileSystem::new();
        fs.add_file_with_mtime("/a", "same", t(20));
        let baseline = Baseline {
            mtime: t(10),
            checksum: checksum_bytes(b"same"),
        };

        assert!(!is_stale(&fs, Path::new("/a"), &baseline).unwrap());
        assert_eq!(fs.read_count("/a"), 1);
    }

    #[test]
    fn later_mtime_with_new_content_is_stale() {
        let fs = MockFileSystem::new();
        fs.add_file_with_mtime("/a", "new", t(20));
        let baseline = Baseline {
            mtime: t(10),
            checksum: checksum_bytes(b"old"),
        };

        assert!(is_stale(&fs, Path::new("/a"), &baseline).unwrap());
    }

    #[test]
    fn probe_reports_current_pair() {
        let fs = MockFileSystem::new();
        fs.add_file_with_mtime("/a", "123456789", t(5));

        let probed = probe(&fs, Path::new("/a")).unwrap().unwrap();
        assert_eq!(probed.mtime, t(5));
        assert_eq!(probed.checksum, 0xCBF4_3926);
        assert!(probe(&fs, Path::new("/b")).unwrap().is_none());
    }
}
