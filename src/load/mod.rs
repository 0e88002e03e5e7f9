// src/load/mod.rs

//! The load gateway: how a sketch's content gets into the running process.
//!
//! A sketch never interprets its own file. On `reload` it hands the path to
//! a [`LoadGateway`], which answers with one of three outcomes:
//!
//! - `Ok(success)`: the content was taken in (`success` is passed through),
//! - `Err(LoadError::Unresolved)`: the content references something that
//!   cannot be resolved; the sketch logs this and reports `false`,
//! - `Err(LoadError::Fatal)`: anything else; the sketch propagates it.

pub mod shell;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

pub use shell::ShellLoader;

#[derive(Error, Debug)]
pub enum LoadError {
    /// The content could not be fully resolved/interpreted.
    #[error("unresolved: {0}")]
    Unresolved(String),

    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

pub trait LoadGateway: Send + Sync {
    fn load(&self, path: &Path) -> Result<bool, LoadError>;
}

impl<F> LoadGateway for F
where
    F: Fn(&Path) -> Result<bool, LoadError> + Send + Sync,
{
    fn load(&self, path: &Path) -> Result<bool, LoadError> {
        self(path)
    }
}

/// Gateway used when nothing is configured to consume the content: it only
/// records that a reload happened.
#[derive(Debug, Clone, Default)]
pub struct LogLoader;

impl LoadGateway for LogLoader {
    fn load(&self, path: &Path) -> Result<bool, LoadError> {
        info!(path = ?path, "sketch reloaded (no load command configured)");
        Ok(true)
    }
}

/// Gateway for read-only commands: accepts the content without running
/// anything.
#[derive(Debug, Clone, Default)]
pub struct InertLoader;

impl LoadGateway for InertLoader {
    fn load(&self, path: &Path) -> Result<bool, LoadError> {
        debug!(path = ?path, "load skipped");
        Ok(true)
    }
}
