// src/errors.rs

//! Crate-wide error type and `Result` alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SketchError {
    /// `edit` was called but neither the config nor the environment names an
    /// editor program.
    #[error("editor not defined")]
    EditorNotDefined,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The load gateway failed in a way other than "content did not resolve".
    #[error("loading {path:?} failed: {source:#}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SketchError>;
