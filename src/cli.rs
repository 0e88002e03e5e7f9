// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `sketchpad`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sketchpad",
    version,
    about = "Track an externally edited file and reload it when its content changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Sketchpad.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SKETCHPAD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Identifier shown in previews and logs.
    #[arg(long, value_name = "ID", default_value = "1", global = true)]
    pub id: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch a sketch and reload it whenever its content changes.
    Watch {
        file: PathBuf,

        /// Load the file once and exit.
        #[arg(long)]
        once: bool,
    },

    /// Open a sketch in the configured editor.
    ///
    /// Without FILE a scratch sketch is created for the duration of the
    /// editing session.
    Edit {
        file: Option<PathBuf>,

        /// Do not wait for the editor to exit.
        #[arg(long)]
        background: bool,

        /// Do not reload after the editor exits.
        #[arg(long)]
        no_reload: bool,
    },

    /// Print a preview of a sketch.
    Show {
        file: PathBuf,

        /// Print the whole file instead of the first lines.
        #[arg(long, short)]
        verbose: bool,
    },

    /// Copy a sketch to another location.
    Save { file: PathBuf, dest: PathBuf },

    /// Print the CRC-32 of each file.
    Checksum {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
