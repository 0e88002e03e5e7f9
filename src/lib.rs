// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod load;
pub mod logging;
pub mod sketch;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::{ConfigFile, load_or_default};
use crate::exec::{EditOutcome, EditorLauncher, EditorSettings, ShellRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::load::{InertLoader, LoadGateway, LogLoader, ShellLoader};
use crate::sketch::{Sketch, checksum_file};
use crate::watch::{WatchEvent, WatchOptions};

pub use crate::errors::SketchError;
pub use crate::sketch::{Baseline, SketchGuard};
pub use crate::types::SketchId;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;
    let id = SketchId::new(args.id.clone());

    match args.command {
        Command::Watch { file, once } => watch_file(&cfg, id, &file, once).await,
        Command::Edit {
            file,
            background,
            no_reload,
        } => {
            // The editor blocks on the terminal; keep it off the runtime.
            tokio::task::spawn_blocking(move || edit_file(&cfg, id, file.as_deref(), background, no_reload))
                .await?
        }
        Command::Show { file, verbose } => {
            let sketch = open_sketch(&cfg, id, Some(&file), Arc::new(InertLoader))?;
            print!("{}", sketch.render(verbose)?);
            Ok(())
        }
        Command::Save { file, dest } => {
            let sketch = open_sketch(&cfg, id, Some(&file), Arc::new(InertLoader))?;
            if sketch.save(&dest)? {
                println!("saved {} -> {}", sketch.path().display(), dest.display());
            } else {
                println!("nothing saved");
            }
            Ok(())
        }
        Command::Checksum { files } => {
            let fs = RealFileSystem;
            for file in files {
                let crc = checksum_file(&fs as &dyn FileSystem, &file)?;
                println!("{crc:08x}  {}", file.display());
            }
            Ok(())
        }
    }
}

/// Pick the load gateway described by `[load]`.
pub fn loader_from_config(cfg: &ConfigFile) -> Arc<dyn LoadGateway> {
    match &cfg.load.cmd {
        Some(cmd) => Arc::new(ShellLoader::new(cmd.clone())),
        None => Arc::new(LogLoader),
    }
}

fn open_sketch(
    cfg: &ConfigFile,
    id: SketchId,
    file: Option<&Path>,
    loader: Arc<dyn LoadGateway>,
) -> Result<Sketch> {
    let mut builder = Sketch::builder(id)
        .scratch_affixes(cfg.scratch.prefix.clone(), cfg.scratch.suffix.clone());
    if let Some(file) = file {
        builder = builder.path(file);
    }
    Ok(builder.build(loader)?)
}

async fn watch_file(cfg: &ConfigFile, id: SketchId, file: &Path, once: bool) -> Result<()> {
    let sketch = Arc::new(open_sketch(cfg, id, Some(file), loader_from_config(cfg))?);
    if once {
        if !sketch.path().is_file() {
            bail!("nothing to load: {} does not exist", sketch.path().display());
        }
        info!(sketch = %sketch.id(), baseline = ?sketch.baseline(), "loaded once");
        return Ok(());
    }

    let (tx, rx) = mpsc::channel::<WatchEvent>(64);
    let _watcher = watch::spawn_watcher(sketch.path(), tx.clone())?;

    // Ctrl-C -> graceful shutdown.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = tx.send(WatchEvent::ShutdownRequested).await;
    });

    let options = WatchOptions::from_poll_ms(cfg.watch.poll_interval_ms);
    let stats = watch::run_session(sketch, options, rx).await?;
    info!(?stats, "watch finished");
    Ok(())
}

fn edit_file(
    cfg: &ConfigFile,
    id: SketchId,
    file: Option<&Path>,
    background: bool,
    no_reload: bool,
) -> Result<()> {
    let sketch = open_sketch(cfg, id, file, loader_from_config(cfg))?;

    let mut settings = EditorSettings::from_config(&cfg.editor);
    if background {
        settings.background = true;
    }
    if no_reload {
        settings.reload_on_quit = false;
    }
    if settings.background && sketch.is_scratch() {
        // The scratch file is removed when this process exits.
        warn!("scratch sketches cannot be edited in the background; waiting for the editor");
        settings.background = false;
    }

    let launcher = EditorLauncher::new(settings, Arc::new(ShellRunner));
    match sketch.edit(&launcher)? {
        EditOutcome::Spawned { command } => info!(cmd = %command, "editor running in background"),
        EditOutcome::Finished { reloaded, .. } => {
            if reloaded == Some(false) {
                warn!(sketch = %sketch.id(), "sketch was not loaded after editing");
            }
            print!("{}", sketch.render(false)?);
        }
    }
    Ok(())
}
