// src/watch/session.rs

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, trace};

use crate::sketch::Sketch;

/// Events consumed by a watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The filesystem reported activity on the sketch's file.
    FileChanged,
    ShutdownRequested,
}

#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Re-check staleness on this interval even without file events.
    pub poll_interval: Option<Duration>,
}

impl WatchOptions {
    pub fn from_poll_ms(ms: u64) -> Self {
        Self {
            poll_interval: (ms > 0).then(|| Duration::from_millis(ms)),
        }
    }
}

/// Counters describing what a session did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub checks: usize,
    pub reloads: usize,
    pub failed_reloads: usize,
    pub errors: usize,
}

/// Drive a sketch from watch events until shutdown or until every sender is
/// dropped.
///
/// Each file event and each poll tick runs `reload_if_stale` on the blocking
/// pool. Errors from a reload are logged and counted; the session keeps
/// going.
pub async fn run_session(
    sketch: Arc<Sketch>,
    options: WatchOptions,
    mut events: mpsc::Receiver<WatchEvent>,
) -> Result<SessionStats> {
    let mut stats = SessionStats::default();
    let mut ticker = options.poll_interval.map(|d| {
        let mut i = tokio::time::interval(d);
        i.set_missed_tick_behavior(MissedTickBehavior::Skip);
        i
    });

    info!(sketch = %sketch.id(), path = ?sketch.path(), "watch session started");

    loop {
        let event = tokio::select! {
            ev = events.recv() => match ev {
                Some(ev) => Some(ev),
                None => break,
            },
            _ = tick(&mut ticker) => None,
        };

        match event {
            Some(WatchEvent::ShutdownRequested) => {
                info!("shutdown requested; ending watch session");
                break;
            }
            Some(WatchEvent::FileChanged) | None => {
                check_once(&sketch, &mut stats).await?;
            }
        }
    }

    debug!(?stats, "watch session finished");
    Ok(stats)
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(i) => {
            i.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn check_once(sketch: &Arc<Sketch>, stats: &mut SessionStats) -> Result<()> {
    stats.checks += 1;
    let s = Arc::clone(sketch);
    let outcome = tokio::task::spawn_blocking(move || s.reload_if_stale())
        .await
        .context("staleness check panicked")?;

    match outcome {
        Ok(None) => trace!(sketch = %sketch.id(), "not stale"),
        Ok(Some(true)) => stats.reloads += 1,
        Ok(Some(false)) => stats.failed_reloads += 1,
        Err(err) => {
            stats.errors += 1;
            error!(sketch = %sketch.id(), error = %err, "reload failed");
        }
    }
    Ok(())
}
