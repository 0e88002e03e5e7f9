// src/watch/mod.rs

//! Watch mode.
//!
//! This module is responsible for:
//! - Turning filesystem notifications for one sketch file into
//!   `WatchEvent`s (`notify`).
//! - Running the session loop that reacts to those events (and to a poll
//!   interval) by reloading the sketch when it is stale.
//!
//! It does **not** decide staleness itself; that stays with the sketch.

pub mod session;
pub mod watcher;

pub use session::{SessionStats, WatchEvent, WatchOptions, run_session};
pub use watcher::{WatcherHandle, spawn_watcher};
