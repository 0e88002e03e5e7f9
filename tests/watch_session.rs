use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use sketchpad::fs::mock::MockFileSystem;
use sketchpad::sketch::Sketch;
use sketchpad::watch::{SessionStats, WatchEvent, WatchOptions, run_session};
use sketchpad_test_utils::fake_loader::{Scripted, ScriptedLoader};
use sketchpad_test_utils::{at, init_tracing};
use tokio::sync::mpsc;

type TestResult = Result<(), Box<dyn Error>>;

const PATH: &str = "/work/live.rb";

fn mock_sketch(
    fs: &MockFileSystem,
    loader: Arc<ScriptedLoader>,
) -> Result<Arc<Sketch>, Box<dyn Error>> {
    fs.add_file_with_mtime(PATH, "a = 1\n", at(100));
    Ok(Arc::new(
        Sketch::builder(1u64)
            .path(PATH)
            .file_system(Arc::new(fs.clone()))
            .build(loader)?,
    ))
}

#[tokio::test]
async fn file_events_reload_only_stale_content() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let loader = Arc::new(ScriptedLoader::new());
    let sketch = mock_sketch(&fs, loader.clone())?;

    let (tx, rx) = mpsc::channel(16);
    let session = tokio::spawn(run_session(sketch, WatchOptions::default(), rx));

    // Noise: an event without a content change.
    tx.send(WatchEvent::FileChanged).await?;

    fs.add_file_with_mtime(PATH, "a = 2\n", at(200));
    tx.send(WatchEvent::FileChanged).await?;

    // Same bytes, newer mtime: suppressed by the checksum.
    fs.add_file_with_mtime(PATH, "a = 2\n", at(300));
    tx.send(WatchEvent::FileChanged).await?;

    tx.send(WatchEvent::ShutdownRequested).await?;
    let stats = session.await??;

    assert_eq!(
        stats,
        SessionStats {
            checks: 3,
            reloads: 1,
            failed_reloads: 0,
            errors: 0,
        }
    );
    assert_eq!(loader.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn failures_are_counted_and_the_session_continues() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let loader = Arc::new(ScriptedLoader::with_script([
        Scripted::Loaded(true),
        Scripted::Unresolved("NameError".into()),
        Scripted::Fatal("segfault in extension".into()),
        Scripted::Loaded(true),
    ]));
    let sketch = mock_sketch(&fs, loader.clone())?;

    // One short session per edit, so each change is checked on its own.
    let mut total = SessionStats::default();
    for (i, body) in ["b\n", "c\n", "d\n"].iter().enumerate() {
        fs.add_file_with_mtime(PATH, *body, at(200 + i as u64));

        let (tx, rx) = mpsc::channel(1);
        tx.send(WatchEvent::FileChanged).await?;
        drop(tx);

        let stats = run_session(Arc::clone(&sketch), WatchOptions::default(), rx).await?;
        total.checks += stats.checks;
        total.reloads += stats.reloads;
        total.failed_reloads += stats.failed_reloads;
        total.errors += stats.errors;
    }

    assert_eq!(
        total,
        SessionStats {
            checks: 3,
            reloads: 1,
            failed_reloads: 1,
            errors: 1,
        }
    );
    assert_eq!(loader.call_count(), 4);
    Ok(())
}

#[tokio::test]
async fn poll_interval_picks_up_changes_without_events() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let loader = Arc::new(ScriptedLoader::new());
    let sketch = mock_sketch(&fs, loader.clone())?;

    let (tx, rx) = mpsc::channel(16);
    let options = WatchOptions {
        poll_interval: Some(Duration::from_millis(20)),
    };
    let session = tokio::spawn(run_session(Arc::clone(&sketch), options, rx));

    fs.add_file_with_mtime(PATH, "polled\n", at(500));

    // Give the ticker time to fire a few times.
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if loader.call_count() >= 2 {
            break;
        }
    }

    tx.send(WatchEvent::ShutdownRequested).await?;
    let stats = session.await??;
    assert!(stats.reloads >= 1);
    assert_eq!(sketch.baseline().mtime, at(500));
    Ok(())
}

#[test]
fn zero_poll_interval_disables_polling() {
    assert_eq!(WatchOptions::from_poll_ms(0).poll_interval, None);
    assert_eq!(
        WatchOptions::from_poll_ms(20).poll_interval,
        Some(Duration::from_millis(20))
    );
}
