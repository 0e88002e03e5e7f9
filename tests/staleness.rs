use std::error::Error;
use std::sync::Arc;

use sketchpad::sketch::Sketch;
use sketchpad_test_utils::builders::SketchFile;
use sketchpad_test_utils::fake_loader::ScriptedLoader;
use sketchpad_test_utils::{at, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

fn open(file: &SketchFile) -> Result<(Sketch, Arc<ScriptedLoader>), Box<dyn Error>> {
    let loader = Arc::new(ScriptedLoader::new());
    let sketch = Sketch::builder(1u64).path(file.path()).build(loader.clone())?;
    Ok((sketch, loader))
}

#[test]
fn unchanged_file_is_not_stale() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("a.rb", "puts 1\n", at(1_000));
    let (sketch, _) = open(&file)?;

    assert!(!sketch.is_stale()?);
    assert!(!sketch.is_stale()?);
    Ok(())
}

#[test]
fn changed_content_with_later_mtime_is_stale_until_reload() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("a.rb", "puts 1\n", at(1_000));
    let (sketch, loader) = open(&file)?;

    file.write_at("puts 2\n", at(2_000));
    assert!(sketch.is_stale()?);
    assert!(sketch.is_stale()?);

    assert!(sketch.reload()?);
    assert!(!sketch.is_stale()?);
    assert_eq!(loader.call_count(), 2);
    Ok(())
}

#[test]
fn identical_rewrite_is_suppressed_by_checksum() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("a.rb", "puts 1\n", at(1_000));
    let (sketch, _) = open(&file)?;

    file.write_at("puts 1\n", at(5_000));
    assert!(!sketch.is_stale()?);
    Ok(())
}

#[test]
fn content_change_without_mtime_advance_goes_unnoticed() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("a.rb", "puts 1\n", at(1_000));
    let (sketch, _) = open(&file)?;

    file.write_at("puts 'something else'\n", at(1_000));
    assert!(!sketch.is_stale()?);

    // An older mtime is not "strictly greater" either.
    file.write_at("puts 3\n", at(500));
    assert!(!sketch.is_stale()?);
    Ok(())
}

#[test]
fn missing_file_is_never_stale() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("a.rb", "puts 1\n", at(1_000));
    let (sketch, _) = open(&file)?;

    file.remove();
    assert!(!sketch.is_stale()?);
    Ok(())
}

#[test]
fn reload_if_stale_reloads_only_when_needed() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("a.rb", "x = 1\n", at(1_000));
    let (sketch, loader) = open(&file)?;
    assert_eq!(loader.call_count(), 1);

    assert_eq!(sketch.reload_if_stale()?, None);
    assert_eq!(loader.call_count(), 1);

    file.write_at("x = 2\n", at(2_000));
    assert_eq!(sketch.reload_if_stale()?, Some(true));
    assert_eq!(loader.call_count(), 2);
    assert_eq!(sketch.reload_if_stale()?, None);
    Ok(())
}
