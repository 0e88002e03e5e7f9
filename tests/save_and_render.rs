use std::error::Error;
use std::fs;
use std::sync::Arc;

use sketchpad::sketch::Sketch;
use sketchpad_test_utils::builders::SketchFile;
use sketchpad_test_utils::fake_loader::ScriptedLoader;
use sketchpad_test_utils::{at, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

fn ten_lines() -> String {
    (1..=10).map(|i| format!("line {i}\n")).collect()
}

#[test]
fn save_to_own_path_is_refused() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("s.rb", "x = 1\n", at(1_000));
    let sketch = Sketch::builder(1u64)
        .path(file.path())
        .build(Arc::new(ScriptedLoader::new()))?;

    assert!(!sketch.save(file.path())?);
    Ok(())
}

#[test]
fn save_through_dotdot_alias_leaves_file_intact() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("s.rb", "precious = 1\n", at(1_000));
    let sketch = Sketch::builder(1u64)
        .path(file.path())
        .build(Arc::new(ScriptedLoader::new()))?;
    fs::create_dir(file.dir().join("sub"))?;

    let alias = file.dir().join("sub").join("..").join("s.rb");
    assert!(!sketch.save(&alias)?);
    assert_eq!(fs::read_to_string(file.path())?, "precious = 1\n");
    Ok(())
}

#[cfg(unix)]
#[test]
fn save_through_symlink_alias_leaves_file_intact() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("s.rb", "precious = 1\n", at(1_000));
    let sketch = Sketch::builder(1u64)
        .path(file.path())
        .build(Arc::new(ScriptedLoader::new()))?;

    let link = file.dir().join("link.rb");
    std::os::unix::fs::symlink(file.path(), &link)?;
    assert!(!sketch.save(&link)?);
    assert_eq!(fs::read_to_string(file.path())?, "precious = 1\n");
    Ok(())
}

#[test]
fn save_elsewhere_copies_bytes_and_keeps_baseline() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("s.rb", "x = 1\ny = 2\n", at(1_000));
    let sketch = Sketch::builder(1u64)
        .path(file.path())
        .build(Arc::new(ScriptedLoader::new()))?;
    let before = sketch.baseline();

    let dest = file.dir().join("kept.rb");
    assert!(sketch.save(&dest)?);
    assert_eq!(fs::read(&dest)?, fs::read(file.path())?);
    assert_eq!(sketch.baseline(), before);
    Ok(())
}

#[test]
fn save_of_missing_file_copies_nothing() -> TestResult {
    init_tracing();
    let file = SketchFile::new("never.rb");
    let sketch = Sketch::builder(1u64)
        .path(file.path())
        .build(Arc::new(ScriptedLoader::new()))?;

    let dest = file.dir().join("copy.rb");
    assert!(!sketch.save(&dest)?);
    assert!(!dest.exists());
    Ok(())
}

#[test]
fn save_into_missing_directory_is_an_error() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("s.rb", "x\n", at(1_000));
    let sketch = Sketch::builder(1u64)
        .path(file.path())
        .build(Arc::new(ScriptedLoader::new()))?;

    let dest = file.dir().join("no/such/dir/copy.rb");
    assert!(sketch.save(&dest).is_err());
    Ok(())
}

#[test]
fn render_truncates_unless_verbose() -> TestResult {
    init_tracing();
    let file = SketchFile::with_content("ten.rb", &ten_lines(), at(1_000));
    let sketch = Sketch::builder(42u64)
        .path(file.path())
        .build(Arc::new(ScriptedLoader::new()))?;

    let short = sketch.render(false)?;
    let mut lines = short.lines();
    assert_eq!(lines.next(), Some("#42: ten.rb"));
    assert_eq!(lines.next(), Some(""));
    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), 5);
    assert_eq!(body[3], "  line 4");
    assert_eq!(body[4], "  ...");

    let long = sketch.render(true)?;
    assert_eq!(long.lines().skip(2).count(), 10);
    assert!(long.ends_with("  line 10\n"));

    assert_eq!(sketch.to_string(), short);
    Ok(())
}

#[test]
fn render_of_missing_file_is_header_only() -> TestResult {
    init_tracing();
    let file = SketchFile::new("ghost.rb");
    let sketch = Sketch::builder(3u64)
        .path(file.path())
        .name("ghost")
        .build(Arc::new(ScriptedLoader::new()))?;

    assert_eq!(sketch.render(true)?, "#3: ghost\n");

    sketch.set_name(None);
    assert_eq!(sketch.render(false)?, "#3\n");
    Ok(())
}
