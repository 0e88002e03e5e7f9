// src/sketch/render.rs

use std::fmt::Write;

use crate::types::SketchId;

/// Number of content lines shown by a non-verbose preview.
pub const PREVIEW_LINES: usize = 4;

const INDENT: &str = "  ";
const ELLIPSIS: &str = "...";

/// Format a sketch preview.
///
/// ```text
/// #3: scratch.rb
///
///   line one
///   line two
///   ...
/// ```
///
/// `content` is `None` when the backing file does not exist, in which case
/// only the header is produced.
pub fn render_preview(
    id: &SketchId,
    name: Option<&str>,
    content: Option<&str>,
    verbose: bool,
) -> String {
    let mut out = format!("#{id}");
    if let Some(name) = name {
        let _ = write!(out, ": {name}");
    }
    out.push('\n');

    let Some(content) = content else {
        return out;
    };

    out.push('\n');
    let mut lines = content.lines();
    let limit = if verbose { usize::MAX } else { PREVIEW_LINES };

    for line in lines.by_ref().take(limit) {
        let _ = writeln!(out, "{INDENT}{line}");
    }
    if lines.next().is_some() {
        let _ = writeln!(out, "{INDENT}{ELLIPSIS}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_lines() -> String {
        (1..=10).map(|i| format!("line {i}\n")).collect()
    }

    #[test]
    fn header_only_when_file_missing() {
        let id = SketchId::from(7u64);
        assert_eq!(render_preview(&id, Some("foo.rb"), None, false), "#7: foo.rb\n");
        assert_eq!(render_preview(&id, None, None, true), "#7\n");
    }

    #[test]
    fn short_preview_truncates_to_four_lines() {
        let id = SketchId::from(1u64);
        let out = render_preview(&id, None, Some(&ten_lines()), false);
        let body: Vec<&str> = out.lines().skip(2).collect();
        assert_eq!(
            body,
            vec!["  line 1", "  line 2", "  line 3", "  line 4", "  ..."]
        );
    }

    #[test]
    fn verbose_preview_shows_everything() {
        let id = SketchId::from(1u64);
        let out = render_preview(&id, None, Some(&ten_lines()), true);
        let body: Vec<&str> = out.lines().skip(2).collect();
        assert_eq!(body.len(), 10);
        assert!(!out.contains(ELLIPSIS));
    }

    #[test]
    fn exactly_four_lines_has_no_ellipsis() {
        let id = SketchId::from(1u64);
        let out = render_preview(&id, None, Some("a\nb\nc\nd\n"), false);
        assert!(!out.contains(ELLIPSIS));
    }
}
