use std::fmt;

/// Caller-assigned identity of a sketch.
///
/// The value is opaque to this crate; it only shows up in previews and log
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SketchId(String);

impl SketchId {
    pub fn new(id: impl Into<String>) -> Self {
        SketchId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SketchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SketchId {
    fn from(s: &str) -> Self {
        SketchId(s.to_string())
    }
}

impl From<String> for SketchId {
    fn from(s: String) -> Self {
        SketchId(s)
    }
}

impl From<u64> for SketchId {
    fn from(n: u64) -> Self {
        SketchId(n.to_string())
    }
}
