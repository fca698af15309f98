//! Splitting of a combined shader file into per-stage sources.
//!
//! A combined file holds every stage of one program. Sections are opened by
//! marker lines such as `#shader vertex` or `#shader fragment`; every other
//! line belongs to whichever section is currently open. Splitting never
//! fails: a missing section is an empty string, and the problem surfaces
//! when that stage is compiled.

use std::fmt;
use std::path::Path;

use crate::error::RenderError;

/// Token that opens a new section.
const MARKER: &str = "#shader";

/// The programmable stages a combined shader file can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    /// Lower-case stage name, as written after the `#shader` marker.
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
        }
    }

    /// Interprets the text following a `#shader` marker.
    ///
    /// Matches by substring, so `#shader vertex // main pass` still opens
    /// the vertex section. Returns `None` for an unrecognized kind.
    fn from_marker(rest: &str) -> Option<Self> {
        if rest.contains("vertex") {
            Some(ShaderKind::Vertex)
        } else if rest.contains("fragment") {
            Some(ShaderKind::Fragment)
        } else {
            None
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertex and fragment sources produced by [`split`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSourceSet {
    vertex: String,
    fragment: String,
}

impl ShaderSourceSet {
    /// Creates a source set from already separated stage sources.
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Reads a combined shader file from disk and splits it.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Io` if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Io(format!("failed to read {}: {e}", path.display())))?;
        Ok(split(&text))
    }

    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns the source for the given stage.
    pub fn source(&self, kind: ShaderKind) -> &str {
        match kind {
            ShaderKind::Vertex => &self.vertex,
            ShaderKind::Fragment => &self.fragment,
        }
    }

    fn section_mut(&mut self, kind: ShaderKind) -> &mut String {
        match kind {
            ShaderKind::Vertex => &mut self.vertex,
            ShaderKind::Fragment => &mut self.fragment,
        }
    }
}

/// Splits a combined shader file into its vertex and fragment sections.
///
/// - Lines before the first marker are discarded.
/// - A marker with an unrecognized kind keeps the current section open;
///   the marker line itself is never copied.
/// - Every other line is copied verbatim with a trailing `'\n'`.
pub fn split(text: &str) -> ShaderSourceSet {
    let mut set = ShaderSourceSet::default();
    let mut active: Option<ShaderKind> = None;

    for line in text.split_terminator('\n') {
        if let Some(pos) = line.find(MARKER) {
            let rest = &line[pos + MARKER.len()..];
            if let Some(kind) = ShaderKind::from_marker(rest) {
                active = Some(kind);
            }
        } else if let Some(kind) = active {
            let section = set.section_mut(kind);
            section.push_str(line);
            section.push('\n');
        }
    }

    set
}
