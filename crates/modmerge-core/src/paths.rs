//! Relative script paths used as the join key between the repository, the
//! vanilla install and the mods tree.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A normalized relative path, stored as its segments.
///
/// Both `/` and `\` are accepted as separators when parsing, so paths reported
/// by git and paths typed on Windows compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath {
    segments: Vec<String>,
}

impl RelativePath {
    /// Parse a relative path, dropping empty and `.` segments.
    ///
    /// Segments are kept verbatim, surrounding spaces included. Returns `None`
    /// for a blank path or one with no segments left.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        let segments: Vec<String> = raw
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(RelativePath { segments })
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path with platform separators, for joining onto a root.
    pub fn to_path_buf(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Whether `path` ends with exactly these segments.
    ///
    /// Matching is per whole segment: `scripts/foo.ws` is a tail of
    /// `/Mods/A/scripts/foo.ws` but not of `/Mods/A/myscripts/foo.ws`.
    pub fn is_tail_of(&self, path: &Path) -> bool {
        let mut components = path.components().rev();
        for segment in self.segments.iter().rev() {
            match components.next() {
                Some(Component::Normal(name)) if name == segment.as_str() => {}
                _ => return false,
            }
        }
        true
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
