use std::path::{Component, Path, PathBuf};

use crate::paths::RelativePath;

/// One three-way merge of a changed script into one mod's copy of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTask {
    /// Changed path this task was built from
    pub relative: RelativePath,
    /// Ancestor content: the previous version's file in the scripts repository
    pub base: PathBuf,
    /// Current vanilla content
    pub vanilla: PathBuf,
    /// Mod file as seen inside the mods tree, possibly a symlink
    pub mod_logical: PathBuf,
    /// Real storage location of the mod file; merges read and write here
    pub mod_resolved: PathBuf,
}

impl MergeTask {
    /// File name shown when prompting.
    pub fn display_name(&self) -> String {
        self.mod_logical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.relative.to_string())
    }

    /// Name of the mod folder directly under `mods_root` holding this file.
    pub fn mod_name(&self, mods_root: &Path) -> Option<String> {
        let relative = self.mod_logical.strip_prefix(mods_root).ok()?;
        match relative.components().next()? {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        }
    }
}
