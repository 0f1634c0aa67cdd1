//! Collection of the three file sets a merge run joins together.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::merge::MergeError;
use crate::merge::constants::{MERGED_FILES_DIR, SCRIPT_EXTENSION};
use crate::paths::RelativePath;
use crate::utils::dir_scan::list_files_with_extension;
use crate::vcs::VersionControl;

/// Absolute path of a file found by directory enumeration.
pub type FileRecord = PathBuf;

/// Relative paths whose vanilla content changed, in the order version
/// control reported them. Duplicates are dropped, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    paths: Vec<RelativePath>,
}

impl ChangeSet {
    pub fn from_paths(paths: impl IntoIterator<Item = RelativePath>) -> Self {
        let mut seen = HashSet::new();
        let paths = paths
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        ChangeSet { paths }
    }

    /// Parse newline-delimited diff output, normalizing separators.
    pub fn parse(diff_output: &str) -> Self {
        ChangeSet::from_paths(diff_output.lines().filter_map(RelativePath::parse))
    }

    /// Keep only paths matching a glob, compared against the `/`-joined form.
    pub fn retain_matching(&mut self, pattern: &str) {
        let pattern = pattern.replace('\\', "/");
        self.paths
            .retain(|p| glob_match::glob_match(&pattern, &p.to_string()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelativePath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Paths changed between `from` and `to` in the scripts repository.
pub fn compute_change_set(
    vcs: &dyn VersionControl,
    from: &str,
    to: &str,
) -> Result<ChangeSet, MergeError> {
    let output = vcs.diff_names(from, to)?;
    let change_set = ChangeSet::parse(&output);
    info!(from, to, changed = change_set.len(), "computed change set");
    Ok(change_set)
}

/// Script files of the current vanilla install, under `content_root`.
pub fn scan_vanilla_files(content_root: &Path) -> Result<Vec<FileRecord>, MergeError> {
    let files = list_files_with_extension(content_root, SCRIPT_EXTENSION, None).map_err(|e| {
        MergeError::io(format!("failed to scan {}", content_root.display()), e)
    })?;
    debug!(root = %content_root.display(), count = files.len(), "scanned vanilla scripts");
    Ok(files)
}

/// Script files under `mods_root`, skipping the merged-output folder.
pub fn scan_mod_files(mods_root: &Path) -> Result<Vec<FileRecord>, MergeError> {
    let files = list_files_with_extension(mods_root, SCRIPT_EXTENSION, Some(MERGED_FILES_DIR))
        .map_err(|e| MergeError::io(format!("failed to scan {}", mods_root.display()), e))?;
    debug!(root = %mods_root.display(), count = files.len(), "scanned mod scripts");
    Ok(files)
}
