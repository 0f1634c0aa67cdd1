use std::path::PathBuf;

use modmerge_core::Config;
use modmerge_core::merge::{restore_all, MergeError};
use modmerge_core::resolve::SymlinkResolver;

/// Put every mod script back to its content before the first merge.
///
/// Returns the resolved paths that were restored.
pub fn run(config: &Config) -> Result<Vec<PathBuf>, MergeError> {
    restore_all(&config.mods_root(), &config.previous_version, &SymlinkResolver)
}
