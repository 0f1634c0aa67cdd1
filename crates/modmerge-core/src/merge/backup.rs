//! Pre-merge backups of mod files.
//!
//! A mod file's backup lives beside its real storage location as
//! `<file>.<previous_version>.bak`. The backup is written the first time the
//! file enters a merge session for that version and is only ever read after
//! that, so every run starts from the same unmerged content.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::collect::scan_mod_files;
use crate::merge::constants::BACKUP_EXTENSION;
use crate::merge::{MergeError, MergeTask};
use crate::resolve::ResolveReal;

/// What [`ensure_backup`] did to reach the pre-merge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupAction {
    /// No backup existed; the current content was captured
    Created,
    /// A backup existed and was copied back over the mod file
    Restored,
}

/// Backup location for a mod file and previous-version label.
pub fn backup_path(mod_resolved: &Path, previous_version: &str) -> PathBuf {
    let mut name = OsString::from(mod_resolved.as_os_str());
    name.push(format!(".{}.{}", previous_version, BACKUP_EXTENSION));
    PathBuf::from(name)
}

/// Put the task's mod file into its pre-merge state.
///
/// Restores from an existing backup, or captures one if none exists yet.
/// Calling this repeatedly without merging in between leaves the mod file
/// unchanged.
pub fn ensure_backup(task: &MergeTask, previous_version: &str) -> Result<BackupAction, MergeError> {
    let backup = backup_path(&task.mod_resolved, previous_version);

    if backup.exists() {
        copy(&backup, &task.mod_resolved)?;
        debug!(file = %task.mod_resolved.display(), "restored from backup");
        Ok(BackupAction::Restored)
    } else {
        copy(&task.mod_resolved, &backup)?;
        debug!(file = %task.mod_resolved.display(), backup = %backup.display(), "created backup");
        Ok(BackupAction::Created)
    }
}

/// Copy a mod file's backup back over it, if one exists.
///
/// Returns whether a backup was found.
pub fn restore(mod_resolved: &Path, previous_version: &str) -> Result<bool, MergeError> {
    let backup = backup_path(mod_resolved, previous_version);
    if !backup.exists() {
        return Ok(false);
    }
    copy(&backup, mod_resolved)?;
    Ok(true)
}

/// Restore every mod file under `mods_root` that has a backup for
/// `previous_version`. Backups are kept.
///
/// Returns the real paths that were restored, each at most once.
pub fn restore_all(
    mods_root: &Path,
    previous_version: &str,
    resolver: &dyn ResolveReal,
) -> Result<Vec<PathBuf>, MergeError> {
    let mut seen = HashSet::new();
    let mut restored = Vec::new();

    for mod_file in scan_mod_files(mods_root)? {
        let real = resolver.resolve_real(&mod_file)?;
        if !seen.insert(real.clone()) {
            continue;
        }
        if restore(&real, previous_version)? {
            info!(file = %real.display(), "restored mod file");
            restored.push(real);
        }
    }

    Ok(restored)
}

fn copy(from: &Path, to: &Path) -> Result<(), MergeError> {
    fs::copy(from, to).map(|_| ()).map_err(|e| {
        MergeError::io(
            format!("failed to copy {} to {}", from.display(), to.display()),
            e,
        )
    })
}
