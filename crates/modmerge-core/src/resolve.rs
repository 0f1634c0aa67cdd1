//! Pairing of changed paths with vanilla and mod files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collect::{ChangeSet, FileRecord};
use crate::merge::{MergeError, MergeTask};

/// Resolves a filesystem indirection to its real storage location.
pub trait ResolveReal {
    /// Return the final target of `path`, or `path` unchanged when it is not
    /// an indirection. Fails with [`MergeError::PathNotFound`] when nothing
    /// exists there.
    fn resolve_real(&self, path: &Path) -> Result<PathBuf, MergeError>;
}

/// Follows symbolic links anywhere along the path, as deployed by mod
/// managers such as Vortex.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymlinkResolver;

impl ResolveReal for SymlinkResolver {
    fn resolve_real(&self, path: &Path) -> Result<PathBuf, MergeError> {
        // exists() follows links, so a dangling link counts as missing
        if !path.exists() {
            return Err(MergeError::PathNotFound(path.to_path_buf()));
        }

        // resolves links in every component, not only the last
        fs::canonicalize(path)
            .map_err(|e| MergeError::io(format!("failed to resolve {}", path.display()), e))
    }
}

/// Build one [`MergeTask`] per (changed path, matching mod file) pair.
///
/// Tasks follow the change set order, then mod scan order. Every
/// correspondence error is returned before any task is handed out, so a run
/// never starts on a partial list.
pub fn resolve(
    change_set: &ChangeSet,
    vanilla_files: &[FileRecord],
    mod_files: &[FileRecord],
    repo_root: &Path,
    resolver: &dyn ResolveReal,
) -> Result<Vec<MergeTask>, MergeError> {
    let mut tasks = Vec::new();

    for relative in change_set.iter() {
        let modded: Vec<&FileRecord> = mod_files
            .iter()
            .filter(|m| relative.is_tail_of(m))
            .collect();
        if modded.is_empty() {
            continue;
        }

        let mut vanilla_matches = vanilla_files.iter().filter(|v| relative.is_tail_of(v));
        let vanilla = match (vanilla_matches.next(), vanilla_matches.next()) {
            (Some(only), None) => only,
            (None, _) => {
                return Err(MergeError::MissingVanillaFile {
                    file: relative.to_string(),
                });
            }
            (Some(_), Some(_)) => {
                return Err(MergeError::AmbiguousMatch {
                    file: relative.to_string(),
                    candidates: vanilla_files
                        .iter()
                        .filter(|v| relative.is_tail_of(v))
                        .cloned()
                        .collect(),
                });
            }
        };

        let base = repo_root.join(relative.to_path_buf());
        for mod_logical in modded {
            let mod_resolved = resolver.resolve_real(mod_logical)?;
            debug!(
                file = %relative,
                mod_file = %mod_logical.display(),
                resolved = %mod_resolved.display(),
                "resolved merge task"
            );
            tasks.push(MergeTask {
                relative: relative.clone(),
                base: base.clone(),
                vanilla: vanilla.clone(),
                mod_logical: mod_logical.clone(),
                mod_resolved,
            });
        }
    }

    Ok(tasks)
}
