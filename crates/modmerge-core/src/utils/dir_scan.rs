use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively list files under `root` with the given extension.
///
/// Symlinks are followed, but the returned paths are the ones seen while
/// walking `root`, not their targets. Directories named `excluded_dir` are
/// pruned along with everything below them. Results are in a stable
/// (name-sorted, depth-first) order.
pub fn list_files_with_extension(
    root: &Path,
    extension: &str,
    excluded_dir: Option<&str>,
) -> io::Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let pruned = entry.depth() > 0
                && entry.file_type().is_dir()
                && excluded_dir.is_some_and(|name| entry.file_name() == OsStr::new(name));
            !pruned
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn lists_nested_files_with_extension() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("scripts/game/player.ws"));
        touch(&dir.path().join("scripts/engine/base.ws"));
        touch(&dir.path().join("scripts/readme.txt"));

        let files = list_files_with_extension(dir.path(), "ws", None).unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("scripts/engine/base.ws"),
                dir.path().join("scripts/game/player.ws"),
            ]
        );
    }

    #[test]
    fn extension_match_ignores_case() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("UPPER.WS"));

        let files = list_files_with_extension(dir.path(), "ws", None).unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn prunes_excluded_directory() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("modA/scripts/foo.ws"));
        touch(&dir.path().join("merged/scripts/foo.ws"));

        let files = list_files_with_extension(dir.path(), "ws", Some("merged")).unwrap();

        assert_eq!(files, vec![dir.path().join("modA/scripts/foo.ws")]);
    }

    #[test]
    fn excluded_name_only_prunes_directories() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("modA/merged.ws"));

        let files = list_files_with_extension(dir.path(), "ws", Some("merged.ws")).unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let files = list_files_with_extension(dir.path(), "ws", None).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn nonexistent_root_errors() {
        let result = list_files_with_extension(Path::new("/nonexistent/directory"), "ws", None);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_keep_their_logical_path() {
        let dir = tempdir().unwrap();
        let storage = dir.path().join("storage/foo.ws");
        touch(&storage);
        let mods = dir.path().join("mods/modA/scripts");
        fs::create_dir_all(&mods).unwrap();
        std::os::unix::fs::symlink(&storage, mods.join("foo.ws")).unwrap();

        let files = list_files_with_extension(&dir.path().join("mods"), "ws", None).unwrap();

        assert_eq!(files, vec![mods.join("foo.ws")]);
    }
}
