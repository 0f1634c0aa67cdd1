//! Optional helper application launched when a run finishes.

use std::path::Path;

use tracing::{debug, warn};

use crate::merge::MergeError;
use crate::utils::process::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperLaunch {
    Launched,
    NotInstalled,
}

/// Run the helper at `helper` with no arguments if it exists.
///
/// Waits for it to exit; its output and exit status are ignored. Only a
/// failure to start it is an error.
pub fn launch_helper(helper: &Path, runner: &dyn CommandRunner) -> Result<HelperLaunch, MergeError> {
    if !helper.is_file() {
        debug!(path = %helper.display(), "post-run helper not installed");
        return Ok(HelperLaunch::NotInstalled);
    }

    let output = runner
        .run(helper.as_os_str(), &[], helper.parent())
        .map_err(|e| MergeError::io(format!("failed to launch {}", helper.display()), e))?;
    if !output.success() {
        warn!(path = %helper.display(), exit_code = ?output.exit_code, "post-run helper exited unsuccessfully");
    }
    Ok(HelperLaunch::Launched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::process::testing::FakeRunner;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_helper_is_not_launched() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::default();

        let result = launch_helper(&dir.path().join("Merger/Merger.exe"), &runner).unwrap();

        assert_eq!(result, HelperLaunch::NotInstalled);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn existing_helper_runs_without_arguments_in_its_directory() {
        let dir = tempdir().unwrap();
        let helper_dir = dir.path().join("Merger");
        fs::create_dir_all(&helper_dir).unwrap();
        let helper = helper_dir.join("Merger.exe");
        fs::write(&helper, b"").unwrap();
        let runner = FakeRunner::default();

        let result = launch_helper(&helper, &runner).unwrap();

        assert_eq!(result, HelperLaunch::Launched);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].args.is_empty());
        assert_eq!(calls[0].workdir, Some(helper_dir.display().to_string()));
    }

    #[test]
    fn helper_exit_status_is_ignored() {
        let dir = tempdir().unwrap();
        let helper = dir.path().join("Merger.exe");
        fs::write(&helper, b"").unwrap();
        let runner = FakeRunner::default();
        runner.push_exit(3, "whatever");

        assert_eq!(launch_helper(&helper, &runner).unwrap(), HelperLaunch::Launched);
    }

    #[test]
    fn helper_spawn_failure_is_io_error() {
        let dir = tempdir().unwrap();
        let helper = dir.path().join("Merger.exe");
        fs::write(&helper, b"").unwrap();
        let runner = FakeRunner::default();
        runner.push_spawn_error();

        assert!(matches!(
            launch_helper(&helper, &runner),
            Err(MergeError::Io { .. })
        ));
    }
}
