//! Version-control access to the vanilla scripts repository.

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::merge::MergeError;
use crate::utils::process::{CommandOutput, CommandRunner};

/// Operations the merge run needs from version control.
pub trait VersionControl {
    /// Newline-delimited paths whose content differs between two revisions.
    fn diff_names(&self, from: &str, to: &str) -> Result<String, MergeError>;

    /// Materialize `revision` in the working copy, discarding local changes.
    fn checkout(&self, revision: &str) -> Result<(), MergeError>;
}

/// [`VersionControl`] implemented with the `git` command line.
pub struct GitRepository<'a> {
    root: PathBuf,
    runner: &'a dyn CommandRunner,
}

impl<'a> GitRepository<'a> {
    pub fn new(root: impl Into<PathBuf>, runner: &'a dyn CommandRunner) -> Self {
        GitRepository {
            root: root.into(),
            runner,
        }
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput, MergeError> {
        let os_args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
        self.runner
            .run(OsStr::new("git"), &os_args, Some(&self.root))
            .map_err(|e| MergeError::Repository {
                reason: format!("failed to run git {}: {}", args.join(" "), e),
            })
    }

    fn git_checked(&self, args: &[&str]) -> Result<String, MergeError> {
        let output = self.git(args)?;
        if !output.success() {
            return Err(MergeError::Repository {
                reason: format!(
                    "git {} exited with {:?}: {}",
                    args.join(" "),
                    output.exit_code,
                    output.stderr.trim()
                ),
            });
        }
        Ok(output.stdout)
    }

    fn verify_revision(&self, revision: &str) -> Result<(), MergeError> {
        let commit = format!("{}^{{commit}}", revision);
        let output = self.git(&["rev-parse", "--verify", "--quiet", &commit])?;
        if output.success() {
            Ok(())
        } else {
            Err(MergeError::Repository {
                reason: format!("unknown revision '{}' in {}", revision, self.root.display()),
            })
        }
    }
}

impl VersionControl for GitRepository<'_> {
    fn diff_names(&self, from: &str, to: &str) -> Result<String, MergeError> {
        self.verify_revision(from)?;
        self.verify_revision(to)?;
        // unquoted paths, so non-ASCII names match the files on disk
        self.git_checked(&[
            "-c",
            "core.quotePath=false",
            "diff-tree",
            "-r",
            "--no-commit-id",
            "--name-only",
            from,
            to,
        ])
    }

    fn checkout(&self, revision: &str) -> Result<(), MergeError> {
        info!(revision, repo = %self.root.display(), "checking out");
        self.git_checked(&["checkout", "-f", revision]).map(|_| ())
    }
}

/// Keeps an ancestor revision checked out until finished or dropped.
///
/// Dropping an unfinished guard checks `restore_to` back out and only logs a
/// failure; call [`CheckoutGuard::finish`] to observe it.
pub struct CheckoutGuard<'a> {
    vcs: &'a dyn VersionControl,
    restore_to: String,
    done: bool,
}

impl<'a> CheckoutGuard<'a> {
    pub fn enter(
        vcs: &'a dyn VersionControl,
        revision: &str,
        restore_to: &str,
    ) -> Result<Self, MergeError> {
        vcs.checkout(revision)?;
        Ok(CheckoutGuard {
            vcs,
            restore_to: restore_to.to_string(),
            done: false,
        })
    }

    pub fn restore_to(&self) -> &str {
        &self.restore_to
    }

    pub fn finish(mut self) -> Result<(), MergeError> {
        self.done = true;
        self.vcs.checkout(&self.restore_to)
    }
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Err(e) = self.vcs.checkout(&self.restore_to) {
            warn!(revision = %self.restore_to, error = %e, "failed to revert checkout");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::process::testing::FakeRunner;
    use std::cell::RefCell;

    #[test]
    fn diff_names_verifies_both_revisions_first() {
        let runner = FakeRunner::default();
        runner.push_ok("abc\n");
        runner.push_ok("def\n");
        runner.push_ok("scripts/foo.ws\n");
        let repo = GitRepository::new("/repo", &runner);

        let names = repo.diff_names("v1", "v2").unwrap();

        assert_eq!(names, "scripts/foo.ws\n");
        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].args, vec!["rev-parse", "--verify", "--quiet", "v1^{commit}"]);
        assert_eq!(calls[1].args, vec!["rev-parse", "--verify", "--quiet", "v2^{commit}"]);
        assert_eq!(
            calls[2].args,
            vec![
                "-c",
                "core.quotePath=false",
                "diff-tree",
                "-r",
                "--no-commit-id",
                "--name-only",
                "v1",
                "v2"
            ]
        );
        assert!(calls.iter().all(|c| c.program == "git" && c.workdir.as_deref() == Some("/repo")));
    }

    #[test]
    fn unknown_revision_is_repository_error() {
        let runner = FakeRunner::default();
        runner.push_ok("abc\n");
        runner.push_exit(1, "");
        let repo = GitRepository::new("/repo", &runner);

        let result = repo.diff_names("v1", "missing");

        assert!(matches!(
            result,
            Err(MergeError::Repository { ref reason }) if reason.contains("missing")
        ));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn failing_diff_is_repository_error() {
        let runner = FakeRunner::default();
        runner.push_ok("");
        runner.push_ok("");
        runner.push_exit(128, "fatal: bad object");
        let repo = GitRepository::new("/repo", &runner);

        let result = repo.diff_names("v1", "v2");

        assert!(matches!(
            result,
            Err(MergeError::Repository { ref reason }) if reason.contains("bad object")
        ));
    }

    #[test]
    fn missing_git_binary_is_repository_error() {
        let runner = FakeRunner::default();
        runner.push_spawn_error();
        let repo = GitRepository::new("/repo", &runner);

        assert!(matches!(repo.checkout("v1"), Err(MergeError::Repository { .. })));
    }

    #[test]
    fn checkout_forces_revision() {
        let runner = FakeRunner::default();
        let repo = GitRepository::new("/repo", &runner);

        repo.checkout("v4.0-steam").unwrap();

        assert_eq!(runner.calls()[0].args, vec!["checkout", "-f", "v4.0-steam"]);
    }

    /// Records checkouts; fails when asked for a revision in `failing`.
    #[derive(Default)]
    struct RecordingVcs {
        checkouts: RefCell<Vec<String>>,
        failing: Vec<String>,
    }

    impl VersionControl for RecordingVcs {
        fn diff_names(&self, _from: &str, _to: &str) -> Result<String, MergeError> {
            Ok(String::new())
        }

        fn checkout(&self, revision: &str) -> Result<(), MergeError> {
            self.checkouts.borrow_mut().push(revision.to_string());
            if self.failing.iter().any(|r| r == revision) {
                return Err(MergeError::Repository {
                    reason: "checkout failed".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn guard_finish_restores_current_version() {
        let vcs = RecordingVcs::default();

        let guard = CheckoutGuard::enter(&vcs, "old", "new").unwrap();
        assert_eq!(guard.restore_to(), "new");
        guard.finish().unwrap();

        assert_eq!(*vcs.checkouts.borrow(), vec!["old", "new"]);
    }

    #[test]
    fn guard_drop_restores_current_version() {
        let vcs = RecordingVcs::default();

        {
            let _guard = CheckoutGuard::enter(&vcs, "old", "new").unwrap();
        }

        assert_eq!(*vcs.checkouts.borrow(), vec!["old", "new"]);
    }

    #[test]
    fn guard_finish_surfaces_revert_failure() {
        let vcs = RecordingVcs {
            failing: vec!["new".to_string()],
            ..RecordingVcs::default()
        };

        let guard = CheckoutGuard::enter(&vcs, "old", "new").unwrap();

        assert!(guard.finish().is_err());
        assert_eq!(vcs.checkouts.borrow().len(), 2);
    }

    #[test]
    fn failed_enter_does_not_revert() {
        let vcs = RecordingVcs {
            failing: vec!["old".to_string()],
            ..RecordingVcs::default()
        };

        assert!(CheckoutGuard::enter(&vcs, "old", "new").is_err());
        assert_eq!(*vcs.checkouts.borrow(), vec!["old"]);
    }
}
