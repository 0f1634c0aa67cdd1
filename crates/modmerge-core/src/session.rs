//! One complete merge run, from change set to post-run helper.

use tracing::{info, warn};

use crate::collect::{compute_change_set, scan_mod_files, scan_vanilla_files, ChangeSet};
use crate::config::{Config, Mode};
use crate::launcher::{launch_helper, HelperLaunch};
use crate::merge::{
    DecisionSource, KDiff3, LoopState, MergeError, MergeEvent, MergeOrchestrator, MergeTool,
    RunSummary,
};
use crate::resolve::{resolve, ResolveReal};
use crate::utils::process::CommandRunner;
use crate::vcs::{CheckoutGuard, GitRepository, VersionControl};

/// Progress of a session, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ChangeSetComputed { changed: usize },
    CheckingOut { revision: String },
    TasksResolved { tasks: usize },
    Task(MergeEvent),
    Reverting { revision: String },
    /// Checking `revision` back out failed after the run had already failed
    RevertFailed { revision: String, reason: String },
    HelperLaunched,
    HelperNotInstalled,
    HelperFailed { reason: String },
}

/// What a finished session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub changed_files: usize,
    pub tasks: usize,
    pub summary: RunSummary,
}

/// A merge run over the paths and collaborators in a [`Config`].
pub struct Session<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    resolver: &'a dyn ResolveReal,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        resolver: &'a dyn ResolveReal,
    ) -> Self {
        Session {
            config,
            runner,
            resolver,
        }
    }

    /// Run with git and KDiff3 driven through the session's command runner.
    pub fn run<F>(
        &self,
        decisions: &mut dyn DecisionSource,
        on_event: F,
    ) -> Result<SessionReport, MergeError>
    where
        F: FnMut(SessionEvent),
    {
        let repo = GitRepository::new(&self.config.scripts_repository, self.runner);
        let tool = KDiff3::new(self.config.merge_tool_program(), self.runner);
        self.run_with(&repo, &tool, decisions, on_event)
    }

    /// Run against explicit version-control and merge-tool collaborators.
    ///
    /// The ancestor revision stays checked out from before the scan until
    /// every task is processed; the current revision is checked back out
    /// even when the run fails.
    pub fn run_with<F>(
        &self,
        vcs: &dyn VersionControl,
        tool: &dyn MergeTool,
        decisions: &mut dyn DecisionSource,
        mut on_event: F,
    ) -> Result<SessionReport, MergeError>
    where
        F: FnMut(SessionEvent),
    {
        let config = self.config;

        let mut change_set =
            compute_change_set(vcs, &config.previous_version, &config.current_version)?;
        if let Some(pattern) = &config.filter {
            change_set.retain_matching(pattern);
            info!(pattern = %pattern, remaining = change_set.len(), "applied change set filter");
        }
        on_event(SessionEvent::ChangeSetComputed {
            changed: change_set.len(),
        });

        on_event(SessionEvent::CheckingOut {
            revision: config.previous_version.clone(),
        });
        let guard = CheckoutGuard::enter(vcs, &config.previous_version, &config.current_version)?;

        let outcome = self.merge_in_ancestor(&change_set, tool, decisions, &mut on_event);

        let revision = guard.restore_to().to_string();
        on_event(SessionEvent::Reverting {
            revision: revision.clone(),
        });
        let reverted = guard.finish();
        let (tasks, summary) = match outcome {
            Ok(done) => done,
            Err(e) => {
                // the run error wins; the revert failure must still be visible
                if let Err(revert) = reverted {
                    warn!(revision = %revision, error = %revert, "failed to revert scripts repository");
                    on_event(SessionEvent::RevertFailed {
                        revision,
                        reason: revert.to_string(),
                    });
                }
                return Err(e);
            }
        };
        reverted?;

        match launch_helper(&config.script_merger_path(), self.runner) {
            Ok(HelperLaunch::Launched) => on_event(SessionEvent::HelperLaunched),
            Ok(HelperLaunch::NotInstalled) => on_event(SessionEvent::HelperNotInstalled),
            Err(e) => {
                warn!(error = %e, "post-run helper failed to start");
                on_event(SessionEvent::HelperFailed {
                    reason: e.to_string(),
                });
            }
        }

        Ok(SessionReport {
            changed_files: change_set.len(),
            tasks,
            summary,
        })
    }

    /// Scan, resolve and merge while the ancestor revision is checked out.
    fn merge_in_ancestor<F>(
        &self,
        change_set: &ChangeSet,
        tool: &dyn MergeTool,
        decisions: &mut dyn DecisionSource,
        on_event: &mut F,
    ) -> Result<(usize, RunSummary), MergeError>
    where
        F: FnMut(SessionEvent),
    {
        let config = self.config;
        let mods_root = config.mods_root();
        let mod_files = scan_mod_files(&mods_root)?;
        let vanilla_files = scan_vanilla_files(&config.content_root())?;
        let tasks = resolve(
            change_set,
            &vanilla_files,
            &mod_files,
            &config.scripts_repository,
            self.resolver,
        )?;
        on_event(SessionEvent::TasksResolved { tasks: tasks.len() });

        let state = match config.mode {
            Mode::Interactive => LoopState::default(),
            Mode::Auto => LoopState::auto_all(),
        };
        let orchestrator = MergeOrchestrator::new(&mods_root, &config.previous_version, tool);
        let summary = orchestrator.run(&tasks, decisions, state, |e| on_event(SessionEvent::Task(e)))?;
        Ok((tasks.len(), summary))
    }
}
