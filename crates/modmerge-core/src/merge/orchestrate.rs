//! The per-task decision loop.
//!
//! Tasks are processed strictly in order, one at a time. Each task's mod file
//! is put into its pre-merge state first, then the operator (or the sticky
//! "all" flag) decides whether to merge it.

use std::path::Path;

use tracing::{debug, warn};

use crate::merge::backup::{ensure_backup, restore};
use crate::merge::tool::{remove_sidecar, MergeRequest, MergeTool};
use crate::merge::{MergeError, MergeTask};
use crate::utils::hash::hash_file;

/// An operator's answer for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Merge interactively
    Yes,
    /// Skip this task
    No,
    /// Merge with automatic conflict resolution
    Auto,
    /// Auto-merge this task and every later one without asking
    All,
    /// Stop before this task
    Quit,
}

impl Decision {
    /// Parse a typed answer (`y`, `n`, `a`, `all`, `q`).
    ///
    /// Anything unrecognized is [`Decision::No`].
    pub fn from_input(input: &str) -> Decision {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" => Decision::Yes,
            "a" => Decision::Auto,
            "all" => Decision::All,
            "q" => Decision::Quit,
            _ => Decision::No,
        }
    }
}

/// What the loop does with a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    Merge,
    AutoMerge,
    Quit,
}

/// State carried from one task to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopState {
    auto_all: bool,
}

impl LoopState {
    /// A state that auto-merges everything, as if "all" was chosen up front.
    pub fn auto_all() -> Self {
        LoopState { auto_all: true }
    }

    pub fn is_auto_all(self) -> bool {
        self.auto_all
    }

    /// Apply an operator decision, returning the action and the next state.
    pub fn apply(self, decision: Decision) -> (Action, LoopState) {
        match decision {
            Decision::Yes => (Action::Merge, self),
            Decision::No => (Action::Skip, self),
            Decision::Auto => (Action::AutoMerge, self),
            Decision::All => (Action::AutoMerge, LoopState { auto_all: true }),
            Decision::Quit => (Action::Quit, self),
        }
    }
}

/// How to continue after a task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureChoice {
    /// Record the failure and move on to the next task
    Skip,
    /// Stop the run and return the error
    Abort,
}

/// Human-readable identification of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLabel {
    pub index: usize,
    pub total: usize,
    pub file: String,
    pub mod_name: String,
}

/// Source of operator decisions.
pub trait DecisionSource {
    fn decide(&mut self, label: &TaskLabel, task: &MergeTask) -> Result<Decision, MergeError>;

    fn on_failure(
        &mut self,
        label: &TaskLabel,
        task: &MergeTask,
        error: &MergeError,
    ) -> Result<FailureChoice, MergeError>;
}

/// Progress emitted while the loop runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    /// "All" is engaged; merging without a prompt
    AutoMerging { label: TaskLabel },
    Merged { label: TaskLabel, auto: bool, changed: bool },
    Skipped { label: TaskLabel },
    Failed { label: TaskLabel, reason: String },
    /// Quit chosen; `remaining` tasks were left untouched
    Quit { remaining: usize },
}

/// Result for one processed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Merged { auto: bool, changed: bool },
    Skipped,
    Failed { reason: String },
}

/// Outcomes in task order. Tasks at and after `quit_at` have none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub outcomes: Vec<TaskOutcome>,
    pub quit_at: Option<usize>,
}

impl RunSummary {
    pub fn merged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TaskOutcome::Merged { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TaskOutcome::Skipped))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TaskOutcome::Failed { .. }))
            .count()
    }
}

/// Drives merge tasks through backup, decision and merge.
pub struct MergeOrchestrator<'a> {
    mods_root: &'a Path,
    previous_version: &'a str,
    tool: &'a dyn MergeTool,
}

impl<'a> MergeOrchestrator<'a> {
    pub fn new(mods_root: &'a Path, previous_version: &'a str, tool: &'a dyn MergeTool) -> Self {
        MergeOrchestrator {
            mods_root,
            previous_version,
            tool,
        }
    }

    /// Process `tasks` in order starting from `state`.
    ///
    /// Quit ends the run early without error. A failed task is reported to
    /// `decisions`, which chooses between skipping it and aborting with its
    /// error.
    pub fn run<F>(
        &self,
        tasks: &[MergeTask],
        decisions: &mut dyn DecisionSource,
        mut state: LoopState,
        mut on_event: F,
    ) -> Result<RunSummary, MergeError>
    where
        F: FnMut(MergeEvent),
    {
        let total = tasks.len();
        let mut summary = RunSummary::default();

        for (index, task) in tasks.iter().enumerate() {
            let label = TaskLabel {
                index,
                total,
                file: task.display_name(),
                mod_name: task
                    .mod_name(self.mods_root)
                    .unwrap_or_else(|| "<unknown>".to_string()),
            };

            if let Err(err) = ensure_backup(task, self.previous_version) {
                self.fail(decisions, &label, task, err, &mut summary, &mut on_event)?;
                continue;
            }

            let action = if state.is_auto_all() {
                on_event(MergeEvent::AutoMerging { label: label.clone() });
                Action::AutoMerge
            } else {
                let decision = decisions.decide(&label, task)?;
                let (action, next) = state.apply(decision);
                state = next;
                action
            };
            debug!(index, ?action, file = %task.mod_resolved.display(), "task decided");

            match action {
                Action::Quit => {
                    summary.quit_at = Some(index);
                    on_event(MergeEvent::Quit { remaining: total - index });
                    break;
                }
                Action::Skip => {
                    summary.outcomes.push(TaskOutcome::Skipped);
                    on_event(MergeEvent::Skipped { label });
                }
                Action::Merge | Action::AutoMerge => {
                    let auto = action == Action::AutoMerge;
                    match self.merge_task(task, auto) {
                        Ok(changed) => {
                            summary.outcomes.push(TaskOutcome::Merged { auto, changed });
                            on_event(MergeEvent::Merged { label, auto, changed });
                        }
                        Err(err) => {
                            // only the tool itself can leave partial output;
                            // cleanup failures keep the finished merge
                            if matches!(err, MergeError::ExternalTool { .. }) {
                                restore(&task.mod_resolved, self.previous_version)?;
                            }
                            self.fail(decisions, &label, task, err, &mut summary, &mut on_event)?;
                        }
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Merge one task, returning whether the mod file's content changed.
    fn merge_task(&self, task: &MergeTask, auto: bool) -> Result<bool, MergeError> {
        let before = hash_file(&task.mod_resolved).map_err(|e| {
            MergeError::io(format!("failed to read {}", task.mod_resolved.display()), e)
        })?;

        self.tool.merge(&MergeRequest {
            base: &task.base,
            vanilla: &task.vanilla,
            modded: &task.mod_resolved,
            output: &task.mod_resolved,
            auto,
        })?;
        remove_sidecar(&task.mod_resolved)?;

        let after = hash_file(&task.mod_resolved).map_err(|e| {
            MergeError::io(format!("failed to read {}", task.mod_resolved.display()), e)
        })?;
        Ok(before != after)
    }

    fn fail<F>(
        &self,
        decisions: &mut dyn DecisionSource,
        label: &TaskLabel,
        task: &MergeTask,
        err: MergeError,
        summary: &mut RunSummary,
        on_event: &mut F,
    ) -> Result<(), MergeError>
    where
        F: FnMut(MergeEvent),
    {
        let reason = err.to_string();
        warn!(file = %task.mod_resolved.display(), error = %reason, "merge task failed");
        on_event(MergeEvent::Failed {
            label: label.clone(),
            reason: reason.clone(),
        });

        match decisions.on_failure(label, task, &err)? {
            FailureChoice::Skip => {
                summary.outcomes.push(TaskOutcome::Failed { reason });
                Ok(())
            }
            FailureChoice::Abort => Err(err),
        }
    }
}
