pub mod backup;
pub mod constants;
mod error;
pub mod orchestrate;
mod task;
pub mod tool;

// Re-export public items
pub use backup::{backup_path, ensure_backup, restore_all, BackupAction};
pub use error::MergeError;
pub use orchestrate::{
    Action, Decision, DecisionSource, FailureChoice, LoopState, MergeEvent, MergeOrchestrator,
    RunSummary, TaskLabel, TaskOutcome,
};
pub use task::MergeTask;
pub use tool::{KDiff3, MergeRequest, MergeTool};
