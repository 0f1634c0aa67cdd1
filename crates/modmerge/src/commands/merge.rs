use modmerge_core::Config;
use modmerge_core::merge::{MergeError, MergeEvent, TaskLabel};
use modmerge_core::resolve::SymlinkResolver;
use modmerge_core::session::{Session, SessionEvent, SessionReport};
use modmerge_core::utils::process::SystemRunner;

use crate::prompt::ConsolePrompter;

const WELCOME: &str = "\
Carries your script mods over to the updated game scripts.

For every vanilla script that changed between the two configured versions
and is overridden by a mod, a three-way merge is offered:
  y    merge this file
  n    skip it (default)
  a    merge this file automatically, prompting only on conflicts
  all  merge this and every remaining file automatically
  q    stop here

Each mod file is backed up before it is touched. Run `modmerge rollback`
to undo all merges.
";

/// Run a merge session, printing progress as it goes.
pub fn run(config: &Config) -> Result<SessionReport, MergeError> {
    if !config.skip_welcome {
        println!("{}", WELCOME);
    }

    let session = Session::new(config, &SystemRunner, &SymlinkResolver);
    session.run(&mut ConsolePrompter::from_stdin(), |event| println!("{}", describe(&event)))
}

fn task(label: &TaskLabel) -> String {
    format!(
        "[{}/{}] '{}' from mod '{}'",
        label.index + 1,
        label.total,
        label.file,
        label.mod_name
    )
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::ChangeSetComputed { changed } => {
            format!("{} scripts changed between versions", changed)
        }
        SessionEvent::CheckingOut { revision } => format!("Checking out {}", revision),
        SessionEvent::TasksResolved { tasks: 0 } => "No mod overrides a changed script".to_string(),
        SessionEvent::TasksResolved { tasks } => format!("{} files to merge", tasks),
        SessionEvent::Task(MergeEvent::AutoMerging { label }) => {
            format!("{}: merging automatically", task(label))
        }
        SessionEvent::Task(MergeEvent::Merged { label, changed, .. }) => {
            if *changed {
                format!("{}: merged", task(label))
            } else {
                format!("{}: merged, no changes", task(label))
            }
        }
        SessionEvent::Task(MergeEvent::Skipped { label }) => format!("{}: skipped", task(label)),
        SessionEvent::Task(MergeEvent::Failed { label, reason }) => {
            format!("{}: failed: {}", task(label), reason)
        }
        SessionEvent::Task(MergeEvent::Quit { remaining }) => {
            format!("Stopped; {} files left untouched", remaining)
        }
        SessionEvent::Reverting { revision } => format!("Reverting back to {}", revision),
        SessionEvent::RevertFailed { revision, reason } => format!(
            "Could not check {} back out, the scripts repository is still on the old version: {}",
            revision, reason
        ),
        SessionEvent::HelperLaunched => "Script Merger closed".to_string(),
        SessionEvent::HelperNotInstalled => {
            "Run Witcher 3 Script Merger now to combine the merged mods".to_string()
        }
        SessionEvent::HelperFailed { reason } => {
            format!("Could not start Witcher 3 Script Merger: {}", reason)
        }
    }
}
