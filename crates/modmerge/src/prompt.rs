use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::{Confirm, Input};
use modmerge_core::merge::{
    Decision, DecisionSource, FailureChoice, MergeError, MergeTask, TaskLabel,
};
use tracing::debug;

/// Asks the operator for decisions.
///
/// On a terminal the prompts go through dialoguer. Piped input is read one
/// line per question, and end of input counts as an empty answer.
pub enum ConsolePrompter {
    Terminal,
    Lines(Box<dyn BufRead>),
}

impl ConsolePrompter {
    pub fn from_stdin() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            ConsolePrompter::Terminal
        } else {
            debug!("stdin is not a terminal; reading answers line by line");
            ConsolePrompter::Lines(Box::new(stdin.lock()))
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, MergeError> {
        let ConsolePrompter::Lines(input) = self else {
            return Ok(None);
        };
        print!("{}: ", prompt);
        io::stdout().flush().map_err(answer_error)?;
        let mut line = String::new();
        input.read_line(&mut line).map_err(answer_error)?;
        println!();
        Ok(Some(line))
    }
}

fn answer_error(source: io::Error) -> MergeError {
    MergeError::Io {
        context: "failed to read answer".to_string(),
        source,
    }
}

fn prompt_error(e: dialoguer::Error) -> MergeError {
    let dialoguer::Error::IO(source) = e;
    answer_error(source)
}

/// Anything but an explicit no keeps the run going.
fn failure_choice(answer: &str) -> FailureChoice {
    match answer.trim().to_ascii_lowercase().as_str() {
        "n" | "no" => FailureChoice::Abort,
        _ => FailureChoice::Skip,
    }
}

impl DecisionSource for ConsolePrompter {
    fn decide(&mut self, label: &TaskLabel, _task: &MergeTask) -> Result<Decision, MergeError> {
        let prompt = format!(
            "[{}/{}] Merge '{}' from mod '{}'? [y,n,a,all,q]",
            label.index + 1,
            label.total,
            label.file,
            label.mod_name
        );
        let answer = match self.read_line(&prompt)? {
            Some(line) => line,
            None => Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?,
        };
        Ok(Decision::from_input(&answer))
    }

    fn on_failure(
        &mut self,
        label: &TaskLabel,
        task: &MergeTask,
        _error: &MergeError,
    ) -> Result<FailureChoice, MergeError> {
        let prompt = format!(
            "Skip '{}' ({}) and continue with the next file?",
            label.file,
            task.mod_resolved.display()
        );
        if let Some(line) = self.read_line(&format!("{} [Y/n]", prompt))? {
            return Ok(failure_choice(&line));
        }

        let skip = Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(prompt_error)?;
        Ok(if skip {
            FailureChoice::Skip
        } else {
            FailureChoice::Abort
        })
    }
}
