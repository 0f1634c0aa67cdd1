//! Synchronous child-process execution.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Fully buffered result of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an external program to completion and captures its output.
///
/// Implementations must not return before the process has exited.
pub trait CommandRunner {
    fn run(
        &self,
        program: &OsStr,
        args: &[&OsStr],
        workdir: Option<&Path>,
    ) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &OsStr,
        args: &[&OsStr],
        workdir: Option<&Path>,
    ) -> io::Result<CommandOutput> {
        debug!(
            program = %program.to_string_lossy(),
            args = ?args,
            workdir = ?workdir,
            "running command"
        );

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = workdir {
            cmd.current_dir(dir);
        }

        let output = cmd.output()?;
        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        debug!(exit_code = ?result.exit_code, "command finished");
        Ok(result)
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn system_runner_captures_stdout_and_exit_code() {
        let output = SystemRunner
            .run(OsStr::new("sh"), &[OsStr::new("-c"), OsStr::new("echo hello; exit 3")], None)
            .unwrap();

        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[test]
    fn system_runner_captures_stderr() {
        let output = SystemRunner
            .run(OsStr::new("sh"), &[OsStr::new("-c"), OsStr::new("echo oops >&2")], None)
            .unwrap();

        assert_eq!(output.stderr.trim(), "oops");
        assert!(output.success());
    }

    #[test]
    fn system_runner_uses_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let output = SystemRunner
            .run(OsStr::new("pwd"), &[], Some(dir.path()))
            .unwrap();

        let reported = std::path::PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let result = SystemRunner.run(OsStr::new("/nonexistent/program"), &[], None);
        assert!(result.is_err());
    }
}
