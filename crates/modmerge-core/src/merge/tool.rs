//! The external three-way-merge tool.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::merge::MergeError;
use crate::merge::constants::SIDECAR_EXTENSION;
use crate::utils::process::CommandRunner;

/// Inputs and output of one three-way merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRequest<'a> {
    pub base: &'a Path,
    pub vanilla: &'a Path,
    pub modded: &'a Path,
    pub output: &'a Path,
    /// Resolve non-conflicting changes without opening the tool's UI
    pub auto: bool,
}

/// A three-way-merge capability. Returns only once the merge has finished.
pub trait MergeTool {
    fn merge(&self, request: &MergeRequest<'_>) -> Result<(), MergeError>;
}

/// KDiff3 driven through its command line.
pub struct KDiff3<'a> {
    program: PathBuf,
    runner: &'a dyn CommandRunner,
}

impl<'a> KDiff3<'a> {
    pub fn new(program: impl Into<PathBuf>, runner: &'a dyn CommandRunner) -> Self {
        KDiff3 {
            program: program.into(),
            runner,
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl MergeTool for KDiff3<'_> {
    fn merge(&self, request: &MergeRequest<'_>) -> Result<(), MergeError> {
        let mut args: Vec<&OsStr> = vec![
            request.base.as_os_str(),
            request.vanilla.as_os_str(),
            request.modded.as_os_str(),
            OsStr::new("-o"),
            request.output.as_os_str(),
        ];
        if request.auto {
            args.push(OsStr::new("--auto"));
        }

        let output = self
            .runner
            .run(self.program.as_os_str(), &args, None)
            .map_err(|e| MergeError::ExternalTool {
                program: self.program_name(),
                exit_code: None,
                stderr: e.to_string(),
            })?;

        if !output.success() {
            return Err(MergeError::ExternalTool {
                program: self.program_name(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Path of the sidecar file the merge tool may leave beside `output`.
pub fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(format!(".{}", SIDECAR_EXTENSION));
    PathBuf::from(name)
}

/// Delete the sidecar beside `output` if there is one.
pub fn remove_sidecar(output: &Path) -> Result<(), MergeError> {
    let sidecar = sidecar_path(output);
    match fs::remove_file(&sidecar) {
        Ok(()) => {
            debug!(file = %sidecar.display(), "removed merge sidecar");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MergeError::io(
            format!("failed to remove {}", sidecar.display()),
            e,
        )),
    }
}
