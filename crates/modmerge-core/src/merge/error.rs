use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for every stage of a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Version control failed or a revision does not exist
    #[error("repository error: {reason}")]
    Repository { reason: String },

    /// A changed file has mod copies but no vanilla counterpart
    #[error("no vanilla file found for '{file}'")]
    MissingVanillaFile { file: String },

    /// A changed file matches more than one vanilla file
    #[error("'{file}' matches {} vanilla files: {}", .candidates.len(), join_paths(.candidates))]
    AmbiguousMatch { file: String, candidates: Vec<PathBuf> },

    /// Neither a file nor a directory exists at the path
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Filesystem failure (backup copy, restore, cleanup, enumeration)
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// External merge tool could not be run or exited unsuccessfully
    #[error("{program} failed{}: {stderr}", exit_suffix(.exit_code))]
    ExternalTool {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Configuration could not be read or written
    #[error("config error at {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl MergeError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        MergeError::Io {
            context: context.into(),
            source,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn exit_suffix(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(" (exit code {})", code),
        None => " (terminated by signal)".to_string(),
    }
}
