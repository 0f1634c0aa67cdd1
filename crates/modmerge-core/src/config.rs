use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::merge::constants::{
    CONTENT_DIR, MERGE_TOOL_PROGRAM, MODS_DIR, SCRIPT_MERGER_DIR, SCRIPT_MERGER_EXE,
};
use crate::merge::MergeError;

/// How the decision loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Prompt for every task
    #[default]
    Interactive,
    /// Auto-merge every task without prompting
    Auto,
}

/// Persisted settings for a merge run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub skip_welcome: bool,
    /// Git repository holding the vanilla scripts of each game version
    pub scripts_repository: PathBuf,
    /// Game install root
    pub game_path: PathBuf,
    /// Directory containing the merge tool; the tool is looked up on `PATH` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_tool_dir: Option<PathBuf>,
    /// Revision of the pre-upgrade scripts; also labels backup files
    pub previous_version: String,
    /// Revision of the post-upgrade scripts
    pub current_version: String,
    #[serde(default)]
    pub mode: Mode,
    /// Glob restricting which changed paths are merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, MergeError> {
        let content = fs::read_to_string(path).map_err(|e| MergeError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| MergeError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), MergeError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| MergeError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, content).map_err(|e| MergeError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `path`, writing the default config there first if it is missing.
    ///
    /// The flag is true when the file was just created.
    pub fn load_or_create(path: &Path) -> Result<(Config, bool), MergeError> {
        if path.exists() {
            return Ok((Config::load(path)?, false));
        }
        Config::default().save(path)?;
        Ok((Config::load(path)?, true))
    }

    pub fn mods_root(&self) -> PathBuf {
        self.game_path.join(MODS_DIR)
    }

    pub fn content_root(&self) -> PathBuf {
        self.game_path.join(CONTENT_DIR)
    }

    pub fn merge_tool_program(&self) -> PathBuf {
        match &self.merge_tool_dir {
            Some(dir) => dir.join(MERGE_TOOL_PROGRAM),
            None => PathBuf::from(MERGE_TOOL_PROGRAM),
        }
    }

    pub fn script_merger_path(&self) -> PathBuf {
        self.game_path.join(SCRIPT_MERGER_DIR).join(SCRIPT_MERGER_EXE)
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        Config {
            skip_welcome: false,
            scripts_repository: home.join("Witcher3-Scripts"),
            game_path: home.join(".steam/steam/steamapps/common/The Witcher 3"),
            merge_tool_dir: None,
            previous_version: "v4.0-steam".to_string(),
            current_version: "v4.0.1-steam".to_string(),
            mode: Mode::Interactive,
            filter: None,
        }
    }
}
