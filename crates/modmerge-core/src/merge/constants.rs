/// Extension of game script files (without the dot)
pub const SCRIPT_EXTENSION: &str = "ws";
/// Vanilla script subtree under the install root
pub const CONTENT_DIR: &str = "Content";
/// Mods subtree under the install root
pub const MODS_DIR: &str = "Mods";
/// Aggregate output of the script merger; never treated as a mod
pub const MERGED_FILES_DIR: &str = "mod0000_MergedFiles";
/// Extension appended after the version label of a backup file
pub const BACKUP_EXTENSION: &str = "bak";
/// Extension of the sidecar file the merge tool leaves beside its output
pub const SIDECAR_EXTENSION: &str = "orig";
/// Default merge tool executable name
pub const MERGE_TOOL_PROGRAM: &str = "kdiff3";
/// Directory of the optional post-run helper under the install root
pub const SCRIPT_MERGER_DIR: &str = "WitcherScriptMerger";
/// Executable of the optional post-run helper
pub const SCRIPT_MERGER_EXE: &str = "WitcherScriptMerger.exe";
/// Configuration file name looked up in the working directory
pub const CONFIG_FILENAME: &str = "config.json";
