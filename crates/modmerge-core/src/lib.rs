//! Merge orchestration for carrying game script mods across a version upgrade.
//!
//! The pipeline runs strictly forward: [`collect`] gathers the changed paths
//! and candidate files, [`resolve`] pairs them into [`MergeTask`]s, and the
//! [`merge`] module backs up each mod file and drives the decision loop that
//! invokes the external three-way-merge tool. [`session`] wires it together.

pub mod collect;
pub mod config;
pub mod launcher;
pub mod merge;
pub mod paths;
pub mod resolve;
pub mod session;
pub mod utils;
pub mod vcs;

pub use config::{Config, Mode};
pub use merge::{MergeError, MergeTask};
pub use paths::RelativePath;
