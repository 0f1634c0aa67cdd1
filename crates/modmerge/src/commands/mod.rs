pub mod merge;
pub mod rollback;
