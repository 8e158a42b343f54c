//! Validated string types, with serde implementations that check on
//! deserialization.

pub mod git_branch_name;
pub mod proper_filename;
pub mod task;
