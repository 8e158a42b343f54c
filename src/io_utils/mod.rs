pub mod bash;
pub mod exit_status_ext;
pub mod tempfile_utils;
