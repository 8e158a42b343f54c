//! Benchmark parameter sweeps over an external program: run it for
//! every combination of branch, key-max, threads, iterations and task,
//! average the repeated tick counts, and write per-group data files
//! for plotting.

pub mod checkout;
pub mod config;
pub mod config_file;
pub mod ctx;
pub mod dimension;
pub mod get_terminal_width;
pub mod group;
pub mod io_utils;
pub mod json5_from_str;
pub mod measure;
pub mod row;
pub mod serde;
pub mod stats;
pub mod sweep;
pub mod utillib;
