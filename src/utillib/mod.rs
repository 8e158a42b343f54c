//! Utilities that have nothing to do with benchmarking.

pub mod logging;
