//! Leveled logging to stderr, with a global level set once from the
//! command line options.

use std::{
    io::{StderrLock, Write, stderr},
    sync::atomic::{AtomicU8, Ordering},
};

use anyhow::{Result, bail};
use chrono::{Local, SecondsFormat};

/// Start a log line: locks stderr and writes the timestamp and source
/// location; the caller writes the message.
pub fn write_time(file: &str, line: u32, column: u32) -> StderrLock<'static> {
    let t_str = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
    let mut lock = stderr().lock();
    write!(&mut lock, "{t_str}\t{file}:{line}:{column}\t").expect("stderr must not fail");
    lock
}

// Fields are private, go through `TryFrom`.
#[derive(Debug, clap::Args)]
pub struct LogLevelOpt {
    /// Show each branch switch and each measured combination
    #[clap(short, long)]
    verbose: bool,

    /// Also show every single sample and command line (implies
    /// `--verbose`)
    #[clap(short, long)]
    debug: bool,

    /// Disable warnings, e.g. about ignored build failures. Conflicts
    /// with `--verbose` and `--debug`.
    #[clap(short, long)]
    quiet: bool,
}

impl TryFrom<LogLevelOpt> for LogLevel {
    type Error = anyhow::Error;

    fn try_from(value: LogLevelOpt) -> Result<Self> {
        let LogLevelOpt {
            verbose,
            debug,
            quiet,
        } = value;
        match (quiet, debug, verbose) {
            (true, false, false) => Ok(LogLevel::Quiet),
            (true, _, _) => {
                bail!("option `--quiet` conflicts with the options `--verbose` and `--debug`")
            }
            (false, true, _) => Ok(LogLevel::Debug),
            (false, false, true) => Ok(LogLevel::Info),
            (false, false, false) => Ok(LogLevel::Warn),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Do not log anything
    Quiet = 0,
    /// The default: only `warn!` statements output anything
    Warn = 1,
    /// Progress information for the user
    Info = 2,
    /// Everything, for debugging this program or the benchmarked one
    Debug = 3,
}

impl LogLevel {
    fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(LogLevel::Quiet),
            1 => Some(LogLevel::Warn),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

static LOGLEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);

pub fn set_log_level(val: LogLevel) {
    LOGLEVEL.store(val as u8, Ordering::Relaxed);
}

#[inline]
pub fn log_level() -> LogLevel {
    let level = LOGLEVEL.load(Ordering::Relaxed);
    LogLevel::from_level(level).expect("only valid levels are ever stored")
}

#[macro_export]
macro_rules! warn {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Warn {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[macro_export]
macro_rules! info {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Info {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[macro_export]
macro_rules! debug {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Debug {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}
