//! Taking one sample at a sweep point.

pub mod executable;

use std::process::ExitStatus;

use anyhow::Result;

use crate::sweep::SweepPoint;

pub trait Measure {
    /// Run the benchmark once at `point`, returning the tick count.
    fn measure(&mut self, point: &SweepPoint) -> Result<u64>;
}

impl<M: Measure + ?Sized> Measure for &mut M {
    fn measure(&mut self, point: &SweepPoint) -> Result<u64> {
        (**self).measure(point)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("output of {command} is not a base-10 tick count: {output:?}")]
    Format { command: String, output: String },
    #[error("{command} exited with {status}, output:\n{output}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
        output: String,
    },
}

/// Parse the stdout of the benchmarked program: one unsigned decimal
/// integer, surrounding whitespace allowed.
pub fn parse_ticks(stdout: &str) -> Option<u64> {
    let s = stdout.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[test]
fn t_parse_ticks() {
    assert_eq!(parse_ticks("12345\n"), Some(12345));
    assert_eq!(parse_ticks("  7 "), Some(7));
    assert_eq!(parse_ticks(""), None);
    assert_eq!(parse_ticks("+7"), None);
    assert_eq!(parse_ticks("-7"), None);
    assert_eq!(parse_ticks("0x10"), None);
    assert_eq!(parse_ticks("12 ms"), None);
    assert_eq!(parse_ticks("99999999999999999999999"), None);
}
