//! The benchmarked program as an external process.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use anyhow::Result;

use crate::{
    ctx, debug,
    io_utils::{bash::cmd_as_bash_string, exit_status_ext::OutputExt},
    measure::{Measure, MeasureError, parse_ticks},
    sweep::SweepPoint,
};

/// Runs `program [arguments..] -k KEY_MAX -t THREADS -i ITERS -a TASK`
/// and reads the tick count from its stdout.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkExecutable {
    /// Relative paths are resolved against `dir`
    pub program: PathBuf,

    /// Passed before the sweep flags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,

    /// Working directory to run in (default: the current one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for BenchmarkExecutable {
    fn default() -> Self {
        Self {
            program: "./main".into(),
            arguments: Vec::new(),
            dir: None,
        }
    }
}

impl BenchmarkExecutable {
    pub fn command(&self, point: &SweepPoint) -> Command {
        let Self {
            program,
            arguments,
            dir,
        } = self;
        let mut command = Command::new(program);
        command
            .args(arguments)
            .arg("-k")
            .arg(point.key_max.to_string())
            .arg("-t")
            .arg(point.threads.to_string())
            .arg("-i")
            .arg(point.iters.to_string())
            .arg("-a")
            .arg(point.task.as_str());
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        command
    }
}

impl Measure for BenchmarkExecutable {
    fn measure(&mut self, point: &SweepPoint) -> Result<u64> {
        let mut command = self.command(point);
        let cmd_str = cmd_as_bash_string(&command);
        debug!("running {cmd_str}");
        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(ctx!("running {cmd_str}"))?;
        let (status, outputs) = output.status_and_outputs();
        if !status.success() {
            return Err(MeasureError::ExitStatus {
                command: cmd_str,
                status,
                output: outputs,
            }
            .into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let ticks = parse_ticks(&stdout).ok_or_else(|| MeasureError::Format {
            command: cmd_str.clone(),
            output: stdout.clone().into_owned(),
        })?;
        debug!("{cmd_str} => {ticks}");
        Ok(ticks)
    }
}
