//! Sweeps against a real process: a shell script standing in for the
//! benchmarked program.

use std::{num::NonZeroU32, path::Path};

use anyhow::Result;
use sweepbench::{
    checkout::{BranchSwitcher, BuildFailurePolicy, GitCheckoutBuild, RepositoryConfig},
    dimension::Dimension,
    group::{group_rows, write_groups},
    measure::{MeasureError, executable::BenchmarkExecutable},
    row::{DimensionValue, ResultSet, Row},
    serde::git_branch_name::GitBranchName,
    sweep::{SweepParameters, runner::run_sweep},
};

/// Prints `iters / 10 + threads`, or misbehaves when the task says so.
const FAKE_BENCHMARK: &str = r#"
while [ $# -gt 0 ]; do
    case "$1" in
        -k) k=$2; shift 2;;
        -t) t=$2; shift 2;;
        -i) i=$2; shift 2;;
        -a) a=$2; shift 2;;
        *) shift;;
    esac
done
case "$a" in
    garbage) echo "took 12 ticks";;
    crash) echo "segfault" >&2; exit 3;;
    *) echo $((i / 10 + t));;
esac
"#;

fn fake_benchmark(dir: &Path) -> Result<BenchmarkExecutable> {
    let script = dir.join("fake-benchmark.sh");
    std::fs::write(&script, FAKE_BENCHMARK)?;
    Ok(BenchmarkExecutable {
        program: "/bin/sh".into(),
        arguments: vec![script.to_string_lossy().into_owned()],
        dir: None,
    })
}

fn params(threads: &str, iters: &str, task: &str) -> Result<SweepParameters> {
    Ok(SweepParameters {
        branch: None,
        key_max: Dimension::Fixed(2500),
        threads: threads.parse()?,
        iters: iters.parse()?,
        task: task.parse()?,
        repeats: NonZeroU32::new(3).expect("non-zero"),
    })
}

struct NoSwitching;
impl BranchSwitcher for NoSwitching {
    fn switch_to(&mut self, branch: &GitBranchName) -> Result<()> {
        anyhow::bail!("no branch dimension given, but asked to switch to {branch}")
    }
}

#[test]
fn sweep_over_iters() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let exe = fake_benchmark(tmp.path())?;
    let result = run_sweep(&params("1", "1000..=3000:1000", "r")?, NoSwitching, exe)?;
    let expected: Vec<Row> = [(1000u64, 101.), (2000, 201.), (3000, 301.)]
        .into_iter()
        .map(|(i, avg)| Row::new(vec![DimensionValue::Int(i)], avg))
        .collect();
    assert_eq!(result, ResultSet::Many(expected));
    Ok(())
}

#[test]
fn single_combination_is_a_bare_value() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let exe = fake_benchmark(tmp.path())?;
    let result = run_sweep(&params("2", "500", "r")?, NoSwitching, exe)?;
    assert_eq!(result, ResultSet::One(Row::Scalar(52.)));
    Ok(())
}

#[test]
fn unparseable_output_is_fatal() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let exe = fake_benchmark(tmp.path())?;
    let err = run_sweep(&params("1", "1000", "garbage")?, NoSwitching, exe)
        .err()
        .expect("must fail");
    match err.downcast_ref::<MeasureError>() {
        Some(MeasureError::Format { output, .. }) => assert_eq!(output, "took 12 ticks\n"),
        other => panic!("expected a format error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn nonzero_exit_is_fatal() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let exe = fake_benchmark(tmp.path())?;
    let err = run_sweep(&params("1", "1000", "crash")?, NoSwitching, exe)
        .err()
        .expect("must fail");
    match err.downcast_ref::<MeasureError>() {
        Some(MeasureError::ExitStatus { status, output, .. }) => {
            assert_eq!(status.code(), Some(3));
            assert!(output.contains("segfault"), "{output}");
        }
        other => panic!("expected an exit status error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn write_data_files_idempotently() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let exe = fake_benchmark(tmp.path())?;
    let out = tmp.path().join("out");
    std::fs::create_dir(&out)?;

    let p = params("1,2", "1000,2000", "r")?;
    for _ in 0..2 {
        let result = run_sweep(&p, NoSwitching, exe.clone())?;
        let groups = group_rows(result.rows())?;
        let paths = write_groups(&groups, &out)?;
        assert_eq!(paths, [out.join("1.data"), out.join("2.data")]);
        assert_eq!(
            std::fs::read_to_string(out.join("1.data"))?,
            "1000\t101\n2000\t201\n"
        );
        assert_eq!(
            std::fs::read_to_string(out.join("2.data"))?,
            "1000\t102\n2000\t202\n"
        );
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(&out)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    assert_eq!(names, ["1.data", "2.data"]);
    Ok(())
}

#[test]
fn build_failure_policy() -> Result<()> {
    // Not a Git repository, so the checkout fails.
    let tmp = tempfile::tempdir()?;
    let branch: GitBranchName = "no-such-branch".parse().map_err(anyhow::Error::msg)?;
    let config = |on_build_failure| RepositoryConfig {
        dir: tmp.path().to_owned(),
        build_command: vec!["true".into()],
        on_build_failure,
    };

    let mut abort = GitCheckoutBuild::new(config(BuildFailurePolicy::Abort));
    assert!(abort.switch_to(&branch).is_err());

    let mut carry_on = GitCheckoutBuild::new(config(BuildFailurePolicy::Continue));
    assert!(carry_on.switch_to(&branch).is_ok());
    Ok(())
}
