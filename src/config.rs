use std::{num::NonZeroU32, path::PathBuf};

use anyhow::Result;

use crate::{
    checkout::RepositoryConfig,
    config_file::LoadConfigFile,
    dimension::Dimension,
    measure::executable::BenchmarkExecutable,
    serde::{git_branch_name::GitBranchName, task::Task},
    sweep::SweepParameters,
};

/// The sweepbench config file. Fields that are missing take their
/// value from `SweepConfig::default()`, which is the classic sweep:
/// iterations 1000 to 100000 in steps of 1000, on the branches
/// `course` and `std`. Set `branch` to `null` to benchmark the current
/// build without checking anything out.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct SweepConfig {
    /// The program to benchmark
    pub executable: BenchmarkExecutable,

    /// Where branches are checked out and built
    pub repository: RepositoryConfig,

    /// Where the `<key>.data` files go
    pub output_dir: PathBuf,

    /// How many runs to average per combination
    pub repeats: NonZeroU32,

    pub branch: Option<Dimension<GitBranchName>>,
    pub key_max: Dimension<u64>,
    pub threads: Dimension<u64>,
    pub iters: Dimension<u64>,
    pub task: Dimension<Task>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let branches = ["course", "std"]
            .into_iter()
            .map(|s| s.parse().expect("valid branch name"))
            .collect();
        Self {
            executable: BenchmarkExecutable::default(),
            repository: RepositoryConfig::default(),
            output_dir: ".".into(),
            repeats: NonZeroU32::new(10).expect("non-zero"),
            branch: Some(Dimension::Range(branches)),
            key_max: Dimension::Fixed(2500),
            threads: Dimension::Fixed(1),
            iters: Dimension::steps(1000, 100_000, Some(1000)).expect("non-empty range"),
            task: Dimension::Fixed("r".parse().expect("valid task")),
        }
    }
}

impl SweepConfig {
    pub fn sweep_parameters(&self) -> SweepParameters {
        let Self {
            executable: _,
            repository: _,
            output_dir: _,
            repeats,
            branch,
            key_max,
            threads,
            iters,
            task,
        } = self;
        SweepParameters {
            branch: branch.clone(),
            key_max: key_max.clone(),
            threads: threads.clone(),
            iters: iters.clone(),
            task: task.clone(),
            repeats: *repeats,
        }
    }
}

impl LoadConfigFile for SweepConfig {
    fn default_config_path_without_suffix() -> Result<Option<PathBuf>> {
        Ok(Some("sweepbench".into()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{checkout::BuildFailurePolicy, config_file::ConfigBackend};

    use super::*;

    #[test]
    fn t_default_is_classic_sweep() {
        let config = SweepConfig::default();
        let params = config.sweep_parameters();
        assert_eq!(params.combinations(), 200);
        assert_eq!(params.varying(), ["branch", "iters"]);
        assert_eq!(params.repeats.get(), 10);
    }

    #[test]
    fn t_partial_json5() -> Result<()> {
        let config: SweepConfig = ConfigBackend::Json5.decode(
            r#"{
                // only what differs from the defaults
                branch: null,
                iters: { from: 1000, to: 3000, step: 1000 },
                repository: { on_build_failure: "continue" },
                executable: { program: "./bench", arguments: ["--quiet"] },
            }"#,
        )?;
        assert_eq!(config.branch, None);
        assert_eq!(config.iters, Dimension::Range(vec![1000, 2000, 3000]));
        assert_eq!(config.key_max, Dimension::Fixed(2500));
        assert_eq!(
            config.repository.on_build_failure,
            BuildFailurePolicy::Continue
        );
        assert_eq!(config.repository.build_command, ["make"]);
        assert_eq!(config.executable.program, PathBuf::from("./bench"));
        Ok(())
    }

    #[test]
    fn t_yaml() -> Result<()> {
        let config: SweepConfig = ConfigBackend::Yaml.decode(
            "threads: [1, 2, 4]\n\
             task: w\n\
             repeats: 3\n",
        )?;
        assert_eq!(config.threads, Dimension::Range(vec![1, 2, 4]));
        assert_eq!(config.task.to_string(), "w");
        assert_eq!(config.repeats.get(), 3);
        Ok(())
    }

    #[test]
    fn t_rejects_unknown_and_invalid() {
        assert!(ConfigBackend::Json5
            .decode::<SweepConfig>("{ itres: 5 }")
            .is_err());
        assert!(ConfigBackend::Json5
            .decode::<SweepConfig>("{ repeats: 0 }")
            .is_err());
        assert!(ConfigBackend::Json5
            .decode::<SweepConfig>("{ threads: [] }")
            .is_err());
    }

    #[test]
    fn t_reencode() -> Result<()> {
        let no_branch = SweepConfig {
            branch: None,
            ..Default::default()
        };
        for config in [SweepConfig::default(), no_branch] {
            for backend in [ConfigBackend::Json5, ConfigBackend::Yaml, ConfigBackend::Hcl] {
                let s = backend.encode(&config)?;
                let back: SweepConfig = backend.decode(&s)?;
                assert_eq!(back, config);
            }
        }
        Ok(())
    }
}
