//! Switching the benchmarked program to another branch: check it out
//! and rebuild.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use anyhow::{Result, anyhow, bail};
use run_git::git::GitWorkingDir;
use strum_macros::{Display, EnumString};

use crate::{
    ctx, info,
    io_utils::{
        bash::{bash_string_from_cmd, cmd_as_bash_string},
        exit_status_ext::OutputExt,
    },
    serde::git_branch_name::GitBranchName,
    warn,
};

pub trait BranchSwitcher {
    /// Make the benchmarked program reflect `branch`.
    fn switch_to(&mut self, branch: &GitBranchName) -> Result<()>;
}

impl<B: BranchSwitcher + ?Sized> BranchSwitcher for &mut B {
    fn switch_to(&mut self, branch: &GitBranchName) -> Result<()> {
        (**self).switch_to(branch)
    }
}

/// What to do when `git checkout` or the build command fails.
#[derive(
    Debug,
    Display,
    EnumString,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "kebab_case")]
#[serde(rename_all = "kebab-case")]
pub enum BuildFailurePolicy {
    /// Stop the sweep with an error
    #[default]
    Abort,
    /// Warn, then benchmark whatever executable is there
    Continue,
}

/// The repository holding the benchmarked program's source.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// The Git working directory; the build command runs here, too
    #[serde(default = "default_repository_dir")]
    pub dir: PathBuf,

    /// Program and arguments, not interpreted by a shell
    #[serde(default = "default_build_command")]
    pub build_command: Vec<String>,

    #[serde(default)]
    pub on_build_failure: BuildFailurePolicy,
}

fn default_repository_dir() -> PathBuf {
    ".".into()
}

fn default_build_command() -> Vec<String> {
    vec!["make".into()]
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            dir: default_repository_dir(),
            build_command: default_build_command(),
            on_build_failure: BuildFailurePolicy::default(),
        }
    }
}

impl RepositoryConfig {
    /// The equivalent shell command line, for dry runs.
    pub fn describe_switch(&self, branch: &GitBranchName) -> String {
        format!(
            "cd {} && git checkout {} && {}",
            bash_string_from_cmd([self.dir.to_string_lossy()]),
            bash_string_from_cmd([branch.as_str()]),
            bash_string_from_cmd(&self.build_command)
        )
    }
}

/// `git checkout <branch>`, then the build command if that worked.
#[derive(Debug)]
pub struct GitCheckoutBuild {
    config: RepositoryConfig,
    git_working_dir: GitWorkingDir,
}

impl GitCheckoutBuild {
    pub fn new(config: RepositoryConfig) -> Self {
        let git_working_dir = GitWorkingDir::from(config.dir.clone());
        Self {
            config,
            git_working_dir,
        }
    }

    fn checkout(&self, branch: &GitBranchName) -> Result<()> {
        let quiet = true;
        if self.git_working_dir.git(&["checkout", branch.as_str()], quiet)? {
            Ok(())
        } else {
            bail!(
                "`git checkout {branch}` in {:?} was not successful",
                self.config.dir
            )
        }
    }

    fn build(&self) -> Result<()> {
        let (program, arguments) = self
            .config
            .build_command
            .split_first()
            .ok_or_else(|| anyhow!("the build command is empty"))?;
        let mut command = Command::new(program);
        command
            .args(arguments)
            .current_dir(&self.config.dir)
            .stdin(Stdio::null());
        let cmd_str = cmd_as_bash_string(&command);
        info!("building: {cmd_str} in {:?}", self.config.dir);
        let output = command.output().map_err(ctx!("running {cmd_str}"))?;
        let (status, outputs) = output.status_and_outputs();
        if status.success() {
            Ok(())
        } else {
            bail!(
                "build command {cmd_str} in {:?} exited with {status}, output:\n{outputs}",
                self.config.dir
            )
        }
    }
}

impl BranchSwitcher for GitCheckoutBuild {
    fn switch_to(&mut self, branch: &GitBranchName) -> Result<()> {
        info!("switching to branch {branch} in {:?}", self.config.dir);
        let result = self.checkout(branch).and_then(|()| self.build());
        match (result, self.config.on_build_failure) {
            (Ok(()), _) => Ok(()),
            (Err(e), BuildFailurePolicy::Abort) => {
                Err(e.context(format!("switching to branch {branch}")))
            }
            (Err(e), BuildFailurePolicy::Continue) => {
                warn!(
                    "switching to branch {branch} failed, continuing with \
                     the existing executable: {e:#}"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn t_policy_from_str() {
        assert_eq!(
            BuildFailurePolicy::from_str("continue").ok(),
            Some(BuildFailurePolicy::Continue)
        );
        assert_eq!(BuildFailurePolicy::Abort.to_string(), "abort");
        assert!(BuildFailurePolicy::from_str("ignore").is_err());
    }

    #[test]
    fn t_describe_switch() -> anyhow::Result<()> {
        let config = RepositoryConfig {
            dir: "../fast map".into(),
            ..Default::default()
        };
        assert_eq!(
            config.describe_switch(&"std".parse().map_err(anyhow::Error::msg)?),
            "cd '../fast map' && git checkout std && make"
        );
        Ok(())
    }
}
