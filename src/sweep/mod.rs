//! Sweeps: the cartesian product of the five dimensions, enumerated
//! branch-major (then key-max, threads, iterations, task).

pub mod runner;

use std::num::NonZeroU32;

use itertools::iproduct;

use crate::{
    dimension::Dimension,
    row::DimensionValue,
    serde::{git_branch_name::GitBranchName, task::Task},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SweepParameters {
    /// `None`: benchmark whatever is currently built, no checkouts
    pub branch: Option<Dimension<GitBranchName>>,
    pub key_max: Dimension<u64>,
    pub threads: Dimension<u64>,
    pub iters: Dimension<u64>,
    pub task: Dimension<Task>,
    /// Number of runs averaged per combination
    pub repeats: NonZeroU32,
}

/// One combination of dimension values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint<'t> {
    pub branch: Option<&'t GitBranchName>,
    pub key_max: u64,
    pub threads: u64,
    pub iters: u64,
    pub task: &'t Task,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanStep<'t> {
    /// Check out and build the branch; precedes all its points
    SwitchBranch(&'t GitBranchName),
    Measure(SweepPoint<'t>),
}

impl SweepParameters {
    fn branch_values(&self) -> Vec<Option<&GitBranchName>> {
        match &self.branch {
            None => vec![None],
            Some(branch) => branch.values().iter().map(Some).collect(),
        }
    }

    fn branch_varies(&self) -> bool {
        self.branch.as_ref().is_some_and(Dimension::varies)
    }

    /// The number of points in the sweep.
    pub fn combinations(&self) -> usize {
        let branches = self.branch.as_ref().map_or(1, Dimension::len);
        branches * self.key_max.len() * self.threads.len() * self.iters.len() * self.task.len()
    }

    /// The names of the dimensions that appear in rows, in row order.
    pub fn varying(&self) -> Vec<&'static str> {
        [
            ("branch", self.branch_varies()),
            ("key_max", self.key_max.varies()),
            ("threads", self.threads.varies()),
            ("iters", self.iters.varies()),
            ("task", self.task.varies()),
        ]
        .into_iter()
        .filter_map(|(name, varies)| varies.then_some(name))
        .collect()
    }

    /// Everything a run does, in order, without doing it.
    pub fn plan(&self) -> impl Iterator<Item = PlanStep<'_>> {
        self.branch_values().into_iter().flat_map(move |branch| {
            let points = iproduct!(
                self.key_max.values(),
                self.threads.values(),
                self.iters.values(),
                self.task.values()
            )
            .map(move |(key_max, threads, iters, task)| {
                PlanStep::Measure(SweepPoint {
                    branch,
                    key_max: *key_max,
                    threads: *threads,
                    iters: *iters,
                    task,
                })
            });
            branch.map(PlanStep::SwitchBranch).into_iter().chain(points)
        })
    }

    /// The row columns for `point`: the values of the varying
    /// dimensions only.
    pub fn row_dimensions(&self, point: &SweepPoint) -> Vec<DimensionValue> {
        let mut dimensions = Vec::new();
        if self.branch_varies() {
            if let Some(branch) = point.branch {
                dimensions.push(branch.clone().into());
            }
        }
        if self.key_max.varies() {
            dimensions.push(point.key_max.into());
        }
        if self.threads.varies() {
            dimensions.push(point.threads.into());
        }
        if self.iters.varies() {
            dimensions.push(point.iters.into());
        }
        if self.task.varies() {
            dimensions.push(point.task.clone().into());
        }
        dimensions
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use anyhow::Result;

    use super::*;

    pub fn params(branch: Option<&str>, iters: &str, repeats: u32) -> Result<SweepParameters> {
        Ok(SweepParameters {
            branch: branch.map(str::parse).transpose()?,
            key_max: Dimension::Fixed(2500),
            threads: Dimension::Fixed(1),
            iters: iters.parse()?,
            task: "r".parse()?,
            repeats: NonZeroU32::new(repeats).expect("test uses non-zero repeats"),
        })
    }

    #[test]
    fn t_plan_order() -> Result<()> {
        let mut p = params(Some("course,std"), "1000,2000", 1)?;
        p.task = "r,w".parse()?;
        let steps: Vec<String> = p
            .plan()
            .map(|step| match step {
                PlanStep::SwitchBranch(b) => format!("switch {b}"),
                PlanStep::Measure(pt) => format!(
                    "{} {} {} {} {}",
                    pt.branch.map(|b| b.as_str()).unwrap_or("-"),
                    pt.key_max,
                    pt.threads,
                    pt.iters,
                    pt.task
                ),
            })
            .collect();
        assert_eq!(
            steps,
            [
                "switch course",
                "course 2500 1 1000 r",
                "course 2500 1 1000 w",
                "course 2500 1 2000 r",
                "course 2500 1 2000 w",
                "switch std",
                "std 2500 1 1000 r",
                "std 2500 1 1000 w",
                "std 2500 1 2000 r",
                "std 2500 1 2000 w",
            ]
        );
        assert_eq!(p.combinations(), 8);
        assert_eq!(p.varying(), ["branch", "iters", "task"]);
        Ok(())
    }

    #[test]
    fn t_plan_without_branch() -> Result<()> {
        let p = params(None, "1000..=3000:1000", 1)?;
        let steps: Vec<_> = p.plan().collect();
        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|s| matches!(s, PlanStep::Measure(pt) if pt.branch.is_none())));
        assert_eq!(p.varying(), ["iters"]);
        Ok(())
    }

    #[test]
    fn t_single_branch_is_not_a_column() -> Result<()> {
        let p = params(Some("course"), "1000", 1)?;
        assert!(p.varying().is_empty());
        let steps: Vec<_> = p.plan().collect();
        assert_eq!(steps.len(), 2);
        if let PlanStep::Measure(pt) = &steps[1] {
            assert!(p.row_dimensions(pt).is_empty());
        } else {
            panic!("expected a measurement step, got {:?}", steps[1]);
        }
        Ok(())
    }
}
