use anyhow::{Result, anyhow};

use crate::{
    checkout::BranchSwitcher,
    debug, info,
    measure::Measure,
    row::{ResultSet, Row},
    stats::Mean,
    sweep::{PlanStep, SweepParameters},
};

/// Run every point of the sweep `params.repeats` times and average.
/// Any error aborts the whole sweep; no partial results are returned.
pub fn run_sweep(
    params: &SweepParameters,
    mut switcher: impl BranchSwitcher,
    mut measure: impl Measure,
) -> Result<ResultSet> {
    let repeats = params.repeats.get();
    let mut rows = Vec::with_capacity(params.combinations());
    for step in params.plan() {
        match step {
            PlanStep::SwitchBranch(branch) => switcher.switch_to(branch)?,
            PlanStep::Measure(point) => {
                let samples = (0..repeats)
                    .map(|i| {
                        let ticks = measure.measure(&point)?;
                        debug!("sample {}/{repeats} at {point:?}: {ticks}", i + 1);
                        Ok(ticks)
                    })
                    .collect::<Result<Vec<u64>>>()?;
                let average = samples
                    .mean()
                    .ok_or_else(|| anyhow!("bug: repeats is non-zero"))?;
                info!("{point:?}: average {average} over {repeats} runs");
                rows.push(Row::new(params.row_dimensions(&point), average));
            }
        }
    }
    Ok(ResultSet::from_rows(rows))
}
