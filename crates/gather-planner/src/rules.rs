//! Validation and lightweight rewrites over parsed steps.

use gather_operators as ops;

use crate::dsl::yaml::Step;
use crate::error::PlanError;
use crate::expr::Expr;

/// Check everything that can be checked before any element flows: step
/// parameters, expression syntax and kind, and that grouping steps are last.
pub fn validate(steps: &[Step]) -> Result<(), PlanError> {
    if steps.is_empty() {
        return Err(PlanError::Invalid("pipeline has no steps".into()));
    }

    let last = steps.len() - 1;
    for (i, step) in steps.iter().enumerate() {
        let at = |e: ops::OpError| PlanError::Invalid(format!("step {i}: {e}"));
        match step {
            Step::Map { expr } => {
                Expr::parse_transform(expr)?;
            }
            Step::Filter { expr } | Step::TakeWhileIncluding { expr } => {
                Expr::parse_predicate(expr)?;
            }
            Step::FlatMapIf { expr, repeat } => {
                Expr::parse_predicate(expr)?;
                if *repeat == 0 {
                    return Err(PlanError::Invalid(format!(
                        "step {i}: flat_map_if repeat must be at least 1"
                    )));
                }
            }
            Step::Limit { n } => {
                ops::limit(*n).map_err(at)?;
            }
            Step::Chunks { size } => {
                ops::chunks(*size).map_err(at)?;
            }
            Step::SlidingWindow { size } => {
                ops::sliding_window(*size).map_err(at)?;
            }
            Step::DoNothing {}
            | Step::Inspect { .. }
            | Step::Increasing { .. }
            | Step::RunningAverage {}
            | Step::Sorted { .. }
            | Step::IncreasingSequence { .. } => {}
        }

        if step.is_grouping() && i != last {
            return Err(PlanError::Invalid(format!(
                "step {i} ('{}') emits groups and must be the last step",
                step.key()
            )));
        }
    }
    Ok(())
}

/// Apply rewrites that never change the output.
///
/// Currently: drop `do_nothing` steps, keeping one if nothing else is left.
pub fn optimize(steps: Vec<Step>) -> Vec<Step> {
    let had_steps = !steps.is_empty();
    let kept: Vec<Step> = steps
        .into_iter()
        .filter(|s| !matches!(s, Step::DoNothing {}))
        .collect();
    if kept.is_empty() && had_steps {
        return vec![Step::DoNothing {}];
    }
    kept
}
