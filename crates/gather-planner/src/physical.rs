//! Step bindings: the planner's view of each step as an operator instance.
//!
//! The exec runtime instantiates the erased stage for each binding; the CLI's
//! `explain` prints them.

use gather_operators::Characteristics;
use serde::{Deserialize, Serialize};

use crate::dsl::yaml::{ParsedPipeline, SortOrder, Step};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepBinding {
    pub index: usize,
    pub key: String,
    /// Parameters in a compact human-readable form.
    pub detail: String,
    pub characteristics: Characteristics,
}

pub fn bind(pipeline: &ParsedPipeline) -> Vec<StepBinding> {
    pipeline
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| StepBinding {
            index,
            key: step.key().to_string(),
            detail: detail(step),
            characteristics: characteristics(step),
        })
        .collect()
}

/// Characteristics of the whole chain.
pub fn pipeline_characteristics(bindings: &[StepBinding]) -> Option<Characteristics> {
    bindings
        .iter()
        .map(|b| b.characteristics)
        .reduce(Characteristics::then)
}

pub fn characteristics(step: &Step) -> Characteristics {
    match step {
        Step::TakeWhileIncluding { .. } | Step::Limit { .. } => Characteristics::SHORT_CIRCUIT,
        Step::Chunks { .. }
        | Step::SlidingWindow { .. }
        | Step::Sorted { .. }
        | Step::IncreasingSequence { .. } => Characteristics::BUFFERING,
        Step::DoNothing {}
        | Step::Inspect { .. }
        | Step::Map { .. }
        | Step::Filter { .. }
        | Step::FlatMapIf { .. }
        | Step::Increasing { .. }
        | Step::RunningAverage {} => Characteristics::STREAMING,
    }
}

fn detail(step: &Step) -> String {
    let fmt_order = |o: &SortOrder| match o {
        SortOrder::Asc => "order=asc".to_string(),
        SortOrder::Desc => "order=desc".to_string(),
    };
    match step {
        Step::DoNothing {} | Step::RunningAverage {} => String::new(),
        Step::Inspect { label } => label
            .as_deref()
            .map(|l| format!("label={l}"))
            .unwrap_or_default(),
        Step::Map { expr } | Step::Filter { expr } | Step::TakeWhileIncluding { expr } => {
            expr.clone()
        }
        Step::FlatMapIf { expr, repeat } => format!("{expr} repeat={repeat}"),
        Step::Limit { n } => format!("n={n}"),
        Step::Chunks { size } | Step::SlidingWindow { size } => format!("size={size}"),
        Step::Increasing { order }
        | Step::Sorted { order }
        | Step::IncreasingSequence { order } => fmt_order(order),
    }
}
