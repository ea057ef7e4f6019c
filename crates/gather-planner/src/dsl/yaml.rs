//! YAML front-end for linear pipelines.
//!
//! Example:
//! ```yaml
//! config:
//!   max_input_elements: 1000000
//! steps:
//!   - op: filter
//!     expr: "x % 2 == 1"
//!   - op: map
//!     expr: "x * 10"
//!   - op: limit
//!     n: 10
//!   - op: chunks
//!     size: 3
//! ```

use gather_core::ExecConfig;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::rules;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    pub steps: Vec<Step>,
}

/// Element order for comparator-driven steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

fn default_repeat() -> usize {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    // Braced so that stray keys are rejected like on every other step.
    DoNothing {},
    Inspect {
        #[serde(default)]
        label: Option<String>,
    },
    Map {
        expr: String,
    },
    Filter {
        expr: String,
    },
    /// Emits the element `repeat` times where `expr` holds.
    FlatMapIf {
        expr: String,
        #[serde(default = "default_repeat")]
        repeat: usize,
    },
    TakeWhileIncluding {
        expr: String,
    },
    Limit {
        n: usize,
    },
    Increasing {
        #[serde(default)]
        order: SortOrder,
    },
    RunningAverage {},
    Chunks {
        size: usize,
    },
    SlidingWindow {
        size: usize,
    },
    Sorted {
        #[serde(default)]
        order: SortOrder,
    },
    IncreasingSequence {
        #[serde(default)]
        order: SortOrder,
    },
}

impl Step {
    /// Operator key, matching the `op` tag.
    pub fn key(&self) -> &'static str {
        match self {
            Step::DoNothing {} => "do_nothing",
            Step::Inspect { .. } => "inspect",
            Step::Map { .. } => "map",
            Step::Filter { .. } => "filter",
            Step::FlatMapIf { .. } => "flat_map_if",
            Step::TakeWhileIncluding { .. } => "take_while_including",
            Step::Limit { .. } => "limit",
            Step::Increasing { .. } => "increasing",
            Step::RunningAverage {} => "running_average",
            Step::Chunks { .. } => "chunks",
            Step::SlidingWindow { .. } => "sliding_window",
            Step::Sorted { .. } => "sorted",
            Step::IncreasingSequence { .. } => "increasing_sequence",
        }
    }

    /// Emits groups rather than numbers.
    pub fn is_grouping(&self) -> bool {
        matches!(
            self,
            Step::Chunks { .. } | Step::SlidingWindow { .. } | Step::IncreasingSequence { .. }
        )
    }
}

/// The `config:` block. Fields left out keep whatever the caller had.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub max_input_elements: Option<usize>,
    pub trace_elements: Option<bool>,
}

impl PipelineConfig {
    /// Overlay this block onto `cfg`.
    pub fn apply_to(&self, cfg: &mut ExecConfig) {
        if let Some(n) = self.max_input_elements {
            cfg.max_input_elements = Some(n);
        }
        if let Some(t) = self.trace_elements {
            cfg.trace_elements = t;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPipeline {
    pub steps: Vec<Step>,
    pub config: PipelineConfig,
}

/// Parse, validate, and optimize a YAML pipeline.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline, PlanError> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    rules::validate(&doc.steps)?;
    Ok(ParsedPipeline {
        steps: rules::optimize(doc.steps),
        config: doc.config.unwrap_or_default(),
    })
}
