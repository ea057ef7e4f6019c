#![forbid(unsafe_code)]
//! gather-planner: YAML pipelines → validated, optimized step lists.
//!
//! - `dsl::yaml`: the document format and `parse_yaml_pipeline`.
//! - `expr`: the small expression language used by map/filter-like steps.
//! - `rules`: validation and identity-removal.
//! - `physical`: per-step bindings with operator characteristics.

pub mod dsl;
pub mod error;
pub mod expr;
pub mod physical;
pub mod rules;

pub use dsl::yaml::{parse_yaml_pipeline, ParsedPipeline, Pipeline, PipelineConfig, SortOrder, Step};
pub use error::PlanError;
pub use expr::{EvalError, Expr};
pub use physical::{bind, pipeline_characteristics, StepBinding};
