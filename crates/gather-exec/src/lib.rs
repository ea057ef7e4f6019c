#![forbid(unsafe_code)]
//! gather-exec: hosts that drive gatherers, the YAML pipeline engine,
//! deterministic replay hashing, and tracing hooks.
//!
//! - `host`: `drive`, `drive_into`, and the lazy `GatherExt::gather` adapter
//!   for any `Gatherer` over any iterator.
//! - `runtime`: `Engine`, which runs a `ParsedPipeline` over `Number`s and
//!   emits a `RunManifest`.

pub mod host;
pub mod metrics;
pub mod replay;
pub mod runtime;

pub use host::{drive, drive_into, DriveSummary, GatherExt, GatherIter};
pub use runtime::{Engine, ExecError, RunOutput, StageInfo};
