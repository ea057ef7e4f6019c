#![forbid(unsafe_code)]
//! gather-core: shared types for the gather workspace.
//!
//! - `Number` / `Record`: the value model the pipeline engine streams.
//! - `ExecConfig`: engine configuration (env + serde).
//! - `RunManifest` + stable hashing for provenance.
//!
//! The generic operators in `gather-operators` do not depend on these value
//! types; they are only needed by the planner/engine layers.

pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod value;

pub use config::ExecConfig;
pub use error::{Error, Result};
pub use value::{Number, Record};

/// Engine version stamped into manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
