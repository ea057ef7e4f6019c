//! Deterministic run manifest for audit/replay.
//!
//! The engine emits a manifest after a successful run; identical steps and
//! identical input produce identical `plan_hash`, `inputs_digest` and
//! `outputs_digest`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    /// Stable hash of the pipeline steps (and their parameters).
    pub plan_hash: Hash256,

    /// Engine version string for provenance.
    pub engine_version: String,

    /// Digest over the consumed input elements.
    pub inputs_digest: Option<Hash256>,

    /// Digest over the emitted records.
    pub outputs_digest: Option<Hash256>,

    /// Input elements actually consumed (never counts past a stop).
    pub elements_in: u64,
    pub records_out: u64,

    /// A stage asked the host to stop pulling input.
    pub stopped_early: bool,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(plan_hash: Hash256, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            plan_hash,
            engine_version: crate::VERSION.to_string(),
            inputs_digest: None,
            outputs_digest: None,
            elements_in: 0,
            records_out: 0,
            stopped_early: false,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(
        mut self,
        finished_ms: u64,
        inputs_digest: Option<Hash256>,
        outputs_digest: Option<Hash256>,
    ) -> Self {
        self.finished_ms = finished_ms;
        self.inputs_digest = inputs_digest;
        self.outputs_digest = outputs_digest;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.started_ms)
    }
}
