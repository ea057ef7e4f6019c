//! Deterministic replay & provenance helpers.
//!
//! The plan hash covers the serialized steps with all their parameters, so two
//! runs of the same pipeline over the same input produce identical
//! `plan_hash`, `inputs_digest` and `outputs_digest`.

use gather_core::hash::{hash_serde, Hash256, StreamDigest};
use gather_core::Record;
use gather_planner::Step;

use crate::ExecError;

pub fn hash_steps(steps: &[Step]) -> Result<Hash256, ExecError> {
    hash_serde(&steps).map_err(|e| ExecError::Hash(e.to_string()))
}

/// Digest over emitted records, in order.
pub fn digest_records(records: &[Record]) -> Result<Hash256, ExecError> {
    let mut d = StreamDigest::new();
    for r in records {
        d.update(r).map_err(|e| ExecError::Hash(e.to_string()))?;
    }
    Ok(d.finalize())
}
