//! Stage protocol: the `Gatherer` trait and its `Downstream`.
//!
//! A host (see `gather-exec::host`) drives one run of a gatherer like this:
//!
//! 1. `initialize()` once, producing the run's private state.
//! 2. `integrate(&mut state, element, downstream)` once per element, in
//!    arrival order, until the input ends or a call returns `false`.
//! 3. `finish(state, downstream)` exactly once, also after a stop.
//!
//! The gatherer value itself only holds configuration and caller-supplied
//! functions, so one value can be instantiated any number of times.

use std::collections::VecDeque;

use thiserror::Error;

use crate::plan::Characteristics;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    #[error("invalid configuration for '{op}': {reason}")]
    InvalidConfig { op: &'static str, reason: String },
}

impl OpError {
    pub(crate) fn invalid(op: &'static str, reason: impl Into<String>) -> Self {
        OpError::InvalidConfig {
            op,
            reason: reason.into(),
        }
    }
}

/// Receiver of emitted elements.
///
/// Pushes are delivered synchronously and in order; nothing in the protocol
/// layer buffers or reorders them.
pub trait Downstream<R> {
    fn push(&mut self, item: R);

    /// `true` once this downstream will discard anything pushed to it.
    /// Stages emitting many items per call may stop early when they see it.
    fn is_rejecting(&self) -> bool {
        false
    }
}

impl<R> Downstream<R> for Vec<R> {
    fn push(&mut self, item: R) {
        Vec::push(self, item);
    }
}

impl<R> Downstream<R> for VecDeque<R> {
    fn push(&mut self, item: R) {
        self.push_back(item);
    }
}

impl<R, D> Downstream<R> for &mut D
where
    D: Downstream<R> + ?Sized,
{
    fn push(&mut self, item: R) {
        (**self).push(item);
    }

    fn is_rejecting(&self) -> bool {
        (**self).is_rejecting()
    }
}

/// Closure-backed downstream, see [`from_fn`].
pub struct FnDownstream<F>(F);

impl<R, F> Downstream<R> for FnDownstream<F>
where
    F: FnMut(R),
{
    fn push(&mut self, item: R) {
        (self.0)(item);
    }
}

/// Wrap a closure as a `Downstream`.
pub fn from_fn<R, F>(f: F) -> FnDownstream<F>
where
    F: FnMut(R),
{
    FnDownstream(f)
}

/// Trait that all operators implement.
///
/// Invariants:
/// - `integrate` may push any number of outputs before returning; returning
///   `false` means no further `integrate` call will be made for this state.
/// - State is only ever touched through `&mut` inside these calls, so a run is
///   single-writer by construction.
pub trait Gatherer<T> {
    /// Private per-run state.
    type State;
    /// Emitted element type.
    type Output;

    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Planning hints for hosts; see [`Characteristics`].
    fn characteristics(&self) -> Characteristics;

    /// Fresh state for one run.
    fn initialize(&self) -> Self::State;

    /// Process one element. Returns `true` to keep receiving input.
    fn integrate<D>(&self, state: &mut Self::State, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<Self::Output> + ?Sized;

    /// Flush residual state at end of input. Stages without buffered residue
    /// keep this default.
    fn finish<D>(&self, state: Self::State, downstream: &mut D)
    where
        D: Downstream<Self::Output> + ?Sized,
    {
        let _ = (state, downstream);
    }

    /// Compose with `next`: every output of `self` is integrated into `next`.
    fn and_then<G>(self, next: G) -> crate::chain::Chain<Self, G>
    where
        Self: Sized,
        G: Gatherer<Self::Output>,
    {
        crate::chain::Chain::new(self, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_and_deque_append_in_order() {
        let mut v: Vec<u8> = Vec::new();
        Downstream::push(&mut v, 1);
        Downstream::push(&mut v, 2);
        assert_eq!(v, vec![1, 2]);

        let mut q: VecDeque<u8> = VecDeque::new();
        Downstream::push(&mut q, 3);
        Downstream::push(&mut q, 4);
        assert_eq!(q.pop_front(), Some(3));
    }

    #[test]
    fn closure_downstream_sees_every_item() {
        let mut seen = Vec::new();
        {
            let mut ds = from_fn(|x: i32| seen.push(x * 10));
            ds.push(1);
            ds.push(2);
            assert!(!Downstream::<i32>::is_rejecting(&ds));
        }
        assert_eq!(seen, vec![10, 20]);
    }

    #[test]
    fn invalid_config_message_names_operator() {
        let err = OpError::invalid("chunks", "size must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration for 'chunks': size must be at least 1"
        );
    }
}
