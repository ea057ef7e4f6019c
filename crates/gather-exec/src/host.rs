//! Sequential hosts for a single `Gatherer`.
//!
//! Every host here follows the same protocol: `initialize` once, `integrate`
//! per element in order until the input ends or a call returns `false`, then
//! `finish` exactly once. Nothing is pulled from the input after a stop.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use gather_operators::{Downstream, Gatherer};

/// What a [`drive_into`] call consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveSummary {
    /// Elements pulled from the input, including the one that caused a stop.
    pub consumed: u64,
    /// A stage asked to stop before the input ended.
    pub stopped_early: bool,
}

/// Run `gatherer` over `input`, pushing everything it emits into `downstream`.
pub fn drive_into<T, G, I, D>(gatherer: &G, input: I, downstream: &mut D) -> DriveSummary
where
    G: Gatherer<T>,
    I: IntoIterator<Item = T>,
    D: Downstream<G::Output> + ?Sized,
{
    let mut state = gatherer.initialize();
    let mut summary = DriveSummary::default();
    for element in input {
        summary.consumed += 1;
        if !gatherer.integrate(&mut state, element, downstream) {
            summary.stopped_early = true;
            break;
        }
    }
    gatherer.finish(state, downstream);
    summary
}

/// Run `gatherer` over `input` and collect its output in emission order.
pub fn drive<T, G, I>(gatherer: &G, input: I) -> Vec<G::Output>
where
    G: Gatherer<T>,
    I: IntoIterator<Item = T>,
{
    let mut out = Vec::new();
    drive_into(gatherer, input, &mut out);
    out
}

/// Lazy adapter produced by [`GatherExt::gather`].
///
/// Input is pulled only when no produced output is waiting.
pub struct GatherIter<I, G>
where
    I: Iterator,
    G: Gatherer<I::Item>,
{
    input: I,
    gatherer: G,
    /// `None` once `finish` has run.
    state: Option<G::State>,
    pending: VecDeque<G::Output>,
}

impl<I, G> GatherIter<I, G>
where
    I: Iterator,
    G: Gatherer<I::Item>,
{
    pub fn new(input: I, gatherer: G) -> Self {
        let state = gatherer.initialize();
        Self {
            input,
            gatherer,
            state: Some(state),
            pending: VecDeque::new(),
        }
    }
}

impl<I, G> Iterator for GatherIter<I, G>
where
    I: Iterator,
    G: Gatherer<I::Item>,
{
    type Item = G::Output;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }
            let state = self.state.as_mut()?;
            let keep_going = match self.input.next() {
                Some(element) => self.gatherer.integrate(state, element, &mut self.pending),
                None => false,
            };
            if !keep_going {
                if let Some(state) = self.state.take() {
                    self.gatherer.finish(state, &mut self.pending);
                }
            }
        }
    }
}

impl<I, G> FusedIterator for GatherIter<I, G>
where
    I: Iterator,
    G: Gatherer<I::Item>,
{
}

pub trait GatherExt: Iterator + Sized {
    /// Lazily run `gatherer` over this iterator.
    fn gather<G>(self, gatherer: G) -> GatherIter<Self, G>
    where
        G: Gatherer<Self::Item>,
    {
        GatherIter::new(self, gatherer)
    }
}

impl<I: Iterator> GatherExt for I {}
