//! Minimal protocol-conforming driver for unit tests.

use crate::traits::Gatherer;

/// Initialize once, integrate until the input ends or a stop, finish once.
pub(crate) fn run<T, G>(gatherer: &G, input: impl IntoIterator<Item = T>) -> Vec<G::Output>
where
    G: Gatherer<T>,
{
    let mut state = gatherer.initialize();
    let mut out = Vec::new();
    for element in input {
        if !gatherer.integrate(&mut state, element, &mut out) {
            break;
        }
    }
    gatherer.finish(state, &mut out);
    out
}
