//! Ordering operators: the stable full sort and increasing-run segmentation.

mod run;

pub use run::{increasing_sequence, increasing_sequence_natural, IncreasingSequence};

use std::cmp::Ordering;

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

/// Buffers the whole input and emits it sorted at end of input.
///
/// The sort is stable, so elements comparing equal keep their input order.
/// The input is fully materialized; do not use this on unbounded streams.
#[derive(Debug, Clone)]
pub struct Sorted<F> {
    comparator: F,
}

pub fn sorted<T, F>(comparator: F) -> Sorted<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    Sorted { comparator }
}

/// [`sorted`] under `T`'s natural order.
pub fn sorted_natural<T: Ord>() -> Sorted<fn(&T, &T) -> Ordering> {
    sorted(<T as Ord>::cmp as fn(&T, &T) -> Ordering)
}

impl<T, F> Gatherer<T> for Sorted<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type State = Vec<T>;
    type Output = T;

    fn name(&self) -> &'static str {
        "sorted"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::BUFFERING
    }

    fn initialize(&self) -> Self::State {
        Vec::new()
    }

    fn integrate<D>(&self, buf: &mut Vec<T>, element: T, _downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        buf.push(element);
        true
    }

    fn finish<D>(&self, mut buf: Vec<T>, downstream: &mut D)
    where
        D: Downstream<T> + ?Sized,
    {
        buf.sort_by(|a, b| (self.comparator)(a, b));
        for element in buf {
            if downstream.is_rejecting() {
                break;
            }
            downstream.push(element);
        }
    }
}
