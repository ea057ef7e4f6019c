//! Monotonic filter: keeps only elements strictly greater than the last kept one.

use std::cmp::Ordering;

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

#[derive(Debug, Clone)]
pub struct Increasing<F> {
    comparator: F,
}

/// Keeps the first element, then every element that compares strictly
/// greater than the last kept one. Everything else is dropped silently.
pub fn increasing<T, F>(comparator: F) -> Increasing<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    Increasing { comparator }
}

/// [`increasing`] under `T`'s natural order.
pub fn increasing_natural<T: Ord>() -> Increasing<fn(&T, &T) -> Ordering> {
    increasing(<T as Ord>::cmp as fn(&T, &T) -> Ordering)
}

impl<T, F> Gatherer<T> for Increasing<F>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    /// Last kept element.
    type State = Option<T>;
    type Output = T;

    fn name(&self) -> &'static str {
        "increasing"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::STREAMING
    }

    fn initialize(&self) -> Self::State {
        None
    }

    fn integrate<D>(&self, last: &mut Option<T>, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        let keep = match last {
            None => true,
            Some(prev) => (self.comparator)(prev, &element) == Ordering::Less,
        };
        if keep {
            *last = Some(element.clone());
            downstream.push(element);
        }
        true
    }
}
