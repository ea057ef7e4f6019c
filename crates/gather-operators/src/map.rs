//! Map operators: 1-to-1 `map` and the conditional expansion `flat_map_if`.

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

#[derive(Debug, Clone)]
pub struct Map<F> {
    transform: F,
}

/// Emits `transform(element)` for every input.
pub fn map<T, R, F>(transform: F) -> Map<F>
where
    F: Fn(T) -> R,
{
    Map { transform }
}

impl<T, R, F> Gatherer<T> for Map<F>
where
    F: Fn(T) -> R,
{
    type State = ();
    type Output = R;

    fn name(&self) -> &'static str {
        "map"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::STREAMING
    }

    fn initialize(&self) -> Self::State {}

    fn integrate<D>(&self, _state: &mut (), element: T, downstream: &mut D) -> bool
    where
        D: Downstream<R> + ?Sized,
    {
        downstream.push((self.transform)(element));
        true
    }
}

#[derive(Debug, Clone)]
pub struct FlatMapIf<P, E> {
    predicate: P,
    expand: E,
}

/// Where `predicate` holds, emits every item of `expand(element)` in order;
/// elsewhere emits the element unchanged.
///
/// `expand` must return a finite sequence.
pub fn flat_map_if<T, I, P, E>(predicate: P, expand: E) -> FlatMapIf<P, E>
where
    P: Fn(&T) -> bool,
    E: Fn(T) -> I,
    I: IntoIterator<Item = T>,
{
    FlatMapIf { predicate, expand }
}

impl<T, I, P, E> Gatherer<T> for FlatMapIf<P, E>
where
    P: Fn(&T) -> bool,
    E: Fn(T) -> I,
    I: IntoIterator<Item = T>,
{
    type State = ();
    type Output = T;

    fn name(&self) -> &'static str {
        "flat_map_if"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::STREAMING
    }

    fn initialize(&self) -> Self::State {}

    fn integrate<D>(&self, _state: &mut (), element: T, downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        if !(self.predicate)(&element) {
            downstream.push(element);
            return true;
        }
        for item in (self.expand)(element) {
            if downstream.is_rejecting() {
                break;
            }
            downstream.push(item);
        }
        true
    }
}
