//! Filter operator: keeps elements matching a predicate.

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

#[derive(Debug, Clone)]
pub struct Filter<P> {
    predicate: P,
}

pub fn filter<T, P>(predicate: P) -> Filter<P>
where
    P: Fn(&T) -> bool,
{
    Filter { predicate }
}

impl<T, P> Gatherer<T> for Filter<P>
where
    P: Fn(&T) -> bool,
{
    type State = ();
    type Output = T;

    fn name(&self) -> &'static str {
        "filter"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::STREAMING
    }

    fn initialize(&self) -> Self::State {}

    fn integrate<D>(&self, _state: &mut (), element: T, downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        if (self.predicate)(&element) {
            downstream.push(element);
        }
        true
    }
}
