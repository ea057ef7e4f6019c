//! Early-termination operators: `take_while_including` and `limit`.
//!
//! Both emit the element that triggers the stop, then return `false`; the host
//! must not deliver anything after that.

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer, OpError};

#[derive(Debug, Clone)]
pub struct TakeWhileIncluding<P> {
    predicate: P,
}

/// Emits elements while `predicate` holds, plus the first one that fails it.
pub fn take_while_including<T, P>(predicate: P) -> TakeWhileIncluding<P>
where
    P: Fn(&T) -> bool,
{
    TakeWhileIncluding { predicate }
}

impl<T, P> Gatherer<T> for TakeWhileIncluding<P>
where
    P: Fn(&T) -> bool,
{
    type State = ();
    type Output = T;

    fn name(&self) -> &'static str {
        "take_while_including"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::SHORT_CIRCUIT
    }

    fn initialize(&self) -> Self::State {}

    fn integrate<D>(&self, _state: &mut (), element: T, downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        let keep_going = (self.predicate)(&element);
        downstream.push(element);
        keep_going
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Limit {
    n: usize,
}

/// Emits the first `n` elements. `n` must be at least 1.
pub fn limit(n: usize) -> Result<Limit, OpError> {
    if n == 0 {
        return Err(OpError::invalid("limit", "n must be at least 1"));
    }
    Ok(Limit { n })
}

impl Limit {
    pub fn n(&self) -> usize {
        self.n
    }
}

impl<T> Gatherer<T> for Limit {
    /// Elements seen so far.
    type State = usize;
    type Output = T;

    fn name(&self) -> &'static str {
        "limit"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::SHORT_CIRCUIT
    }

    fn initialize(&self) -> Self::State {
        0
    }

    fn integrate<D>(&self, seen: &mut usize, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        *seen += 1;
        downstream.push(element);
        *seen < self.n
    }
}
