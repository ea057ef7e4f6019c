//! Sequential composition of two gatherers.

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

/// `first` followed by `second`; built with [`Gatherer::and_then`].
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

pub struct ChainState<SA, SB> {
    first: SA,
    second: SB,
    second_stopped: bool,
}

/// Downstream that feeds every pushed item into the next stage.
struct Link<'a, G, S, D: ?Sized> {
    gatherer: &'a G,
    state: &'a mut S,
    stopped: &'a mut bool,
    downstream: &'a mut D,
}

impl<'a, U, G, S, D> Downstream<U> for Link<'a, G, S, D>
where
    G: Gatherer<U, State = S>,
    D: Downstream<G::Output> + ?Sized,
{
    fn push(&mut self, item: U) {
        if *self.stopped {
            return;
        }
        if !self
            .gatherer
            .integrate(&mut *self.state, item, &mut *self.downstream)
        {
            *self.stopped = true;
        }
    }

    fn is_rejecting(&self) -> bool {
        *self.stopped || self.downstream.is_rejecting()
    }
}

impl<T, A, B> Gatherer<T> for Chain<A, B>
where
    A: Gatherer<T>,
    B: Gatherer<A::Output>,
{
    type State = ChainState<A::State, B::State>;
    type Output = B::Output;

    fn name(&self) -> &'static str {
        "chain"
    }

    fn characteristics(&self) -> Characteristics {
        self.first
            .characteristics()
            .then(self.second.characteristics())
    }

    fn initialize(&self) -> Self::State {
        ChainState {
            first: self.first.initialize(),
            second: self.second.initialize(),
            second_stopped: false,
        }
    }

    fn integrate<D>(&self, state: &mut Self::State, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<Self::Output> + ?Sized,
    {
        let mut link = Link {
            gatherer: &self.second,
            state: &mut state.second,
            stopped: &mut state.second_stopped,
            downstream,
        };
        let first_continues = self.first.integrate(&mut state.first, element, &mut link);
        first_continues && !state.second_stopped
    }

    fn finish<D>(&self, state: Self::State, downstream: &mut D)
    where
        D: Downstream<Self::Output> + ?Sized,
    {
        let ChainState {
            first,
            mut second,
            mut second_stopped,
        } = state;

        // `first` is finished even when `second` already stopped; its residue
        // is dropped by the link in that case.
        let mut link = Link {
            gatherer: &self.second,
            state: &mut second,
            stopped: &mut second_stopped,
            downstream: &mut *downstream,
        };
        self.first.finish(first, &mut link);
        self.second.finish(second, downstream);
    }
}
