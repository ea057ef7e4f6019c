//! Pass-through operators: `do_nothing` and `inspect`.

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

/// Emits every element unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoNothing;

pub fn do_nothing() -> DoNothing {
    DoNothing
}

impl<T> Gatherer<T> for DoNothing {
    type State = ();
    type Output = T;

    fn name(&self) -> &'static str {
        "do_nothing"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::STREAMING
    }

    fn initialize(&self) -> Self::State {}

    fn integrate<D>(&self, _state: &mut (), element: T, downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        downstream.push(element);
        true
    }
}

/// Calls an observer on every element, then emits it unchanged.
///
/// A panicking observer unwinds through the host; nothing here catches it.
#[derive(Debug, Clone)]
pub struct Inspect<F> {
    observer: F,
}

pub fn inspect<T, F>(observer: F) -> Inspect<F>
where
    F: Fn(&T),
{
    Inspect { observer }
}

impl<T, F> Gatherer<T> for Inspect<F>
where
    F: Fn(&T),
{
    type State = ();
    type Output = T;

    fn name(&self) -> &'static str {
        "inspect"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::STREAMING
    }

    fn initialize(&self) -> Self::State {}

    fn integrate<D>(&self, _state: &mut (), element: T, downstream: &mut D) -> bool
    where
        D: Downstream<T> + ?Sized,
    {
        (self.observer)(&element);
        downstream.push(element);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::test_util::run;

    #[test]
    fn do_nothing_is_identity() {
        assert_eq!(run(&do_nothing(), vec![1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(run(&do_nothing(), Vec::<u8>::new()), Vec::<u8>::new());
    }

    #[test]
    fn inspect_observes_in_order_and_passes_through() {
        let seen = RefCell::new(Vec::new());
        let g = inspect(|x: &i32| seen.borrow_mut().push(*x));
        assert_eq!(run(&g, vec![1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "observer failed")]
    fn inspect_observer_panic_propagates() {
        let g = inspect(|x: &i32| {
            if *x == 2 {
                panic!("observer failed");
            }
        });
        run(&g, vec![1, 2, 3]);
    }
}
