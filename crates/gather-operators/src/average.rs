//! Running accumulator: mean of everything seen so far.

use num_traits::AsPrimitive;

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

#[derive(Debug, Default, Clone, Copy)]
pub struct RunningAverage;

/// Emits, after each input, the arithmetic mean of all inputs so far.
/// Inputs are converted with `as f64`.
pub fn running_average() -> RunningAverage {
    RunningAverage
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AverageState {
    pub sum: f64,
    pub count: u64,
}

impl<T> Gatherer<T> for RunningAverage
where
    T: AsPrimitive<f64>,
{
    type State = AverageState;
    type Output = f64;

    fn name(&self) -> &'static str {
        "running_average"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::STREAMING
    }

    fn initialize(&self) -> Self::State {
        AverageState::default()
    }

    fn integrate<D>(&self, state: &mut AverageState, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<f64> + ?Sized,
    {
        state.sum += element.as_();
        state.count += 1;
        downstream.push(state.sum / state.count as f64);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::run;

    #[test]
    fn averages_integers() {
        let out = run(&running_average(), vec![1, 2, 3, 4, 3, 2]);
        assert_eq!(out, vec![1.0, 1.5, 2.0, 2.5, 2.6, 2.5]);
    }

    #[test]
    fn averages_floats_and_small_ints() {
        assert_eq!(run(&running_average(), vec![0.5f32, 1.5]), vec![0.5, 1.0]);
        assert_eq!(run(&running_average(), vec![255u8, 1]), vec![255.0, 128.0]);
    }

    #[test]
    fn empty_input_emits_nothing() {
        assert!(run(&running_average(), Vec::<i64>::new()).is_empty());
    }
}
