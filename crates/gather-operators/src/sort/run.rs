//! Run segmentation: split the input into maximal strictly increasing runs.

use std::cmp::Ordering;

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer};

#[derive(Debug, Clone)]
pub struct IncreasingSequence<F> {
    comparator: F,
}

/// Emits each maximal run of strictly increasing consecutive elements as one
/// group. A run closes when the next element does not compare greater than
/// the run's last element; the closing element starts the next run.
///
/// Concatenating the emitted runs reproduces the input. Empty input emits
/// nothing.
pub fn increasing_sequence<T, F>(comparator: F) -> IncreasingSequence<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    IncreasingSequence { comparator }
}

/// [`increasing_sequence`] under `T`'s natural order.
pub fn increasing_sequence_natural<T: Ord>() -> IncreasingSequence<fn(&T, &T) -> Ordering> {
    increasing_sequence(<T as Ord>::cmp as fn(&T, &T) -> Ordering)
}

impl<T, F> Gatherer<T> for IncreasingSequence<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// The open run.
    type State = Vec<T>;
    type Output = Vec<T>;

    fn name(&self) -> &'static str {
        "increasing_sequence"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::BUFFERING
    }

    fn initialize(&self) -> Self::State {
        Vec::new()
    }

    fn integrate<D>(&self, run: &mut Vec<T>, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<Vec<T>> + ?Sized,
    {
        let extends = match run.last() {
            None => true,
            Some(last) => (self.comparator)(last, &element) == Ordering::Less,
        };
        if !extends {
            downstream.push(std::mem::take(run));
        }
        run.push(element);
        true
    }

    fn finish<D>(&self, run: Vec<T>, downstream: &mut D)
    where
        D: Downstream<Vec<T>> + ?Sized,
    {
        if !run.is_empty() {
            downstream.push(run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::run;

    #[test]
    fn splits_into_increasing_runs() {
        let g = increasing_sequence_natural();
        assert_eq!(
            run(&g, vec![1, 2, 3, 4, 3, 2, 1, 5, 6, 7]),
            vec![vec![1, 2, 3, 4], vec![3], vec![2], vec![1, 5, 6, 7]]
        );
    }

    #[test]
    fn equal_neighbours_close_the_run() {
        let g = increasing_sequence_natural();
        assert_eq!(run(&g, vec![1, 1, 2]), vec![vec![1], vec![1, 2]]);
    }

    #[test]
    fn single_element_and_empty_input() {
        let g = increasing_sequence_natural();
        assert_eq!(run(&g, vec![42]), vec![vec![42]]);
        assert!(run(&g, Vec::<i32>::new()).is_empty());
    }

    #[test]
    fn strictly_decreasing_input_gives_singletons() {
        let g = increasing_sequence_natural();
        assert_eq!(
            run(&g, vec![3, 2, 1]),
            vec![vec![3], vec![2], vec![1]]
        );
    }

    #[test]
    fn custom_comparator_on_keys() {
        let g = increasing_sequence(|a: &&str, b: &&str| a.len().cmp(&b.len()));
        assert_eq!(
            run(&g, vec!["a", "bb", "cc", "d"]),
            vec![vec!["a", "bb"], vec!["cc"], vec!["d"]]
        );
    }
}
