use std::collections::VecDeque;

use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer, OpError};

/// Overlapping windows of `size` consecutive elements, advancing by one.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindow {
    size: usize,
}

/// Emits every full window of `size`. If the input never fills one, the
/// partial buffer is emitted once at end of input instead (so an input
/// shorter than `size`, including an empty one, yields exactly one window).
/// `size` must be at least 1.
pub fn sliding_window(size: usize) -> Result<SlidingWindow, OpError> {
    if size == 0 {
        return Err(OpError::invalid("sliding_window", "size must be at least 1"));
    }
    Ok(SlidingWindow { size })
}

impl SlidingWindow {
    pub fn size(&self) -> usize {
        self.size
    }
}

#[derive(Debug, Clone)]
pub struct WindowState<T> {
    window: VecDeque<T>,
    emitted_full: bool,
}

impl<T> Gatherer<T> for SlidingWindow
where
    T: Clone,
{
    type State = WindowState<T>;
    type Output = Vec<T>;

    fn name(&self) -> &'static str {
        "sliding_window"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::BUFFERING
    }

    fn initialize(&self) -> Self::State {
        WindowState {
            window: VecDeque::with_capacity(self.size),
            emitted_full: false,
        }
    }

    fn integrate<D>(&self, state: &mut WindowState<T>, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<Vec<T>> + ?Sized,
    {
        state.window.push_back(element);
        if state.window.len() == self.size {
            state.emitted_full = true;
            downstream.push(state.window.iter().cloned().collect());
            state.window.pop_front();
        }
        true
    }

    fn finish<D>(&self, state: WindowState<T>, downstream: &mut D)
    where
        D: Downstream<Vec<T>> + ?Sized,
    {
        if !state.emitted_full {
            downstream.push(state.window.into_iter().collect());
        }
    }
}
