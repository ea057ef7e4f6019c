#![forbid(unsafe_code)]
//! gather-operators: stateful stream stages and the protocol hosts drive them with.
//!
//! Design intent:
//! - Pure and synchronous; a stage never owns its input or output.
//! - Per-run state lives outside the stage value, so one configured stage
//!   can be run any number of times, including concurrently on separate states.
//! - Stages compose with [`Gatherer::and_then`]; hosts live in `gather-exec`.

pub mod chain;
pub mod plan;
pub mod traits;

pub mod average;
pub mod filter;
pub mod identity;
pub mod increasing;
pub mod limit;
pub mod map;
pub mod sort;
pub mod window;

#[cfg(test)]
mod test_util;

pub use chain::{Chain, ChainState};
pub use plan::Characteristics;
pub use traits::{from_fn, Downstream, FnDownstream, Gatherer, OpError};

pub use average::{running_average, AverageState, RunningAverage};
pub use filter::{filter, Filter};
pub use identity::{do_nothing, inspect, DoNothing, Inspect};
pub use increasing::{increasing, increasing_natural, Increasing};
pub use limit::{limit, take_while_including, Limit, TakeWhileIncluding};
pub use map::{flat_map_if, map, FlatMapIf, Map};
pub use sort::{
    increasing_sequence, increasing_sequence_natural, sorted, sorted_natural,
    IncreasingSequence, Sorted,
};
pub use window::{chunks, sliding_window, Chunks, SlidingWindow, WindowState};
