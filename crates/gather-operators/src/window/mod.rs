//! Windowing and chunking operators.
//!
//! Both emit owned `Vec<T>` snapshots: a snapshot never aliases the operator's
//! internal buffer, so later input cannot change an already emitted group.

mod chunks;
mod sliding;

pub use chunks::{chunks, Chunks};
pub use sliding::{sliding_window, SlidingWindow, WindowState};
