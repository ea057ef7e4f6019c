//! Operator planning surface: `Characteristics`.
//!
//! Hosts and the CLI `explain` command read these; they never change what an
//! operator emits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Static properties of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristics {
    /// Output depends on seeing elements in true arrival order.
    pub sequential: bool,
    /// Never returns `false` from `integrate` on its own.
    pub greedy: bool,
    /// May hold elements back until `finish`.
    pub buffering: bool,
}

impl Characteristics {
    /// One-in, zero-or-more-out, never stops, nothing held back.
    pub const STREAMING: Self = Self {
        sequential: true,
        greedy: true,
        buffering: false,
    };

    /// May stop the input early.
    pub const SHORT_CIRCUIT: Self = Self {
        sequential: true,
        greedy: false,
        buffering: false,
    };

    /// Holds elements and flushes them in `finish`.
    pub const BUFFERING: Self = Self {
        sequential: true,
        greedy: true,
        buffering: true,
    };

    /// Characteristics of `self` followed by `next`.
    pub fn then(self, next: Self) -> Self {
        Self {
            sequential: self.sequential || next.sequential,
            greedy: self.greedy && next.greedy,
            buffering: self.buffering || next.buffering,
        }
    }
}

/// Comma-separated set flags, e.g. `sequential, greedy`.
impl fmt::Display for Characteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<&str> = [
            (self.sequential, "sequential"),
            (self.greedy, "greedy"),
            (self.buffering, "buffering"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
        f.write_str(&flags.join(", "))
    }
}
