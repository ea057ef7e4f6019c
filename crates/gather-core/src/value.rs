//! Value model streamed by the pipeline engine.
//!
//! The generic operators work on any `T`; the engine needs one concrete,
//! serializable element type to run YAML-described pipelines, and that is
//! `Number`. Grouping operators (chunks, windows, runs) produce `Record::Group`.

use std::cmp::Ordering;
use std::fmt;

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

/// A single numeric element. JSON integers decode as `Int`, anything with a
/// fraction or exponent as `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Total order used by the engine's comparators.
    ///
    /// Integers and floats compare by exact numeric value, never through a
    /// lossy `as f64`. Floats follow `f64::total_cmp` except that `-0.0` and
    /// `0.0` are equal (both equal `Int(0)`). Positive NaN sorts after
    /// everything, negative NaN before everything.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Int(a), Number::Float(b)) => cmp_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => cmp_int_float(b, a).reverse(),
            (Number::Float(a), Number::Float(b)) => {
                if a == b {
                    Ordering::Equal
                } else {
                    a.total_cmp(&b)
                }
            }
        }
    }
}

/// 2^63, the first float above every `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }
    // In range, so the floor is an exact i64.
    let floor = f.floor();
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if f > floor => Ordering::Less,
        ord => ord,
    }
}

impl AsPrimitive<f64> for Number {
    fn as_(self) -> f64 {
        self.as_f64()
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// One engine output: a plain number, or a group emitted by a grouping
/// operator (chunk, window, run).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Value(Number),
    Group(Vec<Number>),
}

impl Record {
    pub fn as_value(&self) -> Option<Number> {
        match self {
            Record::Value(n) => Some(*n),
            Record::Group(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Record::Group(_))
    }
}

impl From<Number> for Record {
    fn from(n: Number) -> Self {
        Record::Value(n)
    }
}

impl From<f64> for Record {
    fn from(v: f64) -> Self {
        Record::Value(Number::Float(v))
    }
}

impl From<Vec<Number>> for Record {
    fn from(group: Vec<Number>) -> Self {
        Record::Group(group)
    }
}
