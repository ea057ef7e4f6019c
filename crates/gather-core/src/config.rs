//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Hard cap on consumed input elements. Buffering stages (sort) hold the
    /// whole input, so unbounded inputs should always set this.
    pub max_input_elements: Option<usize>,

    /// Log every element crossing a stage boundary (requires the `tracing`
    /// feature of `gather-exec`).
    pub trace_elements: bool,
}

impl ExecConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `GATHER_MAX_INPUT_ELEMENTS`: input element cap
    /// - `GATHER_TRACE_ELEMENTS`: `1`/`true` to trace every element
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("GATHER_MAX_INPUT_ELEMENTS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_input_elements = Some(v);
            }
        }

        if let Ok(s) = std::env::var("GATHER_TRACE_ELEMENTS") {
            if let Some(v) = parse_flag(&s) {
                cfg.trace_elements = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_input_elements == Some(0) {
            return Err(Error::Config(
                "max_input_elements must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
