//! Script runtime limits.

use serde::{Deserialize, Serialize};

/// Hardening knobs for the embedded script engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum call depth (valid range: 16-10000).
    pub recursion_limit: u32,
    /// Maximum VM stack size (valid range: 256-1048576).
    pub stack_size_limit: u32,
    /// Iterations allowed per loop before the script is aborted (minimum 1000).
    pub loop_iteration_limit: u64,
    /// Timer callbacks run per flush (valid range: 1-100000).
    pub max_timer_runs: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 512,
            stack_size_limit: 10 * 1024,
            loop_iteration_limit: 1_000_000,
            max_timer_runs: 1_000,
        }
    }
}
