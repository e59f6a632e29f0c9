//! Configuration types for message flattening.

use serde::{Deserialize, Serialize};

/// Configuration for the message flattener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Fail with a cycle error when an object or array is re-entered while
    /// it is still being flattened.
    ///
    /// When disabled, a self-referential structure recurses without bound.
    pub detect_cycles: bool,

    /// Maximum nesting depth. The record itself is depth 0.
    ///
    /// Defaults to no limit.
    pub max_depth: Option<usize>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: None,
        }
    }
}

impl FlattenConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable cycle detection.
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Unbounded flattening with no cycle detection.
    ///
    /// Only safe for inputs known to be acyclic.
    pub fn unchecked() -> Self {
        Self {
            detect_cycles: false,
            max_depth: None,
        }
    }

    /// Cycle detection plus a conservative depth limit, for untrusted input.
    pub fn strict() -> Self {
        Self {
            detect_cycles: true,
            max_depth: Some(32),
        }
    }
}
