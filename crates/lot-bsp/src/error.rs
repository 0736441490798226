//! Error types for partitioning runs.

use thiserror::Error;

/// A single configuration constraint that does not hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigIssue {
    #[error("target lot count must be positive")]
    ZeroTarget,

    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("minimum lot {axis} ({min}) exceeds maximum ({max})")]
    SizeBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("minimum split count on the {axis} axis must be at least 1, got {min}")]
    ZeroSplit { axis: &'static str, min: u32 },

    #[error("minimum split count on the {axis} axis ({min}) exceeds maximum ({max})")]
    SplitBounds {
        axis: &'static str,
        min: u32,
        max: u32,
    },

    #[error("split count on the {axis} axis exceeds {limit}, got {max}")]
    SplitTooLarge {
        axis: &'static str,
        max: u32,
        limit: u32,
    },

    #[error("round ceiling must be positive")]
    ZeroRounds,

    #[error("stagnation limit must be positive")]
    ZeroStagnation,
}

/// Returned when a partitioning run is refused before it starts.
///
/// Lists every failed constraint, not only the first one.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid partition configuration: {}", list(.issues))]
pub struct ConfigError {
    issues: Vec<ConfigIssue>,
}

impl ConfigError {
    pub(crate) fn new(issues: Vec<ConfigIssue>) -> Self {
        debug_assert!(!issues.is_empty(), "ConfigError needs at least one issue");
        Self { issues }
    }

    /// The constraints that failed, in the order they were checked.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }
}

fn list(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
