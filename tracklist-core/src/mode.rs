//! Aggregation mode configuration for Tracklist.

use serde::{Deserialize, Serialize};

/// How provider failures shape the overall resolve response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Every successful provider is returned; the call fails only when all
    /// selected providers failed
    Partial,
    /// Any provider failure fails the whole call with a single message body
    Strict,
}

impl AggregationMode {
    /// Check if any single provider failure fails the call.
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl Default for AggregationMode {
    fn default() -> Self {
        Self::Partial
    }
}

impl std::fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Partial => write!(f, "partial"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for AggregationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "partial" => Ok(Self::Partial),
            "strict" | "all-or-nothing" => Ok(Self::Strict),
            _ => Err(format!(
                "Invalid aggregation mode: '{s}'. Valid options are: partial, strict"
            )),
        }
    }
}
