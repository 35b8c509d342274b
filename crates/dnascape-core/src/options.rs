//! Build options: the slider values and fixed approximations that drive one
//! landscape build.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allowed range of the minimum-strength slider, in whole cM.
pub const MIN_CM_RANGE: RangeInclusive<u32> = 1..=20;

// ── Sampling grid ─────────────────────────────────────────────────────────────

/// Fixed-resolution sampling grid shared by every chromosome.
///
/// Every ridge uses the same sample count and the same assumed length, even
/// though real chromosomes range from roughly 50 to 250 Mbp. This keeps the
/// ridges visually aligned and is an intentional approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Number of evenly spaced sample points, both ends included.
    pub samples: usize,
    /// Assumed maximum chromosome length in base pairs.
    pub max_position: u64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { samples: 500, max_position: 250_000_000 }
    }
}

// ── Build options ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Segments below this strength (cM) are dropped. Default 5.
    pub min_cm: u32,
    /// Draw chromosome X as an extra ridge below chromosome 22.
    pub include_x: bool,
    /// Above this many distinct matches only the strongest are kept. Default 10.
    pub match_limit: usize,
    /// How many matches survive truncation. Default 5.
    pub top_matches: usize,
    pub grid: GridSpec,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            min_cm: 5,
            include_x: false,
            match_limit: 10,
            top_matches: 5,
            grid: GridSpec::default(),
        }
    }
}

impl BuildOptions {
    /// Parse options from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !MIN_CM_RANGE.contains(&self.min_cm) {
            return Err(ConfigError::MinCmOutOfRange {
                value: self.min_cm,
                min: *MIN_CM_RANGE.start(),
                max: *MIN_CM_RANGE.end(),
            });
        }
        if self.grid.samples < 2 {
            return Err(ConfigError::TooFewSamples(self.grid.samples));
        }
        if self.grid.max_position == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.top_matches == 0 || self.top_matches > self.match_limit {
            return Err(ConfigError::InvalidMatchBounds {
                top: self.top_matches,
                limit: self.match_limit,
            });
        }
        Ok(())
    }
}
