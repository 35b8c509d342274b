use serde::{Deserialize, Serialize};

/// Height band a chromosome falls into, decided once from its peak height.
/// Only selects the marker colour; heights are never altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainCategory {
    Sea,
    Island,
    Hill,
    Mountain,
}

/// Upper bound (inclusive) of the hill band, in cM.
pub const MOUNTAIN_ABOVE: f64 = 20.0;
/// Upper bound (inclusive) of the island band, in cM.
pub const HILL_ABOVE: f64 = 10.0;

impl TerrainCategory {
    /// `> 20` mountain, `(10, 20]` hill, `(0, 10]` island, otherwise sea.
    pub fn classify(max_height: f64) -> Self {
        if max_height > MOUNTAIN_ABOVE {
            TerrainCategory::Mountain
        } else if max_height > HILL_ABOVE {
            TerrainCategory::Hill
        } else if max_height > 0.0 {
            TerrainCategory::Island
        } else {
            TerrainCategory::Sea
        }
    }

    /// CSS colour name used for peak markers.
    pub fn color(self) -> &'static str {
        match self {
            TerrainCategory::Mountain => "firebrick",
            TerrainCategory::Hill => "forestgreen",
            TerrainCategory::Island => "sandybrown",
            TerrainCategory::Sea => "aliceblue",
        }
    }

    /// RGB triple of [`color`](Self::color).
    pub fn rgb(self) -> [u8; 3] {
        match self {
            TerrainCategory::Mountain => [178, 34, 34],
            TerrainCategory::Hill => [34, 139, 34],
            TerrainCategory::Island => [244, 164, 96],
            TerrainCategory::Sea => [240, 248, 255],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TerrainCategory::Mountain => "mountain",
            TerrainCategory::Hill => "hill",
            TerrainCategory::Island => "island",
            TerrainCategory::Sea => "sea",
        }
    }
}
