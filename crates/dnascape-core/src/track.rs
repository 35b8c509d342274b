use serde::Serialize;

use crate::options::GridSpec;
use crate::segment::Chromosome;

/// Evenly spaced sample positions over `[0, max_position]`, both ends included.
pub fn sample_positions(grid: &GridSpec) -> Vec<f64> {
    let last = grid.samples - 1;
    let max = grid.max_position as f64;
    let step = max / last as f64;
    (0..grid.samples)
        .map(|i| if i == last { max } else { i as f64 * step })
        .collect()
}

/// Accumulated segment strength (cM) along one chromosome, sampled on the
/// shared grid. Overlapping segments add.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromosomeTrack {
    pub chromosome: Chromosome,
    /// Sample positions in base pairs, ascending.
    pub positions: Vec<f64>,
    /// Accumulated cM at each position.
    pub heights: Vec<f64>,
}

impl ChromosomeTrack {
    /// A flat (sea-level) track.
    pub fn flat(chromosome: Chromosome, grid: &GridSpec) -> Self {
        let positions = sample_positions(grid);
        let heights = vec![0.0; positions.len()];
        Self { chromosome, positions, heights }
    }

    /// Add `cm` at every sample position `p` with `start <= p <= end`.
    /// Coordinates past the end of the grid cover nothing beyond it.
    pub fn accumulate(&mut self, start: u64, end: u64, cm: f64) {
        let (start, end) = (start as f64, end as f64);
        let lo = self.positions.partition_point(|&p| p < start);
        let hi = self.positions.partition_point(|&p| p <= end);
        if lo < hi {
            for h in &mut self.heights[lo..hi] {
                *h += cm;
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn max_height(&self) -> f64 {
        self.heights.iter().cloned().fold(0.0, f64::max)
    }

    /// `(position, height)` for every sample with positive height.
    pub fn peaks(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.positions
            .iter()
            .zip(&self.heights)
            .filter(|(_, h)| **h > 0.0)
            .map(|(p, h)| (*p, *h))
    }

    /// Height at the sample nearest to `position`.
    /// Returns None if `position` lies beyond the grid.
    pub fn height_at(&self, position: f64) -> Option<f64> {
        let last = *self.positions.last()?;
        if position < 0.0 || position > last {
            return None;
        }
        let step = last / (self.positions.len() - 1) as f64;
        let idx = (position / step).round() as usize;
        self.heights.get(idx.min(self.heights.len() - 1)).copied()
    }
}
