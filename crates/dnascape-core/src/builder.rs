//! Topography builder: runs all landscape stages in order.

use log::{debug, warn};
use serde::Serialize;

use crate::error::ConfigError;
use crate::matches::{select_matches, MatchSelection};
use crate::options::BuildOptions;
use crate::scene::{Layout, Scene, Trace};
use crate::segment::{Chromosome, SegmentTable};
use crate::terrain::TerrainCategory;
use crate::track::ChromosomeTrack;

#[cfg(feature = "threading")]
use rayon::prelude::*;

// ── Output structs ────────────────────────────────────────────────────────────

/// User-facing message produced while building.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Too many matches; only the strongest were drawn.
    MatchesTruncated { total: usize, shown: usize },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::MatchesTruncated { total, shown } => write!(
                f,
                "The file contains {total} matches. Showing only the {shown} strongest for clarity."
            ),
        }
    }
}

/// Per-chromosome outcome of a build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromosomeSummary {
    pub chromosome: Chromosome,
    pub max_height: f64,
    pub category: TerrainCategory,
    /// Surviving segments on this chromosome.
    pub segments: usize,
}

/// Full output of one landscape build.
#[derive(Debug, Clone)]
pub struct Topography {
    pub scene: Scene,
    pub tracks: Vec<ChromosomeTrack>,
    pub summaries: Vec<ChromosomeSummary>,
    pub selection: MatchSelection,
    pub notices: Vec<Notice>,
    /// Rows that passed the threshold and match selection.
    pub filtered: SegmentTable,
}

// ── Builder ───────────────────────────────────────────────────────────────────

pub struct TopographyBuilder {
    options: BuildOptions,
}

impl TopographyBuilder {
    pub fn new(options: BuildOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the landscape for `table`.
    ///
    /// Stage order:
    ///   1. Minimum-strength filter
    ///   2. Match bounding (top-N by total cM)
    ///   3. Per-chromosome track accumulation
    ///   4. Terrain classification
    ///   5. Trace emission and scene assembly
    pub fn build(&self, table: &SegmentTable) -> Topography {
        let opts = &self.options;

        // ── 1. Threshold ────────────────────────────────────────────────────
        let above = table.filter_min_cm(f64::from(opts.min_cm));
        debug!("{} of {} segments at or above {} cM", above.len(), table.len(), opts.min_cm);

        // ── 2. Match bounding ───────────────────────────────────────────────
        let selection = select_matches(&above, opts.match_limit, opts.top_matches);
        let mut notices = Vec::new();
        let filtered = if selection.truncated {
            let notice = Notice::MatchesTruncated {
                total: selection.total_matches,
                shown: selection.retained.len(),
            };
            warn!("{notice}");
            notices.push(notice);
            above.retain_matches(&selection.retained_names())
        } else {
            above
        };

        // ── 3. Tracks ───────────────────────────────────────────────────────
        let drawn = Chromosome::drawn(opts.include_x);
        let tracks = self.build_tracks(&drawn, &filtered);

        // ── 4 & 5. Classification, traces, scene ────────────────────────────
        let mut traces = Vec::with_capacity(tracks.len() * 2);
        let mut summaries = Vec::with_capacity(tracks.len());
        for track in &tracks {
            let max_height = track.max_height();
            let category = TerrainCategory::classify(max_height);
            traces.push(Trace::ridge(track));
            if let Some(peaks) = Trace::peaks(track, category) {
                traces.push(peaks);
            }
            summaries.push(ChromosomeSummary {
                chromosome: track.chromosome,
                max_height,
                category,
                segments: filtered
                    .rows()
                    .iter()
                    .filter(|r| r.chromosome == Some(track.chromosome))
                    .count(),
            });
        }
        debug!("scene assembled: {} traces over {} chromosomes", traces.len(), tracks.len());

        Topography {
            scene: Scene { traces, layout: Layout::landscape(&drawn) },
            tracks,
            summaries,
            selection,
            notices,
            filtered,
        }
    }

    #[cfg(not(feature = "threading"))]
    fn build_tracks(&self, drawn: &[Chromosome], table: &SegmentTable) -> Vec<ChromosomeTrack> {
        drawn.iter().map(|&c| self.build_track(c, table)).collect()
    }

    #[cfg(feature = "threading")]
    fn build_tracks(&self, drawn: &[Chromosome], table: &SegmentTable) -> Vec<ChromosomeTrack> {
        drawn.par_iter().map(|&c| self.build_track(c, table)).collect()
    }

    fn build_track(&self, chromosome: Chromosome, table: &SegmentTable) -> ChromosomeTrack {
        let mut track = ChromosomeTrack::flat(chromosome, &self.options.grid);
        for row in table.rows().iter().filter(|r| r.chromosome == Some(chromosome)) {
            track.accumulate(row.start, row.end, row.cm);
        }
        track
    }
}

/// Validate `options` and build the scene for `table`.
pub fn build_scene(table: &SegmentTable, options: &BuildOptions) -> Result<Scene, ConfigError> {
    Ok(TopographyBuilder::new(options.clone())?.build(table).scene)
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GridSpec;
    use crate::segment::tests::{row, table};
    use crate::segment::SegmentRow;
    use approx::assert_relative_eq;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn builder(min_cm: u32) -> TopographyBuilder {
        TopographyBuilder::new(BuildOptions { min_cm, ..BuildOptions::default() }).unwrap()
    }

    fn summary(topo: &Topography, c: Chromosome) -> &ChromosomeSummary {
        topo.summaries.iter().find(|s| s.chromosome == c).unwrap()
    }

    #[test]
    fn invalid_options_are_rejected() {
        let opts = BuildOptions { min_cm: 0, ..BuildOptions::default() };
        assert!(TopographyBuilder::new(opts).is_err());
    }

    /// Three fully overlapping segments of 6, 8 and 12 cM form a mountain.
    #[test]
    fn overlapping_segments_form_a_mountain() {
        let t = table(vec![
            row("a", "1", 10_000_000, 60_000_000, 6.0),
            row("b", "1", 10_000_000, 60_000_000, 8.0),
            row("c", "1", 10_000_000, 60_000_000, 12.0),
        ]);
        let topo = builder(5).build(&t);
        let s = summary(&topo, Chromosome::Autosome(1));
        assert_relative_eq!(s.max_height, 26.0);
        assert_eq!(s.category, TerrainCategory::Mountain);
        assert_eq!(s.segments, 3);
        assert!(topo.notices.is_empty());
    }

    #[test]
    fn rows_below_threshold_never_reach_the_grid() {
        let t = table(vec![
            row("a", "2", 0, 250_000_000, 4.9),
            row("b", "3", 0, 250_000_000, 5.0),
        ]);
        let topo = builder(5).build(&t);
        assert_eq!(summary(&topo, Chromosome::Autosome(2)).max_height, 0.0);
        assert_eq!(summary(&topo, Chromosome::Autosome(2)).category, TerrainCategory::Sea);
        assert_eq!(summary(&topo, Chromosome::Autosome(3)).max_height, 5.0);
        assert_eq!(topo.filtered.len(), 1);
    }

    #[test]
    fn twelve_matches_are_truncated_to_five() {
        let rows = (0..12)
            .map(|i| row(&format!("m{i:02}"), "4", 0, 100_000_000, f64::from(i) + 1.0))
            .collect();
        let topo = builder(1).build(&table(rows));
        assert!(topo.selection.truncated);
        assert_eq!(topo.selection.retained.len(), 5);
        assert_eq!(topo.notices, vec![Notice::MatchesTruncated { total: 12, shown: 5 }]);
        assert_eq!(topo.filtered.distinct_matches().len(), 5);
        // 12 + 11 + 10 + 9 + 8
        assert_relative_eq!(summary(&topo, Chromosome::Autosome(4)).max_height, 50.0);
    }

    #[test]
    fn truncation_counts_matches_after_threshold() {
        let mut rows: Vec<SegmentRow> =
            (0..11).map(|i| row(&format!("weak{i}"), "5", 0, 1_000_000, 2.0)).collect();
        rows.push(row("strong", "5", 0, 1_000_000, 9.0));
        let topo = builder(5).build(&table(rows));
        assert!(!topo.selection.truncated);
        assert_eq!(topo.selection.total_matches, 1);
    }

    #[test]
    fn accumulation_is_order_independent() {
        let mut rows = Vec::new();
        for i in 0..40u64 {
            let chrom = (i % 22 + 1).to_string();
            let start = i * 3_000_000;
            rows.push(row(&format!("m{}", i % 7), &chrom, start, start + 40_000_000, 5.5 + i as f64 * 0.25));
        }
        let b = builder(5);
        let baseline = b.build(&table(rows.clone()));

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..5 {
            rows.shuffle(&mut rng);
            let shuffled = b.build(&table(rows.clone()));
            for (x, y) in baseline.tracks.iter().zip(&shuffled.tracks) {
                for (hx, hy) in x.heights.iter().zip(&y.heights) {
                    assert_relative_eq!(*hx, *hy, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn height_equals_sum_of_covering_segments() {
        let segments = [(0u64, 100_000_000u64, 6.0), (50_000_000, 150_000_000, 7.0), (120_000_000, 250_000_000, 9.0)];
        let rows = segments.iter().map(|&(s, e, cm)| row("a", "6", s, e, cm)).collect();
        let topo = builder(5).build(&table(rows));
        let track = topo.tracks.iter().find(|t| t.chromosome == Chromosome::Autosome(6)).unwrap();
        for (p, h) in track.positions.iter().zip(&track.heights) {
            let expected: f64 = segments
                .iter()
                .filter(|(s, e, _)| *s as f64 <= *p && *p <= *e as f64)
                .map(|(_, _, cm)| cm)
                .sum();
            assert_relative_eq!(*h, expected);
        }
    }

    #[test]
    fn scene_has_one_ridge_per_chromosome_and_markers_where_positive() {
        let t = table(vec![row("a", "1", 0, 50_000_000, 8.0), row("a", "22", 0, 50_000_000, 15.0)]);
        let topo = builder(5).build(&t);
        let ridges = topo.scene.traces.iter().filter(|t| t.line.is_some()).count();
        assert_eq!(ridges, 22);
        let peaks: Vec<&Trace> = topo.scene.peak_traces().collect();
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].y[0], 22.0);
        assert_eq!(peaks[0].marker.as_ref().unwrap().color, "sandybrown");
        assert_eq!(peaks[1].y[0], 1.0);
        assert_eq!(peaks[1].marker.as_ref().unwrap().color, "forestgreen");
        assert!(peaks[1].text.as_ref().unwrap().iter().all(|s| s == "Chr 22: 15.0 cM"));
    }

    #[test]
    fn x_is_ignored_unless_requested() {
        let t = table(vec![row("a", "X", 0, 50_000_000, 8.0)]);
        let without = builder(5).build(&t);
        assert_eq!(without.tracks.len(), 22);
        assert_eq!(without.scene.peak_traces().count(), 0);

        let opts = BuildOptions { include_x: true, ..BuildOptions::default() };
        let with = TopographyBuilder::new(opts).unwrap().build(&t);
        assert_eq!(with.tracks.len(), 23);
        assert_eq!(summary(&with, Chromosome::X).category, TerrainCategory::Island);
    }

    #[test]
    fn empty_table_gives_flat_sea() {
        let topo = builder(5).build(&table(Vec::new()));
        assert_eq!(topo.scene.traces.len(), 22);
        assert!(topo.summaries.iter().all(|s| s.category == TerrainCategory::Sea));
    }

    #[test]
    fn repeated_builds_are_identical() {
        let t = table(vec![row("a", "7", 1_000, 90_000_000, 11.0), row("b", "7", 5_000, 20_000_000, 6.0)]);
        let opts = BuildOptions { grid: GridSpec { samples: 200, ..GridSpec::default() }, ..BuildOptions::default() };
        let a = build_scene(&t, &opts).unwrap();
        let b = build_scene(&t, &opts).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[cfg(feature = "threading")]
    #[test]
    fn parallel_tracks_match_sequential_tracks() {
        let t = table(vec![
            row("a", "1", 0, 120_000_000, 9.0),
            row("b", "3", 40_000_000, 80_000_000, 6.5),
            row("c", "X", 1_000_000, 60_000_000, 7.0),
            row("d", "22", 10_000_000, 30_000_000, 14.0),
            row("a", "3", 50_000_000, 150_000_000, 5.0),
        ]);
        let b = TopographyBuilder::new(BuildOptions { include_x: true, ..BuildOptions::default() }).unwrap();
        let drawn = Chromosome::drawn(true);
        let sequential: Vec<ChromosomeTrack> = drawn.iter().map(|&c| b.build_track(c, &t)).collect();
        assert_eq!(b.build_tracks(&drawn, &t), sequential);
    }
}
