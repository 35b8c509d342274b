//! Match grouping and top-N truncation.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::segment::SegmentTable;

/// Total strength of one match across all of its segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTotal {
    pub name: String,
    pub total_cm: f64,
    pub segments: usize,
}

/// Which match groups survive into the landscape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSelection {
    /// Distinct matches before truncation.
    pub total_matches: usize,
    /// Retained matches, strongest first when truncated, otherwise first-seen order.
    pub retained: Vec<MatchTotal>,
    pub truncated: bool,
}

impl MatchSelection {
    pub fn retained_names(&self) -> HashSet<&str> {
        self.retained.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Per-match totals in first-seen order.
pub fn match_totals(table: &SegmentTable) -> Vec<MatchTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<MatchTotal> = Vec::new();
    for row in table.rows() {
        let slot = *index.entry(row.match_name.as_str()).or_insert_with(|| {
            totals.push(MatchTotal { name: row.match_name.clone(), total_cm: 0.0, segments: 0 });
            totals.len() - 1
        });
        totals[slot].total_cm += row.cm;
        totals[slot].segments += 1;
    }
    totals
}

/// Keep every match when there are at most `match_limit`; otherwise keep the
/// `top` matches with the highest total cM. Equal totals keep first-seen order.
pub fn select_matches(table: &SegmentTable, match_limit: usize, top: usize) -> MatchSelection {
    let mut totals = match_totals(table);
    let total_matches = totals.len();
    if total_matches <= match_limit {
        return MatchSelection { total_matches, retained: totals, truncated: false };
    }

    // Stable sort: ties stay in first-seen order.
    totals.sort_by(|a, b| b.total_cm.total_cmp(&a.total_cm));
    totals.truncate(top);
    MatchSelection { total_matches, retained: totals, truncated: true }
}
