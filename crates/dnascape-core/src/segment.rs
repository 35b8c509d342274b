//! Segment rows and the table they are loaded into.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Number of autosomes drawn as ridges.
pub const AUTOSOME_COUNT: u8 = 22;

/// A chromosome that can own a ridge in the landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chromosome {
    Autosome(u8),
    X,
}

impl Chromosome {
    /// Autosomes in ascending order, followed by X when requested.
    pub fn drawn(include_x: bool) -> Vec<Chromosome> {
        let mut all: Vec<Chromosome> = (1..=AUTOSOME_COUNT).map(Chromosome::Autosome).collect();
        if include_x {
            all.push(Chromosome::X);
        }
        all
    }

    /// Position along the stacking axis. Chromosome 1 sits on top at 22,
    /// chromosome 22 at 1, X underneath at 0.
    pub fn stack_offset(self) -> f64 {
        match self {
            Chromosome::Autosome(n) => f64::from(AUTOSOME_COUNT + 1 - n),
            Chromosome::X => 0.0,
        }
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chromosome::Autosome(n) => write!(f, "{n}"),
            Chromosome::X => f.write_str("X"),
        }
    }
}

impl FromStr for Chromosome {
    type Err = ();

    /// Accepts `1`..`22` and `X`, with or without a `chr` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = match s.get(..3) {
            Some(prefix) if s.len() > 3 && prefix.eq_ignore_ascii_case("chr") => &s[3..],
            _ => s,
        };
        if s.eq_ignore_ascii_case("x") {
            return Ok(Chromosome::X);
        }
        match s.parse::<u8>() {
            Ok(n) if (1..=AUTOSOME_COUNT).contains(&n) => Ok(Chromosome::Autosome(n)),
            _ => Err(()),
        }
    }
}

impl Serialize for Chromosome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One shared DNA segment between the tester and a match.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRow {
    pub match_name: String,
    /// Trimmed label as it appeared in the file.
    pub chromosome_label: String,
    /// `None` for labels without a ridge (Y, MT, ...).
    pub chromosome: Option<Chromosome>,
    pub start: u64,
    pub end: u64,
    /// Segment strength in centiMorgans.
    pub cm: f64,
    /// Every field of the source record, in header order.
    pub record: Vec<String>,
}

/// Loaded rows plus the trimmed header labels they were read under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentTable {
    headers: Vec<String>,
    rows: Vec<SegmentRow>,
}

impl SegmentTable {
    pub fn new(headers: Vec<String>, rows: Vec<SegmentRow>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[SegmentRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose strength is at least `min_cm`.
    pub fn filter_min_cm(&self, min_cm: f64) -> SegmentTable {
        self.filtered(|row| row.cm >= min_cm)
    }

    /// Rows belonging to one of `names`.
    pub fn retain_matches(&self, names: &HashSet<&str>) -> SegmentTable {
        self.filtered(|row| names.contains(row.match_name.as_str()))
    }

    fn filtered(&self, keep: impl Fn(&SegmentRow) -> bool) -> SegmentTable {
        SegmentTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Distinct match names in first-seen order.
    pub fn distinct_matches(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.match_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Write the raw records (every original column) back out as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(&row.record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
