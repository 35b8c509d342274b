//! Chromosome-browser CSV loader.
//!
//! Reads a comma-separated export with a header row, trims the header labels,
//! checks that every required column is present and parses each record into a
//! [`SegmentRow`]. Any failure rejects the whole file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::error::LoadError;
use crate::segment::{SegmentRow, SegmentTable};

pub const MATCH_NAME: &str = "Match Name";
pub const CHROMOSOME: &str = "Chromosome";
pub const START_LOCATION: &str = "Start Location";
pub const END_LOCATION: &str = "End Location";
pub const CENTIMORGANS: &str = "Centimorgans";

/// Column labels every input file must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 5] =
    [MATCH_NAME, CHROMOSOME, START_LOCATION, END_LOCATION, CENTIMORGANS];

/// Column indices of the required labels within a header row.
struct Columns {
    match_name: usize,
    chromosome: usize,
    start: usize,
    end: usize,
    cm: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, LoadError> {
        let find = |label: &str| headers.iter().position(|h| h == label);
        match (
            find(MATCH_NAME),
            find(CHROMOSOME),
            find(START_LOCATION),
            find(END_LOCATION),
            find(CENTIMORGANS),
        ) {
            (Some(match_name), Some(chromosome), Some(start), Some(end), Some(cm)) => {
                Ok(Self { match_name, chromosome, start, end, cm })
            }
            _ => Err(LoadError::MissingColumns {
                missing: REQUIRED_COLUMNS
                    .into_iter()
                    .filter(|label| find(*label).is_none())
                    .map(str::to_owned)
                    .collect(),
            }),
        }
    }
}

/// Load a segment table from any reader.
pub fn load<R: Read>(reader: R) -> Result<SegmentTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
    if headers.is_empty() {
        return Err(LoadError::EmptyInput);
    }
    let columns = Columns::locate(&headers)?;
    debug!("header: {} columns, all required labels present", headers.len());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        let match_name = required(&record, columns.match_name, line, MATCH_NAME)?.to_owned();
        let chromosome_label = required(&record, columns.chromosome, line, CHROMOSOME)?.to_owned();
        let start = parse_position(
            required(&record, columns.start, line, START_LOCATION)?,
            line,
            START_LOCATION,
        )?;
        let end = parse_position(
            required(&record, columns.end, line, END_LOCATION)?,
            line,
            END_LOCATION,
        )?;
        let cm = parse_strength(required(&record, columns.cm, line, CENTIMORGANS)?, line)?;
        if start > end {
            return Err(LoadError::InvertedSegment { line, start, end });
        }

        rows.push(SegmentRow {
            chromosome: chromosome_label.parse().ok(),
            match_name,
            chromosome_label,
            start,
            end,
            cm,
            record: record.iter().map(str::to_owned).collect(),
        });
    }

    info!("loaded {} segments", rows.len());
    Ok(SegmentTable::new(headers, rows))
}

/// Load a segment table from a file on disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<SegmentTable, LoadError> {
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file))
}

/// Trimmed, non-empty field of a required column.
fn required<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    line: u64,
    column: &'static str,
) -> Result<&'r str, LoadError> {
    match record.get(idx).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LoadError::EmptyField { line, column }),
    }
}

/// Base-pair coordinate. Spreadsheet exports sometimes add thousands
/// separators or write integral floats (`1234.0`); both are accepted.
fn parse_position(raw: &str, line: u64, column: &'static str) -> Result<u64, LoadError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    if let Ok(v) = cleaned.parse::<u64>() {
        return Ok(v);
    }
    let invalid = |reason: &str| LoadError::InvalidField {
        line,
        column,
        value: raw.to_owned(),
        reason: reason.to_owned(),
    };
    let v: f64 = cleaned.parse().map_err(|_| invalid("not a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(invalid("must be a non-negative coordinate"));
    }
    if v.fract() != 0.0 || v > u64::MAX as f64 {
        return Err(invalid("must be a whole base-pair position"));
    }
    Ok(v as u64)
}

fn parse_strength(raw: &str, line: u64) -> Result<f64, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidField {
        line,
        column: CENTIMORGANS,
        value: raw.to_owned(),
        reason: reason.to_owned(),
    };
    let v: f64 = raw.parse().map_err(|_| invalid("not a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(invalid("must be a non-negative finite cM value"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::segment::Chromosome;

    const FTDNA_HEADER: &str =
        "Match Name,Chromosome,Start Location,End Location,Centimorgans,Matching SNPs\n";

    fn load_str(s: &str) -> Result<SegmentTable, LoadError> {
        load(s.as_bytes())
    }

    #[test]
    fn loads_ftdna_export() {
        let csv = format!(
            "{FTDNA_HEADER}Jane Doe,1,1000,500000,12.5,900\nJohn Roe,X,2000,3000,7,600\n"
        );
        let table = load_str(&csv).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.match_name, "Jane Doe");
        assert_eq!(first.chromosome, Some(Chromosome::Autosome(1)));
        assert_eq!((first.start, first.end), (1000, 500000));
        assert_eq!(first.cm, 12.5);
        assert_eq!(first.record.len(), 6);
        assert_eq!(table.rows()[1].chromosome, Some(Chromosome::X));
    }

    #[test]
    fn header_labels_are_trimmed() {
        let csv = " Match Name , Chromosome,Start Location ,End Location,  Centimorgans\na,2,1,2,3\n";
        let table = load_str(csv).unwrap();
        assert_eq!(table.headers()[0], "Match Name");
        assert_eq!(table.headers()[4], "Centimorgans");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn missing_columns_are_a_schema_error() {
        let err = load_str("Match Name,Chromosome,Start Location\na,1,5\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        match err {
            LoadError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["End Location", "Centimorgans"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_is_a_parse_error() {
        let err = load_str("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, LoadError::EmptyInput));
    }

    #[test]
    fn columns_map_to_their_own_positions() {
        let headers: Vec<String> = [
            "Notes",
            "Centimorgans",
            "End Location",
            "Start Location",
            "Chromosome",
            "Match Name",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let cols = Columns::locate(&headers).unwrap();
        assert_eq!(
            (cols.match_name, cols.chromosome, cols.start, cols.end, cols.cm),
            (5, 4, 3, 2, 1)
        );

        let err = Columns::locate(&headers[1..5]).err().unwrap();
        assert!(matches!(err, LoadError::MissingColumns { ref missing } if missing == &["Match Name"]));
    }

    #[test]
    fn header_only_file_loads_empty() {
        let table = load_str(FTDNA_HEADER).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn null_required_field_rejects_file() {
        let csv = format!("{FTDNA_HEADER}a,1,1,2,5,1\nb,1,1,2,,1\n");
        let err = load_str(&csv).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, LoadError::EmptyField { line: 3, column: CENTIMORGANS }));
    }

    #[test]
    fn non_numeric_strength_rejects_file() {
        let csv = format!("{FTDNA_HEADER}a,1,1,2,lots,1\n");
        let err = load_str(&csv).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { column: CENTIMORGANS, .. }));
        assert!(err.to_string().contains("'lots'"));
    }

    #[test]
    fn negative_strength_rejects_file() {
        let csv = format!("{FTDNA_HEADER}a,1,1,2,-3,1\n");
        assert!(matches!(load_str(&csv), Err(LoadError::InvalidField { .. })));
    }

    #[test]
    fn inverted_segment_rejects_file() {
        let csv = format!("{FTDNA_HEADER}a,1,500,100,3,1\n");
        let err = load_str(&csv).unwrap_err();
        assert!(matches!(err, LoadError::InvertedSegment { start: 500, end: 100, .. }));
    }

    #[test]
    fn spreadsheet_coordinates_are_accepted() {
        let csv = format!("{FTDNA_HEADER}a,1,\"1,000\",2500.0,3,1\n");
        let table = load_str(&csv).unwrap();
        assert_eq!((table.rows()[0].start, table.rows()[0].end), (1000, 2500));
    }

    #[test]
    fn fractional_coordinate_rejects_file() {
        let csv = format!("{FTDNA_HEADER}a,1,10.5,20,3,1\n");
        assert!(matches!(load_str(&csv), Err(LoadError::InvalidField { column: START_LOCATION, .. })));
    }

    #[test]
    fn ragged_record_is_a_parse_error() {
        let csv = format!("{FTDNA_HEADER}a,1,1,2\n");
        let err = load_str(&csv).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn unknown_chromosome_label_is_kept_without_ridge() {
        let csv = format!("{FTDNA_HEADER}a,Y,1,2,3,1\n");
        let table = load_str(&csv).unwrap();
        assert_eq!(table.rows()[0].chromosome, None);
        assert_eq!(table.rows()[0].chromosome_label, "Y");
    }
}
