//! Error types for loading segment files and validating build options.

use thiserror::Error;

/// The two failure classes a load can end in. Both are terminal for the
/// current file: no rows are returned and no scene is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// One or more required column labels are absent.
    Schema,
    /// The file could not be read or a required field is malformed.
    Parse,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("line {line}: column '{column}' is empty")]
    EmptyField { line: u64, column: &'static str },

    #[error("line {line}: column '{column}' has invalid value '{value}': {reason}")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("line {line}: segment start {start} lies after end {end}")]
    InvertedSegment { line: u64, start: u64, end: u64 },

    #[error("file is empty")]
    EmptyInput,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::MissingColumns { .. } => ErrorKind::Schema,
            _ => ErrorKind::Parse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("min_cm must be within {min}..={max}, got {value}")]
    MinCmOutOfRange { value: u32, min: u32, max: u32 },

    #[error("grid needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("grid max_position must be positive")]
    EmptyGrid,

    #[error("top_matches must be between 1 and match_limit ({limit}), got {top}")]
    InvalidMatchBounds { top: usize, limit: usize },

    #[error("invalid options JSON: {0}")]
    Json(String),
}
