//! Turns chromosome-browser match segments into a pseudo-3D landscape:
//! one ridge per chromosome, height = accumulated shared cM.

pub mod builder;
pub mod error;
pub mod loader;
pub mod matches;
pub mod options;
pub mod scene;
pub mod segment;
pub mod terrain;
pub mod track;

pub use builder::{build_scene, ChromosomeSummary, Notice, Topography, TopographyBuilder};
pub use error::{ConfigError, ErrorKind, LoadError};
pub use loader::{load, load_path, REQUIRED_COLUMNS};
pub use options::{BuildOptions, GridSpec};
pub use scene::Scene;
pub use segment::{Chromosome, SegmentRow, SegmentTable};
pub use terrain::TerrainCategory;
pub use track::ChromosomeTrack;
