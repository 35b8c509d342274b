//! Renderable scene: a Plotly figure (`{"data": [...], "layout": {...}}`)
//! holding one ridge line per chromosome plus coloured peak markers.

use serde::Serialize;

use crate::segment::Chromosome;
use crate::terrain::TerrainCategory;
use crate::track::ChromosomeTrack;

pub const TITLE: &str = "Genome Topography: DNA matches as a landscape";
pub const X_AXIS_TITLE: &str = "Position on chromosome (bp)";
pub const Y_AXIS_TITLE: &str = "Chromosome (1-22)";
pub const Z_AXIS_TITLE: &str = "Shared strength (cM)";

/// Oblique aerial camera position.
pub const CAMERA_EYE: Eye = Eye { x: 1.5, y: 1.5, z: 0.5 };

const RIDGE_COLOR: &str = "black";
const RIDGE_WIDTH: f64 = 1.0;
const PEAK_MARKER_SIZE: f64 = 2.0;

/// Hover text for a single peak sample.
pub fn hover_label(chromosome: Chromosome, height: f64) -> String {
    format!("Chr {chromosome}: {height:.1} cM")
}

// ── Traces ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub color: String,
}

/// One `scatter3d` trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
}

impl Trace {
    /// The full height profile of a chromosome as a thin black line.
    pub fn ridge(track: &ChromosomeTrack) -> Self {
        let offset = track.chromosome.stack_offset();
        Self {
            kind: "scatter3d",
            mode: TraceMode::Lines,
            x: track.positions.clone(),
            y: vec![offset; track.len()],
            z: track.heights.clone(),
            name: Some(format!("Chr {}", track.chromosome)),
            showlegend: false,
            line: Some(LineStyle { color: RIDGE_COLOR.to_owned(), width: RIDGE_WIDTH }),
            marker: None,
            hoverinfo: None,
            text: None,
        }
    }

    /// Markers on every sample with positive height, coloured by `category`.
    /// Returns None for a flat track.
    pub fn peaks(track: &ChromosomeTrack, category: TerrainCategory) -> Option<Self> {
        let (x, z): (Vec<f64>, Vec<f64>) = track.peaks().unzip();
        if x.is_empty() {
            return None;
        }
        let offset = track.chromosome.stack_offset();
        let text = z.iter().map(|h| hover_label(track.chromosome, *h)).collect();
        Some(Self {
            kind: "scatter3d",
            mode: TraceMode::Markers,
            y: vec![offset; x.len()],
            x,
            z,
            name: None,
            showlegend: false,
            line: None,
            marker: Some(MarkerStyle { size: PEAK_MARKER_SIZE, color: category.color().to_owned() }),
            hoverinfo: Some("text"),
            text: Some(text),
        })
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self { text: text.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Eye {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub eye: Eye,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLayout {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
    pub camera: Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub scene: SceneLayout,
    pub margin: Margin,
}

impl Layout {
    /// Fixed titles, camera and margins; one y tick per drawn chromosome.
    pub fn landscape(drawn: &[Chromosome]) -> Self {
        let mut stacked: Vec<Chromosome> = drawn.to_vec();
        stacked.sort_by(|a, b| a.stack_offset().total_cmp(&b.stack_offset()));
        let tickvals = stacked.iter().map(|c| c.stack_offset()).collect();
        let ticktext = stacked.iter().map(|c| format!("Chr {c}")).collect();

        Self {
            title: Title::new(TITLE),
            scene: SceneLayout {
                xaxis: Axis { title: Title::new(X_AXIS_TITLE), tickvals: None, ticktext: None },
                yaxis: Axis {
                    title: Title::new(Y_AXIS_TITLE),
                    tickvals: Some(tickvals),
                    ticktext: Some(ticktext),
                },
                zaxis: Axis { title: Title::new(Z_AXIS_TITLE), tickvals: None, ticktext: None },
                camera: Camera { eye: CAMERA_EYE },
            },
            margin: Margin { l: 0, r: 0, b: 0, t: 50 },
        }
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    #[serde(rename = "data")]
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl Scene {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Marker traces only.
    pub fn peak_traces(&self) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(|t| t.mode == TraceMode::Markers)
    }
}
