use serde::Serialize;
use wasm_bindgen::prelude::*;
use dnascape_core::{load, BuildOptions, Scene, TopographyBuilder};

#[derive(Serialize)]
struct Rendered<'a> {
    figure: &'a Scene,
    notices: Vec<String>,
    /// Rows in the uploaded file.
    segments: usize,
    /// Rows drawn after filtering and match truncation.
    shown: usize,
}

/// Render an uploaded CSV as Plotly figure JSON with the given slider value.
#[wasm_bindgen]
pub fn render_figure(csv_text: &str, min_cm: u32) -> Result<String, JsValue> {
    let options = BuildOptions { min_cm, ..BuildOptions::default() };
    figure_json(csv_text, options).map_err(|e| JsValue::from_str(&e))
}

/// Render with a full options JSON object (absent fields take defaults).
#[wasm_bindgen]
pub fn render_with_options(csv_text: &str, options_json: &str) -> Result<String, JsValue> {
    let options = BuildOptions::from_json(options_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))?;
    figure_json(csv_text, options).map_err(|e| JsValue::from_str(&e))
}

/// Figure plus notices, serialised as `{"figure": ..., "notices": [...]}`.
fn figure_json(csv_text: &str, options: BuildOptions) -> Result<String, String> {
    let builder = TopographyBuilder::new(options).map_err(|e| format!("Invalid options: {e}"))?;
    let table = load(csv_text.as_bytes()).map_err(|e| format!("Error reading file: {e}"))?;
    let topo = builder.build(&table);
    let notices: Vec<String> = topo.notices.iter().map(|n| n.to_string()).collect();
    let rendered = Rendered {
        figure: &topo.scene,
        notices,
        segments: table.len(),
        shown: topo.filtered.len(),
    };
    serde_json::to_string(&rendered).map_err(|e| e.to_string())
}
