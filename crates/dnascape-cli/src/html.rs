//! Standalone HTML page wrapping a Plotly figure.

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Build a self-contained page that draws `figure_json` with Plotly.
pub fn page(figure_json: &str, notices: &[String]) -> String {
    // Keep the figure from closing the surrounding <script> element.
    let figure = figure_json.replace("</", "<\\/");
    let notices: String = notices
        .iter()
        .map(|n| format!("    <p class=\"notice\">{}</p>\n", escape(n)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Genome cartography: DNA topography</title>
  <script src="{PLOTLY_CDN}"></script>
  <style>
    body {{ font-family: sans-serif; margin: 1.5em; }}
    .notice {{ background: #fff3cd; padding: 0.5em 1em; border-radius: 4px; }}
    #landscape {{ width: 100%; height: 80vh; }}
  </style>
</head>
<body>
  <h1>Genome cartography: DNA topography</h1>
  <ul>
    <li><b>Mountains:</b> large shared segments (close relationship).</li>
    <li><b>Islands:</b> small, scattered or distant matches.</li>
    <li><b>Valleys:</b> regions with no shared DNA.</li>
  </ul>
{notices}  <div id="landscape"></div>
  <script>
    const figure = {figure};
    Plotly.newPlot("landscape", figure.data, figure.layout, {{responsive: true}});
  </script>
</body>
</html>
"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
