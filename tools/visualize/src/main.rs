//! Static preview renderer: draws the DNA landscape to a PNG with a fixed
//! oblique projection, for looking at a file without a browser.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use log::info;

use dnascape_core::{load_path, BuildOptions, ChromosomeTrack, Topography, TopographyBuilder};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const RIDGE: Rgb<u8> = Rgb([0, 0, 0]);
/// Tallest peak is drawn this many row spacings high.
const PEAK_ROWS: f64 = 4.0;
/// Horizontal shift per stacked row, in pixels; gives the oblique look.
const ROW_SHIFT_PX: f64 = 6.0;

#[derive(Parser, Debug)]
#[command(name = "visualize", about = "Render a DNA landscape preview PNG")]
struct Args {
    /// Chromosome Browser results export (CSV).
    input: PathBuf,

    /// Minimum segment strength in cM.
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=20))]
    min_cm: u32,

    /// Also draw chromosome X.
    #[arg(long)]
    include_x: bool,

    /// Output PNG path.
    #[arg(short, long, default_value = "data/debug/landscape.png")]
    output: PathBuf,

    #[arg(long, default_value = "1600")]
    width: u32,

    #[arg(long, default_value = "900")]
    height: u32,
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Maps (position, stack row, height) onto image pixels.
struct Projection {
    left: f64,
    bottom: f64,
    plot_width: f64,
    row_spacing: f64,
    max_position: f64,
    z_scale: f64,
}

impl Projection {
    fn new(width: u32, height: u32, rows: usize, max_position: f64, max_height: f64) -> Self {
        let margin = 0.06 * f64::from(width.min(height));
        let row_spacing = (f64::from(height) - 2.0 * margin) / (rows as f64 + PEAK_ROWS);
        let plot_width = f64::from(width) - 2.0 * margin - rows as f64 * ROW_SHIFT_PX;
        Self {
            left: margin,
            bottom: f64::from(height) - margin,
            plot_width,
            row_spacing,
            max_position,
            z_scale: PEAK_ROWS * row_spacing / max_height.max(1.0),
        }
    }

    fn project(&self, position: f64, stack: f64, height: f64) -> (f64, f64) {
        let x = self.left + position / self.max_position * self.plot_width + stack * ROW_SHIFT_PX;
        let y = self.bottom - stack * self.row_spacing - height * self.z_scale;
        (x, y)
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line between two projected points.
fn line(img: &mut RgbImage, (x0, y0): (f64, f64), (x1, y1): (f64, f64), color: Rgb<u8>) {
    let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
    let (xe, ye) = (x1.round() as i64, y1.round() as i64);
    let dx = (xe - x).abs();
    let dy = -(ye - y).abs();
    let sx = if x < xe { 1 } else { -1 };
    let sy = if y < ye { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x, y, color);
        if x == xe && y == ye {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Blank out everything between the ridge and its baseline so nearer ridges
/// hide the ones behind them.
fn occlude(img: &mut RgbImage, proj: &Projection, track: &ChromosomeTrack) {
    let stack = track.chromosome.stack_offset();
    for pair in track.positions.windows(2).zip(track.heights.windows(2)) {
        let (p, h) = pair;
        let (xa, ya) = proj.project(p[0], stack, h[0]);
        let (xb, yb) = proj.project(p[1], stack, h[1]);
        let (_, base) = proj.project(p[0], stack, 0.0);
        let (xa_px, xb_px) = (xa.round() as i64, xb.round() as i64);
        for x in xa_px..=xb_px {
            let t = if xb_px == xa_px { 0.0 } else { (x - xa_px) as f64 / (xb_px - xa_px) as f64 };
            let top = (ya + (yb - ya) * t).round() as i64;
            for y in top..=base.round() as i64 {
                put(img, x, y, BACKGROUND);
            }
        }
    }
}

fn render(topo: &Topography, opts: &BuildOptions, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let max_height = topo.summaries.iter().map(|s| s.max_height).fold(0.0, f64::max);
    let proj = Projection::new(width, height, topo.tracks.len(), opts.grid.max_position as f64, max_height);

    // Back to front: chromosome 1 is furthest away.
    let mut order: Vec<usize> = (0..topo.tracks.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (topo.tracks[a].chromosome.stack_offset(), topo.tracks[b].chromosome.stack_offset());
        sb.total_cmp(&sa)
    });

    for idx in order {
        let track = &topo.tracks[idx];
        let category = topo.summaries[idx].category;
        let stack = track.chromosome.stack_offset();

        occlude(&mut img, &proj, track);
        let points: Vec<(f64, f64)> = track
            .positions
            .iter()
            .zip(&track.heights)
            .map(|(&p, &h)| proj.project(p, stack, h))
            .collect();
        for pair in points.windows(2) {
            line(&mut img, pair[0], pair[1], RIDGE);
        }

        let peak = Rgb(category.rgb());
        for (p, h) in track.peaks() {
            let (x, y) = proj.project(p, stack, h);
            let (x, y) = (x.round() as i64, y.round() as i64);
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                put(&mut img, x + dx, y + dy, peak);
            }
        }
    }
    img
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = BuildOptions { min_cm: args.min_cm, include_x: args.include_x, ..BuildOptions::default() };
    let builder = TopographyBuilder::new(options.clone())?;
    let table = load_path(&args.input).with_context(|| format!("cannot load {}", args.input.display()))?;

    info!("building landscape from {} segments", table.len());
    let topo = builder.build(&table);
    for notice in &topo.notices {
        println!("Note: {notice}");
    }

    let img = render(&topo, &options, args.width, args.height);
    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }
    img.save(&args.output).with_context(|| format!("failed to save {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
