//! Renders a chromosome-browser match export as a DNA landscape.
//!
//! Reads the CSV, applies the minimum-cM filter and writes the scene as
//! Plotly figure JSON or as a standalone HTML page.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use dnascape_core::{
    load_path, BuildOptions, ChromosomeSummary, ErrorKind, SegmentTable, Topography,
    TopographyBuilder, REQUIRED_COLUMNS,
};

mod html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Plotly figure JSON.
    Json,
    /// Self-contained HTML page.
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "dnascape", about = "Render DNA match segments as a chromosome landscape")]
struct Args {
    /// Chromosome Browser results export (CSV).
    input: PathBuf,

    /// Minimum segment strength in cM (filters noise).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=20))]
    min_cm: Option<u32>,

    /// Also draw chromosome X.
    #[arg(long)]
    include_x: bool,

    /// Build options JSON file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the filtered segments.
    #[arg(long)]
    table: bool,

    /// Write the filtered segments, all original columns, to this CSV file.
    #[arg(long)]
    rows_out: Option<PathBuf>,

    /// Print max height and terrain category per chromosome.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = resolve_options(&args)?;
    let builder = TopographyBuilder::new(options).context("invalid build options")?;

    let table = load_input(&args.input)?;
    eprintln!("Loaded {} segments.", table.len());
    eprintln!("Showing segments of at least {} cM.", builder.options().min_cm);

    let topo = builder.build(&table);
    for notice in &topo.notices {
        eprintln!("Note: {notice}");
    }

    if args.summary {
        eprint!("{}", format_summary(&topo.summaries));
    }
    if args.table {
        eprint!("{}", format_table(&topo.filtered));
    }
    if let Some(path) = &args.rows_out {
        let file = fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        topo.filtered
            .write_csv(file)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("wrote {} rows to {}", topo.filtered.len(), path.display());
    }

    let rendered = render(args.format, &topo)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("cannot write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

/// Options file (or defaults) with command-line overrides applied.
fn resolve_options(args: &Args) -> Result<BuildOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            BuildOptions::from_json(&json)
                .with_context(|| format!("invalid options in {}", path.display()))?
        }
        None => BuildOptions::default(),
    };
    if let Some(min_cm) = args.min_cm {
        options.min_cm = min_cm;
    }
    if args.include_x {
        options.include_x = true;
    }
    Ok(options)
}

/// Load the input, turning the two load failure kinds into user-facing messages.
fn load_input(path: &Path) -> Result<SegmentTable> {
    match load_path(path) {
        Ok(table) => Ok(table),
        Err(e) if e.kind() == ErrorKind::Schema => bail!(
            "{e}. Expected a Chromosome Browser CSV with columns: {}",
            REQUIRED_COLUMNS.join(", ")
        ),
        Err(e) => bail!("error reading {}: {e}", path.display()),
    }
}

fn render(format: Format, topo: &Topography) -> Result<String> {
    match format {
        Format::Json => Ok(topo.scene.to_json_pretty()?),
        Format::Html => {
            let notices: Vec<String> = topo.notices.iter().map(|n| n.to_string()).collect();
            Ok(html::page(&topo.scene.to_json()?, &notices))
        }
    }
}

fn format_summary(summaries: &[ChromosomeSummary]) -> String {
    let mut out = format!("{:<6} {:>9} {:>9}  {}\n", "Chr", "Segments", "Max cM", "Terrain");
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<6} {:>9} {:>9.1}  {}",
            s.chromosome.to_string(),
            s.segments,
            s.max_height,
            s.category.label()
        );
    }
    out
}

/// Column-aligned dump of every original column.
fn format_table(table: &SegmentTable) -> String {
    let widths: Vec<usize> = table
        .headers()
        .iter()
        .enumerate()
        .map(|(i, h)| {
            table
                .rows()
                .iter()
                .filter_map(|r| r.record.get(i))
                .map(|v| v.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = aligned_line(table.headers().iter().map(String::as_str), &widths);
    for row in table.rows() {
        out += &aligned_line(row.record.iter().map(String::as_str), &widths);
    }
    out
}

fn aligned_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    padded.join("  ").trim_end().to_owned() + "\n"
}
