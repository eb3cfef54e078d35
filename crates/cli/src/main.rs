mod input;

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use syncline_core::svg::render_svg;
use syncline_core::{Timeline, TimelineConfig};
use syncline_protocol::{HitTarget, Primitive};
use tracing_subscriber::EnvFilter;

use crate::input::LoadOptions;

const MICROS_PER_SECOND: f64 = 1e6;

#[derive(Parser, Debug)]
#[command(name = "syncline", version)]
struct Cli {
    /// Timeline JSON (`events`, `jobs`, `color_map`, `event_pairs`), or raw
    /// job logs with `--job-logs`.
    input: PathBuf,

    /// Output SVG path. Defaults to stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Timeline config JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plot width in pixels, overriding the config.
    #[arg(long)]
    width: Option<f64>,

    /// Zoom start, in seconds after the first event.
    #[arg(long)]
    from: Option<f64>,

    /// Zoom end, in seconds after the first event.
    #[arg(long)]
    to: Option<f64>,

    /// Hover the marker with this key (`{job_id}-{log_index}`) before rendering.
    #[arg(long)]
    hover: Option<String>,

    /// Recompute `event_pairs` from the events' names and pairing keys.
    #[arg(long)]
    derive_pairs: bool,

    /// Treat the input as `{"logs": [...], "test_names": {...}, "color_map": {...}}`.
    #[arg(long)]
    job_logs: bool,

    /// Regex with a `name` group for shortening test names (repeatable).
    #[arg(long = "name-pattern")]
    name_patterns: Vec<String>,

    /// Use the dark palette.
    #[arg(long)]
    dark: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            TimelineConfig::from_json(&json)?
        }
        None => TimelineConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }

    let data = input::load(
        &cli.input,
        &LoadOptions {
            job_logs: cli.job_logs,
            name_patterns: &cli.name_patterns,
            derive_pairs: cli.derive_pairs,
        },
    )?;

    let mut timeline = Timeline::new(config);
    timeline.init(data, None);

    let Some(full) = timeline.viewport().map(|v| v.full()) else {
        bail!("{} contains no events", cli.input.display());
    };

    if cli.from.is_some() || cli.to.is_some() {
        let start = full.start + cli.from.unwrap_or(0.0) * MICROS_PER_SECOND;
        let end = cli
            .to
            .map_or(full.end, |to| full.start + to * MICROS_PER_SECOND);
        if !timeline.zoom_to(start, end) {
            bail!("zoom range is empty after clamping to the timeline");
        }
    }

    if let Some(key) = &cli.hover {
        let (source, center) = timeline
            .view()
            .scene
            .primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Marker {
                    key: marker_key,
                    source,
                    center,
                    ..
                } if marker_key.to_string() == *key => Some((*source, *center)),
                _ => None,
            })
            .with_context(|| format!("no visible marker with key {key}"))?;
        timeline.pointer_enter(&HitTarget::Marker { source }, center);
    }

    let svg = render_svg(timeline.view(), cli.dark);
    match &cli.output {
        Some(path) => std::fs::write(path, svg)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(svg.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}
