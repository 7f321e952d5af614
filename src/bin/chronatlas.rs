use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use chronatlas::{
    load_atlas, Atlas, AtlasSession, DetailPanel, RecordingSurface, SurfaceOp, TimingConfig,
    WebMercator,
};

#[derive(Parser, Debug)]
#[command(name = "chronatlas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the two bulk data documents.
    Validate(DataArgs),
    /// Play one period transition headlessly and report surface activity.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct DataArgs {
    /// Object records JSON.
    #[arg(long)]
    objects: PathBuf,

    /// Period list JSON.
    #[arg(long)]
    periods: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Period index to render.
    #[arg(long)]
    period: usize,

    /// Projection zoom level.
    #[arg(long, default_value_t = 5.0)]
    zoom: f64,

    /// Simulated frame interval in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// How long to run the clock, in milliseconds.
    #[arg(long, default_value_t = 4000.0)]
    duration_ms: f64,
}

/// Prints panel output to stderr; the simulator has no DOM to write into.
#[derive(Debug, Default)]
struct StderrPanel;

impl DetailPanel for StderrPanel {
    fn show(&mut self, title: &str, html_body: &str) {
        eprintln!("panel: {title}: {html_body}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_atlas(args: &DataArgs) -> anyhow::Result<Atlas> {
    let objects = read_doc(&args.objects)?;
    let periods = read_doc(&args.periods)?;
    Ok(load_atlas(&objects, &periods)?)
}

fn read_doc(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn cmd_validate(args: DataArgs) -> anyhow::Result<()> {
    let atlas = read_atlas(&args)?;
    let route_count: usize = atlas
        .objects
        .iter()
        .flat_map(|o| &o.locations)
        .map(|l| l.routes.len())
        .sum();
    eprintln!(
        "ok: {} objects, {} periods, {} routes",
        atlas.objects.len(),
        atlas.period_count(),
        route_count
    );
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let atlas = read_atlas(&args.data)?;
    let projector = WebMercator::new(args.zoom)?;

    let mut session = AtlasSession::new(
        atlas,
        Box::new(projector),
        RecordingSurface::new(),
        StderrPanel,
        TimingConfig::default(),
    )?;

    session.request_period(args.period, 0.0)?;
    let mut now = 0.0;
    while now <= args.duration_ms {
        now += args.frame_ms;
        session.tick(now)?;
    }

    let surface = session.surface();
    let mut markers = 0usize;
    let mut polylines = 0usize;
    let mut style_sets = 0usize;
    let mut point_sets = 0usize;
    for op in surface.ops() {
        match op {
            SurfaceOp::AddMarker { .. } => markers += 1,
            SurfaceOp::AddPolyline { .. } => polylines += 1,
            SurfaceOp::SetStyleValues { .. } | SurfaceOp::SetStyle { .. } => style_sets += 1,
            SurfaceOp::SetPolylinePoints { .. } => point_sets += 1,
            SurfaceOp::Remove { .. } => {}
        }
    }

    eprintln!(
        "period {:?}: {markers} markers, {polylines} routes, {style_sets} style updates, \
         {point_sets} crawl updates, {} layers live, {} animations pending",
        session.current_period(),
        surface.live_count(),
        session.active_animations()
    );
    Ok(())
}
