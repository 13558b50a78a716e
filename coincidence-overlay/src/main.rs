mod overlay;

use anyhow::{Context, Result};
use clap::Parser;
use overlay::{build_overlays, Overlay};
use std::path::{Path, PathBuf};
use strawscint_common::{
    plot::{plot_path, save_overlay_svg, Labels},
    report::{load_report, CoincidenceReport},
    tracer::init_tracer,
};
use tracing::{debug, info, warn};

// cargo run --bin coincidence-overlay -- --single single.json --double double.json --plot-dir plots

/// Overlays the normalised coincidence tables of the single strike and
/// double strike selections.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Coincidence tables built from events with a single scintillator strike.
    #[clap(long)]
    single: PathBuf,

    /// Coincidence tables built from events with two scintillator strikes.
    #[clap(long)]
    double: PathBuf,

    /// Directory the overlay plots are written to.
    #[clap(long, default_value = "plots")]
    plot_dir: PathBuf,
}

fn load(path: &Path, expected: usize) -> Result<CoincidenceReport> {
    let report: CoincidenceReport = load_report(path)?;
    match report.strikes_per_event {
        Some(strikes) if strikes == expected => {}
        other => warn!(
            "{} holds tables for {:?} strikes per event, expected {expected}",
            path.display(),
            other
        ),
    }
    Ok(report)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracer()?;
    debug!("Args: {:?}", args);

    let single = load(&args.single, 1).context("failed to load single strike tables")?;
    let double = load(&args.double, 2).context("failed to load double strike tables")?;

    let overlays = build_overlays(&single, &double)?;
    for Overlay {
        file_name,
        title,
        x_label,
        y_label,
        series,
    } in &overlays
    {
        let path = plot_path(&args.plot_dir, file_name)?;
        save_overlay_svg(
            &path,
            series,
            Labels {
                title: *title,
                x: *x_label,
                y: *y_label,
            },
        )
        .with_context(|| format!("failed to draw {file_name}"))?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}
