mod histograms;
mod reducer;

use anyhow::{Context, Result};
use clap::Parser;
use histograms::{DelayBinning, DelayHistograms};
use std::path::{Path, PathBuf};
use strawscint_common::{
    loader::load_hits,
    plot::{plot_path, save_heatmap_svg, save_histogram_svg, Labels, PlotError},
    report::{save_report, DelayReport},
    tracer::init_tracer,
    ProgressOpts, Time,
};
use tracing::{debug, info, warn};

// cargo run --bin scint-delays -- --scint-hits scint_hits.jsonl --plot-dir plots

/// Counts how often each scintillator paddle fires per event, and finds the
/// tightest gap between the two paddles firing in turn.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Hit table of the scintillator paddles.
    #[clap(long, env = "STRAWSCINT_SCINT_HITS")]
    scint_hits: PathBuf,

    /// Only read this many scintillator records.
    #[clap(long)]
    max_scint_hits: Option<usize>,

    /// Minimum gaps below this are also histogrammed on a fine scale.
    #[clap(long, env = "STRAWSCINT_GAP_THRESHOLD", default_value = "100")]
    gap_threshold: Time,

    /// Number of bins in the fine gap histogram.
    #[clap(long, default_value = "100")]
    short_range_bins: usize,

    /// Upper edge of the coarse gap histogram.
    #[clap(long, default_value = "20000000")]
    full_range: Time,

    /// Number of bins in the coarse gap histogram.
    #[clap(long, default_value = "100")]
    full_range_bins: usize,

    /// Number of unit bins on each axis of the hits-per-paddle histogram.
    #[clap(long, default_value = "15")]
    max_hits: usize,

    /// File to write the delay tables to.
    #[clap(long, default_value = "scint_coincidence_delays.json")]
    output: PathBuf,

    /// If set, SVG plots of each table are written to this directory.
    #[clap(long)]
    plot_dir: Option<PathBuf>,

    #[clap(flatten)]
    progress: ProgressOpts,
}

impl Cli {
    fn binning(&self) -> DelayBinning {
        DelayBinning {
            threshold: self.gap_threshold,
            short_range_bins: self.short_range_bins,
            full_range: self.full_range,
            full_range_bins: self.full_range_bins,
            max_hits: self.max_hits,
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracer()?;
    debug!("Args: {:?}", args);

    let scint_hits = load_hits(&args.scint_hits, args.max_scint_hits)
        .context("failed to load scintillator hits")?;

    let mut histograms =
        DelayHistograms::new(&args.binning()).context("invalid histogram binning")?;

    let hits = scint_hits.iter().enumerate().map(|(entry, hit)| {
        args.progress.report("scintillator", entry);
        hit
    });
    for summary in reducer::summarise_events(hits) {
        histograms.record(&summary);
    }

    let report = histograms.into_report();
    info!(
        "Summarised {} events, {} with alternating paddle hits",
        report.events,
        report.full_range.entries()
    );
    if report.hit_counts.outside() > 0 {
        warn!(
            "{} events had more hits on a paddle than the hit count table holds",
            report.hit_counts.outside()
        );
    }
    if report.full_range.overflow() > 0 {
        warn!(
            "{} minimum gaps were beyond the full range table",
            report.full_range.overflow()
        );
    }

    save_report(&args.output, &report).context("failed to save delay tables")?;

    if let Some(plot_dir) = &args.plot_dir {
        save_plots(plot_dir, &report).context("failed to plot delay tables")?;
    }
    Ok(())
}

fn save_plots(dir: &Path, report: &DelayReport) -> Result<(), PlotError> {
    save_heatmap_svg(
        &plot_path(dir, "scint_wire_hits")?,
        &report.hit_counts,
        Labels {
            title: "Events with Given Number of Strikes on Each Scintillator",
            x: "Scintillator 0 Strikes",
            y: "Scintillator 1 Strikes",
        },
    )?;

    let title = format!(
        "Scintillator Hit Time Offsets Below {}ns",
        report.threshold
    );
    save_histogram_svg(
        &plot_path(dir, "time_offsets")?,
        &report.short_range,
        Labels {
            title: &title,
            x: "Hit Time Offset / ns",
            y: "Events",
        },
    )?;

    save_histogram_svg(
        &plot_path(dir, "time_offsets_nocut")?,
        &report.full_range,
        Labels {
            title: "Scintillator Hit Time Offsets",
            x: "Hit Time Offset / ns",
            y: "Events",
        },
    )
}
