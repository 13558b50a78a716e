mod aggregation;
mod index;
mod matcher;
mod parameters;
mod plots;

use aggregation::{aggregate, Binning, StrikeSelection};
use anyhow::{Context, Result};
use clap::Parser;
use index::EventIndex;
use parameters::{BinningOpts, CutOpts};
use std::path::PathBuf;
use strawscint_common::{
    cut::{CutPolicy, CutWidths},
    loader::load_hits,
    report::save_report,
    tracer::init_tracer,
    ProgressOpts,
};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

// cargo run --bin straw-coincidence -- --scint-hits scint_hits.jsonl --straw-hits straw_hits.jsonl --plot-dir plots

/// Finds straw hits that follow a scintillator strike in the same event, and
/// tabulates how many straws follow each strike and how long after.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Hit table of the scintillator paddles.
    #[clap(long, env = "STRAWSCINT_SCINT_HITS")]
    scint_hits: PathBuf,

    /// Hit table of the straw wires.
    #[clap(long, env = "STRAWSCINT_STRAW_HITS")]
    straw_hits: PathBuf,

    /// Only read this many scintillator records.
    #[clap(long)]
    max_scint_hits: Option<usize>,

    /// Only read this many straw records.
    #[clap(long)]
    max_straw_hits: Option<usize>,

    #[clap(flatten)]
    cuts: CutOpts,

    /// Restrict the tables to events with exactly this many scintillator strikes.
    #[clap(long)]
    strikes_per_event: Option<usize>,

    #[clap(flatten)]
    binning: BinningOpts,

    /// File to write the coincidence tables to.
    #[clap(long, default_value = "scint_straw_coincidence.json")]
    output: PathBuf,

    /// If set, SVG plots of each table are written to this directory.
    #[clap(long)]
    plot_dir: Option<PathBuf>,

    #[clap(flatten)]
    progress: ProgressOpts,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracer()?;
    debug!("Args: {:?}", args);

    let cuts = CutWidths::from(&args.cuts);

    let scint_hits = load_hits(&args.scint_hits, args.max_scint_hits)
        .context("failed to load scintillator hits")?;
    let straw_hits = load_hits(&args.straw_hits, args.max_straw_hits)
        .context("failed to load straw hits")?;

    info!("Indexing scintillator strikes");
    let mut index = EventIndex::build(scint_hits.iter().enumerate().map(|(entry, hit)| {
        args.progress.report("scintillator", entry);
        hit
    }));
    if index.is_empty() {
        warn!("No scintillator strikes, every table will be empty");
    }
    info!(
        "Indexed {} strikes across {} events",
        index.len(),
        index.event_count()
    );

    info!("Matching straw hits");
    let summary = matcher::match_straw_hits(&mut index, &straw_hits, &cuts, &args.progress);
    if summary.straw_hits > 0 && summary.coincidences == 0 {
        warn!("No straw hit fell within any cut");
    }
    for policy in CutPolicy::iter() {
        let matched = index
            .strikes()
            .filter(|strike| !strike.cluster(policy).is_empty())
            .count();
        info!("{matched} strikes have straw hits within the {policy} cut");
    }

    let report = aggregate(&index, StrikeSelection::from(args.strikes_per_event))
        .into_report(&cuts, &Binning::from(&args.binning))
        .context("invalid histogram binning")?;

    save_report(&args.output, &report).context("failed to save coincidence tables")?;

    if let Some(plot_dir) = &args.plot_dir {
        plots::save_plots(plot_dir, &report).context("failed to plot coincidence tables")?;
    }
    Ok(())
}
