mod generator;

use anyhow::{Context, Result};
use clap::Parser;
use generator::{HitGenerator, SimulationConfig};
use rand::{SeedableRng, rngs::StdRng};
use std::{fs::create_dir_all, path::PathBuf};
use strawscint_common::{
    loader::save_hits, tracer::init_tracer, Channel, EventNumber, ProgressOpts, RunNumber, Time,
};
use tracing::{debug, info};

// cargo run --bin hit-simulator -- --runs 2 --events 10000 --seed 1 --output-dir sim

/// Writes synthetic scintillator and straw hit tables.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Number of the first run.
    #[clap(long, default_value = "1")]
    first_run: RunNumber,

    /// Number of runs to simulate.
    #[clap(long, default_value = "1")]
    runs: RunNumber,

    /// Number of events in each run.
    #[clap(long, default_value = "10000")]
    events: EventNumber,

    /// Mean number of scintillator strikes per event.
    #[clap(long, default_value = "1.5")]
    mean_strikes: f64,

    /// Mean number of straw hits following each strike.
    #[clap(long, default_value = "3")]
    mean_straws_per_strike: f64,

    /// Mean delay of a straw hit after its strike.
    #[clap(long, default_value = "60")]
    mean_straw_delay: f64,

    /// Mean number of uncorrelated straw hits per event.
    #[clap(long, default_value = "1")]
    mean_noise_straws: f64,

    /// Length of the window strikes and noise are spread over.
    #[clap(long, default_value = "1000")]
    event_window: Time,

    /// Number of straw wires.
    #[clap(long, default_value = "64")]
    straw_wires: Channel,

    /// Seed of the random number generator, if unset the output is not reproducible.
    #[clap(long, env = "STRAWSCINT_SEED")]
    seed: Option<u64>,

    /// Directory to write `scint_hits.jsonl` and `straw_hits.jsonl` to.
    #[clap(long, default_value = ".")]
    output_dir: PathBuf,

    #[clap(flatten)]
    progress: ProgressOpts,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            mean_strikes: self.mean_strikes,
            mean_straws_per_strike: self.mean_straws_per_strike,
            mean_straw_delay: self.mean_straw_delay,
            mean_noise_straws: self.mean_noise_straws,
            event_window: self.event_window,
            straw_wires: self.straw_wires,
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracer()?;
    debug!("Args: {:?}", args);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut generator = HitGenerator::new(&args.config(), rng)?;

    let mut scint_hits = Vec::new();
    let mut straw_hits = Vec::new();
    let mut entry = 0;
    for run in args.first_run..args.first_run + args.runs {
        for event in 0..args.events {
            args.progress.report("simulation", entry);
            entry += 1;

            let simulated = generator.event(run, event);
            scint_hits.extend(simulated.scint);
            straw_hits.extend(simulated.straws);
        }
    }
    info!(
        "Simulated {} scintillator hits and {} straw hits in {entry} events",
        scint_hits.len(),
        straw_hits.len()
    );

    create_dir_all(&args.output_dir).context("failed to create output directory")?;
    save_hits(&args.output_dir.join("scint_hits.jsonl"), &scint_hits)
        .context("failed to save scintillator hits")?;
    save_hits(&args.output_dir.join("straw_hits.jsonl"), &straw_hits)
        .context("failed to save straw hits")?;
    Ok(())
}
