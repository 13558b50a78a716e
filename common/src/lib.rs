pub mod cut;
pub mod histogram;
pub mod loader;
pub mod plot;
pub mod report;
pub mod tracer;

use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::info;

pub type RunNumber = u32;
pub type EventNumber = u32;
pub type Channel = u32;
pub type Time = i64;

/// Identifies a single recording period of the detector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventKey {
    pub run: RunNumber,
    pub event: EventNumber,
}

impl EventKey {
    pub fn new(run: RunNumber, event: EventNumber) -> Self {
        Self { run, event }
    }
}

/// A single detection on either the scintillator paddles or a straw wire.
///
/// The serialised field names follow the columns of the tree dumper output
/// the hit tables are exported from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "Run")]
    pub run: RunNumber,
    #[serde(rename = "Event")]
    pub event: EventNumber,
    #[serde(rename = "Wire")]
    pub channel: Channel,
    #[serde(rename = "HitTime")]
    pub time: Time,
}

impl Hit {
    pub fn new(run: RunNumber, event: EventNumber, channel: Channel, time: Time) -> Self {
        Self {
            run,
            event,
            channel,
            time,
        }
    }

    pub fn key(&self) -> EventKey {
        EventKey::new(self.run, self.event)
    }
}

#[derive(Clone, Debug, Args)]
pub struct ProgressOpts {
    /// Log progress every this many records, zero disables progress logging.
    #[clap(long, env = "STRAWSCINT_PROGRESS_INTERVAL", default_value = "50000")]
    pub progress_interval: usize,
}

impl ProgressOpts {
    pub fn silent() -> Self {
        Self {
            progress_interval: 0,
        }
    }

    pub fn report(&self, stage: &str, index: usize) {
        if self.progress_interval != 0 && index % self.progress_interval == 0 {
            info!(stage, index, "Processing");
        }
    }
}
