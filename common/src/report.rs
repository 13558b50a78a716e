//! The tabulated results handed from the analysis tools to the plotting tools.
use crate::{
    cut::CutPolicy,
    histogram::{Histogram1D, Histogram2D},
    loader::WriteError,
    Time,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReadReportError {
    #[error("Cannot open report {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed report {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Straw coincidence tables for one delay cut.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutReport {
    pub policy: CutPolicy,
    pub width: Time,
    /// Number of straws matched to each strike that had at least one match.
    pub counts: Histogram1D,
    /// Delay of every matched straw after its strike.
    pub delays: Histogram1D,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoincidenceReport {
    /// Number of strikes per event the tables were restricted to, if any.
    pub strikes_per_event: Option<usize>,
    pub cuts: Vec<CutReport>,
}

impl CoincidenceReport {
    pub fn cut(&self, policy: CutPolicy) -> Option<&CutReport> {
        self.cuts.iter().find(|cut| cut.policy == policy)
    }
}

/// Scintillator double-hit tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelayReport {
    pub threshold: Time,
    pub events: usize,
    /// Hits on channel 0 against hits on channel 1, per event.
    pub hit_counts: Histogram2D,
    /// Minimum alternating-channel gap per event, for gaps below `threshold`.
    pub short_range: Histogram1D,
    /// Minimum alternating-channel gap per event.
    pub full_range: Histogram1D,
}

pub fn save_report<T: Serialize>(path: &Path, report: &T) -> Result<(), WriteError> {
    let file = File::create(path).map_err(|source| WriteError::Create {
        path: path.to_owned(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    info!("Wrote report to {}", path.display());
    Ok(())
}

pub fn load_report<T: DeserializeOwned>(path: &Path) -> Result<T, ReadReportError> {
    let file = File::open(path).map_err(|source| ReadReportError::Open {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ReadReportError::Parse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Axis;

    #[test]
    fn cut_lookup_by_policy() {
        let counts = Histogram1D::new(Axis::new(10, 0.0, 10.0).unwrap());
        let report = CoincidenceReport {
            strikes_per_event: None,
            cuts: vec![CutReport {
                policy: CutPolicy::Long,
                width: 500,
                counts: counts.clone(),
                delays: Histogram1D::new(Axis::new(50, 0.0, 500.0).unwrap()),
            }],
        };
        assert_eq!(report.cut(CutPolicy::Long).map(|cut| cut.width), Some(500));
        assert!(report.cut(CutPolicy::Short).is_none());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"policy\":\"long\""));
        let parsed: CoincidenceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
