use crate::index::EventIndex;
use strawscint_common::{
    cut::{CutPolicy, CutWidths},
    histogram::{Axis, AxisError, Histogram1D},
    report::{CoincidenceReport, CutReport},
    Time,
};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// Which events contribute to the tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum StrikeSelection {
    #[default]
    All,
    /// Only events holding exactly this many strikes.
    StrikesPerEvent(usize),
}

impl StrikeSelection {
    fn admits(&self, strikes_in_event: usize) -> bool {
        match self {
            StrikeSelection::All => true,
            StrikeSelection::StrikesPerEvent(n) => strikes_in_event == *n,
        }
    }

    fn strikes_per_event(&self) -> Option<usize> {
        match self {
            StrikeSelection::All => None,
            StrikeSelection::StrikesPerEvent(n) => Some(*n),
        }
    }
}

impl From<Option<usize>> for StrikeSelection {
    fn from(strikes_per_event: Option<usize>) -> Self {
        strikes_per_event.map_or(StrikeSelection::All, StrikeSelection::StrikesPerEvent)
    }
}

/// Raw values for one cut, before binning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Distribution {
    /// Cluster size of every strike with at least one matched straw.
    pub(crate) counts: Vec<usize>,
    /// Delay of every matched straw after its strike.
    pub(crate) delays: Vec<Time>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CoincidenceDistributions {
    selection: StrikeSelection,
    short_cut: Distribution,
    long_cut: Distribution,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Binning {
    /// Cluster sizes are binned in unit bins over `[0, count_bins)`.
    pub(crate) count_bins: usize,
    /// Delays are binned over `[0, cut width)`.
    pub(crate) delay_bins: usize,
}

impl Default for Binning {
    fn default() -> Self {
        Self {
            count_bins: 10,
            delay_bins: 50,
        }
    }
}

impl CoincidenceDistributions {
    pub(crate) fn get(&self, policy: CutPolicy) -> &Distribution {
        match policy {
            CutPolicy::Short => &self.short_cut,
            CutPolicy::Long => &self.long_cut,
        }
    }

    fn get_mut(&mut self, policy: CutPolicy) -> &mut Distribution {
        match policy {
            CutPolicy::Short => &mut self.short_cut,
            CutPolicy::Long => &mut self.long_cut,
        }
    }

    pub(crate) fn into_report(
        self,
        cuts: &CutWidths,
        binning: &Binning,
    ) -> Result<CoincidenceReport, AxisError> {
        let count_axis = Axis::new(binning.count_bins, 0.0, binning.count_bins as f64)?;
        let cut_reports = CutPolicy::iter()
            .map(|policy| -> Result<CutReport, AxisError> {
                let width = cuts.width(policy);
                let distribution = self.get(policy);

                let mut counts = Histogram1D::new(count_axis);
                for &count in &distribution.counts {
                    counts.fill(count as f64);
                }
                let delay_axis = Axis::new(binning.delay_bins, 0.0, width as f64)?;
                let mut delays = Histogram1D::new(delay_axis);
                for &delay in &distribution.delays {
                    delays.fill(delay as f64);
                }
                let outside = delays.underflow() + delays.overflow();
                if outside > 0 {
                    warn!("{outside} {policy} cut delays fall outside [0, {width})");
                }
                if counts.overflow() > 0 {
                    warn!(
                        "{} {policy} cut clusters exceed {} straws",
                        counts.overflow(),
                        binning.count_bins
                    );
                }

                Ok(CutReport {
                    policy,
                    width,
                    counts,
                    delays,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CoincidenceReport {
            strikes_per_event: self.selection.strikes_per_event(),
            cuts: cut_reports,
        })
    }
}

/// Reduces the populated clusters into per-cut distributions.
///
/// Strikes with an empty cluster are left out of both the counts and the
/// delays of that cut rather than contributing a zero.
pub(crate) fn aggregate(index: &EventIndex, selection: StrikeSelection) -> CoincidenceDistributions {
    let mut distributions = CoincidenceDistributions {
        selection,
        ..Default::default()
    };
    for (_, strikes) in index
        .events()
        .filter(|(_, strikes)| selection.admits(strikes.len()))
    {
        for strike in strikes {
            for policy in CutPolicy::iter() {
                let cluster = strike.cluster(policy);
                if cluster.is_empty() {
                    continue;
                }
                let distribution = distributions.get_mut(policy);
                distribution.counts.push(cluster.len());
                distribution.delays.extend(strike.delays(policy));
            }
        }
    }
    for policy in CutPolicy::iter() {
        debug!(
            "{policy} cut: {} strikes with coincidences",
            distributions.get(policy).counts.len()
        );
    }
    distributions
}
