use crate::index::EventIndex;
use strawscint_common::{
    cut::{CutPolicy, CutWidths},
    Hit, ProgressOpts,
};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MatchSummary {
    pub(crate) straw_hits: usize,
    /// Straw hits recorded in an event with no scintillator strikes.
    pub(crate) straw_hits_without_strikes: usize,
    /// Cluster entries added, summed over every strike and cut.
    pub(crate) coincidences: usize,
}

/// Appends each straw hit to the cluster of every strike in its event whose
/// window, under each cut, contains it.
///
/// A straw hit may land in several clusters: strikes in the same event can
/// have overlapping windows, and each cut is tested independently.
#[instrument(skip_all)]
pub(crate) fn match_straw_hits<'a, I>(
    index: &mut EventIndex,
    straw_hits: I,
    cuts: &CutWidths,
    progress: &ProgressOpts,
) -> MatchSummary
where
    I: IntoIterator<Item = &'a Hit>,
{
    let mut summary = MatchSummary::default();
    for (entry, straw) in straw_hits.into_iter().enumerate() {
        progress.report("straw", entry);
        summary.straw_hits += 1;

        let strikes = index.lookup_mut(&straw.key());
        if strikes.is_empty() {
            summary.straw_hits_without_strikes += 1;
            continue;
        }
        for strike in strikes {
            for policy in CutPolicy::iter() {
                if cuts.admits(policy, strike.time(), straw.time) {
                    strike.cluster_mut(policy).push(straw.time);
                    summary.coincidences += 1;
                }
            }
        }
    }
    info!(
        "Matched {} straw hits: {} coincidences, {} hits in events without strikes",
        summary.straw_hits, summary.coincidences, summary.straw_hits_without_strikes
    );
    summary
}
