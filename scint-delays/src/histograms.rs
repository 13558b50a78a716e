use crate::reducer::EventSummary;
use strawscint_common::{
    histogram::{Axis, AxisError, Histogram1D, Histogram2D},
    report::DelayReport,
    Time,
};

#[derive(Clone, Copy, Debug)]
pub(crate) struct DelayBinning {
    /// Gaps below this also go in the short range histogram, which spans `[0, threshold)`.
    pub(crate) threshold: Time,
    pub(crate) short_range_bins: usize,
    /// Upper edge of the full range histogram.
    pub(crate) full_range: Time,
    pub(crate) full_range_bins: usize,
    /// Unit bins per axis of the hit count histogram.
    pub(crate) max_hits: usize,
}

impl Default for DelayBinning {
    fn default() -> Self {
        Self {
            threshold: 100,
            short_range_bins: 100,
            full_range: 20_000_000,
            full_range_bins: 100,
            max_hits: 15,
        }
    }
}

pub(crate) struct DelayHistograms {
    threshold: Time,
    events: usize,
    hit_counts: Histogram2D,
    short_range: Histogram1D,
    full_range: Histogram1D,
}

impl DelayHistograms {
    pub(crate) fn new(binning: &DelayBinning) -> Result<Self, AxisError> {
        let hits_axis = Axis::new(binning.max_hits, 0.0, binning.max_hits as f64)?;
        Ok(Self {
            threshold: binning.threshold,
            events: 0,
            hit_counts: Histogram2D::new(hits_axis, hits_axis),
            short_range: Histogram1D::new(Axis::new(
                binning.short_range_bins,
                0.0,
                binning.threshold as f64,
            )?),
            full_range: Histogram1D::new(Axis::new(
                binning.full_range_bins,
                0.0,
                binning.full_range as f64,
            )?),
        })
    }

    pub(crate) fn record(&mut self, summary: &EventSummary) {
        self.events += 1;
        let [channel_0, channel_1] = summary.channel_counts;
        self.hit_counts.fill(channel_0 as f64, channel_1 as f64);

        if let Some(gap) = summary.min_gap {
            if gap < self.threshold {
                self.short_range.fill(gap as f64);
            }
            self.full_range.fill(gap as f64);
        }
    }

    pub(crate) fn into_report(self) -> DelayReport {
        DelayReport {
            threshold: self.threshold,
            events: self.events,
            hit_counts: self.hit_counts,
            short_range: self.short_range,
            full_range: self.full_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strawscint_common::EventKey;

    fn summary(channel_counts: [u32; 2], min_gap: Option<Time>) -> EventSummary {
        EventSummary {
            key: EventKey::new(1, 1),
            channel_counts,
            min_gap,
        }
    }

    #[test]
    fn gaps_below_threshold_fill_both_ranges() {
        let mut histograms = DelayHistograms::new(&DelayBinning::default()).unwrap();
        histograms.record(&summary([2, 1], Some(15)));
        histograms.record(&summary([1, 1], Some(100)));
        histograms.record(&summary([3, 0], None));

        let report = histograms.into_report();
        assert_eq!(report.events, 3);
        assert_eq!(report.short_range.entries(), 1);
        assert_eq!(report.short_range.bin_content(15), Some(1));
        assert_eq!(report.full_range.entries(), 2);
        assert_eq!(report.full_range.bin_content(0), Some(2));
    }

    #[test]
    fn every_event_fills_the_hit_counts() {
        let mut histograms = DelayHistograms::new(&DelayBinning::default()).unwrap();
        histograms.record(&summary([2, 1], Some(15)));
        histograms.record(&summary([2, 1], None));
        histograms.record(&summary([0, 20], None));

        let report = histograms.into_report();
        assert_eq!(report.hit_counts.bin_content(2, 1), Some(2));
        assert_eq!(report.hit_counts.outside(), 1);
        assert_eq!(report.hit_counts.entries(), 3);
    }
}
