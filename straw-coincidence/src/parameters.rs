use crate::aggregation::Binning;
use clap::Args;
use strawscint_common::{cut::CutWidths, Time};

#[derive(Clone, Debug, Args)]
pub(crate) struct CutOpts {
    /// Upper limit on the delay of a straw hit after a strike, for the short cut.
    #[clap(long, env = "STRAWSCINT_SHORT_CUT", default_value = "75")]
    pub(crate) short_cut: Time,

    /// Upper limit on the delay of a straw hit after a strike, for the long cut.
    #[clap(long, env = "STRAWSCINT_LONG_CUT", default_value = "500")]
    pub(crate) long_cut: Time,
}

impl From<&CutOpts> for CutWidths {
    fn from(opts: &CutOpts) -> Self {
        CutWidths {
            short: opts.short_cut,
            long: opts.long_cut,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub(crate) struct BinningOpts {
    /// Number of unit bins in the straws-per-strike histograms.
    #[clap(long, default_value = "10")]
    pub(crate) count_bins: usize,

    /// Number of bins in the delay histograms, which span zero to the cut width.
    #[clap(long, default_value = "50")]
    pub(crate) delay_bins: usize,
}

impl From<&BinningOpts> for Binning {
    fn from(opts: &BinningOpts) -> Self {
        Binning {
            count_bins: opts.count_bins,
            delay_bins: opts.delay_bins,
        }
    }
}
