use strawscint_common::{
    cut::CutPolicy,
    histogram::ScaledHistogram,
    plot::{Series, SeriesColour},
    report::{CoincidenceReport, CutReport},
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum OverlayError {
    #[error("The {sample} report has no {policy} cut")]
    MissingCut { sample: Sample, policy: CutPolicy },
    #[error("The {sample} {policy} cut {table} histogram is empty")]
    EmptyHistogram {
        sample: Sample,
        policy: CutPolicy,
        table: &'static str,
    },
}

/// Which report a histogram came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum Sample {
    /// Events with a single scintillator strike.
    #[strum(to_string = "single")]
    Single,
    /// Events with two coinciding scintillator strikes.
    #[strum(to_string = "double")]
    Double,
}

impl Sample {
    fn legend(&self) -> &'static str {
        match self {
            Sample::Single => "1 scint hit",
            Sample::Double => "2 scint hits",
        }
    }
}

/// Count histogram scaled to unit area and delay histogram scaled to unit peak.
#[derive(Clone, Debug)]
struct NormalisedCut {
    width: i64,
    counts: ScaledHistogram,
    delays: ScaledHistogram,
}

fn normalise(
    report: &CoincidenceReport,
    sample: Sample,
    policy: CutPolicy,
) -> Result<NormalisedCut, OverlayError> {
    let CutReport {
        width,
        counts,
        delays,
        ..
    } = report
        .cut(policy)
        .ok_or(OverlayError::MissingCut { sample, policy })?;
    let empty = |table| OverlayError::EmptyHistogram {
        sample,
        policy,
        table,
    };
    Ok(NormalisedCut {
        width: *width,
        counts: counts.normalised_by_integral().ok_or_else(|| empty("counts"))?,
        delays: delays.normalised_by_maximum().ok_or_else(|| empty("delays"))?,
    })
}

/// A plot comparing several normalised histograms.
#[derive(Clone, Debug)]
pub(crate) struct Overlay {
    pub(crate) file_name: &'static str,
    pub(crate) title: &'static str,
    pub(crate) x_label: &'static str,
    pub(crate) y_label: &'static str,
    pub(crate) series: Vec<Series>,
}

/// Compares the short and long cut count tables within each sample, and the
/// single and double sample delay tables within each cut.
pub(crate) fn build_overlays(
    single: &CoincidenceReport,
    double: &CoincidenceReport,
) -> Result<Vec<Overlay>, OverlayError> {
    let single_short = normalise(single, Sample::Single, CutPolicy::Short)?;
    let single_long = normalise(single, Sample::Single, CutPolicy::Long)?;
    let double_short = normalise(double, Sample::Double, CutPolicy::Short)?;
    let double_long = normalise(double, Sample::Double, CutPolicy::Long)?;

    let count_series = |short: &NormalisedCut, long: &NormalisedCut| {
        vec![
            Series {
                label: format!("Delay cut {} ns", short.width),
                histogram: short.counts.clone(),
                colour: SeriesColour::Blue,
            },
            Series {
                label: format!("Delay cut {} ns", long.width),
                histogram: long.counts.clone(),
                colour: SeriesColour::Red,
            },
        ]
    };
    let delay_series = |single: &NormalisedCut, double: &NormalisedCut| {
        vec![
            Series {
                label: Sample::Single.legend().to_owned(),
                histogram: single.delays.clone(),
                colour: SeriesColour::Blue,
            },
            Series {
                label: Sample::Double.legend().to_owned(),
                histogram: double.delays.clone(),
                colour: SeriesColour::Red,
            },
        ]
    };

    Ok(vec![
        Overlay {
            file_name: "single_straw_coincidence_overlay",
            title: "Straw Hits After Scint Hits (Single Scint Hit)",
            x_label: "Number of Straw Hits",
            y_label: "Proportion of Coincidence Events",
            series: count_series(&single_short, &single_long),
        },
        Overlay {
            file_name: "double_straw_coincidence_overlay",
            title: "Straw Hits After Scint Hits (Two Coinciding Scint Hits)",
            x_label: "Number of Straw Hits",
            y_label: "Proportion of Coincidence Events",
            series: count_series(&double_short, &double_long),
        },
        Overlay {
            file_name: "long_delay_overlay",
            title: "Straw Hit Delay Time (Long Time Cut)",
            x_label: "Delay Time",
            y_label: "Events",
            series: delay_series(&single_long, &double_long),
        },
        Overlay {
            file_name: "short_delay_overlay",
            title: "Straw Hit Delay Time (Short Time Cut)",
            x_label: "Delay Time",
            y_label: "Events",
            series: delay_series(&single_short, &double_short),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use strawscint_common::histogram::{Axis, Histogram1D};

    fn histogram(bins: usize, high: f64, values: &[f64]) -> Histogram1D {
        let mut histogram = Histogram1D::new(Axis::new(bins, 0.0, high).unwrap());
        for &value in values {
            histogram.fill(value);
        }
        histogram
    }

    fn report(counts: &[f64], delays: &[f64]) -> CoincidenceReport {
        CoincidenceReport {
            strikes_per_event: None,
            cuts: vec![
                CutReport {
                    policy: CutPolicy::Short,
                    width: 75,
                    counts: histogram(10, 10.0, counts),
                    delays: histogram(50, 75.0, delays),
                },
                CutReport {
                    policy: CutPolicy::Long,
                    width: 500,
                    counts: histogram(10, 10.0, counts),
                    delays: histogram(50, 500.0, delays),
                },
            ],
        }
    }

    #[test]
    fn four_overlays_with_two_series_each() {
        let single = report(&[1.0, 1.0, 2.0], &[10.0, 12.0, 40.0]);
        let double = report(&[2.0, 3.0], &[5.0]);
        let overlays = build_overlays(&single, &double).unwrap();

        assert_eq!(
            overlays.iter().map(|o| o.file_name).collect::<Vec<_>>(),
            vec![
                "single_straw_coincidence_overlay",
                "double_straw_coincidence_overlay",
                "long_delay_overlay",
                "short_delay_overlay"
            ]
        );
        assert!(overlays.iter().all(|o| o.series.len() == 2));
    }

    #[test]
    fn counts_have_unit_area_and_delays_unit_peak() {
        let single = report(&[1.0, 1.0, 2.0], &[10.0, 12.0, 40.0]);
        let double = report(&[2.0, 3.0], &[5.0]);
        let overlays = build_overlays(&single, &double).unwrap();

        for overlay in &overlays[..2] {
            for series in &overlay.series {
                assert_approx_eq!(series.histogram.sum(), 1.0);
            }
        }
        for overlay in &overlays[2..] {
            for series in &overlay.series {
                assert_approx_eq!(series.histogram.max_value(), 1.0);
            }
        }
        let labels: Vec<_> = overlays[0].series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Delay cut 75 ns", "Delay cut 500 ns"]);
    }

    #[test]
    fn empty_tables_cannot_be_normalised() {
        let single = report(&[1.0], &[10.0]);
        let double = report(&[], &[]);
        assert_eq!(
            build_overlays(&single, &double).err(),
            Some(OverlayError::EmptyHistogram {
                sample: Sample::Double,
                policy: CutPolicy::Short,
                table: "counts",
            })
        );
    }

    #[test]
    fn missing_cuts_are_reported() {
        let mut single = report(&[1.0], &[10.0]);
        single.cuts.retain(|cut| cut.policy == CutPolicy::Short);
        let double = report(&[1.0], &[10.0]);
        assert_eq!(
            build_overlays(&single, &double).err(),
            Some(OverlayError::MissingCut {
                sample: Sample::Single,
                policy: CutPolicy::Long,
            })
        );
    }
}
