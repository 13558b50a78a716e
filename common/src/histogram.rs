//! Fixed-width binned histograms.
//!
//! Binning follows the usual detector-analysis convention: `bins` equal bins
//! cover the half-open range `[low, high)`, and fills outside that range are
//! tallied as underflow or overflow rather than dropped.
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AxisError {
    #[error("axis must have at least one bin")]
    NoBins,
    #[error("axis upper edge {high} must exceed lower edge {low}")]
    EmptyRange { low: f64, high: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bin {
    Underflow,
    Index(usize),
    Overflow,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    bins: usize,
    low: f64,
    high: f64,
}

impl Axis {
    pub fn new(bins: usize, low: f64, high: f64) -> Result<Self, AxisError> {
        if bins == 0 {
            return Err(AxisError::NoBins);
        }
        if high.partial_cmp(&low) != Some(std::cmp::Ordering::Greater) {
            return Err(AxisError::EmptyRange { low, high });
        }
        Ok(Self { bins, low, high })
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    pub fn lower_edge(&self, index: usize) -> f64 {
        self.low + self.bin_width() * index as f64
    }

    pub fn bin_of(&self, value: f64) -> Bin {
        if value < self.low {
            Bin::Underflow
        } else if value >= self.high || value.is_nan() {
            Bin::Overflow
        } else {
            let index = ((value - self.low) / (self.high - self.low) * self.bins as f64) as usize;
            // Rounding can push values just below `high` onto the upper edge
            Bin::Index(index.min(self.bins.saturating_sub(1)))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    axis: Axis,
    counts: Array1<u64>,
    underflow: u64,
    overflow: u64,
}

impl Histogram1D {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            counts: Array1::zeros(axis.bins()),
            underflow: 0,
            overflow: 0,
        }
    }

    pub fn fill(&mut self, value: f64) -> Bin {
        let bin = self.axis.bin_of(value);
        match bin {
            Bin::Underflow => self.underflow += 1,
            Bin::Overflow => self.overflow += 1,
            Bin::Index(index) => {
                if let Some(count) = self.counts.get_mut(index) {
                    *count += 1;
                }
            }
        }
        bin
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn bin_content(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Every fill, including those that landed outside the axis.
    pub fn entries(&self) -> u64 {
        self.integral() + self.underflow + self.overflow
    }

    /// Sum of the in-range bins.
    pub fn integral(&self) -> u64 {
        self.counts.sum()
    }

    pub fn max_bin_content(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or_default()
    }

    pub fn scaled(&self, factor: f64) -> ScaledHistogram {
        ScaledHistogram {
            axis: self.axis,
            values: self.counts.mapv(|count| count as f64 * factor),
        }
    }

    /// Scales the histogram to unit area, `None` if nothing is in range.
    pub fn normalised_by_integral(&self) -> Option<ScaledHistogram> {
        match self.integral() {
            0 => None,
            integral => Some(self.scaled(1.0 / integral as f64)),
        }
    }

    /// Scales the histogram so its tallest bin is one, `None` if all bins are empty.
    pub fn normalised_by_maximum(&self) -> Option<ScaledHistogram> {
        match self.max_bin_content() {
            0 => None,
            max => Some(self.scaled(1.0 / max as f64)),
        }
    }
}

/// A histogram whose contents have been rescaled for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaledHistogram {
    axis: Axis,
    values: Array1<f64>,
}

impl ScaledHistogram {
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram2D {
    x_axis: Axis,
    y_axis: Axis,
    counts: Array2<u64>,
    outside: u64,
}

impl Histogram2D {
    pub fn new(x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            x_axis,
            y_axis,
            counts: Array2::zeros((x_axis.bins(), y_axis.bins())),
            outside: 0,
        }
    }

    pub fn fill(&mut self, x: f64, y: f64) {
        match (self.x_axis.bin_of(x), self.y_axis.bin_of(y)) {
            (Bin::Index(i), Bin::Index(j)) => {
                if let Some(count) = self.counts.get_mut((i, j)) {
                    *count += 1;
                }
            }
            _ => self.outside += 1,
        }
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Counts indexed by `(x bin, y bin)`.
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    pub fn bin_content(&self, x_bin: usize, y_bin: usize) -> Option<u64> {
        self.counts.get((x_bin, y_bin)).copied()
    }

    pub fn outside(&self) -> u64 {
        self.outside
    }

    pub fn entries(&self) -> u64 {
        self.integral() + self.outside
    }

    pub fn integral(&self) -> u64 {
        self.counts.sum()
    }

    pub fn max_bin_content(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn axis_rejects_degenerate_ranges() {
        assert_eq!(Axis::new(0, 0.0, 10.0), Err(AxisError::NoBins));
        assert_eq!(
            Axis::new(10, 5.0, 5.0),
            Err(AxisError::EmptyRange {
                low: 5.0,
                high: 5.0
            })
        );
    }

    #[test]
    fn fractional_bin_widths() {
        // 50 bins over [0, 75) as used for the short delay cut
        let axis = Axis::new(50, 0.0, 75.0).unwrap();
        assert_eq!(axis.bin_of(0.0), Bin::Index(0));
        assert_eq!(axis.bin_of(1.0), Bin::Index(0));
        assert_eq!(axis.bin_of(2.0), Bin::Index(1));
        assert_eq!(axis.bin_of(74.0), Bin::Index(49));
        assert_eq!(axis.bin_of(75.0), Bin::Overflow);
        assert_eq!(axis.bin_of(-1.0), Bin::Underflow);
        assert_approx_eq!(axis.lower_edge(2), 3.0);
    }

    #[test]
    fn fill_tracks_out_of_range_entries() {
        let mut histogram = Histogram1D::new(Axis::new(10, 0.0, 10.0).unwrap());
        for value in [0.0, 3.0, 3.5, 9.0, 10.0, 12.0, -4.0] {
            histogram.fill(value);
        }
        assert_eq!(histogram.integral(), 4);
        assert_eq!(histogram.entries(), 7);
        assert_eq!(histogram.underflow(), 1);
        assert_eq!(histogram.overflow(), 2);
        assert_eq!(histogram.bin_content(3), Some(2));
        assert_eq!(histogram.max_bin_content(), 2);
        assert_eq!(histogram.bin_content(10), None);
    }

    #[test]
    fn normalisation() {
        let mut histogram = Histogram1D::new(Axis::new(4, 0.0, 4.0).unwrap());
        for value in [0.0, 1.0, 1.0, 1.0, 3.0] {
            histogram.fill(value);
        }

        let by_area = histogram.normalised_by_integral().unwrap();
        assert_approx_eq!(by_area.sum(), 1.0);
        assert_approx_eq!(by_area.max_value(), 0.6);

        let by_peak = histogram.normalised_by_maximum().unwrap();
        assert_approx_eq!(by_peak.max_value(), 1.0);
        assert_approx_eq!(by_peak.values().sum(), 5.0 / 3.0);
    }

    #[test]
    fn empty_histograms_cannot_be_normalised() {
        let mut histogram = Histogram1D::new(Axis::new(4, 0.0, 4.0).unwrap());
        histogram.fill(8.0);
        assert!(histogram.normalised_by_integral().is_none());
        assert!(histogram.normalised_by_maximum().is_none());
    }

    #[test]
    fn fill_2d() {
        let axis = Axis::new(15, 0.0, 15.0).unwrap();
        let mut histogram = Histogram2D::new(axis, axis);
        histogram.fill(1.0, 2.0);
        histogram.fill(1.0, 2.0);
        histogram.fill(0.0, 14.0);
        histogram.fill(15.0, 0.0);

        assert_eq!(histogram.bin_content(1, 2), Some(2));
        assert_eq!(histogram.bin_content(2, 1), Some(0));
        assert_eq!(histogram.bin_content(0, 14), Some(1));
        assert_eq!(histogram.outside(), 1);
        assert_eq!(histogram.entries(), 4);
        assert_eq!(histogram.max_bin_content(), 2);
    }
}
