//! Joint intensity histogram (the co-occurrence matrix)

use ndarray::{Array2, ArrayView2};
use texel_core::{Error, GridElement, NeighborhoodView, Result};

use super::offsets::OffsetPair;

/// A `bins × bins` joint frequency table over the intensity range
/// `[min, max + 1)` with linear binning.
///
/// One histogram is owned by one worker for a whole run. It is filled in
/// place for a pixel, read by the feature extractor and then cleared with
/// [`reset`](Self::reset); the storage is never reallocated.
#[derive(Debug, Clone)]
pub struct CooccurrenceHistogram {
    bins: usize,
    min: f64,
    max: f64,
    interval: f64,
    counts: Array2<f64>,
    total: f64,
}

impl CooccurrenceHistogram {
    /// Create an empty histogram accepting values in `[min, max]`
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidParameter {
                name: "bins_per_axis",
                value: bins.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::InvalidParameter {
                name: "min/max",
                value: format!("{}..={}", min, max),
                reason: "range must be finite with min <= max".to_string(),
            });
        }
        let interval = bin_width(bins, min, max).ok_or_else(|| Error::InvalidParameter {
            name: "min/max",
            value: format!("{}..={}", min, max),
            reason: "range is too wide or too narrow to bin".to_string(),
        })?;

        Ok(Self {
            bins,
            min,
            max,
            interval,
            counts: Array2::zeros((bins, bins)),
            total: 0.0,
        })
    }

    /// Number of bins along each axis
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Lowest accepted value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Highest accepted value
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether `value` lies in the accepted range
    pub fn accepts(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Bin index of an accepted value
    pub fn bin_index(&self, value: f64) -> usize {
        let bin = ((value - self.min) / self.interval).floor();
        if bin <= 0.0 {
            0
        } else {
            (bin as usize).min(self.bins - 1)
        }
    }

    /// Add one observation to bin `(i, j)`
    pub fn increment(&mut self, i: usize, j: usize) {
        self.counts[[i, j]] += 1.0;
        self.total += 1.0;
    }

    /// Frequency at bin `(i, j)`
    pub fn frequency(&self, i: usize, j: usize) -> f64 {
        self.counts[[i, j]]
    }

    /// Sum of all frequencies
    pub fn total_frequency(&self) -> f64 {
        self.total
    }

    /// The table as a 2-D view, indexed `[[i, j]]`
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.counts.view()
    }

    /// Divide every bin by the total frequency so the table sums to 1.
    ///
    /// An empty histogram is left untouched.
    pub fn normalize(&mut self) {
        if self.total > 0.0 {
            self.counts /= self.total;
            self.total = 1.0;
        }
    }

    /// Clear every bin, keeping the allocation
    pub fn reset(&mut self) {
        self.counts.fill(0.0);
        self.total = 0.0;
    }

    /// Whether `h[i][j] == h[j][i]` for every pair of bins
    pub fn is_symmetric(&self) -> bool {
        self.counts == self.counts.t()
    }
}

/// Width of one bin over `[min, max + 1)`, if it is finite and positive
pub(super) fn bin_width(bins: usize, min: f64, max: f64) -> Option<f64> {
    let width = (max + 1.0 - min) / bins as f64;
    (width.is_finite() && width > 0.0).then_some(width)
}

/// Fill `histogram` with the co-occurrences around the view's center.
///
/// For every pair both positions are read; if both values are in range the
/// pair is counted at `(p1, p2)` and again at `(p2, p1)`, which keeps the
/// table symmetric and gives a same-bin pair two counts on the diagonal.
/// Pairs with a value out of range are dropped. The histogram is neither
/// cleared nor reallocated.
pub fn accumulate<T: GridElement>(
    histogram: &mut CooccurrenceHistogram,
    view: &mut NeighborhoodView<'_, T>,
    pairs: &[OffsetPair],
) {
    for pair in pairs {
        let p1 = view.read(&pair.first).as_f64();
        let p2 = view.read(&pair.second).as_f64();

        if histogram.accepts(p1) && histogram.accepts(p2) {
            let i = histogram.bin_index(p1);
            let j = histogram.bin_index(p2);
            histogram.increment(i, j);
            histogram.increment(j, i);
        }
    }
}
