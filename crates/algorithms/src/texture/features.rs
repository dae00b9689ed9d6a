//! Haralick texture features of a co-occurrence histogram

use super::histogram::CooccurrenceHistogram;

/// Number of features produced per pixel
pub const FEATURE_COUNT: usize = 8;

/// The texture features, in output component order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFeature {
    /// Angular second moment: Σ p²
    Energy,
    /// −Σ p·log₂ p
    Entropy,
    /// Linear dependency of gray levels
    Correlation,
    /// Homogeneity: Σ p / (1 + (i − j)²)
    InverseDifferenceMoment,
    /// Contrast: Σ p·(i − j)²
    Inertia,
    /// Skewness of the sum distribution
    ClusterShade,
    /// Kurtosis-like tail weight of the sum distribution
    ClusterProminence,
    /// Information measure of correlation
    HaralickCorrelation,
}

impl TextureFeature {
    /// Every feature in output order
    pub const ALL: [TextureFeature; FEATURE_COUNT] = [
        TextureFeature::Energy,
        TextureFeature::Entropy,
        TextureFeature::Correlation,
        TextureFeature::InverseDifferenceMoment,
        TextureFeature::Inertia,
        TextureFeature::ClusterShade,
        TextureFeature::ClusterProminence,
        TextureFeature::HaralickCorrelation,
    ];

    /// Output component index
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short snake_case name, used for output file suffixes
    pub fn name(self) -> &'static str {
        match self {
            TextureFeature::Energy => "energy",
            TextureFeature::Entropy => "entropy",
            TextureFeature::Correlation => "correlation",
            TextureFeature::InverseDifferenceMoment => "idm",
            TextureFeature::Inertia => "inertia",
            TextureFeature::ClusterShade => "cluster_shade",
            TextureFeature::ClusterProminence => "cluster_prominence",
            TextureFeature::HaralickCorrelation => "haralick_correlation",
        }
    }
}

/// The eight features of one pixel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureFeatures {
    pub energy: f64,
    pub entropy: f64,
    pub correlation: f64,
    pub inverse_difference_moment: f64,
    pub inertia: f64,
    pub cluster_shade: f64,
    pub cluster_prominence: f64,
    pub haralick_correlation: f64,
}

impl TextureFeatures {
    /// Features in output component order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.energy,
            self.entropy,
            self.correlation,
            self.inverse_difference_moment,
            self.inertia,
            self.cluster_shade,
            self.cluster_prominence,
            self.haralick_correlation,
        ]
    }

    /// Rebuild from output component order
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            energy,
            entropy,
            correlation,
            inverse_difference_moment,
            inertia,
            cluster_shade,
            cluster_prominence,
            haralick_correlation,
        ] = values;
        Self {
            energy,
            entropy,
            correlation,
            inverse_difference_moment,
            inertia,
            cluster_shade,
            cluster_prominence,
            haralick_correlation,
        }
    }

    /// Value of a single feature
    pub fn get(&self, feature: TextureFeature) -> f64 {
        self.to_array()[feature.index()]
    }
}

/// Below this a standard deviation or entropy is treated as zero
const DEGENERATE_EPS: f64 = 1e-12;

/// Computes [`TextureFeatures`] from a histogram.
///
/// Holds the marginal distributions as scratch space so that extracting
/// features for a pixel allocates nothing. One extractor per worker.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    px: Vec<f64>,
    py: Vec<f64>,
}

impl FeatureExtractor {
    /// Create an extractor for histograms with `bins` bins per axis
    pub fn new(bins: usize) -> Self {
        Self {
            px: vec![0.0; bins],
            py: vec![0.0; bins],
        }
    }

    /// Compute the features of `histogram`.
    ///
    /// Works on relative frequencies `p = h / Σh` with the bin indices as
    /// gray levels. An empty histogram yields all zeros.
    pub fn extract(&mut self, histogram: &CooccurrenceHistogram) -> TextureFeatures {
        let total = histogram.total_frequency();
        if total <= 0.0 {
            return TextureFeatures::default();
        }

        let bins = histogram.bins();
        if self.px.len() != bins {
            self.px.resize(bins, 0.0);
            self.py.resize(bins, 0.0);
        }
        self.px.fill(0.0);
        self.py.fill(0.0);

        let h = histogram.view();

        // Marginals and means
        let mut mean_x = 0.0;
        let mut mean_y = 0.0;
        for ((i, j), &f) in h.indexed_iter() {
            if f == 0.0 {
                continue;
            }
            let p = f / total;
            self.px[i] += p;
            self.py[j] += p;
            mean_x += i as f64 * p;
            mean_y += j as f64 * p;
        }

        let mut var_x = 0.0;
        let mut var_y = 0.0;
        let mut energy = 0.0;
        let mut entropy = 0.0;
        let mut sum_ij = 0.0;
        let mut idm = 0.0;
        let mut inertia = 0.0;
        let mut shade = 0.0;
        let mut prominence = 0.0;
        let mut hxy1 = 0.0;

        for ((i, j), &f) in h.indexed_iter() {
            if f == 0.0 {
                continue;
            }
            let p = f / total;
            let (fi, fj) = (i as f64, j as f64);
            let diff = fi - fj;
            let sum_dev = fi + fj - mean_x - mean_y;

            var_x += (fi - mean_x).powi(2) * p;
            var_y += (fj - mean_y).powi(2) * p;
            energy += p * p;
            entropy -= p * p.log2();
            sum_ij += fi * fj * p;
            idm += p / (1.0 + diff * diff);
            inertia += p * diff * diff;
            shade += p * sum_dev.powi(3);
            prominence += p * sum_dev.powi(4);
            hxy1 -= p * (self.px[i] * self.py[j]).log2();
        }

        let sigma = var_x.sqrt() * var_y.sqrt();
        let correlation = if sigma > DEGENERATE_EPS {
            (sum_ij - mean_x * mean_y) / sigma
        } else {
            0.0
        };

        let hx = marginal_entropy(&self.px);
        let hy = marginal_entropy(&self.py);
        let h_max = hx.max(hy);
        let haralick_correlation = if h_max > DEGENERATE_EPS {
            (entropy - hxy1) / h_max
        } else {
            0.0
        };

        TextureFeatures {
            energy,
            entropy: clean_zero(entropy),
            correlation,
            inverse_difference_moment: idm,
            inertia,
            cluster_shade: shade,
            cluster_prominence: prominence,
            haralick_correlation,
        }
    }
}

fn marginal_entropy(p: &[f64]) -> f64 {
    p.iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| -v * v.log2())
        .sum()
}

/// Fold the `-0.0` produced by `-(1 · log₂ 1)` into `0.0`
fn clean_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn histogram(bins: usize, cells: &[(usize, usize, usize)]) -> CooccurrenceHistogram {
        let mut h = CooccurrenceHistogram::new(bins, 0.0, (bins - 1) as f64).unwrap();
        for &(i, j, n) in cells {
            for _ in 0..n {
                h.increment(i, j);
            }
        }
        h
    }

    #[test]
    fn test_single_bin_histogram() {
        let h = histogram(8, &[(3, 3, 10)]);
        let f = FeatureExtractor::new(8).extract(&h);
        assert_relative_eq!(f.energy, 1.0);
        assert_eq!(f.entropy, 0.0);
        assert_eq!(f.inertia, 0.0);
        assert_relative_eq!(f.inverse_difference_moment, 1.0);
        assert_eq!(f.correlation, 0.0);
        assert_eq!(f.cluster_shade, 0.0);
        assert_eq!(f.cluster_prominence, 0.0);
        assert_eq!(f.haralick_correlation, 0.0);
    }

    #[test]
    fn test_empty_histogram_falls_back_to_zero() {
        let mut h = histogram(4, &[]);
        let mut extractor = FeatureExtractor::new(4);
        assert_eq!(extractor.extract(&h), TextureFeatures::default());
        h.normalize();
        assert_eq!(extractor.extract(&h).to_array(), [0.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_two_level_off_diagonal() {
        // Symmetric 0<->1 co-occurrences only
        let h = histogram(2, &[(0, 1, 5), (1, 0, 5)]);
        let f = FeatureExtractor::new(2).extract(&h);
        assert_relative_eq!(f.energy, 0.5);
        assert_relative_eq!(f.entropy, 1.0);
        assert_relative_eq!(f.inertia, 1.0);
        assert_relative_eq!(f.inverse_difference_moment, 0.5);
        // Perfect anti-correlation
        assert_relative_eq!(f.correlation, -1.0, epsilon = 1e-12);
        // i + j is always 1 == mean_x + mean_y
        assert_relative_eq!(f.cluster_shade, 0.0);
        assert_relative_eq!(f.cluster_prominence, 0.0);
        // HXY = 1, HXY1 = 2, HX = HY = 1
        assert_relative_eq!(f.haralick_correlation, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalized_and_raw_agree() {
        let mut h = histogram(4, &[(0, 0, 2), (0, 2, 3), (2, 0, 3), (3, 1, 1), (1, 3, 1)]);
        let mut extractor = FeatureExtractor::new(4);
        let raw = extractor.extract(&h);
        h.normalize();
        let normalized = extractor.extract(&h);
        for (a, b) in raw.to_array().iter().zip(normalized.to_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_uniform_histogram_independent() {
        // p_ij = px_i * py_j: no information shared between the axes
        let cells: Vec<(usize, usize, usize)> =
            (0..4).flat_map(|i| (0..4).map(move |j| (i, j, 3))).collect();
        let h = histogram(4, &cells);
        let f = FeatureExtractor::new(4).extract(&h);
        assert_relative_eq!(f.energy, 1.0 / 16.0);
        assert_relative_eq!(f.entropy, 4.0, epsilon = 1e-12);
        assert_relative_eq!(f.correlation, 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.haralick_correlation, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_feature_order() {
        let f = TextureFeatures::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(f.inverse_difference_moment, 4.0);
        assert_eq!(f.get(TextureFeature::HaralickCorrelation), 8.0);
        for (k, feature) in TextureFeature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), k);
            assert_eq!(f.get(*feature), (k + 1) as f64);
        }
    }
}
