//! Windowed texture feature filter
//!
//! For every pixel of the requested region, builds the co-occurrence
//! histogram of the window around it and stores the eight texture features
//! in an output grid of shape `region.size + [8]`.
//!
//! The output region is split into slabs along the first axis, one per
//! worker. A worker owns one histogram and one extractor for its whole slab
//! and writes only into its own chunk of the output.

use ndarray::{ArrayD, ArrayViewMutD, Axis, IxDyn};
use texel_core::grid::decompose_faces;
use texel_core::{ComputeStage, Error, GridElement, NeighborhoodView, Region, Result, Volume};
use texel_parallel::partition::slab_extent;
use texel_parallel::{ParallelStrategy, Progress, split_region};

use super::features::{FEATURE_COUNT, FeatureExtractor, TextureFeature, TextureFeatures};
use super::histogram::{CooccurrenceHistogram, accumulate};
use super::offsets::{OffsetPair, generate_offset_pairs};
use super::params::TextureParams;

/// Texture features of a region: one feature vector per pixel.
#[derive(Debug, Clone)]
pub struct FeatureVolume {
    data: ArrayD<f64>,
    region: Region,
    spacing: Vec<f64>,
    origin: Vec<f64>,
}

impl FeatureVolume {
    fn empty(region: &Region, spacing: &[f64], origin: &[f64]) -> Self {
        let mut shape = region.size().to_vec();
        shape.push(FEATURE_COUNT);
        // Index zero of the output is the region start
        let origin = origin
            .iter()
            .zip(spacing)
            .zip(region.start())
            .map(|((o, s), &start)| o + s * start as f64)
            .collect();
        Self {
            data: ArrayD::zeros(IxDyn(&shape)),
            region: region.clone(),
            spacing: spacing.to_vec(),
            origin,
        }
    }

    /// Shape `region.size + [8]`
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Region of the input these features were computed for
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Pixel spacing, copied from the input
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    /// Physical position of output index zero
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// Raw output, last axis holding the features
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_array(self) -> ArrayD<f64> {
        self.data
    }

    /// Features at `index`, relative to the region start
    pub fn features_at(&self, index: &[usize]) -> Result<TextureFeatures> {
        let spatial = &self.data.shape()[..self.data.ndim() - 1];
        if index.len() != spatial.len() || index.iter().zip(spatial).any(|(i, n)| i >= n) {
            return Err(Error::IndexOutOfBounds {
                index: index.to_vec(),
                shape: spatial.to_vec(),
            });
        }
        let mut values = [0.0; FEATURE_COUNT];
        let mut idx = index.to_vec();
        idx.push(0);
        for (k, value) in values.iter_mut().enumerate() {
            idx[index.len()] = k;
            *value = self.data[&idx[..]];
        }
        Ok(TextureFeatures::from_array(values))
    }

    /// Single feature at `index`, relative to the region start
    pub fn get(&self, index: &[usize], feature: TextureFeature) -> Result<f64> {
        Ok(self.features_at(index)?.get(feature))
    }

    /// One feature as a scalar volume carrying the output metadata
    pub fn component(&self, feature: TextureFeature) -> Result<Volume<f64>> {
        let axis = Axis(self.data.ndim() - 1);
        let plane = self.data.index_axis(axis, feature.index()).to_owned();
        let mut volume = Volume::from_array(plane);
        volume.set_spacing(self.spacing.clone())?;
        volume.set_origin(self.origin.clone())?;
        Ok(volume)
    }
}

/// Windowed co-occurrence texture filter.
///
/// # Example
///
/// ```
/// use texel_algorithms::texture::{TextureFeature, TextureFeatureFilter, TextureParams, Window};
/// use texel_core::Volume;
///
/// let image = Volume::filled(&[5, 5, 5], 7u8);
/// let params = TextureParams {
///     window: Window::Uniform(1),
///     bins_per_axis: 16,
///     ..TextureParams::default().with_offset([1, 0, 0])
/// };
/// let features = TextureFeatureFilter::new(params).unwrap().execute(&image).unwrap();
/// assert_eq!(features.get(&[2, 2, 2], TextureFeature::Energy).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct TextureFeatureFilter {
    params: TextureParams,
    progress: Option<Progress>,
}

impl TextureFeatureFilter {
    /// Create a filter, rejecting invalid parameters
    pub fn new(params: TextureParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            progress: None,
        })
    }

    /// Report completed pixels through `progress`
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Compute the features of every pixel of `input`
    pub fn execute<T: GridElement>(&self, input: &Volume<T>) -> Result<FeatureVolume> {
        self.process(input, &input.largest_region())
    }

    fn run<T: GridElement>(&self, input: &Volume<T>, region: &Region) -> Result<FeatureVolume> {
        let params = &self.params;
        let ndim = input.ndim();
        if ndim == 0 {
            return Err(Error::InvalidDimensions {
                shape: Vec::new(),
                reason: "texture features need at least one axis".to_string(),
            });
        }
        let radius = params.validate_for(ndim)?;
        if region.ndim() != ndim {
            return Err(Error::DimensionMismatch {
                what: "region",
                expected: ndim,
                actual: region.ndim(),
            });
        }
        let buffered = input.largest_region();
        if !region.is_inside(&buffered) {
            return Err(Error::RegionOutOfBounds {
                start: region.start().to_vec(),
                size: region.size().to_vec(),
                shape: input.shape().to_vec(),
            });
        }

        let mut output = FeatureVolume::empty(region, input.spacing(), input.origin());
        if let Some(progress) = &self.progress {
            progress.start(region.num_pixels());
        }
        if region.is_empty() {
            return Ok(output);
        }

        let pairs = generate_offset_pairs(&radius, &params.offsets)?;

        let workers = params.mode.worker_count();
        let slabs = split_region(region, workers);
        let chunk = slab_extent(region.size()[0], workers);
        let work: Vec<(Region, ArrayViewMutD<'_, f64>)> = slabs
            .into_iter()
            .zip(output.data.axis_chunks_iter_mut(Axis(0), chunk))
            .collect();

        params.mode.try_for_each(work, |(slab, out)| {
            self.scan_slab(input, &buffered, &slab, &radius, &pairs, out)
        })?;

        Ok(output)
    }

    fn scan_slab<T: GridElement>(
        &self,
        input: &Volume<T>,
        buffered: &Region,
        slab: &Region,
        radius: &[usize],
        pairs: &[OffsetPair],
        mut out: ArrayViewMutD<'_, f64>,
    ) -> Result<()> {
        let params = &self.params;
        let mut histogram = CooccurrenceHistogram::new(params.bins_per_axis, params.min, params.max)?;
        let mut extractor = FeatureExtractor::new(params.bins_per_axis);

        let ndim = slab.ndim();
        let mut idx = vec![0usize; ndim + 1];

        for face in decompose_faces(buffered, slab, radius)? {
            let mut view = NeighborhoodView::new(input, params.boundary, face.is_interior())?;
            let mut cursor = face.region.cursor();
            while let Some(position) = cursor.advance() {
                view.recenter(position)?;
                accumulate(&mut histogram, &mut view, pairs);
                if params.normalize {
                    histogram.normalize();
                }
                let features = extractor.extract(&histogram);

                for axis in 0..ndim {
                    idx[axis] = position[axis] - slab.start()[axis];
                }
                for (k, value) in features.to_array().into_iter().enumerate() {
                    idx[ndim] = k;
                    out[&idx[..]] = value;
                }

                histogram.reset();
                if let Some(progress) = &self.progress {
                    progress.inc();
                }
            }
        }
        Ok(())
    }
}

impl<T: GridElement> ComputeStage<Volume<T>> for TextureFeatureFilter {
    type Output = FeatureVolume;
    type Params = TextureParams;

    fn name(&self) -> &'static str {
        "CooccurrenceTextureFeatures"
    }

    fn params(&self) -> &TextureParams {
        &self.params
    }

    fn process(&self, input: &Volume<T>, region: &Region) -> Result<FeatureVolume> {
        self.run(input, region)
    }
}

/// Compute texture features for the whole of `input`
pub fn texture_features<T: GridElement>(
    input: &Volume<T>,
    params: &TextureParams,
) -> Result<FeatureVolume> {
    TextureFeatureFilter::new(params.clone())?.execute(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::params::Window;
    use approx::assert_relative_eq;
    use texel_core::{BoundaryCondition, Offset};
    use texel_parallel::ProcessingMode;

    fn params(radius: usize, offset: [isize; 3]) -> TextureParams {
        TextureParams {
            window: Window::Uniform(radius),
            bins_per_axis: 16,
            ..TextureParams::default().with_offset(offset)
        }
    }

    fn noise(shape: &[usize]) -> Volume<u8> {
        let n: usize = shape.iter().product();
        let data = (0..n).map(|v| ((v * 7919 + 13) % 251) as u8).collect();
        Volume::from_vec(shape, data).unwrap()
    }

    #[test]
    fn test_constant_volume() {
        let image = Volume::filled(&[5, 5, 5], 7u8);
        let out = texture_features(&image, &params(1, [1, 0, 0])).unwrap();
        assert_eq!(out.shape(), &[5, 5, 5, FEATURE_COUNT]);

        let whole = image.largest_region();
        let mut cursor = whole.cursor();
        while let Some(pos) = cursor.advance() {
            let f = out.features_at(pos).unwrap();
            assert_relative_eq!(f.energy, 1.0);
            assert_eq!(f.entropy, 0.0);
            assert_eq!(f.inertia, 0.0);
            assert_relative_eq!(f.inverse_difference_moment, 1.0);
            assert_eq!(f.correlation, 0.0);
        }
    }

    #[test]
    fn test_checkerboard_periodic() {
        let shape = [6, 6, 6];
        let mut image: Volume<u8> = Volume::new(&shape);
        let whole = image.largest_region();
        let mut cursor = whole.cursor();
        let mut positions = Vec::new();
        while let Some(pos) = cursor.advance() {
            positions.push(pos.to_vec());
        }
        for pos in &positions {
            let value = if pos.iter().sum::<usize>() % 2 == 0 { 0 } else { 255 };
            image.set(pos, value).unwrap();
        }

        let p = TextureParams {
            boundary: BoundaryCondition::Periodic,
            ..params(1, [1, 0, 0])
        };
        let out = texture_features(&image, &p).unwrap();
        for pos in &positions {
            let f = out.features_at(pos).unwrap();
            // Every pair joins bin 0 and bin 15
            assert_relative_eq!(f.energy, 0.5);
            assert_relative_eq!(f.entropy, 1.0);
            assert_relative_eq!(f.inertia, 225.0);
            assert_relative_eq!(f.inverse_difference_moment, 1.0 / 226.0);
            assert_relative_eq!(f.correlation, -1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_offset_order_does_not_matter() {
        let image = noise(&[6, 7, 5]);
        let a = TextureParams {
            offsets: vec![Offset::from([1, 0, 0]), Offset::from([0, 1, 1])],
            ..params(1, [0, 0, 0])
        };
        let b = TextureParams {
            offsets: vec![Offset::from([0, 1, 1]), Offset::from([1, 0, 0])],
            ..a.clone()
        };
        let fa = texture_features(&image, &a).unwrap();
        let fb = texture_features(&image, &b).unwrap();
        assert_eq!(fa.data(), fb.data());
    }

    #[test]
    fn test_worker_count_does_not_matter() {
        let image = noise(&[9, 6, 5]);
        let base = params(2, [0, 1, 0]);
        let sequential = texture_features(
            &image,
            &TextureParams {
                mode: ProcessingMode::Sequential,
                ..base.clone()
            },
        )
        .unwrap();
        for threads in [2, 3, 7, 16] {
            let parallel = texture_features(
                &image,
                &TextureParams {
                    mode: ProcessingMode::ParallelWith(threads),
                    ..base.clone()
                },
            )
            .unwrap();
            assert_eq!(parallel.data(), sequential.data(), "threads = {}", threads);
        }
    }

    #[test]
    fn test_sub_region_matches_whole() {
        let image = noise(&[7, 8, 6]);
        let filter = TextureFeatureFilter::new(params(1, [1, 1, 0])).unwrap();
        let whole = filter.execute(&image).unwrap();

        let region = Region::new(vec![2, 0, 3], vec![4, 5, 3]).unwrap();
        let part = filter.process(&image, &region).unwrap();
        assert_eq!(part.shape(), &[4, 5, 3, FEATURE_COUNT]);

        let mut cursor = region.cursor();
        while let Some(pos) = cursor.advance() {
            let local: Vec<usize> = pos.iter().zip(region.start()).map(|(p, s)| p - s).collect();
            assert_eq!(
                part.features_at(&local).unwrap(),
                whole.features_at(pos).unwrap()
            );
        }
    }

    #[test]
    fn test_boundary_condition_changes_margins_only() {
        let image = Volume::filled(&[4, 4, 4], 100u8);
        let constant = TextureParams {
            boundary: BoundaryCondition::Constant(0.0),
            ..params(1, [1, 0, 0])
        };
        let out = texture_features(&image, &constant).unwrap();
        assert!(out.get(&[0, 0, 0], TextureFeature::Energy).unwrap() < 1.0);
        assert_relative_eq!(out.get(&[1, 1, 1], TextureFeature::Energy).unwrap(), 1.0);

        let neumann = texture_features(&image, &params(1, [1, 0, 0])).unwrap();
        assert_relative_eq!(neumann.get(&[0, 0, 0], TextureFeature::Energy).unwrap(), 1.0);
    }

    #[test]
    fn test_normalize_gives_same_features() {
        let image = noise(&[5, 5, 5]);
        let raw = texture_features(&image, &params(1, [1, 0, 1])).unwrap();
        let normalized = texture_features(
            &image,
            &TextureParams {
                normalize: true,
                ..params(1, [1, 0, 1])
            },
        )
        .unwrap();
        for (a, b) in raw.data().iter().zip(normalized.data()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_out_of_range_image_gives_zeros() {
        let image = Volume::filled(&[3, 3], 200u8);
        let p = TextureParams {
            window: Window::Uniform(1),
            min: 0.0,
            max: 100.0,
            normalize: true,
            ..TextureParams::default().with_offset([0, 1])
        };
        let out = texture_features(&image, &p).unwrap();
        assert!(out.data().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_progress_counts_every_pixel() {
        let image = noise(&[4, 5, 3]);
        let progress = Progress::new();
        TextureFeatureFilter::new(params(1, [1, 0, 0]))
            .unwrap()
            .with_progress(progress.clone())
            .execute(&image)
            .unwrap();
        assert_eq!(progress.completed(), 60);
        assert!(progress.is_done());
    }

    #[test]
    fn test_metadata_propagates() {
        let mut image = noise(&[4, 6]);
        image.set_spacing(vec![2.0, 0.5]).unwrap();
        image.set_origin(vec![10.0, -1.0]).unwrap();
        let filter = TextureFeatureFilter::new(TextureParams {
            window: Window::Uniform(1),
            ..TextureParams::default().with_offset([1, 0])
        })
        .unwrap();
        let region = Region::new(vec![1, 2], vec![2, 3]).unwrap();
        let out = filter.process(&image, &region).unwrap();
        assert_eq!(out.spacing(), &[2.0, 0.5]);
        assert_eq!(out.origin(), &[12.0, 0.0]);

        let energy = out.component(TextureFeature::Energy).unwrap();
        assert_eq!(energy.shape(), &[2, 3]);
        assert_eq!(energy.origin(), &[12.0, 0.0]);
        assert_eq!(
            energy.get(&[1, 2]).unwrap(),
            out.get(&[1, 2], TextureFeature::Energy).unwrap()
        );
    }

    #[test]
    fn test_float_element_range_bins_values() {
        let image = Volume::from_vec(&[3, 3], (0..9).map(f64::from).collect()).unwrap();
        let p = TextureParams {
            window: Window::Uniform(1),
            ..TextureParams::for_element::<f64>().with_offset([0, 1])
        };
        let out = texture_features(&image, &p).unwrap();
        let f = out.features_at(&[1, 1]).unwrap();
        assert!(f.energy < 1.0);
        assert!(f.entropy > 0.0);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(TextureFeatureFilter::new(TextureParams::default()).is_err());
        let unbinnable = TextureParams {
            min: f64::MIN,
            max: f64::MAX,
            ..params(1, [1, 0, 0])
        };
        assert!(TextureFeatureFilter::new(unbinnable).is_err());

        let image = noise(&[4, 4, 4]);
        let filter = TextureFeatureFilter::new(TextureParams::default().with_offset([1, 0])).unwrap();
        assert!(filter.execute(&image).is_err());

        let filter = TextureFeatureFilter::new(params(1, [1, 0, 0])).unwrap();
        let outside = Region::new(vec![2, 2, 2], vec![3, 1, 1]).unwrap();
        assert!(filter.process(&image, &outside).is_err());

        let empty = Region::new(vec![1, 1, 1], vec![0, 2, 2]).unwrap();
        let out = filter.process(&image, &empty).unwrap();
        assert_eq!(out.shape(), &[0, 2, 2, FEATURE_COUNT]);
    }
}
