//! Main Volume type

use crate::error::{Error, Result};
use crate::grid::{GridElement, Region};
use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// An N-dimensional grid of scalar intensities.
///
/// `Volume<T>` stores values of type `T` in row-major order (last axis
/// fastest) together with per-axis `spacing` and `origin` metadata.
///
/// # Example
///
/// ```
/// use texel_core::Volume;
///
/// let mut volume: Volume<u8> = Volume::new(&[4, 5, 6]);
/// volume.set(&[1, 2, 3], 42).unwrap();
/// assert_eq!(volume.get(&[1, 2, 3]).unwrap(), 42);
/// ```
#[derive(Debug, Clone)]
pub struct Volume<T: GridElement> {
    /// Values in standard (row-major, contiguous) layout
    data: ArrayD<T>,
    /// Physical distance between samples along each axis
    spacing: Vec<f64>,
    /// Physical position of index zero along each axis
    origin: Vec<f64>,
}

impl<T: GridElement> Volume<T> {
    /// Create a new volume filled with zeros
    pub fn new(shape: &[usize]) -> Self {
        Self::from_array(ArrayD::zeros(IxDyn(shape)))
    }

    /// Create a new volume filled with a specific value
    pub fn filled(shape: &[usize], value: T) -> Self {
        Self::from_array(ArrayD::from_elem(IxDyn(shape), value))
    }

    /// Create a volume from row-major data
    pub fn from_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::InvalidDimensions {
                shape: shape.to_vec(),
                reason: format!("expected {} values, got {}", expected, data.len()),
            });
        }

        let array = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self::from_array(array))
    }

    /// Create a volume from an ndarray, copying into standard layout if needed
    pub fn from_array(data: ArrayD<T>) -> Self {
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        let ndim = data.ndim();
        Self {
            data,
            spacing: vec![1.0; ndim],
            origin: vec![0.0; ndim],
        }
    }

    // Dimensions

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Extent along every axis
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Element strides along every axis
    pub fn strides(&self) -> &[isize] {
        self.data.strides()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the volume is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Region covering the whole volume
    pub fn largest_region(&self) -> Region {
        Region::from_shape(self.shape())
    }

    // Data access

    /// Get value at `index`
    pub fn get(&self, index: &[usize]) -> Result<T> {
        if index.len() != self.ndim() {
            return Err(self.out_of_bounds(index));
        }
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds(index))
    }

    /// Set value at `index`
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        if index.len() != self.ndim() {
            return Err(self.out_of_bounds(index));
        }
        let err = self.out_of_bounds(index);
        let cell = self.data.get_mut(index).ok_or(err)?;
        *cell = value;
        Ok(())
    }

    /// Flat row-major view of all values
    pub fn as_slice(&self) -> Result<&[T]> {
        self.data
            .as_slice()
            .ok_or_else(|| Error::Other("volume data is not contiguous".into()))
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayViewD<'_, T> {
        self.data.view()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    /// Consume the volume and return the underlying array
    pub fn into_array(self) -> ArrayD<T> {
        self.data
    }

    fn out_of_bounds(&self, index: &[usize]) -> Error {
        Error::IndexOutOfBounds {
            index: index.to_vec(),
            shape: self.shape().to_vec(),
        }
    }

    // Metadata

    /// Sample spacing along each axis
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    /// Set the sample spacing
    pub fn set_spacing(&mut self, spacing: Vec<f64>) -> Result<()> {
        if spacing.len() != self.ndim() {
            return Err(Error::DimensionMismatch {
                what: "spacing",
                expected: self.ndim(),
                actual: spacing.len(),
            });
        }
        self.spacing = spacing;
        Ok(())
    }

    /// Physical origin along each axis
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// Set the physical origin
    pub fn set_origin(&mut self, origin: Vec<f64>) -> Result<()> {
        if origin.len() != self.ndim() {
            return Err(Error::DimensionMismatch {
                what: "origin",
                expected: self.ndim(),
                actual: origin.len(),
            });
        }
        self.origin = origin;
        Ok(())
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean) over all cells.
    ///
    /// NaN values of floating point volumes are skipped.
    pub fn statistics(&self) -> VolumeStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &value in self.data.iter() {
            let v = value.as_f64();
            if v.is_nan() {
                continue;
            }
            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }
            sum += v;
            count += 1;
        }

        VolumeStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
        }
    }
}

/// Basic statistics for a volume
#[derive(Debug, Clone)]
pub struct VolumeStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volume_creation() {
        let volume: Volume<f32> = Volume::new(&[4, 5, 6]);
        assert_eq!(volume.ndim(), 3);
        assert_eq!(volume.shape(), &[4, 5, 6]);
        assert_eq!(volume.len(), 120);
        assert_eq!(volume.strides(), &[30, 6, 1]);
    }

    #[test]
    fn test_volume_access() {
        let mut volume: Volume<u8> = Volume::new(&[3, 3]);
        volume.set(&[2, 1], 9).unwrap();
        assert_eq!(volume.get(&[2, 1]).unwrap(), 9);
        assert!(volume.get(&[3, 0]).is_err());
        assert!(volume.get(&[0]).is_err());
        assert!(volume.set(&[0, 3], 1).is_err());
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Volume::<u8>::from_vec(&[2, 2], vec![1, 2, 3]).is_err());
        let volume = Volume::<u8>::from_vec(&[2, 2], vec![1, 2, 3, 4]).unwrap();
        assert_eq!(volume.get(&[1, 0]).unwrap(), 3);
        assert_eq!(volume.as_slice().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_array_forces_standard_layout() {
        let array = ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0u8, 1, 2, 3, 4, 5])
            .unwrap()
            .reversed_axes();
        let volume = Volume::from_array(array);
        assert_eq!(volume.as_slice().unwrap(), &[0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_volume_statistics() {
        let data: Vec<f32> = (0..100).map(|v| v as f32).collect();
        let volume = Volume::from_vec(&[10, 10], data).unwrap();
        let stats = volume.statistics();
        assert_eq!(stats.min, Some(0.0));
        assert_eq!(stats.max, Some(99.0));
        assert_relative_eq!(stats.mean.unwrap(), 49.5, epsilon = 1e-10);
        assert_eq!(stats.valid_count, 100);
    }

    #[test]
    fn test_spacing_checks_dimensions() {
        let mut volume: Volume<u8> = Volume::new(&[2, 2]);
        volume.set_spacing(vec![0.5, 2.0]).unwrap();
        assert_eq!(volume.spacing(), &[0.5, 2.0]);
        assert!(volume.set_spacing(vec![1.0]).is_err());
    }
}
