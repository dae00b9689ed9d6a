//! Configuration of the texture feature filter

use texel_core::{BoundaryCondition, Error, GridElement, Offset, Result};
use texel_parallel::ProcessingMode;

use super::histogram::bin_width;

/// Default number of histogram bins per axis
pub const DEFAULT_BINS_PER_AXIS: usize = 64;

/// Sliding window half-extent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Window {
    /// Same radius on every axis
    Uniform(usize),
    /// One radius per axis
    PerAxis(Vec<usize>),
}

impl Window {
    /// Radius vector for a volume with `ndim` axes
    pub fn radius(&self, ndim: usize) -> Result<Vec<usize>> {
        match self {
            Window::Uniform(r) => Ok(vec![*r; ndim]),
            Window::PerAxis(radius) if radius.len() == ndim => Ok(radius.clone()),
            Window::PerAxis(radius) => Err(Error::DimensionMismatch {
                what: "window radius",
                expected: ndim,
                actual: radius.len(),
            }),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::Uniform(10)
    }
}

/// Parameters for texture feature computation
#[derive(Debug, Clone)]
pub struct TextureParams {
    /// Neighborhood half-extent around every pixel
    pub window: Window,
    /// Co-occurrence directions (at least one, each of image dimensionality)
    pub offsets: Vec<Offset>,
    /// Histogram bins along each axis (default: 64)
    pub bins_per_axis: usize,
    /// Lowest intensity placed in the histogram (inclusive)
    pub min: f64,
    /// Highest intensity placed in the histogram (inclusive)
    pub max: f64,
    /// Divide the histogram by its total frequency before extraction
    pub normalize: bool,
    /// Handling of neighborhood reads outside the image
    pub boundary: BoundaryCondition,
    /// Sequential or parallel execution
    pub mode: ProcessingMode,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            window: Window::default(),
            offsets: Vec::new(),
            bins_per_axis: DEFAULT_BINS_PER_AXIS,
            min: 0.0,
            max: 255.0,
            normalize: false,
            boundary: BoundaryCondition::default(),
            mode: ProcessingMode::default(),
        }
    }
}

impl TextureParams {
    /// Defaults with the histogram range spanning every value of `T`.
    ///
    /// Floating point types have no usable full range and keep the default
    /// `0..=255`.
    pub fn for_element<T: GridElement>() -> Self {
        if T::is_float() {
            return Self::default();
        }
        Self {
            min: T::min_value().as_f64(),
            max: T::max_value().as_f64(),
            ..Default::default()
        }
    }

    /// Replace the offsets with a single direction
    pub fn with_offset(mut self, offset: impl Into<Offset>) -> Self {
        self.offsets = vec![offset.into()];
        self
    }

    /// Check the dimension-independent parameters
    pub fn validate(&self) -> Result<()> {
        if self.offsets.is_empty() {
            return Err(Error::InvalidParameter {
                name: "offsets",
                value: "[]".to_string(),
                reason: "at least one co-occurrence offset is required".to_string(),
            });
        }
        let ndim = self.offsets[0].ndim();
        if let Some(bad) = self.offsets.iter().find(|o| o.ndim() != ndim) {
            return Err(Error::InvalidParameter {
                name: "offsets",
                value: bad.to_string(),
                reason: format!("all offsets must have {} components", ndim),
            });
        }
        if self.bins_per_axis == 0 {
            return Err(Error::InvalidParameter {
                name: "bins_per_axis",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::InvalidParameter {
                name: "min/max",
                value: format!("{}..={}", self.min, self.max),
                reason: "histogram range must be finite".to_string(),
            });
        }
        if self.min > self.max {
            return Err(Error::InvalidParameter {
                name: "min/max",
                value: format!("{}..={}", self.min, self.max),
                reason: "min must not exceed max".to_string(),
            });
        }
        if bin_width(self.bins_per_axis, self.min, self.max).is_none() {
            return Err(Error::InvalidParameter {
                name: "min/max",
                value: format!("{}..={}", self.min, self.max),
                reason: format!("range cannot be split into {} bins", self.bins_per_axis),
            });
        }
        if let Window::PerAxis(radius) = &self.window
            && radius.len() != ndim
        {
            return Err(Error::DimensionMismatch {
                what: "window radius",
                expected: ndim,
                actual: radius.len(),
            });
        }
        Ok(())
    }

    /// Check the parameters against an input with `ndim` axes and return
    /// the per-axis radius
    pub fn validate_for(&self, ndim: usize) -> Result<Vec<usize>> {
        self.validate()?;
        let offset_ndim = self.offsets[0].ndim();
        if offset_ndim != ndim {
            return Err(Error::DimensionMismatch {
                what: "offset",
                expected: ndim,
                actual: offset_ndim,
            });
        }
        self.window.radius(ndim)
    }
}
