//! # texel core
//!
//! Core types, traits and I/O for the texel texture library.
//!
//! This crate provides:
//! - `Volume<T>`: N-dimensional scalar grid
//! - `Region`: axis-aligned sub-range of grid positions
//! - `NeighborhoodView` and `BoundaryCondition`: neighbor reads around a
//!   center with pluggable out-of-domain handling
//! - Face decomposition of regions into interior and margin parts
//! - TIFF I/O for 2-D images and 3-D page stacks

pub mod error;
pub mod grid;
pub mod io;

pub use error::{Error, Result};
pub use grid::{
    BoundaryCondition, GridElement, NeighborhoodView, Offset, Region, Volume,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{
        BoundaryCondition, GridElement, NeighborhoodView, Offset, Region, Volume,
    };
    pub use crate::ComputeStage;
}

/// A single compute stage of the texel pipeline.
///
/// A stage is configured once through its parameter struct and then asked
/// to produce output for a region of its input. Stages are pure: the input
/// is never modified and repeated calls yield identical results.
pub trait ComputeStage<I: ?Sized> {
    /// Output produced for a region
    type Output;
    /// Parameters controlling stage behavior
    type Params;

    /// Returns the stage name
    fn name(&self) -> &'static str;

    /// Returns the validated parameters of this stage
    fn params(&self) -> &Self::Params;

    /// Compute the output for `region` of `input`
    fn process(&self, input: &I, region: &Region) -> Result<Self::Output>;
}
