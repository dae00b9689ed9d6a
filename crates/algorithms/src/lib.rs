//! # texel algorithms
//!
//! Windowed gray-level co-occurrence texture analysis for N-dimensional
//! images.
//!
//! ## Available Algorithm Categories
//!
//! - **texture**: co-occurrence histograms and Haralick features per pixel

pub mod texture;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::texture::{
        texture_features, FeatureVolume, TextureFeature, TextureFeatureFilter, TextureFeatures,
        TextureParams, Window,
    };
    pub use texel_core::prelude::*;
    pub use texel_parallel::{Progress, ProcessingMode};
}
