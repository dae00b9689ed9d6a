//! Co-occurrence texture features
//!
//! - **Offsets**: window-relative position pairs for each direction
//! - **Histogram**: symmetric joint intensity histogram of those pairs
//! - **Features**: the eight Haralick features of a histogram
//! - **Filter**: per-pixel sliding-window driver over a region

mod features;
mod filter;
mod histogram;
mod offsets;
mod params;

pub use features::{FEATURE_COUNT, FeatureExtractor, TextureFeature, TextureFeatures};
pub use filter::{FeatureVolume, TextureFeatureFilter, texture_features};
pub use histogram::{CooccurrenceHistogram, accumulate};
pub use offsets::{OffsetPair, generate_offset_pairs};
pub use params::{DEFAULT_BINS_PER_AXIS, TextureParams, Window};
