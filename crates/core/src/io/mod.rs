//! I/O operations for reading and writing volumes
//!
//! Volumes are stored as TIFF: a single page is a 2-D image and a stack of
//! equally sized pages is a 3-D volume with the page index as axis 0.

mod native;

pub use native::{read_volume, read_volume_from_buffer, write_volume, write_volume_to_buffer};
