//! N-dimensional grid data structures and neighborhood access

mod boundary;
mod element;
mod faces;
mod neighborhood;
mod offset;
mod region;
mod volume;

pub use boundary::BoundaryCondition;
pub use element::GridElement;
pub use faces::{decompose_faces, Face, FaceKind};
pub use neighborhood::NeighborhoodView;
pub use offset::Offset;
pub use region::{Region, RegionCursor};
pub use volume::{Volume, VolumeStatistics};
