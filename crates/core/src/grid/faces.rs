//! Face decomposition of a region for neighborhood scans
//!
//! A neighborhood of radius `r` centered on a pixel near the edge of the
//! buffered region reaches outside of it. Splitting the scanned region into
//! one interior face, where every read is in bounds, and margin faces,
//! where reads go through a boundary condition, keeps the boundary logic
//! out of the hot path.

use crate::error::{Error, Result};
use crate::grid::Region;

/// Whether a face needs boundary handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    /// All neighborhood reads stay inside the buffered region
    Interior,
    /// Some neighborhood reads fall outside the buffered region
    Margin,
}

/// One face of a decomposed region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub region: Region,
    pub kind: FaceKind,
}

impl Face {
    /// Whether every read from this face is in bounds
    pub fn is_interior(&self) -> bool {
        self.kind == FaceKind::Interior
    }
}

/// Split `region` into an interior face and margin faces.
///
/// `buffered` is the region actually backed by data (usually the whole
/// volume) and `radius` the neighborhood half-extent per axis. The returned
/// faces are non-empty, pairwise disjoint and cover `region` exactly. The
/// interior face, when it exists, comes first.
pub fn decompose_faces(buffered: &Region, region: &Region, radius: &[usize]) -> Result<Vec<Face>> {
    let ndim = buffered.ndim();
    if region.ndim() != ndim {
        return Err(Error::DimensionMismatch {
            what: "region",
            expected: ndim,
            actual: region.ndim(),
        });
    }
    if radius.len() != ndim {
        return Err(Error::DimensionMismatch {
            what: "radius",
            expected: ndim,
            actual: radius.len(),
        });
    }
    if !region.is_inside(buffered) {
        return Err(Error::RegionOutOfBounds {
            start: region.start().to_vec(),
            size: region.size().to_vec(),
            shape: buffered.size().to_vec(),
        });
    }

    let mut margins = Vec::new();
    let mut rest = region.clone();

    for axis in 0..ndim {
        let lo = buffered.start()[axis] + radius[axis];
        let hi = buffered.end(axis).saturating_sub(radius[axis]);

        let rs = rest.start()[axis];
        let re = rest.end(axis);
        let lo_end = lo.clamp(rs, re);
        let hi_start = hi.clamp(lo_end, re);

        let lower = rest.with_axis_range(axis, rs, lo_end);
        if !lower.is_empty() {
            margins.push(Face {
                region: lower,
                kind: FaceKind::Margin,
            });
        }
        let upper = rest.with_axis_range(axis, hi_start, re);
        if !upper.is_empty() {
            margins.push(Face {
                region: upper,
                kind: FaceKind::Margin,
            });
        }

        rest = rest.with_axis_range(axis, lo_end, hi_start);
    }

    let mut faces = Vec::with_capacity(margins.len() + 1);
    if !rest.is_empty() {
        faces.push(Face {
            region: rest,
            kind: FaceKind::Interior,
        });
    }
    faces.extend(margins);
    Ok(faces)
}
