//! Neighbor reads around a moving center position

use crate::error::{Error, Result};
use crate::grid::{BoundaryCondition, GridElement, Offset, Volume};

/// Read access to the neighborhood of one center position.
///
/// The view is built once per face and recentered for every pixel, so a
/// scan allocates nothing per position. On an interior face every read is
/// known to be in bounds and goes straight to the flat buffer; on a margin
/// face reads go through the [`BoundaryCondition`].
pub struct NeighborhoodView<'a, T: GridElement> {
    volume: &'a Volume<T>,
    values: &'a [T],
    boundary: BoundaryCondition,
    in_bounds: bool,
    center: Vec<isize>,
    center_flat: isize,
    scratch: Vec<isize>,
}

impl<'a, T: GridElement> NeighborhoodView<'a, T> {
    /// Create a view over `volume`.
    ///
    /// `in_bounds` promises that every read issued through this view stays
    /// inside the volume; it must only be set for interior faces.
    pub fn new(volume: &'a Volume<T>, boundary: BoundaryCondition, in_bounds: bool) -> Result<Self> {
        let values = volume.as_slice()?;
        let ndim = volume.ndim();
        Ok(Self {
            volume,
            values,
            boundary,
            in_bounds,
            center: vec![0; ndim],
            center_flat: 0,
            scratch: vec![0; ndim],
        })
    }

    /// Move the view to a new center position
    pub fn recenter(&mut self, position: &[usize]) -> Result<()> {
        if position.len() != self.center.len() {
            return Err(Error::DimensionMismatch {
                what: "neighborhood center",
                expected: self.center.len(),
                actual: position.len(),
            });
        }
        let volume = self.volume;
        let strides = volume.strides();
        let mut flat = 0isize;
        for (axis, &p) in position.iter().enumerate() {
            self.center[axis] = p as isize;
            flat += p as isize * strides[axis];
        }
        self.center_flat = flat;
        Ok(())
    }

    /// Read the value at `offset` relative to the current center
    pub fn read(&mut self, offset: &Offset) -> T {
        let volume = self.volume;
        let strides = volume.strides();
        if self.in_bounds {
            let delta: isize = offset
                .components()
                .iter()
                .zip(strides)
                .map(|(o, s)| o * s)
                .sum();
            return self.values[(self.center_flat + delta) as usize];
        }

        for (axis, o) in offset.components().iter().enumerate() {
            self.scratch[axis] = self.center[axis] + o;
        }
        self.boundary.resolve(volume, &self.scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Volume<u8> {
        // 3x4:
        //  0  1  2  3
        //  4  5  6  7
        //  8  9 10 11
        Volume::from_vec(&[3, 4], (0..12).collect()).unwrap()
    }

    #[test]
    fn test_interior_reads() {
        let v = grid();
        let mut view = NeighborhoodView::new(&v, BoundaryCondition::default(), true).unwrap();
        view.recenter(&[1, 1]).unwrap();
        assert_eq!(view.read(&Offset::from([0, 0])), 5);
        assert_eq!(view.read(&Offset::from([-1, -1])), 0);
        assert_eq!(view.read(&Offset::from([1, 2])), 11);
    }

    #[test]
    fn test_margin_reads_use_boundary() {
        let v = grid();
        let mut view = NeighborhoodView::new(&v, BoundaryCondition::ZeroFluxNeumann, false).unwrap();
        view.recenter(&[0, 0]).unwrap();
        assert_eq!(view.read(&Offset::from([-1, -1])), 0);
        assert_eq!(view.read(&Offset::from([-1, 1])), 1);

        let mut view = NeighborhoodView::new(&v, BoundaryCondition::Constant(200.0), false).unwrap();
        view.recenter(&[2, 3]).unwrap();
        assert_eq!(view.read(&Offset::from([1, 0])), 200);
        assert_eq!(view.read(&Offset::from([0, -1])), 10);
    }

    #[test]
    fn test_recenter_checks_dimension() {
        let v = grid();
        let mut view = NeighborhoodView::new(&v, BoundaryCondition::default(), false).unwrap();
        assert!(view.recenter(&[1, 1, 1]).is_err());
    }
}
