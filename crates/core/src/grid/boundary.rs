//! Boundary conditions for reads outside the grid domain

use crate::grid::{GridElement, Volume};

/// Rule used to synthesize a value for a position outside the volume.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoundaryCondition {
    /// Repeat the nearest edge value (zero-flux Neumann)
    #[default]
    ZeroFluxNeumann,
    /// Every outside position reads this constant
    Constant(f64),
    /// Wrap around to the opposite side of the volume
    Periodic,
}

impl BoundaryCondition {
    /// Map a possibly out-of-range coordinate onto `0..len` along one axis.
    ///
    /// Returns `None` when the coordinate is outside and the condition
    /// supplies a constant instead of an in-domain position.
    pub fn resolve_axis(&self, coord: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let n = len as isize;
        if (0..n).contains(&coord) {
            return Some(coord as usize);
        }
        match self {
            BoundaryCondition::ZeroFluxNeumann => Some(coord.clamp(0, n - 1) as usize),
            BoundaryCondition::Constant(_) => None,
            BoundaryCondition::Periodic => Some(coord.rem_euclid(n) as usize),
        }
    }

    /// Read `volume` at `position`, applying the condition on every axis
    /// where the position falls outside the domain.
    pub fn resolve<T: GridElement>(&self, volume: &Volume<T>, position: &[isize]) -> T {
        let strides = volume.strides();
        let shape = volume.shape();
        let mut flat = 0isize;
        for (axis, &coord) in position.iter().enumerate() {
            match self.resolve_axis(coord, shape[axis]) {
                Some(c) => flat += c as isize * strides[axis],
                None => return self.fill_value(),
            }
        }
        match volume.as_slice() {
            Ok(values) => values[flat as usize],
            Err(_) => self.fill_value(),
        }
    }

    /// Value returned when no in-domain position exists
    pub fn fill_value<T: GridElement>(&self) -> T {
        match self {
            BoundaryCondition::Constant(v) => T::saturating_from_f64(*v),
            _ => T::zero(),
        }
    }
}
