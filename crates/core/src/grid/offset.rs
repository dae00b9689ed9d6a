//! Relative displacement vectors

use std::fmt;
use std::ops::Add;

/// An integer displacement between two grid positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset(Vec<isize>);

impl Offset {
    /// Create an offset from its per-axis components
    pub fn new(components: Vec<isize>) -> Self {
        Self(components)
    }

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Per-axis components
    pub fn components(&self) -> &[isize] {
        &self.0
    }

    /// Whether `|self[i]| <= radius[i]` on every axis
    pub fn within(&self, radius: &[usize]) -> bool {
        self.0.len() == radius.len()
            && self
                .0
                .iter()
                .zip(radius)
                .all(|(&o, &r)| o.unsigned_abs() <= r)
    }
}

impl From<Vec<isize>> for Offset {
    fn from(components: Vec<isize>) -> Self {
        Self(components)
    }
}

impl<const N: usize> From<[isize; N]> for Offset {
    fn from(components: [isize; N]) -> Self {
        Self(components.to_vec())
    }
}

impl Add for &Offset {
    type Output = Offset;

    fn add(self, rhs: &Offset) -> Offset {
        Offset(self.0.iter().zip(&rhs.0).map(|(a, b)| a + b).collect())
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "]")
    }
}
