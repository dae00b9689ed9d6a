//! Axis-aligned regions of grid positions

use crate::error::{Error, Result};

/// An axis-aligned rectangular range of grid positions.
///
/// Covers `start[i] .. start[i] + size[i]` along every axis `i`. A region
/// with a zero extent on any axis is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    start: Vec<usize>,
    size: Vec<usize>,
}

impl Region {
    /// Create a region from its start corner and per-axis extent
    pub fn new(start: Vec<usize>, size: Vec<usize>) -> Result<Self> {
        if start.len() != size.len() {
            return Err(Error::DimensionMismatch {
                what: "region start/size",
                expected: start.len(),
                actual: size.len(),
            });
        }
        Ok(Self { start, size })
    }

    /// Region starting at the origin with the given shape
    pub fn from_shape(shape: &[usize]) -> Self {
        Self {
            start: vec![0; shape.len()],
            size: shape.to_vec(),
        }
    }

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.size.len()
    }

    /// Start corner
    pub fn start(&self) -> &[usize] {
        &self.start
    }

    /// Extent along every axis
    pub fn size(&self) -> &[usize] {
        &self.size
    }

    /// Exclusive end along `axis`
    pub fn end(&self, axis: usize) -> usize {
        self.start[axis] + self.size[axis]
    }

    /// Total number of positions
    pub fn num_pixels(&self) -> usize {
        self.size.iter().product()
    }

    /// Whether the region holds no positions
    pub fn is_empty(&self) -> bool {
        self.size.iter().any(|&s| s == 0)
    }

    /// Whether `position` lies inside the region
    pub fn contains(&self, position: &[usize]) -> bool {
        position.len() == self.ndim()
            && position
                .iter()
                .enumerate()
                .all(|(axis, &p)| p >= self.start[axis] && p < self.end(axis))
    }

    /// Whether `self` lies entirely inside `other`
    pub fn is_inside(&self, other: &Region) -> bool {
        self.ndim() == other.ndim()
            && (0..self.ndim()).all(|axis| {
                self.start[axis] >= other.start[axis] && self.end(axis) <= other.end(axis)
            })
    }

    /// Copy of this region restricted to `start .. end` along `axis`
    pub fn with_axis_range(&self, axis: usize, start: usize, end: usize) -> Self {
        let mut region = self.clone();
        region.start[axis] = start;
        region.size[axis] = end.saturating_sub(start);
        region
    }

    /// Scan cursor over every position of the region.
    ///
    /// Positions are visited in row-major order (last axis fastest).
    pub fn cursor(&self) -> RegionCursor<'_> {
        RegionCursor {
            region: self,
            current: self.start.clone(),
            started: false,
            done: self.is_empty(),
        }
    }
}

/// Row-major scan over a [`Region`].
///
/// A lending cursor: the position buffer is reused between steps so a
/// full scan performs a single allocation.
#[derive(Debug)]
pub struct RegionCursor<'a> {
    region: &'a Region,
    current: Vec<usize>,
    started: bool,
    done: bool,
}

impl RegionCursor<'_> {
    /// Advance to the next position, returning it, or `None` at the end
    pub fn advance(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.current);
        }

        let mut axis = self.region.ndim();
        loop {
            if axis == 0 {
                self.done = true;
                return None;
            }
            axis -= 1;
            self.current[axis] += 1;
            if self.current[axis] < self.region.end(axis) {
                return Some(&self.current);
            }
            self.current[axis] = self.region.start[axis];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_counts() {
        let region = Region::new(vec![1, 2], vec![3, 4]).unwrap();
        assert_eq!(region.num_pixels(), 12);
        assert_eq!(region.end(0), 4);
        assert_eq!(region.end(1), 6);
        assert!(region.contains(&[1, 2]));
        assert!(!region.contains(&[4, 2]));
        assert!(!region.is_empty());
    }

    #[test]
    fn test_region_mismatched_start_size() {
        assert!(Region::new(vec![0, 0], vec![1]).is_err());
    }

    #[test]
    fn test_cursor_row_major() {
        let region = Region::new(vec![1, 0], vec![2, 3]).unwrap();
        let mut cursor = region.cursor();
        let mut seen = Vec::new();
        while let Some(pos) = cursor.advance() {
            seen.push(pos.to_vec());
        }
        assert_eq!(
            seen,
            vec![
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
                vec![2, 0],
                vec![2, 1],
                vec![2, 2],
            ]
        );
    }

    #[test]
    fn test_cursor_empty_region() {
        let region = Region::new(vec![0, 0], vec![0, 5]).unwrap();
        assert!(region.cursor().advance().is_none());
    }

    #[test]
    fn test_is_inside() {
        let outer = Region::from_shape(&[10, 10, 10]);
        let inner = Region::new(vec![2, 2, 2], vec![8, 1, 1]).unwrap();
        let spill = Region::new(vec![2, 2, 2], vec![9, 1, 1]).unwrap();
        assert!(inner.is_inside(&outer));
        assert!(!spill.is_inside(&outer));
    }
}
