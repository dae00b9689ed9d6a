//! Co-occurrence offset pairs
//!
//! Every co-occurrence observation inside a window is a pair of relative
//! positions `(o1, o2)` with `o2 = o1 + d` for one of the requested
//! directions `d`. The pairs only depend on the window radius and the
//! directions, so they are enumerated once before any pixel is visited.

use texel_core::{Error, Offset, Result};

/// Two window-relative positions sampled together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPair {
    pub first: Offset,
    pub second: Offset,
}

/// Enumerate every offset pair realizing one of `directions` inside a
/// window of half-extent `radius`.
///
/// Visits each window position `o1` (center included) and keeps
/// `(o1, o1 + d)` whenever `o1 + d` is still inside the window. Pairs are
/// not deduplicated: overlapping directions add weight, exactly like
/// sampling the same pair twice.
pub fn generate_offset_pairs(radius: &[usize], directions: &[Offset]) -> Result<Vec<OffsetPair>> {
    if directions.is_empty() {
        return Err(Error::InvalidParameter {
            name: "offsets",
            value: "[]".to_string(),
            reason: "at least one co-occurrence offset is required".to_string(),
        });
    }
    let ndim = radius.len();
    if let Some(bad) = directions.iter().find(|d| d.ndim() != ndim) {
        return Err(Error::DimensionMismatch {
            what: "offset",
            expected: ndim,
            actual: bad.ndim(),
        });
    }

    let window: usize = radius.iter().map(|r| 2 * r + 1).product();
    let mut pairs = Vec::with_capacity(window * directions.len());

    let lower: Vec<isize> = radius.iter().map(|&r| -(r as isize)).collect();
    let mut o1 = lower.clone();
    loop {
        let first = Offset::new(o1.clone());
        for direction in directions {
            let second = &first + direction;
            if second.within(radius) {
                pairs.push(OffsetPair {
                    first: first.clone(),
                    second,
                });
            }
        }

        // Odometer step over the window, axis 0 fastest
        let mut axis = 0;
        loop {
            if axis == ndim {
                return Ok(pairs);
            }
            o1[axis] += 1;
            if o1[axis] <= radius[axis] as isize {
                break;
            }
            o1[axis] = lower[axis];
            axis += 1;
        }
    }
}
