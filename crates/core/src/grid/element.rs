//! Grid element trait for generic scalar intensities

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a grid cell.
///
/// Bounds the scalar intensity types a [`Volume`](super::Volume) can hold.
/// Every element converts losslessly enough to `f64` for histogram binning.
pub trait GridElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Minimum value representable by this type
    fn min_value() -> Self;

    /// Maximum value representable by this type
    fn max_value() -> Self;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Convert self to f64
    fn as_f64(self) -> f64;

    /// Convert an f64 into this type, saturating at the type bounds.
    ///
    /// NaN maps to zero for integer types.
    fn saturating_from_f64(value: f64) -> Self;
}

macro_rules! impl_grid_element_int {
    ($t:ty) => {
        impl GridElement for $t {
            fn min_value() -> Self {
                <$t>::MIN
            }

            fn max_value() -> Self {
                <$t>::MAX
            }

            fn is_float() -> bool {
                false
            }

            fn as_f64(self) -> f64 {
                self as f64
            }

            fn saturating_from_f64(value: f64) -> Self {
                // `as` saturates and maps NaN to 0
                value.round() as $t
            }
        }
    };
}

macro_rules! impl_grid_element_float {
    ($t:ty) => {
        impl GridElement for $t {
            fn min_value() -> Self {
                <$t>::MIN
            }

            fn max_value() -> Self {
                <$t>::MAX
            }

            fn is_float() -> bool {
                true
            }

            fn as_f64(self) -> f64 {
                self as f64
            }

            fn saturating_from_f64(value: f64) -> Self {
                value as $t
            }
        }
    };
}

impl_grid_element_int!(i8);
impl_grid_element_int!(i16);
impl_grid_element_int!(i32);
impl_grid_element_int!(i64);
impl_grid_element_int!(u8);
impl_grid_element_int!(u16);
impl_grid_element_int!(u32);
impl_grid_element_int!(u64);
impl_grid_element_float!(f32);
impl_grid_element_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_from_f64() {
        assert_eq!(<u8 as GridElement>::saturating_from_f64(300.0), 255);
        assert_eq!(<u8 as GridElement>::saturating_from_f64(-4.0), 0);
        assert_eq!(<i16 as GridElement>::saturating_from_f64(f64::NAN), 0);
        assert_eq!(<u8 as GridElement>::saturating_from_f64(7.6), 8);
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(GridElement::as_f64(200u8), 200.0);
        assert_eq!(GridElement::as_f64(-3i32), -3.0);
        assert!(<f32 as GridElement>::is_float());
        assert!(!<u16 as GridElement>::is_float());
    }
}
