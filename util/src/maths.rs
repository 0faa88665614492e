//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle in degrees into the range [0, 360).
///
/// Only used for display, headings themselves are never wrapped.
pub fn wrap_deg_360<T>(angle_deg: T) -> T
where
    T: Float
{
    let full_turn = T::from(360.0).unwrap_or_else(T::max_value);

    let wrapped = rem_euclid(angle_deg, full_turn);

    // Guard against the round-off case described in `rem_euclid`
    if wrapped >= full_turn { T::zero() } else { wrapped }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 100f64), 2.5), 25.0);
        assert_eq!(lin_map((0f64, 800f64), (0f64, 80f64), 800.0), 80.0);
        assert_eq!(lin_map((-1f64, 1f64), (0f64, 2f64), -1.0), 0.0);
    }

    #[test]
    fn test_wrap_deg_360() {
        assert_eq!(wrap_deg_360(0f64), 0.0);
        assert_eq!(wrap_deg_360(360f64), 0.0);
        assert_eq!(wrap_deg_360(370f64), 10.0);
        assert_eq!(wrap_deg_360(-90f64), 270.0);
        assert_eq!(wrap_deg_360(-720f64), 0.0);
    }
}
