#[allow(unused_imports)]
use crate::core::prelude::*;

use crate::util::gm_float;
use crate::util::gm_float::GmFloat;
use crate::util::gm_range;
use itertools::Product;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::iter::Sum;
use std::{
    fmt,
    fmt::Formatter,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Range, Sub, SubAssign},
};

/// A 2D vector with 64-bit floating point coordinates.
///
/// [`Vec2`] is the plain value type of the geometry layer: addition,
/// subtraction, scaling, normalisation, dot and cross products, rotation,
/// and the various distance/projection utilities. The pooled [`Point`]
/// (see [`crate::util::point`]) converts to and from this type at its
/// boundary.
///
/// # Equality and ordering
/// Two vectors are equal if their components differ by less than
/// [`EPSILON`](crate::core::config::EPSILON). Ordering is deterministic even
/// for `NaN` components (falls back to [`total_cmp`](f64::total_cmp)), which
/// keeps vectors usable as `BTreeMap`/`BTreeSet` keys; it carries no
/// geometric meaning.
#[derive(Default, Debug, Copy, Clone, bincode::Encode, bincode::Decode)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl PartialEq for Vec2 {
    fn eq(&self, other: &Self) -> bool {
        if self.is_finite() || other.is_finite() {
            (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
        } else {
            self.x == other.x && self.y == other.y
        }
    }
}
impl Eq for Vec2 {}

impl PartialOrd<Self> for Vec2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vec2 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        if (self.x - other.x).abs() < EPSILON {
            return self.y.partial_cmp(&other.y).unwrap_or_else(|| {
                warn!("Vec2: partial_cmp() failed for y: {} vs. {}", self, other);
                self.y.total_cmp(&other.y)
            });
        }
        if let Some(o) = self.x.partial_cmp(&other.x) {
            o
        } else {
            warn!("Vec2: partial_cmp() failed for x: {} vs. {}", self, other);
            match self.x.total_cmp(&other.x) {
                Ordering::Equal => self
                    .y
                    .partial_cmp(&other.y)
                    .unwrap_or_else(|| self.y.total_cmp(&other.y)),
                o => o,
            }
        }
    }
}

impl Hash for Vec2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl Vec2 {
    /// Returns a unit vector pointing to the right (positive x-axis).
    #[must_use]
    pub fn right() -> Vec2 {
        Vec2 { x: 1.0, y: 0.0 }
    }
    /// Returns a unit vector pointing upward (negative y-axis).
    ///
    /// Note: this follows a coordinate system where y increases downward,
    /// which is common in 2D graphics applications.
    #[must_use]
    pub fn up() -> Vec2 {
        Vec2 { x: 0.0, y: -1.0 }
    }
    /// Returns a unit vector pointing to the left (negative x-axis).
    #[must_use]
    pub fn left() -> Vec2 {
        Vec2 { x: -1.0, y: 0.0 }
    }
    /// Returns a unit vector pointing downward (positive y-axis).
    #[must_use]
    pub fn down() -> Vec2 {
        Vec2 { x: 0.0, y: 1.0 }
    }
    /// Returns a vector with both components set to 1.0.
    #[must_use]
    pub fn one() -> Vec2 {
        Vec2 { x: 1.0, y: 1.0 }
    }
    /// Returns a vector with both components set to 0.0.
    #[must_use]
    pub fn zero() -> Vec2 {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Creates a new vector with both components set to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let vec = Vec2::splat(3.0);
    /// assert_eq!(vec.x, 3.0);
    /// assert_eq!(vec.y, 3.0);
    /// ```
    #[must_use]
    pub fn splat(v: f64) -> Vec2 {
        Vec2 { x: v, y: v }
    }

    /// Returns the squared length of the vector.
    ///
    /// Use this instead of [`len`](Vec2::len) when comparing lengths, to
    /// avoid the square root.
    #[must_use]
    pub fn len_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Returns the length of the vector.
    #[must_use]
    pub fn len(&self) -> f64 {
        self.len_squared().sqrt()
    }

    /// Returns a normalised (unit) vector in the same direction as this
    /// vector.
    ///
    /// If the original vector's length is zero, returns a zero vector to
    /// avoid division by zero. Negative zero components are forced to
    /// positive zero.
    #[must_use]
    pub fn normed(&self) -> Vec2 {
        let mut rv = match self.len() {
            0.0 => Vec2::zero(),
            len => *self / len,
        };
        rv.x = gm_float::force_positive_zero(rv.x);
        rv.y = gm_float::force_positive_zero(rv.y);
        rv
    }

    /// Returns a new vector with the absolute values of each component.
    #[must_use]
    pub fn abs(&self) -> Vec2 {
        Vec2 {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }

    /// Returns a new vector rotated clockwise (in screen coordinates, with y
    /// down) by the given angle in radians.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let vec = Vec2::right();
    /// let rotated = vec.rotated(std::f64::consts::PI / 2.0);
    /// assert!(rotated.almost_eq(Vec2::down()));
    /// ```
    #[must_use]
    pub fn rotated(&self, radians: f64) -> Vec2 {
        Mat3x3::rotation(radians) * *self
    }

    /// Reflects the vector about a normal vector.
    ///
    /// # Parameters
    ///
    /// * `normal` - The normal vector to reflect about. Must be already
    ///   normalised.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let vec = Vec2 { x: 1.0, y: 1.0 };
    /// let reflected = vec.reflect(Vec2::up());
    /// assert_eq!(reflected, Vec2 { x: 1.0, y: -1.0 });
    /// ```
    #[must_use]
    pub fn reflect(&self, normal: Vec2) -> Vec2 {
        *self - 2.0 * self.dot(normal) * normal
    }

    /// Returns a new vector where each component is the reciprocal of the
    /// corresponding component. A zero vector maps to a zero vector.
    #[must_use]
    pub fn reciprocal(&self) -> Vec2 {
        if self.is_zero() {
            Vec2 {
                x: gm_float::force_positive_zero(self.x),
                y: gm_float::force_positive_zero(self.y),
            }
        } else {
            Vec2 {
                x: 1.0 / self.x,
                y: 1.0 / self.y,
            }
        }
    }

    /// Returns an orthogonal vector, rotated 90 degrees clockwise from this
    /// one (the left normal in screen coordinates).
    ///
    /// # Examples
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let vec = Vec2 { x: 3.0, y: 2.0 };
    /// let perpendicular = vec.orthog();
    /// assert_eq!(perpendicular, Vec2 { x: 2.0, y: -3.0 });
    /// assert_eq!(vec.dot(perpendicular), 0.0);
    /// ```
    #[must_use]
    pub fn orthog(&self) -> Vec2 {
        Vec2 {
            x: self.y,
            y: -self.x,
        }
    }

    /// Performs a component-wise multiplication of two vectors.
    #[must_use]
    pub fn component_wise(&self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }

    /// Performs a component-wise division of two vectors. Division by a zero
    /// vector yields a zero vector.
    #[must_use]
    pub fn component_wise_div(&self, other: Vec2) -> Vec2 {
        if other.is_zero() {
            Vec2::zero()
        } else {
            Vec2 {
                x: self.x / other.x,
                y: self.y / other.y,
            }
        }
    }

    /// Computes the dot product of two vectors.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let v1 = Vec2 { x: 2.0, y: 3.0 };
    /// let v2 = Vec2 { x: 4.0, y: 5.0 };
    /// assert_eq!(v1.dot(v2), 23.0); // 2*4 + 3*5
    /// ```
    #[must_use]
    pub fn dot(&self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Computes the 2D cross product of two vectors: the signed area of the
    /// parallelogram they span.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let v1 = Vec2 { x: 2.0, y: 0.0 };
    /// let v2 = Vec2 { x: 0.0, y: 3.0 };
    /// assert_eq!(v1.cross(v2), 6.0); // 2*3 - 0*0
    /// ```
    #[must_use]
    pub fn cross(&self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Calculates the smallest angle in radians between two vectors, in the
    /// range `[0, π]`.
    #[must_use]
    pub fn angle_radians(&self, other: Vec2) -> f64 {
        self.normed().dot(other.normed()).acos()
    }

    /// Projects this vector onto the given axis.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let v = Vec2 { x: 3.0, y: 4.0 };
    /// assert_eq!(v.project(Vec2::right()), Vec2 { x: 3.0, y: 0.0 });
    /// ```
    #[must_use]
    pub fn project(&self, axis: Vec2) -> Vec2 {
        self.dot(axis.normed()) * axis.normed()
    }

    /// Computes the Euclidean distance between two points.
    #[must_use]
    pub fn dist(&self, other: Vec2) -> f64 {
        (other - *self).len()
    }

    /// Computes the squared Euclidean distance between two points.
    #[must_use]
    pub fn dist_squared(&self, other: Vec2) -> f64 {
        (other - *self).len_squared()
    }

    /// Linearly interpolates between this vector and another vector.
    ///
    /// `t` is clamped to `[0, 1]`; `t = 0` returns this vector, `t = 1`
    /// returns `to`. For extrapolating scalar interpolation see
    /// [`math::lerp`](crate::util::math::lerp).
    #[must_use]
    pub fn lerp(&self, to: Vec2, t: f64) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        Vec2 {
            x: math::lerp(self.x, to.x, t),
            y: math::lerp(self.y, to.y, t),
        }
    }

    /// Checks if the vector is approximately equal to another vector: the
    /// length of their difference is less than
    /// [`EPSILON`](crate::core::config::EPSILON).
    pub fn almost_eq(&self, rhs: Vec2) -> bool {
        (*self - rhs).len() < EPSILON
    }

    /// Converts the vector to a [`Vec2i`] by rounding each component to the
    /// nearest integer. Lossy.
    #[must_use]
    pub fn as_vec2i_lossy(&self) -> Vec2i {
        Vec2i {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
        }
    }

    /// Component-wise minimum of two vectors.
    #[must_use]
    pub fn min(&self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
        }
    }

    /// Component-wise maximum of two vectors.
    #[must_use]
    pub fn max(&self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }
}

impl Zero for Vec2 {
    fn zero() -> Self {
        Vec2::zero()
    }

    fn is_zero(&self) -> bool {
        self.almost_eq(Self::zero())
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(value: [f64; 2]) -> Self {
        Vec2 {
            x: value[0],
            y: value[1],
        }
    }
}
impl From<[i32; 2]> for Vec2 {
    fn from(value: [i32; 2]) -> Self {
        Vec2 {
            x: f64::from(value[0]),
            y: f64::from(value[1]),
        }
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(value: Vec2) -> Self {
        [value.x, value.y]
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let precision = f.precision();

        write!(f, "vec(")?;
        if let Some(p) = precision {
            write!(f, "{0:.1$}", self.x, p)?;
            write!(f, ", {0:.1$}", self.y, p)?;
        } else {
            write!(f, "{}, {}", self.x, self.y)?;
        }
        write!(f, ")")
    }
}

impl Add<Vec2> for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
impl AddAssign<Vec2> for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Vec2> for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
impl SubAssign<Vec2> for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Sum<Vec2> for Vec2 {
    fn sum<I: Iterator<Item = Vec2>>(iter: I) -> Self {
        iter.fold(Vec2::zero(), Vec2::add)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Self::Output {
        rhs * self
    }
}
impl Mul<Vec2> for f64 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self * rhs.x,
            y: self * rhs.y,
        }
    }
}
impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f64) -> Self::Output {
        Vec2 {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}
impl DivAssign<f64> for Vec2 {
    fn div_assign(&mut self, rhs: f64) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Self::Output {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// A 2D vector with integer coordinates, used for pixel and tile indexing.
#[derive(
    Default,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Copy,
    Clone,
    Hash,
    bincode::Encode,
    bincode::Decode,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    #[must_use]
    pub fn right() -> Vec2i {
        Vec2i { x: 1, y: 0 }
    }
    #[must_use]
    pub fn up() -> Vec2i {
        Vec2i { x: 0, y: -1 }
    }
    #[must_use]
    pub fn left() -> Vec2i {
        Vec2i { x: -1, y: 0 }
    }
    #[must_use]
    pub fn down() -> Vec2i {
        Vec2i { x: 0, y: 1 }
    }
    #[must_use]
    pub fn one() -> Vec2i {
        Vec2i { x: 1, y: 1 }
    }
    #[must_use]
    pub fn zero() -> Vec2i {
        Vec2i { x: 0, y: 0 }
    }

    #[must_use]
    pub fn splat(value: i32) -> Self {
        Self { x: value, y: value }
    }

    /// Converts a [`Vec2i`] to [`Vec2`].
    pub fn as_vec2(&self) -> Vec2 {
        Into::<Vec2>::into(*self)
    }

    /// Creates a Cartesian product of two ranges, from `start` to `end`
    /// (exclusive), iterating through all integer coordinates in that
    /// rectangle.
    pub fn range(start: Vec2i, end: Vec2i) -> Product<Range<i32>, Range<i32>> {
        (start.x..end.x).cartesian_product(start.y..end.y)
    }

    /// Creates a Cartesian product of two ranges, from `(0, 0)` to the given
    /// `end` (exclusive). Commonly used for iterating through grid-based
    /// data like tilesets or pixel regions.
    pub fn range_from_zero(end: impl Into<Vec2i>) -> Product<Range<i32>, Range<i32>> {
        Self::range(Vec2i::zero(), end.into())
    }

    /// Calculates a linear index into a 2D array with the given dimensions,
    /// in row-major order. Bounds are checked.
    #[allow(clippy::cast_sign_loss)]
    pub fn as_index(&self, width: u32, height: u32) -> usize {
        check_ge!(self.x, 0);
        check_ge!(self.y, 0);
        check_lt!(self.x as u32, width);
        check_lt!(self.y as u32, height);
        (self.y as u32 * width + self.x as u32) as usize
    }
}

impl From<Vec2i> for Vec2 {
    fn from(value: Vec2i) -> Self {
        Self {
            x: f64::from(value.x),
            y: f64::from(value.y),
        }
    }
}

impl Zero for Vec2i {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl From<[i32; 2]> for Vec2i {
    fn from(value: [i32; 2]) -> Self {
        Vec2i {
            x: value[0],
            y: value[1],
        }
    }
}

impl From<Vec2i> for [i32; 2] {
    fn from(value: Vec2i) -> Self {
        [value.x, value.y]
    }
}

impl fmt::Display for Vec2i {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "vec({}, {})", self.x, self.y)
    }
}

impl Add<Vec2i> for Vec2i {
    type Output = Vec2i;

    fn add(self, rhs: Vec2i) -> Self::Output {
        Vec2i {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
impl AddAssign<Vec2i> for Vec2i {
    fn add_assign(&mut self, rhs: Vec2i) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Vec2i> for Vec2i {
    type Output = Vec2i;

    fn sub(self, rhs: Vec2i) -> Self::Output {
        Vec2i {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
impl SubAssign<Vec2i> for Vec2i {
    fn sub_assign(&mut self, rhs: Vec2i) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<i32> for Vec2i {
    type Output = Vec2i;

    fn mul(self, rhs: i32) -> Self::Output {
        rhs * self
    }
}
impl Mul<Vec2i> for i32 {
    type Output = Vec2i;

    fn mul(self, rhs: Vec2i) -> Self::Output {
        Vec2i {
            x: self * rhs.x,
            y: self * rhs.y,
        }
    }
}

impl Div<i32> for Vec2i {
    type Output = Vec2i;

    fn div(self, rhs: i32) -> Self::Output {
        Vec2i {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

impl Neg for Vec2i {
    type Output = Vec2i;

    fn neg(self) -> Self::Output {
        Vec2i {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// A 3x3 matrix for 2D transformations in homogeneous coordinates.
///
/// The elements are arranged as follows:
/// ```text
/// | xx xy xw |
/// | yx yy yw |
/// | wx wy ww |
/// ```
/// where the first two columns are the linear transformation and the third
/// column the translation.
#[derive(Debug, Copy, Clone, PartialEq, bincode::Encode, bincode::Decode)]
#[must_use]
pub struct Mat3x3 {
    pub xx: f64,
    pub xy: f64,
    pub xw: f64,
    pub yx: f64,
    pub yy: f64,
    pub yw: f64,
    pub wx: f64,
    pub wy: f64,
    pub ww: f64,
}

impl Mat3x3 {
    /// Creates an identity matrix.
    pub fn one() -> Mat3x3 {
        Mat3x3 {
            xx: 1.0,
            xy: 0.0,
            xw: 0.0,
            yx: 0.0,
            yy: 1.0,
            yw: 0.0,
            wx: 0.0,
            wy: 0.0,
            ww: 1.0,
        }
    }

    /// Creates a zero matrix.
    pub fn zero() -> Mat3x3 {
        Mat3x3 {
            xx: 0.0,
            xy: 0.0,
            xw: 0.0,
            yx: 0.0,
            yy: 0.0,
            yw: 0.0,
            wx: 0.0,
            wy: 0.0,
            ww: 0.0,
        }
    }

    /// Creates a translation matrix:
    /// ```text
    /// | 1 0 dx |
    /// | 0 1 dy |
    /// | 0 0 1  |
    /// ```
    pub fn translation(dx: f64, dy: f64) -> Mat3x3 {
        Mat3x3 {
            xx: 1.0,
            xy: 0.0,
            xw: dx,
            yx: 0.0,
            yy: 1.0,
            yw: dy,
            wx: 0.0,
            wy: 0.0,
            ww: 1.0,
        }
    }

    /// Creates a translation matrix from a [`Vec2`].
    pub fn translation_vec2(vec2: Vec2) -> Mat3x3 {
        Self::translation(vec2.x, vec2.y)
    }

    /// Creates a rotation matrix:
    /// ```text
    /// | cos(θ)  -sin(θ)  0 |
    /// | sin(θ)   cos(θ)  0 |
    /// | 0        0       1 |
    /// ```
    /// In screen coordinates (y down) this rotates clockwise.
    pub fn rotation(radians: f64) -> Mat3x3 {
        Mat3x3 {
            xx: f64::cos(radians),
            xy: -f64::sin(radians),
            xw: 0.0,
            yx: f64::sin(radians),
            yy: f64::cos(radians),
            yw: 0.0,
            wx: 0.0,
            wy: 0.0,
            ww: 1.0,
        }
    }

    /// Creates a non-uniform scale matrix:
    /// ```text
    /// | sx 0  0 |
    /// | 0  sy 0 |
    /// | 0  0  1 |
    /// ```
    pub fn scale(sx: f64, sy: f64) -> Mat3x3 {
        Mat3x3 {
            xx: sx,
            xy: 0.0,
            xw: 0.0,
            yx: 0.0,
            yy: sy,
            yw: 0.0,
            wx: 0.0,
            wy: 0.0,
            ww: 1.0,
        }
    }

    /// Calculates the determinant of the matrix.
    pub fn det(&self) -> f64 {
        self.xx * (self.yy * self.ww - self.yw * self.wy)
            - self.xy * (self.yx * self.ww - self.yw * self.wx)
            + self.xw * (self.yx * self.wy - self.yy * self.wx)
    }

    /// Calculates the inverse of the matrix via the adjugate, or `None` if
    /// the matrix is singular (determinant within
    /// [`EPSILON`](crate::core::config::EPSILON) of zero).
    ///
    /// # Examples
    /// ```
    /// use glimmer::core::prelude::*;
    /// let m = Mat3x3::translation(2.0, 3.0) * Mat3x3::rotation(0.5);
    /// let inv = m.inverse().unwrap();
    /// assert!((m * inv).almost_eq(Mat3x3::one()));
    /// ```
    pub fn inverse(&self) -> Option<Mat3x3> {
        let det = self.det();
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Mat3x3 {
            xx: (self.yy * self.ww - self.yw * self.wy) * inv_det,
            xy: (self.xw * self.wy - self.xy * self.ww) * inv_det,
            xw: (self.xy * self.yw - self.xw * self.yy) * inv_det,
            yx: (self.yw * self.wx - self.yx * self.ww) * inv_det,
            yy: (self.xx * self.ww - self.xw * self.wx) * inv_det,
            yw: (self.xw * self.yx - self.xx * self.yw) * inv_det,
            wx: (self.yx * self.wy - self.yy * self.wx) * inv_det,
            wy: (self.xy * self.wx - self.xx * self.wy) * inv_det,
            ww: (self.xx * self.yy - self.xy * self.yx) * inv_det,
        })
    }

    /// Compares two matrices for approximate equality.
    pub fn almost_eq(&self, rhs: Mat3x3) -> bool {
        f64::abs(self.xx - rhs.xx) < EPSILON
            && f64::abs(self.xy - rhs.xy) < EPSILON
            && f64::abs(self.xw - rhs.xw) < EPSILON
            && f64::abs(self.yx - rhs.yx) < EPSILON
            && f64::abs(self.yy - rhs.yy) < EPSILON
            && f64::abs(self.yw - rhs.yw) < EPSILON
            && f64::abs(self.wx - rhs.wx) < EPSILON
            && f64::abs(self.wy - rhs.wy) < EPSILON
            && f64::abs(self.ww - rhs.ww) < EPSILON
    }
}

impl One for Mat3x3 {
    fn one() -> Self {
        Self::one()
    }
}

impl Zero for Mat3x3 {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_zero(&self) -> bool {
        self.almost_eq(Self::zero())
    }
}

impl Add<Mat3x3> for Mat3x3 {
    type Output = Mat3x3;

    fn add(self, rhs: Mat3x3) -> Self::Output {
        Mat3x3 {
            xx: self.xx + rhs.xx,
            xy: self.xy + rhs.xy,
            xw: self.xw + rhs.xw,
            yx: self.yx + rhs.yx,
            yy: self.yy + rhs.yy,
            yw: self.yw + rhs.yw,
            wx: self.wx + rhs.wx,
            wy: self.wy + rhs.wy,
            ww: self.ww + rhs.ww,
        }
    }
}

impl Mul<Vec2> for Mat3x3 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self.xx * rhs.x + self.xy * rhs.y + self.xw * 1.0,
            y: self.yx * rhs.x + self.yy * rhs.y + self.yw * 1.0,
        }
    }
}
impl Mul<Mat3x3> for Mat3x3 {
    type Output = Mat3x3;

    fn mul(self, rhs: Mat3x3) -> Self::Output {
        Mat3x3 {
            xx: self.xx * rhs.xx + self.xy * rhs.yx + self.xw * rhs.wx,
            xy: self.xx * rhs.xy + self.xy * rhs.yy + self.xw * rhs.wy,
            xw: self.xx * rhs.xw + self.xy * rhs.yw + self.xw * rhs.ww,
            yx: self.yx * rhs.xx + self.yy * rhs.yx + self.yw * rhs.wx,
            yy: self.yx * rhs.xy + self.yy * rhs.yy + self.yw * rhs.wy,
            yw: self.yx * rhs.xw + self.yy * rhs.yw + self.yw * rhs.ww,
            wx: self.wx * rhs.xx + self.wy * rhs.yx + self.ww * rhs.wx,
            wy: self.wx * rhs.xy + self.wy * rhs.yy + self.ww * rhs.wy,
            ww: self.wx * rhs.xw + self.wy * rhs.yw + self.ww * rhs.ww,
        }
    }
}

/// Trait for types that have an axis-aligned bounding box.
///
/// Requires [`extent()`](AxisAlignedExtent::extent) and
/// [`centre()`](AxisAlignedExtent::centre); everything else (corners, edges,
/// containment) has default implementations in terms of those two.
pub trait AxisAlignedExtent {
    fn extent(&self) -> Vec2;
    fn centre(&self) -> Vec2;

    fn half_widths(&self) -> Vec2 {
        self.extent() / 2.0
    }
    fn top_left(&self) -> Vec2 {
        self.centre() - self.half_widths()
    }
    fn top_right(&self) -> Vec2 {
        let hw = self.half_widths();
        self.centre() + Vec2 { x: hw.x, y: -hw.y }
    }
    fn bottom_left(&self) -> Vec2 {
        let hw = self.half_widths();
        self.centre() + Vec2 { x: -hw.x, y: hw.y }
    }
    fn bottom_right(&self) -> Vec2 {
        self.centre() + self.half_widths()
    }

    fn left(&self) -> f64 {
        self.top_left().x
    }
    fn right(&self) -> f64 {
        self.top_right().x
    }
    fn top(&self) -> f64 {
        self.top_left().y
    }
    fn bottom(&self) -> f64 {
        self.bottom_left().y
    }

    fn as_rect(&self) -> Rect {
        Rect::new(self.centre(), self.half_widths())
    }
    /// Half-open containment test. The collision layer's
    /// [`point_in_rect`](crate::util::collision::point_in_rect) is the
    /// inclusive variant.
    fn contains_point(&self, pos: Vec2) -> bool {
        (self.left()..self.right()).contains(&pos.x) && (self.top()..self.bottom()).contains(&pos.y)
    }
    fn contains_rect(&self, rect: &Rect) -> bool {
        self.left() <= rect.left()
            && self.right() >= rect.right()
            && self.top() <= rect.top()
            && self.bottom() >= rect.bottom()
    }

    fn union(&self, rhs: impl AxisAlignedExtent) -> Rect {
        self.as_rect().union(&rhs.as_rect())
    }
}

/// A rectangle defined by a centre point and half-widths.
///
/// # Examples
///
/// ```
/// use glimmer::core::prelude::*;
///
/// let rect = Rect::from_xywh(0.0, 0.0, 10.0, 6.0);
/// assert_eq!(rect.left(), 0.0);
/// assert_eq!(rect.bottom(), 6.0);
/// assert_eq!(rect.centre(), Vec2 { x: 5.0, y: 3.0 });
/// ```
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    bincode::Encode,
    bincode::Decode,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Rect {
    centre: Vec2,
    half_widths: Vec2,
}

impl Rect {
    /// Creates a new rectangle with the given centre point and half-widths.
    pub fn new(centre: Vec2, half_widths: Vec2) -> Self {
        Self {
            centre,
            half_widths,
        }
    }
    /// Creates a new rectangle from two diagonal corner points.
    pub fn from_coords(top_left: Vec2, bottom_right: Vec2) -> Self {
        let half_widths = (bottom_right - top_left) / 2.0;
        let centre = top_left + half_widths;
        Self {
            centre,
            half_widths,
        }
    }
    /// Creates a new rectangle from its top-left corner and extent.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_coords(
            Vec2 { x, y },
            Vec2 {
                x: x + width,
                y: y + height,
            },
        )
    }
    /// Creates an empty rectangle with zero size at the origin.
    pub fn empty() -> Self {
        Self {
            centre: Vec2::zero(),
            half_widths: Vec2::zero(),
        }
    }

    /// True if either dimension is (within tolerance of) zero or negative.
    pub fn is_empty(&self) -> bool {
        self.half_widths.x < EPSILON || self.half_widths.y < EPSILON
    }

    #[must_use]
    pub fn union(&self, rhs: &Rect) -> Rect {
        let top_left = self.top_left().min(rhs.top_left());
        let bottom_right = self.bottom_right().max(rhs.bottom_right());
        Self::from_coords(top_left, bottom_right)
    }

    /// The overlapping region of two rectangles, or `None` if they do not
    /// overlap by more than a sliver.
    ///
    /// # Examples
    /// ```
    /// use glimmer::core::prelude::*;
    /// let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
    /// let b = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);
    /// let i = a.intersection(&b).unwrap();
    /// assert_eq!(i, Rect::from_xywh(5.0, 5.0, 5.0, 5.0));
    /// assert!(a.intersection(&Rect::from_xywh(20.0, 0.0, 5.0, 5.0)).is_none());
    /// ```
    #[must_use]
    pub fn intersection(&self, rhs: &Rect) -> Option<Rect> {
        let x = gm_range::overlap_f64(&(self.left()..self.right()), &(rhs.left()..rhs.right()))?;
        let y = gm_range::overlap_f64(&(self.top()..self.bottom()), &(rhs.top()..rhs.bottom()))?;
        Some(Self::from_coords(
            Vec2 {
                x: x.start,
                y: y.start,
            },
            Vec2 { x: x.end, y: y.end },
        ))
    }

    #[must_use]
    pub fn translated(mut self, by: Vec2) -> Rect {
        self.centre += by;
        self
    }
}

impl AxisAlignedExtent for Rect {
    fn extent(&self) -> Vec2 {
        self.half_widths * 2.0
    }
    fn centre(&self) -> Vec2 {
        self.centre
    }
}

/// A 2D transformation: translation, rotation (radians, clockwise in screen
/// coordinates) and non-uniform scale.
#[derive(Copy, Clone, Debug, PartialEq, bincode::Encode, bincode::Decode)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub centre: Vec2,
    pub rotation: f64,
    pub scale: Vec2,
}

impl Transform {
    /// Creates a new transform at the specified centre position.
    #[must_use]
    pub fn with_centre(centre: Vec2) -> Self {
        Self {
            centre,
            ..Default::default()
        }
    }

    /// Creates a new transform with the specified rotation in radians.
    #[must_use]
    pub fn with_rotation(rotation: f64) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Creates a new transform with the specified scale factors.
    #[must_use]
    pub fn with_scale(scale: Vec2) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    /// Returns a new transform translated by the given offset vector.
    #[must_use]
    pub fn translated(&self, by: Vec2) -> Self {
        Self {
            centre: self.centre + by,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Returns a new transform that is the inverse of this transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            centre: -self.centre,
            rotation: -self.rotation,
            scale: self.scale.reciprocal(),
        }
    }

    /// True if this transform moves nothing: no rotation and unit scale.
    pub fn is_axis_aligned_unit(&self) -> bool {
        self.rotation.abs() < EPSILON && self.scale.almost_eq(Vec2::one())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            centre: Vec2::zero(),
            rotation: 0.0,
            scale: Vec2::one(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    // ==================== Vec2 basic operations ====================

    #[test]
    fn vec2_arithmetic() {
        let a = Vec2 { x: 1.0, y: 2.0 };
        let b = Vec2 { x: 3.0, y: 4.0 };
        assert_eq!(a + b, Vec2 { x: 4.0, y: 6.0 });
        assert_eq!(b - a, Vec2 { x: 2.0, y: 2.0 });
        assert_eq!(a * 2.0, Vec2 { x: 2.0, y: 4.0 });
        assert_eq!(2.0 * a, Vec2 { x: 2.0, y: 4.0 });
        assert_eq!(b / 2.0, Vec2 { x: 1.5, y: 2.0 });
        assert_eq!(-a, Vec2 { x: -1.0, y: -2.0 });
    }

    #[test]
    fn vec2_assign_ops() {
        let mut a = Vec2 { x: 1.0, y: 2.0 };
        a += Vec2 { x: 3.0, y: 4.0 };
        assert_eq!(a, Vec2 { x: 4.0, y: 6.0 });
        a -= Vec2 { x: 1.0, y: 1.0 };
        assert_eq!(a, Vec2 { x: 3.0, y: 5.0 });
        a *= 2.0;
        assert_eq!(a, Vec2 { x: 6.0, y: 10.0 });
        a /= 2.0;
        assert_eq!(a, Vec2 { x: 3.0, y: 5.0 });
    }

    #[test]
    fn vec2_length_and_distance() {
        let v = Vec2 { x: 3.0, y: 4.0 };
        assert_eq!(v.len(), 5.0);
        assert_eq!(v.len_squared(), 25.0);
        assert_eq!(Vec2::zero().dist(v), 5.0);
        assert_eq!(Vec2::zero().dist_squared(v), 25.0);
    }

    #[test]
    fn vec2_normed() {
        let v = Vec2 { x: 3.0, y: 4.0 }.normed();
        assert!(v.almost_eq(Vec2 { x: 0.6, y: 0.8 }));
        assert_eq!(Vec2::zero().normed(), Vec2::zero());
    }

    #[test]
    fn vec2_dot_cross() {
        let a = Vec2 { x: 2.0, y: 3.0 };
        let b = Vec2 { x: 4.0, y: 5.0 };
        assert_eq!(a.dot(b), 23.0);
        assert_eq!(a.cross(b), -2.0);
        assert_eq!(a.cross(a), 0.0);
        assert_eq!(a.dot(a.orthog()), 0.0);
    }

    #[test]
    fn vec2_rotation() {
        assert!(Vec2::right().rotated(FRAC_PI_2).almost_eq(Vec2::down()));
        assert!(Vec2::right().rotated(PI).almost_eq(Vec2::left()));
        assert!(Vec2::right().rotated(-FRAC_PI_2).almost_eq(Vec2::up()));
    }

    #[test]
    fn vec2_reflect_and_project() {
        let v = Vec2 { x: 1.0, y: 1.0 };
        assert_eq!(v.reflect(Vec2::up()), Vec2 { x: 1.0, y: -1.0 });
        assert_eq!(
            Vec2 { x: 3.0, y: 4.0 }.project(Vec2::right()),
            Vec2 { x: 3.0, y: 0.0 }
        );
    }

    #[test]
    fn vec2_epsilon_equality() {
        let a = Vec2 { x: 1.0, y: 1.0 };
        let b = Vec2 {
            x: 1.0 + EPSILON / 2.0,
            y: 1.0,
        };
        assert_eq!(a, b);
        assert!(a.almost_eq(b));
        assert_ne!(
            a,
            Vec2 {
                x: 1.0 + EPSILON * 2.0,
                y: 1.0
            }
        );
    }

    #[test]
    fn vec2_lossy_integer_conversion() {
        assert_eq!(
            Vec2 { x: 1.4, y: -1.6 }.as_vec2i_lossy(),
            Vec2i { x: 1, y: -2 }
        );
    }

    #[test]
    fn vec2_component_wise_ops() {
        let a = Vec2 { x: 2.0, y: 3.0 };
        let b = Vec2 { x: 4.0, y: 6.0 };
        assert_eq!(a.component_wise(b), Vec2 { x: 8.0, y: 18.0 });
        assert_eq!(b.component_wise_div(a), Vec2 { x: 2.0, y: 2.0 });
        assert_eq!(b.component_wise_div(Vec2::zero()), Vec2::zero());
        assert_eq!(a.reciprocal(), Vec2 { x: 0.5, y: 1.0 / 3.0 });
    }

    #[test]
    fn vec2_angle_between() {
        assert!((Vec2::right().angle_radians(Vec2::down()) - FRAC_PI_2).abs() < EPSILON);
        assert!((Vec2::right().angle_radians(Vec2::left()) - PI).abs() < EPSILON);
        assert!(Vec2::right().angle_radians(Vec2::right()).abs() < EPSILON);
    }

    #[test]
    fn vec2_conversions_and_sum() {
        assert_eq!(Vec2::from([2.0, 3.0]), Vec2 { x: 2.0, y: 3.0 });
        assert_eq!(Vec2::from([2, 3]), Vec2 { x: 2.0, y: 3.0 });
        assert_eq!(<[f64; 2]>::from(Vec2 { x: 2.0, y: 3.0 }), [2.0, 3.0]);
        assert_eq!(Vec2i::from([2, 3]), Vec2i { x: 2, y: 3 });
        let total: Vec2 = [Vec2::right(), Vec2::down(), Vec2::right()]
            .into_iter()
            .sum();
        assert_eq!(total, Vec2 { x: 2.0, y: 1.0 });
    }

    #[test]
    fn vec2_lerp_is_clamped() {
        let a = Vec2::zero();
        let b = Vec2 { x: 10.0, y: 20.0 };
        assert_eq!(a.lerp(b, 0.5), Vec2 { x: 5.0, y: 10.0 });
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        // Unlike the scalar helper, the vector form clamps.
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    // ==================== Vec2i ====================

    #[test]
    fn vec2i_arithmetic_and_directions() {
        let a = Vec2i { x: 1, y: 2 };
        assert_eq!(a + Vec2i::right(), Vec2i { x: 2, y: 2 });
        assert_eq!(a - Vec2i::down(), Vec2i { x: 1, y: 1 });
        assert_eq!(3 * a, Vec2i { x: 3, y: 6 });
        assert_eq!(a * 3, Vec2i { x: 3, y: 6 });
        assert_eq!(Vec2i { x: 6, y: 4 } / 2, Vec2i { x: 3, y: 2 });
        assert_eq!(-a, Vec2i { x: -1, y: -2 });
        assert_eq!(Vec2i::left() + Vec2i::right(), Vec2i::zero());
        assert_eq!(Vec2i::up() + Vec2i::down(), Vec2i::zero());
        assert_eq!(Vec2i::one(), Vec2i::splat(1));
        assert_eq!(a.as_vec2(), Vec2 { x: 1.0, y: 2.0 });
    }

    #[test]
    fn vec2i_range_iteration() {
        let cells = Vec2i::range_from_zero(Vec2i { x: 2, y: 3 }).count();
        assert_eq!(cells, 6);
        let coords: Vec<_> = Vec2i::range(Vec2i { x: 1, y: 1 }, Vec2i { x: 3, y: 2 }).collect();
        assert_eq!(coords, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn vec2i_as_index_row_major() {
        assert_eq!(Vec2i { x: 0, y: 0 }.as_index(4, 4), 0);
        assert_eq!(Vec2i { x: 3, y: 0 }.as_index(4, 4), 3);
        assert_eq!(Vec2i { x: 0, y: 1 }.as_index(4, 4), 4);
        assert_eq!(Vec2i { x: 2, y: 3 }.as_index(4, 4), 14);
    }

    #[test]
    #[should_panic(expected = "check failed")]
    fn vec2i_as_index_out_of_bounds() {
        Vec2i { x: 4, y: 0 }.as_index(4, 4);
    }

    // ==================== Mat3x3 ====================

    #[test]
    fn mat3x3_identity_and_translation() {
        let v = Vec2 { x: 2.0, y: 3.0 };
        assert_eq!(Mat3x3::one() * v, v);
        assert_eq!(
            Mat3x3::translation(1.0, -1.0) * v,
            Vec2 { x: 3.0, y: 2.0 }
        );
    }

    #[test]
    fn mat3x3_rotation_matches_vec2_rotated() {
        let v = Vec2 { x: 2.0, y: 3.0 };
        for i in 0..8 {
            let angle = f64::from(i) * PI / 4.0;
            assert!((Mat3x3::rotation(angle) * v).almost_eq(v.rotated(angle)));
        }
    }

    #[test]
    fn mat3x3_scale() {
        assert_eq!(
            Mat3x3::scale(2.0, 0.5) * Vec2 { x: 3.0, y: 4.0 },
            Vec2 { x: 6.0, y: 2.0 }
        );
    }

    #[test]
    fn mat3x3_inverse_round_trip() {
        let m = Mat3x3::translation(5.0, -2.0) * Mat3x3::rotation(0.7) * Mat3x3::scale(2.0, 3.0);
        let inv = m.inverse().unwrap();
        assert!((m * inv).almost_eq(Mat3x3::one()));
        assert!((inv * m).almost_eq(Mat3x3::one()));
        let v = Vec2 { x: 1.0, y: 2.0 };
        assert!((inv * (m * v)).almost_eq(v));
    }

    #[test]
    fn mat3x3_singular_has_no_inverse() {
        assert!(Mat3x3::scale(0.0, 1.0).inverse().is_none());
        assert!(Mat3x3::zero().inverse().is_none());
    }

    // ==================== Rect ====================

    #[test]
    fn rect_accessors() {
        let rect = Rect::from_xywh(1.0, 2.0, 4.0, 6.0);
        assert_eq!(rect.left(), 1.0);
        assert_eq!(rect.right(), 5.0);
        assert_eq!(rect.top(), 2.0);
        assert_eq!(rect.bottom(), 8.0);
        assert_eq!(rect.centre(), Vec2 { x: 3.0, y: 5.0 });
        assert_eq!(rect.extent(), Vec2 { x: 4.0, y: 6.0 });
    }

    #[test]
    fn rect_contains_point_half_open() {
        let rect = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains_point(Vec2 { x: 0.0, y: 0.0 }));
        assert!(rect.contains_point(Vec2 { x: 9.9, y: 9.9 }));
        assert!(!rect.contains_point(Vec2 { x: 10.0, y: 5.0 }));
        assert!(!rect.contains_point(Vec2 { x: -0.1, y: 5.0 }));
    }

    #[test]
    fn rect_intersection_cases() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            a.intersection(&Rect::from_xywh(5.0, -5.0, 10.0, 10.0)),
            Some(Rect::from_xywh(5.0, 0.0, 5.0, 5.0))
        );
        // Full containment.
        assert_eq!(
            a.intersection(&Rect::from_xywh(2.0, 2.0, 3.0, 3.0)),
            Some(Rect::from_xywh(2.0, 2.0, 3.0, 3.0))
        );
        // Disjoint and merely touching both come back empty.
        assert!(a.intersection(&Rect::from_xywh(11.0, 0.0, 2.0, 2.0)).is_none());
        assert!(a.intersection(&Rect::from_xywh(10.0, 0.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn rect_union() {
        let a = Rect::from_xywh(0.0, 0.0, 2.0, 2.0);
        let b = Rect::from_xywh(5.0, 5.0, 1.0, 1.0);
        assert_eq!(a.union(&b), Rect::from_xywh(0.0, 0.0, 6.0, 6.0));
    }

    #[test]
    fn rect_emptiness_and_translation() {
        assert!(Rect::empty().is_empty());
        assert!(Rect::from_xywh(0.0, 0.0, 5.0, 0.0).is_empty());
        assert!(!Rect::from_xywh(0.0, 0.0, 1.0, 1.0).is_empty());
        assert_eq!(
            Rect::from_xywh(0.0, 0.0, 2.0, 2.0).translated(Vec2 { x: 3.0, y: -1.0 }),
            Rect::from_xywh(3.0, -1.0, 2.0, 2.0)
        );
    }

    // ==================== Transform ====================

    #[test]
    fn transform_defaults_and_builders() {
        let t = Transform::default();
        assert!(t.is_axis_aligned_unit());
        assert_eq!(t.scale, Vec2::one());
        let t = Transform::with_rotation(0.5);
        assert!(!t.is_axis_aligned_unit());
        assert_eq!(t.centre, Vec2::zero());
        let t = Transform::with_centre(Vec2::one()).translated(Vec2::right());
        assert_eq!(t.centre, Vec2 { x: 2.0, y: 1.0 });
    }

    #[test]
    fn transform_inverse() {
        let t = Transform {
            centre: Vec2 { x: 2.0, y: 3.0 },
            rotation: FRAC_PI_2,
            scale: Vec2 { x: 2.0, y: 2.0 },
        };
        let inv = t.inverse();
        assert_eq!(inv.centre, -t.centre);
        assert_eq!(inv.rotation, -t.rotation);
        assert_eq!(inv.scale, Vec2 { x: 0.5, y: 0.5 });
    }
}
