//! A pooled 2D point with weak auto-release semantics.
//!
//! Hot per-frame code churns through enormous numbers of short-lived points;
//! [`Point`] recycles their heap storage through a thread-local free list
//! instead of hitting the allocator every time. A point is either *owned*
//! (the caller releases it with [`Point::put`]) or *weak* ([`Weak`], released
//! automatically the first time it is consumed as an operation argument, or
//! when dropped). Every operation that accepts another point takes
//! [`impl PointSource`](PointSource), which is the single place the
//! "release if and only if weak" rule lives.

#[allow(unused_imports)]
use crate::core::prelude::*;

use std::cell::RefCell;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Default)]
struct PointData {
    v: Vec2,
}

#[derive(Default)]
struct PointPool {
    free: Vec<Box<PointData>>,
    recycled: u64,
}

thread_local! {
    static POINT_POOL: RefCell<PointPool> = RefCell::new(PointPool::default());
}

fn pool_acquire(v: Vec2) -> Box<PointData> {
    if !USE_POINT_POOL {
        return Box::new(PointData { v });
    }
    POINT_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        match pool.free.pop() {
            Some(mut data) => {
                pool.recycled += 1;
                data.v = v;
                data
            }
            None => Box::new(PointData { v }),
        }
    })
}

fn pool_release(data: Box<PointData>) {
    if !USE_POINT_POOL {
        return;
    }
    POINT_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        if pool.free.len() < POINT_POOL_MAX_FREE {
            pool.free.push(data);
        }
    });
}

/// The number of released point instances currently waiting for reuse on
/// this thread.
pub fn pool_free_count() -> usize {
    POINT_POOL.with(|pool| pool.borrow().free.len())
}

/// The number of acquisitions this thread has served from recycled storage.
pub fn pool_recycled_count() -> u64 {
    POINT_POOL.with(|pool| pool.borrow().recycled)
}

/// Drops all free instances held by this thread's pool.
pub fn pool_clear() {
    POINT_POOL.with(|pool| pool.borrow_mut().free.clear());
}

/// Argument position for point-consuming operations.
///
/// [`take`](PointSource::take) reads the point's components and releases the
/// point back to the pool if and only if it was acquired as weak:
/// - `&Point`: borrowed, never released; the caller keeps ownership.
/// - [`Weak`]: by value, always released.
/// - [`Vec2`]: plain-value interop; nothing to release.
///
/// Operations never re-derive this rule per call site, so a weak argument
/// cannot leak on any code path, including early returns.
pub trait PointSource {
    fn take(self) -> Vec2;
}

impl PointSource for &Point {
    fn take(self) -> Vec2 {
        self.as_vec2()
    }
}

impl PointSource for Weak {
    fn take(mut self) -> Vec2 {
        let p = self.0.take().expect("weak point already released");
        let v = p.as_vec2();
        p.put();
        v
    }
}

impl PointSource for Vec2 {
    fn take(self) -> Vec2 {
        self
    }
}

/// A pool-backed 2D point.
///
/// Obtain instances with [`Point::get`] (owned) or [`Point::weak`]
/// (auto-released); return owned instances with [`Point::put`]. `put`
/// consumes the point, so use-after-release and double-release do not
/// compile; the free list can never hold an instance that live code can
/// still reach. Dropping a point without `put()` deallocates it normally:
/// safe, but the storage is not recycled.
///
/// Mutating operations return `&mut Self` for chaining:
///
/// ```
/// use glimmer::core::prelude::*;
/// let mut p = Point::get(1.0, 2.0);
/// p.add(1.0, 0.0).scale(2.0).rotate_by_degrees(0.0);
/// assert_eq!(p.x(), 4.0);
/// p.put();
/// ```
#[derive(Debug)]
pub struct Point {
    data: Box<PointData>,
}

/// A point tagged for automatic release.
///
/// Dereferences to [`Point`] for reading and in-place mutation. Its storage
/// returns to the pool the first time it is consumed as an operation
/// argument, or when it goes out of scope, whichever comes first.
#[derive(Debug)]
pub struct Weak(Option<Point>);

impl Deref for Weak {
    type Target = Point;

    fn deref(&self) -> &Point {
        self.0.as_ref().expect("weak point already released")
    }
}
impl DerefMut for Weak {
    fn deref_mut(&mut self) -> &mut Point {
        self.0.as_mut().expect("weak point already released")
    }
}

impl Drop for Weak {
    fn drop(&mut self) {
        if let Some(p) = self.0.take() {
            p.put();
        }
    }
}

/// Solves for the parametric position along `d` (anchored at `a`) of the
/// intersection with the line through `b` along `p`, via the perp-product
/// ratio formula. NaN when the lines are parallel or either direction is
/// degenerate.
fn parametric_ratio(d: Vec2, a: Vec2, b: Vec2, p: Vec2) -> f64 {
    if d.cross(p).abs() < EPSILON_SQUARED {
        return f64::NAN;
    }
    if d.len_squared() < EPSILON_SQUARED || p.len_squared() < EPSILON_SQUARED {
        return f64::NAN;
    }
    let diff = b - a;
    (diff.y * p.x - diff.x * p.y) / (d.y * p.x - d.x * p.y)
}

impl Point {
    /// Acquires an owned point from the pool, or allocates if the pool is
    /// empty.
    #[must_use]
    pub fn get(x: f64, y: f64) -> Point {
        Point {
            data: pool_acquire(Vec2 { x, y }),
        }
    }

    /// Acquires a point tagged for automatic release; see [`Weak`].
    #[must_use]
    pub fn weak(x: f64, y: f64) -> Weak {
        Weak(Some(Point::get(x, y)))
    }

    /// The explicit conversion from the plain vector type.
    #[must_use]
    pub fn from_vec2(v: Vec2) -> Point {
        Point {
            data: pool_acquire(v),
        }
    }

    /// The explicit conversion to the plain vector type.
    #[must_use]
    pub fn as_vec2(&self) -> Vec2 {
        self.data.v
    }

    /// Releases this point's storage back to the pool. Consumes the point;
    /// further use does not compile.
    pub fn put(self) {
        pool_release(self.data);
    }

    pub fn x(&self) -> f64 {
        self.data.v.x
    }
    pub fn y(&self) -> f64 {
        self.data.v.y
    }
    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.data.v.x = x;
        self
    }
    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.data.v.y = y;
        self
    }
    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.data.v = Vec2 { x, y };
        self
    }

    pub fn add(&mut self, x: f64, y: f64) -> &mut Self {
        self.data.v += Vec2 { x, y };
        self
    }
    pub fn subtract(&mut self, x: f64, y: f64) -> &mut Self {
        self.data.v -= Vec2 { x, y };
        self
    }
    /// Scales both components by `factor`; see [`scale_xy`](Point::scale_xy)
    /// for non-uniform scaling.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.data.v *= factor;
        self
    }
    pub fn scale_xy(&mut self, x: f64, y: f64) -> &mut Self {
        self.data.v = self.data.v.component_wise(Vec2 { x, y });
        self
    }
    pub fn negate(&mut self) -> &mut Self {
        self.data.v = -self.data.v;
        self
    }

    /// Adds another point's components to this point.
    pub fn add_point(&mut self, other: impl PointSource) -> &mut Self {
        self.data.v += other.take();
        self
    }
    /// Subtracts another point's components from this point.
    pub fn subtract_point(&mut self, other: impl PointSource) -> &mut Self {
        self.data.v -= other.take();
        self
    }
    /// Multiplies this point component-wise by another point.
    pub fn scale_point(&mut self, other: impl PointSource) -> &mut Self {
        self.data.v = self.data.v.component_wise(other.take());
        self
    }
    /// Overwrites this point with another point's components.
    pub fn copy_from(&mut self, other: impl PointSource) -> &mut Self {
        self.data.v = other.take();
        self
    }

    /// Returns a new pooled point holding the sum; neither operand is
    /// mutated (weak arguments still release).
    #[must_use]
    pub fn add_new(&self, other: impl PointSource) -> Point {
        Point::from_vec2(self.data.v + other.take())
    }
    /// Returns a new pooled point holding the difference.
    #[must_use]
    pub fn subtract_new(&self, other: impl PointSource) -> Point {
        Point::from_vec2(self.data.v - other.take())
    }
    /// Returns a new pooled point holding this point scaled by `factor`.
    #[must_use]
    pub fn scale_new(&self, factor: f64) -> Point {
        Point::from_vec2(self.data.v * factor)
    }
    /// Returns a new pooled point holding this point negated.
    #[must_use]
    pub fn negate_new(&self) -> Point {
        Point::from_vec2(-self.data.v)
    }
    /// Returns a new pooled point with the same components.
    #[must_use]
    pub fn clone_new(&self) -> Point {
        Point::from_vec2(self.data.v)
    }

    pub fn dot_product(&self, other: impl PointSource) -> f64 {
        self.data.v.dot(other.take())
    }
    /// The scalar magnitude of the 2D cross product:
    /// `x1 * y2 - y1 * x2`.
    pub fn cross_product_length(&self, other: impl PointSource) -> f64 {
        self.data.v.cross(other.take())
    }
    /// The dot product of this point's left normal with `other`.
    pub fn perp_product(&self, other: impl PointSource) -> f64 {
        let o = other.take();
        self.y() * o.x - self.x() * o.y
    }

    /// True if the cross product with `other` is within
    /// [`EPSILON_SQUARED`](crate::core::config::EPSILON_SQUARED) of zero.
    pub fn is_parallel(&self, other: impl PointSource) -> bool {
        self.data.v.cross(other.take()).abs() < EPSILON_SQUARED
    }
    /// True if the dot product with `other` is within
    /// [`EPSILON_SQUARED`](crate::core::config::EPSILON_SQUARED) of zero.
    pub fn is_perpendicular(&self, other: impl PointSource) -> bool {
        self.data.v.dot(other.take()).abs() < EPSILON_SQUARED
    }

    pub fn length(&self) -> f64 {
        self.data.v.len()
    }
    pub fn length_squared(&self) -> f64 {
        self.data.v.len_squared()
    }
    pub fn distance_to(&self, other: impl PointSource) -> f64 {
        self.data.v.dist(other.take())
    }

    /// Scales this point to unit length. If the current length is within
    /// [`EPSILON`](crate::core::config::EPSILON) of zero, this is a no-op
    /// returning the point unchanged (never divides by zero).
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len < EPSILON {
            return self;
        }
        self.scale(1.0 / len)
    }

    /// Rotates this point clockwise (screen coordinates) about the origin.
    pub fn rotate_by_radians(&mut self, radians: f64) -> &mut Self {
        self.rotate_with_trig(radians.sin(), radians.cos())
    }
    pub fn rotate_by_degrees(&mut self, degrees: f64) -> &mut Self {
        self.rotate_by_radians(degrees.to_radians())
    }
    /// Rotation with the caller's precomputed sine and cosine, for rotating
    /// many points by the same angle.
    pub fn rotate_with_trig(&mut self, sin: f64, cos: f64) -> &mut Self {
        let Vec2 { x, y } = self.data.v;
        self.data.v = Vec2 {
            x: x * cos - y * sin,
            y: x * sin + y * cos,
        };
        self
    }

    /// Rotates this point clockwise about an arbitrary pivot point.
    ///
    /// ```
    /// use glimmer::core::prelude::*;
    /// let mut p = Point::get(2.0, 1.0);
    /// p.pivot_radians(Point::weak(1.0, 1.0), std::f64::consts::FRAC_PI_2);
    /// assert!(p.equals(Vec2 { x: 1.0, y: 2.0 }));
    /// p.put();
    /// ```
    pub fn pivot_radians(&mut self, pivot: impl PointSource, radians: f64) -> &mut Self {
        let pivot = pivot.take();
        let rotated = (self.data.v - pivot).rotated(radians);
        self.data.v = pivot + rotated;
        self
    }
    pub fn pivot_degrees(&mut self, pivot: impl PointSource, degrees: f64) -> &mut Self {
        self.pivot_radians(pivot, degrees.to_radians())
    }

    /// The angle of this point as a direction vector, in radians in
    /// `(-π, π]`; pointing right is 0, angles increase clockwise in screen
    /// coordinates.
    pub fn radians(&self) -> f64 {
        self.y().atan2(self.x())
    }
    pub fn degrees(&self) -> f64 {
        self.radians().to_degrees()
    }

    /// The directional angle from this point to another, in radians in
    /// `(-π, π]`; pointing right is 0.
    pub fn radians_to(&self, other: impl PointSource) -> f64 {
        let o = other.take();
        (o.y - self.y()).atan2(o.x - self.x())
    }
    pub fn degrees_to(&self, other: impl PointSource) -> f64 {
        self.radians_to(other).to_degrees()
    }
    /// The symmetric inverse of [`radians_to`](Point::radians_to): the angle
    /// from `other` to this point.
    pub fn radians_from(&self, other: impl PointSource) -> f64 {
        let o = other.take();
        (self.y() - o.y).atan2(self.x() - o.x)
    }
    pub fn degrees_from(&self, other: impl PointSource) -> f64 {
        self.radians_from(other).to_degrees()
    }

    /// The x component of the unit direction, or 0 for a degenerate point.
    pub fn dx(&self) -> f64 {
        let len = self.length();
        if len < EPSILON { 0.0 } else { self.x() / len }
    }
    /// The y component of the unit direction, or 0 for a degenerate point.
    pub fn dy(&self) -> f64 {
        let len = self.length();
        if len < EPSILON { 0.0 } else { self.y() / len }
    }

    /// Returns a new pooled point holding the unit direction.
    #[must_use]
    pub fn unit_new(&self) -> Point {
        Point::get(self.dx(), self.dy())
    }
    /// Returns a new pooled point holding the left normal `(y, -x)`.
    #[must_use]
    pub fn left_normal_new(&self) -> Point {
        Point::get(self.y(), -self.x())
    }
    /// Returns a new pooled point holding the right normal `(-y, x)`.
    #[must_use]
    pub fn right_normal_new(&self) -> Point {
        Point::get(-self.y(), self.x())
    }

    /// Returns a new pooled point holding the projection of this point onto
    /// `p`. Projection onto a zero-length `p` divides by zero, per the
    /// crate's unguarded-degeneracy contract.
    #[must_use]
    pub fn project_to(&self, p: impl PointSource) -> Point {
        let p = p.take();
        let k = self.data.v.dot(p) / p.len_squared();
        Point::from_vec2(k * p)
    }
    /// [`project_to`](Point::project_to) for a `p` the caller guarantees is
    /// already unit length; skips the division. Not checked.
    #[must_use]
    pub fn project_to_normalized(&self, p: impl PointSource) -> Point {
        let p = p.take();
        let k = self.data.v.dot(p);
        Point::from_vec2(k * p)
    }

    /// Treating this point as a direction from `a` and `p` as a direction
    /// from `b`, solves for the parametric position along this direction of
    /// the line-line intersection. Returns NaN when the directions are
    /// parallel (cross product within
    /// [`EPSILON_SQUARED`](crate::core::config::EPSILON_SQUARED) of zero) or
    /// either direction is near-zero length.
    pub fn ratio(&self, a: impl PointSource, b: impl PointSource, p: impl PointSource) -> f64 {
        parametric_ratio(self.data.v, a.take(), b.take(), p.take())
    }

    /// The intersection of the line through `a` along this direction with
    /// the line through `b` along `p`, as a new pooled point. Degenerate
    /// input (see [`ratio`](Point::ratio)) yields a `(NaN, NaN)` point, not
    /// an error.
    #[must_use]
    pub fn find_intersection(
        &self,
        a: impl PointSource,
        b: impl PointSource,
        p: impl PointSource,
    ) -> Point {
        let a = a.take();
        let t = parametric_ratio(self.data.v, a, b.take(), p.take());
        if t.is_nan() {
            Point::get(f64::NAN, f64::NAN)
        } else {
            Point::from_vec2(a + t * self.data.v)
        }
    }

    /// Like [`find_intersection`](Point::find_intersection), but requires a
    /// true segment-segment intersection: both parametric ratios must lie in
    /// `(0, 1]`. Yields `(NaN, NaN)` otherwise.
    #[must_use]
    pub fn find_intersection_in_bounds(
        &self,
        a: impl PointSource,
        b: impl PointSource,
        p: impl PointSource,
    ) -> Point {
        let a = a.take();
        let b = b.take();
        let p = p.take();
        let t1 = parametric_ratio(self.data.v, a, b, p);
        let t2 = parametric_ratio(p, b, a, self.data.v);
        if !t1.is_nan() && !t2.is_nan() && t1 > 0.0 && t1 <= 1.0 && t2 > 0.0 && t2 <= 1.0 {
            Point::from_vec2(a + t1 * self.data.v)
        } else {
            Point::get(f64::NAN, f64::NAN)
        }
    }

    /// Reflects this point (as a velocity) off a surface whose unit left
    /// normal is `normal`, retaining `bounce_coeff` of the speed. `normal`
    /// must already be unit length; this is not checked.
    pub fn bounce(&mut self, normal: impl PointSource, bounce_coeff: f64) -> &mut Self {
        let n = normal.take();
        let d = (1.0 + bounce_coeff) * self.data.v.dot(n);
        self.data.v -= d * n;
        self
    }

    /// Like [`bounce`](Point::bounce), but decomposes the velocity into its
    /// normal and tangential components and recombines them with separate
    /// coefficients: the normal component is reversed and scaled by
    /// `bounce_coeff`, the tangential component retained scaled by
    /// `friction`. `normal` must already be unit length; not checked.
    pub fn bounce_with_friction(
        &mut self,
        normal: impl PointSource,
        bounce_coeff: f64,
        friction: f64,
    ) -> &mut Self {
        let n = normal.take();
        let tangent = Vec2 { x: -n.y, y: n.x };
        let along_tangent = self.data.v.dot(tangent) * tangent;
        let along_normal = self.data.v.dot(n) * n;
        self.data.v = -1.0 * bounce_coeff * along_normal + friction * along_tangent;
        self
    }

    /// True if both components are finite (not NaN, not infinite).
    pub fn is_valid(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    /// Tolerance comparison: both component differences within
    /// [`EPSILON`](crate::core::config::EPSILON).
    pub fn equals(&self, other: impl PointSource) -> bool {
        let o = other.take();
        math::equal_eps(self.x(), o.x) && math::equal_eps(self.y(), o.y)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.data.v == other.data.v
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "point({}, {})", self.x(), self.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    // ==================== Pool accounting ====================

    #[test]
    fn pool_returns_to_baseline_after_paired_get_put() {
        pool_clear();
        // Warm the pool so the baseline is non-trivial.
        Point::get(0.0, 0.0).put();
        let baseline = pool_free_count();
        for i in 0..100 {
            let p = Point::get(f64::from(i), 1.0);
            p.put();
        }
        assert_eq!(pool_free_count(), baseline);
    }

    #[test]
    fn pool_recycles_released_storage() {
        pool_clear();
        Point::get(1.0, 2.0).put();
        assert_eq!(pool_free_count(), 1);
        let before = pool_recycled_count();
        let p = Point::get(3.0, 4.0);
        assert_eq!(pool_free_count(), 0);
        assert_eq!(pool_recycled_count(), before + 1);
        assert_eq!(p.x(), 3.0);
        assert_eq!(p.y(), 4.0);
        p.put();
    }

    #[test]
    fn distinct_live_points_have_distinct_storage() {
        pool_clear();
        let mut a = Point::get(1.0, 1.0);
        let mut b = Point::get(2.0, 2.0);
        a.set(5.0, 5.0);
        assert_eq!(b.x(), 2.0);
        b.set(6.0, 6.0);
        assert_eq!(a.x(), 5.0);
        a.put();
        b.put();
        assert_eq!(pool_free_count(), 2);
    }

    // ==================== Weak auto-release ====================

    #[test]
    fn weak_releases_on_consumption() {
        pool_clear();
        let a = Point::get(0.0, 0.0);
        let b = Point::get(0.0, 0.0);
        a.put();
        b.put();
        let mut host = Point::get(1.0, 1.0);
        let baseline = pool_free_count();
        // The weak point takes a free slot and gives it back when consumed;
        // the owned host is unaffected.
        host.add_point(Point::weak(2.0, 3.0));
        assert_eq!(pool_free_count(), baseline);
        assert!(host.equals(Vec2 { x: 3.0, y: 4.0 }));
        host.put();
        assert_eq!(pool_free_count(), baseline + 1);
    }

    #[test]
    fn weak_releases_on_drop_when_never_consumed() {
        pool_clear();
        {
            let _w = Point::weak(1.0, 1.0);
            assert_eq!(pool_free_count(), 0);
        }
        assert_eq!(pool_free_count(), 1);
    }

    #[test]
    fn owned_arguments_are_never_released() {
        pool_clear();
        let mut host = Point::get(1.0, 1.0);
        let other = Point::get(2.0, 2.0);
        let baseline = pool_free_count();
        host.add_point(&other);
        host.subtract_point(&other);
        assert_eq!(pool_free_count(), baseline);
        // `other` is still live and untouched.
        assert_eq!(other.x(), 2.0);
        host.put();
        other.put();
    }

    #[test]
    fn weak_is_readable_before_consumption() {
        let w = Point::weak(3.0, 4.0);
        assert_eq!(w.x(), 3.0);
        assert_eq!(w.length(), 5.0);
        let mut host = Point::get(0.0, 0.0);
        host.add_point(w);
        assert_eq!(host.y(), 4.0);
        host.put();
    }

    // ==================== Basic algebra ====================

    #[test]
    fn chained_mutators() {
        let mut p = Point::get(1.0, 2.0);
        p.add(1.0, 1.0).subtract(0.0, 2.0).scale(3.0).scale_xy(1.0, 2.0);
        assert!(p.equals(Vec2 { x: 6.0, y: 6.0 }));
        p.set(1.0, -1.0).negate();
        assert!(p.equals(Vec2 { x: -1.0, y: 1.0 }));
        p.put();
    }

    #[test]
    fn new_variants_leave_receiver_unchanged() {
        let a = Point::get(1.0, 2.0);
        let sum = a.add_new(Point::weak(2.0, 3.0));
        let diff = a.subtract_new(Vec2 { x: 1.0, y: 1.0 });
        let scaled = a.scale_new(2.0);
        let neg = a.negate_new();
        assert!(sum.equals(Vec2 { x: 3.0, y: 5.0 }));
        assert!(diff.equals(Vec2 { x: 0.0, y: 1.0 }));
        assert!(scaled.equals(Vec2 { x: 2.0, y: 4.0 }));
        assert!(neg.equals(Vec2 { x: -1.0, y: -2.0 }));
        assert!(a.equals(Vec2 { x: 1.0, y: 2.0 }));
        for p in [a, sum, diff, scaled, neg] {
            p.put();
        }
    }

    #[test]
    fn dot_cross_perp_products() {
        let a = Point::get(2.0, 3.0);
        assert_eq!(a.dot_product(Vec2 { x: 4.0, y: 5.0 }), 23.0);
        assert_eq!(a.cross_product_length(Vec2 { x: 4.0, y: 5.0 }), -2.0);
        // perp product = left normal (y, -x) dotted with the argument.
        assert_eq!(a.perp_product(Vec2 { x: 4.0, y: 5.0 }), 2.0);
        assert!(a.is_parallel(Vec2 { x: 4.0, y: 6.0 }));
        assert!(!a.is_parallel(Vec2 { x: 4.0, y: 5.0 }));
        assert!(a.is_perpendicular(Vec2 { x: -3.0, y: 2.0 }));
        a.put();
    }

    #[test]
    fn normalize_handles_degenerate_length() {
        let mut p = Point::get(3.0, 4.0);
        p.normalize();
        assert!(p.equals(Vec2 { x: 0.6, y: 0.8 }));
        let mut z = Point::get(0.0, 0.0);
        z.normalize();
        assert!(z.equals(Vec2::zero()));
        let mut tiny = Point::get(1e-9, 0.0);
        tiny.normalize();
        assert_eq!(tiny.x(), 1e-9);
        p.put();
        z.put();
        tiny.put();
    }

    #[test]
    fn unit_direction_and_normals() {
        let p = Point::get(3.0, 4.0);
        assert_eq!(p.dx(), 0.6);
        assert_eq!(p.dy(), 0.8);
        let left = p.left_normal_new();
        let right = p.right_normal_new();
        assert!(left.equals(Vec2 { x: 4.0, y: -3.0 }));
        assert!(right.equals(Vec2 { x: -4.0, y: 3.0 }));
        assert_eq!(p.dot_product(&left), 0.0);
        assert_eq!(Point::get(0.0, 0.0).dx(), 0.0);
        for q in [p, left, right] {
            q.put();
        }
    }

    // ==================== Rotation ====================

    #[test]
    fn rotation_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let x = rng.gen_range(-100.0..100.0);
            let y = rng.gen_range(-100.0..100.0);
            let angle = rng.gen_range(-PI..PI);
            let mut p = Point::get(x, y);
            p.rotate_by_radians(angle).rotate_by_radians(-angle);
            assert!(p.equals(Vec2 { x, y }), "({x}, {y}) by {angle}");
            p.put();
        }
    }

    #[test]
    fn rotation_quarter_turn() {
        let mut p = Point::get(1.0, 0.0);
        p.rotate_by_degrees(90.0);
        assert!(p.equals(Vec2 { x: 0.0, y: 1.0 }));
        p.rotate_by_radians(FRAC_PI_2);
        assert!(p.equals(Vec2 { x: -1.0, y: 0.0 }));
        p.put();
    }

    #[test]
    fn rotate_with_precomputed_trig_matches() {
        let angle = 0.37;
        let mut a = Point::get(2.0, -5.0);
        let mut b = Point::get(2.0, -5.0);
        a.rotate_by_radians(angle);
        b.rotate_with_trig(angle.sin(), angle.cos());
        assert!(a.equals(&b));
        a.put();
        b.put();
    }

    #[test]
    fn pivot_about_arbitrary_point() {
        let mut p = Point::get(2.0, 1.0);
        p.pivot_radians(Point::weak(1.0, 1.0), FRAC_PI_2);
        assert!(p.equals(Vec2 { x: 1.0, y: 2.0 }));
        p.pivot_degrees(Point::weak(1.0, 1.0), -90.0);
        assert!(p.equals(Vec2 { x: 2.0, y: 1.0 }));
        p.put();
    }

    // ==================== Angles ====================

    #[test]
    fn directional_angles() {
        let origin = Point::get(0.0, 0.0);
        assert!((origin.radians_to(Vec2 { x: 1.0, y: 1.0 }) - FRAC_PI_4).abs() < EPSILON);
        assert!((origin.degrees_to(Vec2 { x: 0.0, y: 1.0 }) - 90.0).abs() < EPSILON);
        assert!((origin.degrees_to(Vec2 { x: -1.0, y: 0.0 }) - 180.0).abs() < EPSILON);
        // radians_from is the symmetric inverse.
        let other = Point::get(1.0, 1.0);
        assert_eq!(origin.radians_to(&other), other.radians_from(&origin));
        origin.put();
        other.put();
    }

    #[test]
    fn own_angle() {
        let p = Point::get(0.0, 2.0);
        assert!((p.radians() - FRAC_PI_2).abs() < EPSILON);
        assert!((p.degrees() - 90.0).abs() < EPSILON);
        p.put();
    }

    // ==================== Projection ====================

    #[test]
    fn projection() {
        let v = Point::get(3.0, 4.0);
        let onto_x = v.project_to(Vec2 { x: 2.0, y: 0.0 });
        assert!(onto_x.equals(Vec2 { x: 3.0, y: 0.0 }));
        let onto_unit = v.project_to_normalized(Vec2 { x: 1.0, y: 0.0 });
        assert!(onto_unit.equals(Vec2 { x: 3.0, y: 0.0 }));
        v.put();
        onto_x.put();
        onto_unit.put();
    }

    // ==================== Line intersection ====================

    #[test]
    fn intersection_of_crossing_lines() {
        let d = Point::get(1.0, 0.0);
        let hit = d.find_intersection(
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 0.5, y: -1.0 },
            Vec2 { x: 0.0, y: 2.0 },
        );
        assert!(hit.equals(Vec2 { x: 0.5, y: 0.0 }));
        assert_eq!(
            d.ratio(
                Vec2 { x: 0.0, y: 0.0 },
                Vec2 { x: 0.5, y: -1.0 },
                Vec2 { x: 0.0, y: 2.0 },
            ),
            0.5
        );
        d.put();
        hit.put();
    }

    #[test]
    fn parallel_lines_yield_nan() {
        let d = Point::get(1.0, 1.0);
        let hit = d.find_intersection(
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 5.0, y: 0.0 },
            Vec2 { x: 2.0, y: 2.0 },
        );
        assert!(hit.x().is_nan());
        assert!(hit.y().is_nan());
        assert!(!hit.is_valid());
        d.put();
        hit.put();
    }

    #[test]
    fn zero_length_direction_yields_nan() {
        let d = Point::get(0.0, 0.0);
        assert!(d
            .ratio(
                Vec2::zero(),
                Vec2 { x: 1.0, y: 1.0 },
                Vec2 { x: 0.0, y: 1.0 },
            )
            .is_nan());
        d.put();
    }

    #[test]
    fn segment_intersection_respects_bounds() {
        let d = Point::get(1.0, 0.0);
        // Crossing within both segments.
        let hit = d.find_intersection_in_bounds(
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 0.5, y: -1.0 },
            Vec2 { x: 0.0, y: 2.0 },
        );
        assert!(hit.equals(Vec2 { x: 0.5, y: 0.0 }));
        // The second segment starts too far right: t1 = 5, out of (0, 1].
        let miss = d.find_intersection_in_bounds(
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 5.0, y: -1.0 },
            Vec2 { x: 0.0, y: 2.0 },
        );
        assert!(miss.x().is_nan());
        d.put();
        hit.put();
        miss.put();
    }

    // ==================== Bounce ====================

    #[test]
    fn bounce_off_floor() {
        // Moving down-right onto a floor whose unit normal points up.
        let mut v = Point::get(1.0, 1.0);
        v.bounce(Vec2 { x: 0.0, y: -1.0 }, 1.0);
        assert!(v.equals(Vec2 { x: 1.0, y: -1.0 }));
        v.put();
    }

    #[test]
    fn bounce_with_damping() {
        let mut v = Point::get(0.0, 2.0);
        v.bounce(Vec2 { x: 0.0, y: -1.0 }, 0.5);
        assert!(v.equals(Vec2 { x: 0.0, y: -1.0 }));
        v.put();
    }

    #[test]
    fn bounce_with_friction_decomposes() {
        let mut v = Point::get(1.0, 1.0);
        v.bounce_with_friction(Vec2 { x: 0.0, y: -1.0 }, 1.0, 1.0);
        assert!(v.equals(Vec2 { x: 1.0, y: -1.0 }));
        // Zero friction kills the tangential component entirely.
        let mut w = Point::get(1.0, 1.0);
        w.bounce_with_friction(Vec2 { x: 0.0, y: -1.0 }, 1.0, 0.0);
        assert!(w.equals(Vec2 { x: 0.0, y: -1.0 }));
        v.put();
        w.put();
    }

    // ==================== Validity and interop ====================

    #[test]
    fn validity() {
        let p = Point::get(1.0, 2.0);
        assert!(p.is_valid());
        let q = Point::get(f64::NAN, 0.0);
        assert!(!q.is_valid());
        let r = Point::get(f64::INFINITY, 0.0);
        assert!(!r.is_valid());
        for s in [p, q, r] {
            s.put();
        }
    }

    #[test]
    fn vec2_conversion_pair() {
        let v = Vec2 { x: 7.0, y: -2.0 };
        let p = Point::from_vec2(v);
        assert_eq!(p.as_vec2(), v);
        // Plain vectors slot into any consuming argument position.
        let mut q = Point::get(1.0, 1.0);
        q.add_point(v);
        assert!(q.equals(Vec2 { x: 8.0, y: -1.0 }));
        p.put();
        q.put();
    }

    #[test]
    fn display_format() {
        let p = Point::get(1.5, -2.0);
        assert_eq!(format!("{p}"), "point(1.5, -2)");
        p.put();
    }
}
