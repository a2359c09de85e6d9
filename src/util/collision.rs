//! Rectangle/segment queries and pixel-perfect sprite overlap tests.

#[allow(unused_imports)]
use crate::core::prelude::*;

use crate::resource::sprite::FrameView;

/// Inclusive-boundary containment test: is `(px, py)` inside the rectangle
/// at `(rx, ry)` with the given extent? All four edges count as inside.
///
/// # Examples
/// ```
/// use glimmer::util::collision::point_in_rect;
/// assert!(point_in_rect(0.0, 0.0, 0.0, 0.0, 10.0, 10.0));
/// assert!(point_in_rect(10.0, 10.0, 0.0, 0.0, 10.0, 10.0));
/// assert!(!point_in_rect(10.1, 5.0, 0.0, 0.0, 10.0, 10.0));
/// ```
pub fn point_in_rect(px: f64, py: f64, rx: f64, ry: f64, rw: f64, rh: f64) -> bool {
    px >= rx && px <= rx + rw && py >= ry && py <= ry + rh
}

/// Computes where the segment `start → end` first enters `rect`, as a new
/// pooled point, or `None` if it never does.
///
/// - A `start` already inside the rectangle (inclusive) enters immediately:
///   the result is a copy of `start`.
/// - Both endpoints entirely left/right/above/below the rectangle is a
///   trivial miss.
/// - Weak inputs are released on every path.
pub fn calc_rect_entry(
    rect: &Rect,
    start: impl PointSource,
    end: impl PointSource,
) -> Option<Point> {
    let start = start.take();
    let end = end.take();
    let (left, right) = (rect.left(), rect.right());
    let (top, bottom) = (rect.top(), rect.bottom());

    if point_in_rect(start.x, start.y, left, top, rect.extent().x, rect.extent().y) {
        return Some(Point::from_vec2(start));
    }
    // Both endpoints on the same outer side: the segment cannot reach the
    // rectangle.
    if (start.x < left && end.x < left)
        || (start.x > right && end.x > right)
        || (start.y < top && end.y < top)
        || (start.y > bottom && end.y > bottom)
    {
        return None;
    }

    // A vertical segment can only cross the top or bottom edge; which one is
    // first depends on the direction of travel.
    if start.x == end.x {
        return Some(Point::get(start.x, if start.y < end.y { top } else { bottom }));
    }

    // General case: y = m*x + c, intersected with each candidate edge in
    // travel order.
    let m = (end.y - start.y) / (end.x - start.x);
    let c = start.y - m * start.x;

    if start.x < end.x {
        // Travelling rightward: the left edge is the first vertical candidate.
        let left_y = m * left + c;
        if start.x <= left && (top..=bottom).contains(&left_y) {
            return Some(Point::get(left, left_y));
        }
    } else {
        let right_y = m * right + c;
        if start.x >= right && (top..=bottom).contains(&right_y) {
            return Some(Point::get(right, right_y));
        }
    }

    if start.y < end.y {
        // Travelling downward: the top edge.
        let top_x = (top - c) / m;
        if (left..=right).contains(&top_x) {
            return Some(Point::get(top_x, top));
        }
    } else if start.y > end.y {
        let bottom_x = (bottom - c) / m;
        if (left..=right).contains(&bottom_x) {
            return Some(Point::get(bottom_x, bottom));
        }
    }
    None
}

/// Computes where the segment `start → end` last exits `rect`: exactly the
/// entry point of the reversed segment.
pub fn calc_rect_exit(
    rect: &Rect,
    start: impl PointSource,
    end: impl PointSource,
) -> Option<Point> {
    calc_rect_entry(rect, end, start)
}

/// The per-sprite pixel source for an overlap scan: either the sprite's
/// frame sampled directly (axis-aligned, unit scale), or a pooled scratch
/// buffer the transformed silhouette was rendered into.
enum FramePixels<'a> {
    Direct(FrameView<'a>),
    Rendered(ScratchBuffer),
}

impl FramePixels<'_> {
    fn alpha_at(&self, p: Vec2i) -> u8 {
        match self {
            FramePixels::Direct(view) => view.alpha_at(p),
            FramePixels::Rendered(scratch) => scratch.alpha_at(p),
        }
    }
}

fn floor_vec2i(v: Vec2) -> Vec2i {
    Vec2i {
        x: v.x.floor() as i32,
        y: v.y.floor() as i32,
    }
}

fn screen_frame_pixels<'a>(
    sprite: &'a Sprite,
    bounds: &Rect,
    camera: &Camera,
) -> FramePixels<'a> {
    if sprite.transform().is_axis_aligned_unit() {
        return FramePixels::Direct(sprite.frame_view());
    }
    // Advanced path: undo the origin offset, apply scale then rotation, and
    // land the pivot where it sits inside the bounding rectangle, so the
    // rotated silhouette occupies axis-aligned pixel space.
    let size = Vec2i {
        x: bounds.extent().x.ceil() as i32,
        y: bounds.extent().y.ceil() as i32,
    };
    let mut scratch = PixelBuffer::scratch(size);
    let pivot = sprite.position() - camera.scroll - bounds.top_left();
    let mat = Mat3x3::translation_vec2(pivot)
        * Mat3x3::rotation(sprite.rotation_radians())
        * Mat3x3::scale(sprite.scale().x, sprite.scale().y)
        * Mat3x3::translation_vec2(-sprite.origin());
    scratch.draw_transformed(&sprite.frame_view(), mat);
    FramePixels::Rendered(scratch)
}

/// Pixel-perfect overlap test between two sprites.
///
/// The sprites' screen-space bounding rectangles (for `camera`, or a default
/// camera) are intersected first; an empty or sub-pixel intersection is a
/// miss without any pixel sampling. Rotated or scaled sprites are rendered
/// into pooled scratch buffers so both silhouettes can be compared in
/// axis-aligned pixel space. A collision is declared as soon as any pixel
/// pair in the overlap has **both** alpha values `>= alpha_tolerance`
/// (1 is the conventional tolerance: any non-transparent pixel counts).
///
/// Scratch buffers return to their pool when the scan finishes, on every
/// path.
pub fn pixel_perfect_check(
    contact: &Sprite,
    target: &Sprite,
    alpha_tolerance: u8,
    camera: Option<&Camera>,
) -> bool {
    let default_camera = Camera::default();
    let camera = camera.unwrap_or(&default_camera);

    let bounds_a = contact.screen_bounds(camera);
    let bounds_b = target.screen_bounds(camera);
    let Some(overlap) = bounds_a.intersection(&bounds_b) else {
        return false;
    };
    if overlap.extent().x < 1.0 || overlap.extent().y < 1.0 {
        return false;
    }

    let pixels_a = screen_frame_pixels(contact, &bounds_a, camera);
    let pixels_b = screen_frame_pixels(target, &bounds_b, camera);

    // Pixel-space offset of the overlap region within each sprite's bounds.
    let offset_a = floor_vec2i(overlap.top_left() - bounds_a.top_left());
    let offset_b = floor_vec2i(overlap.top_left() - bounds_b.top_left());
    let overlap_extent = floor_vec2i(overlap.extent());

    for (x, y) in Vec2i::range_from_zero(overlap_extent) {
        let p = Vec2i { x, y };
        if pixels_a.alpha_at(offset_a + p) >= alpha_tolerance
            && pixels_b.alpha_at(offset_b + p) >= alpha_tolerance
        {
            return true;
        }
    }
    false
}

/// Single-pixel variant of [`pixel_perfect_check`]: does the world-space
/// point `(px, py)` land on a sufficiently opaque pixel of `target`?
///
/// Rejects immediately when the point is outside the sprite's axis-aligned
/// bounds; otherwise samples that one frame pixel, scaling its alpha by the
/// sprite's overall opacity. Rotation is not unwound here: the sampled
/// pixel is taken from the unrotated frame. Scale is accounted for, so
/// stretched sprites sample the frame pixel under the point.
pub fn pixel_perfect_point_check(px: f64, py: f64, target: &Sprite, alpha_tolerance: u8) -> bool {
    let camera = Camera::default();
    let bounds = target.screen_bounds(&camera);
    if !point_in_rect(
        px,
        py,
        bounds.left(),
        bounds.top(),
        bounds.extent().x,
        bounds.extent().y,
    ) {
        return false;
    }
    let scale = target.scale().abs();
    if scale.x < EPSILON || scale.y < EPSILON {
        return false;
    }
    let local = Vec2 { x: px, y: py } - bounds.top_left();
    let frame_p = floor_vec2i(Vec2 {
        x: local.x / scale.x,
        y: local.y / scale.y,
    });
    f64::from(target.frame_alpha_at(frame_p)) * target.alpha() >= f64::from(alpha_tolerance)
}
