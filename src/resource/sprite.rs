//! The sprite-side collaborators of the collision engine: a transform
//! snapshot (position, origin, rotation, scale, opacity) over a shared
//! sheet of pixels, sliced into frame regions.

#[allow(unused_imports)]
use crate::core::prelude::*;

use crate::resource::bitmap::AlphaSource;
use crate::warn_every_seconds;

/// A minimal viewport: world coordinates minus `scroll` gives screen
/// coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub scroll: Vec2,
}

/// A rectangular region of a sprite sheet, optionally named.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Frame {
    name: Option<String>,
    top_left: Vec2i,
    extent: Vec2i,
}

/// Borrowed read access to a sprite's current frame pixels.
#[derive(Copy, Clone)]
pub struct FrameView<'a> {
    sheet: &'a PixelBuffer,
    top_left: Vec2i,
    extent: Vec2i,
}

impl AlphaSource for FrameView<'_> {
    fn size(&self) -> Vec2i {
        self.extent
    }

    fn alpha_at(&self, p: Vec2i) -> u8 {
        if p.x < 0 || p.y < 0 || p.x >= self.extent.x || p.y >= self.extent.y {
            return 0;
        }
        self.sheet.alpha_at(self.top_left + p)
    }
}

/// A sprite as the collision engine sees it: a frame of pixels placed in the
/// world by a transform snapshot.
///
/// `position` is the world position of the sprite's origin (pivot); the
/// frame's top-left corner sits at `position - origin` (before scale and
/// rotation). Builder-style `with_*` methods configure the snapshot:
///
/// ```
/// use glimmer::core::prelude::*;
/// let sprite = Sprite::from_sheet(PixelBuffer::filled(Vec2i::splat(8), 255))
///     .with_position(Vec2 { x: 10.0, y: 20.0 })
///     .with_rotation_degrees(45.0);
/// assert_eq!(sprite.rotation_degrees(), 45.0);
/// ```
#[derive(Clone, Debug)]
pub struct Sprite {
    sheet: PixelBuffer,
    frames: Vec<Frame>,
    current: usize,
    position: Vec2,
    origin: Vec2,
    rotation_degrees: f64,
    scale: Vec2,
    alpha: f64,
}

impl Sprite {
    /// Creates a sprite with a single frame covering the whole sheet.
    pub fn from_sheet(sheet: PixelBuffer) -> Self {
        let frame = Frame {
            name: None,
            top_left: Vec2i::zero(),
            extent: sheet.size(),
        };
        Self {
            sheet,
            frames: vec![frame],
            current: 0,
            position: Vec2::zero(),
            origin: Vec2::zero(),
            rotation_degrees: 0.0,
            scale: Vec2::one(),
            alpha: 1.0,
        }
    }

    /// Slices a sheet into a grid of equally sized frames, in column-major
    /// tile order starting at `offset`, with `margin` pixels between tiles.
    pub fn from_tileset(
        sheet: PixelBuffer,
        tile_count: Vec2i,
        tile_size: Vec2i,
        offset: Vec2i,
        margin: Vec2i,
    ) -> Self {
        check_ge!(tile_size.x, 1);
        check_ge!(tile_size.y, 1);
        check_ge!(tile_count.x, 1);
        check_ge!(tile_count.y, 1);
        let frames = Vec2i::range_from_zero(tile_count)
            .map(|(tile_x, tile_y)| Frame {
                name: None,
                top_left: offset
                    + tile_x * (tile_size + margin).x * Vec2i::right()
                    + tile_y * (tile_size + margin).y * Vec2i::down(),
                extent: tile_size,
            })
            .collect_vec();
        Self {
            sheet,
            frames,
            current: 0,
            position: Vec2::zero(),
            origin: Vec2::zero(),
            rotation_degrees: 0.0,
            scale: Vec2::one(),
            alpha: 1.0,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }
    #[must_use]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }
    #[must_use]
    pub fn with_rotation_degrees(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }
    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
    /// Overall opacity in `[0, 1]`, applied on top of per-pixel alpha by the
    /// single-point collision check.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn set_position(&mut self, position: Vec2) -> &mut Self {
        self.position = position;
        self
    }

    /// Registers a named frame region. The bounds are trimmed to the sheet;
    /// a frame whose trimmed bounds collapse to zero area is still
    /// registered, with a diagnostic.
    pub fn add_frame(&mut self, name: impl Into<String>, top_left: Vec2i, extent: Vec2i) -> &mut Self {
        let name = name.into();
        let sheet_size = self.sheet.size();
        let clipped_tl = Vec2i {
            x: top_left.x.max(0),
            y: top_left.y.max(0),
        };
        let clipped_br = Vec2i {
            x: (top_left.x + extent.x).min(sheet_size.x),
            y: (top_left.y + extent.y).min(sheet_size.y),
        };
        let clipped_extent = Vec2i {
            x: (clipped_br.x - clipped_tl.x).max(0),
            y: (clipped_br.y - clipped_tl.y).max(0),
        };
        if clipped_extent.x == 0 || clipped_extent.y == 0 {
            warn_every_seconds!(
                5,
                "frame '{name}': trimmed bounds are empty ({top_left} + {extent} on a {sheet_size} sheet)"
            );
        }
        self.frames.push(Frame {
            name: Some(name),
            top_left: clipped_tl,
            extent: clipped_extent,
        });
        self
    }

    /// Switches to the named frame. An unknown name keeps the current frame,
    /// with a diagnostic.
    pub fn set_frame(&mut self, name: &str) -> &mut Self {
        match self
            .frames
            .iter()
            .position(|f| f.name.as_deref() == Some(name))
        {
            Some(index) => self.current = index,
            None => {
                warn_every_seconds!(5, "no frame named '{name}'");
            }
        }
        self
    }

    /// Switches to the frame at `index`; must be in range.
    pub fn set_frame_index(&mut self, index: usize) -> &mut Self {
        check_lt!(index, self.frames.len());
        self.current = index;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
    pub fn current_frame_index(&self) -> usize {
        self.current
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
    pub fn origin(&self) -> Vec2 {
        self.origin
    }
    pub fn scale(&self) -> Vec2 {
        self.scale
    }
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }
    pub fn rotation_radians(&self) -> f64 {
        self.rotation_degrees.to_radians()
    }

    /// The transform snapshot the collision engine consumes.
    pub fn transform(&self) -> Transform {
        Transform {
            centre: self.position,
            rotation: self.rotation_radians(),
            scale: self.scale,
        }
    }

    pub fn frame_extent(&self) -> Vec2i {
        self.frames[self.current].extent
    }

    /// Samples the current frame's alpha at frame-local coordinates; 0
    /// outside the frame.
    pub fn frame_alpha_at(&self, p: Vec2i) -> u8 {
        self.frame_view().alpha_at(p)
    }

    /// Borrowed read access to the current frame's pixels.
    pub fn frame_view(&self) -> FrameView<'_> {
        let frame = &self.frames[self.current];
        FrameView {
            sheet: &self.sheet,
            top_left: frame.top_left,
            extent: frame.extent,
        }
    }

    pub fn screen_position(&self, camera: &Camera) -> Vec2 {
        self.position - camera.scroll
    }

    /// The axis-aligned screen-space bounds of the scaled, rotated frame.
    ///
    /// With no rotation and unit scale this is just the frame rectangle at
    /// `position - origin`; otherwise the four frame corners are taken
    /// through the transform and their bounding box is returned.
    pub fn screen_bounds(&self, camera: &Camera) -> Rect {
        let screen_pos = self.screen_position(camera);
        let extent = self.frame_extent().as_vec2();
        if self.transform().is_axis_aligned_unit() {
            let top_left = screen_pos - self.origin;
            return Rect::from_coords(top_left, top_left + extent);
        }
        let corners = [
            Vec2::zero(),
            Vec2 { x: extent.x, y: 0.0 },
            Vec2 { x: 0.0, y: extent.y },
            extent,
        ];
        let mut min = Vec2::splat(f64::INFINITY);
        let mut max = Vec2::splat(f64::NEG_INFINITY);
        for corner in corners {
            let mapped = (corner - self.origin)
                .component_wise(self.scale)
                .rotated(self.rotation_radians());
            min = min.min(mapped);
            max = max.max(mapped);
        }
        Rect::from_coords(screen_pos + min, screen_pos + max)
    }
}
