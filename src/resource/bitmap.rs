//! Alpha-channel pixel buffers and the scratch-buffer pool.
//!
//! The collision engine only ever reads one channel, so buffers store a
//! row-major `u8` alpha grid; colour stays with the rendering stack. The
//! "advanced" pixel-perfect path renders rotated/scaled silhouettes into
//! short-lived buffers every frame, so those come from a thread-local pool
//! of recycled byte vectors ([`PixelBuffer::scratch`]) instead of fresh
//! allocations.

#[allow(unused_imports)]
use crate::core::prelude::*;

use crate::warn_every_seconds;
use std::cell::RefCell;
use std::mem;
use std::ops::{Deref, DerefMut};

/// Read access to a rectangular alpha grid. Samples outside the grid are
/// fully transparent, never an error.
pub trait AlphaSource {
    fn size(&self) -> Vec2i;
    fn alpha_at(&self, p: Vec2i) -> u8;
}

/// A row-major alpha grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: Vec2i,
    alpha: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer of the given size.
    pub fn new(size: Vec2i) -> Self {
        Self::filled(size, 0)
    }

    /// Creates a buffer with every pixel set to `alpha`.
    pub fn filled(size: Vec2i, alpha: u8) -> Self {
        check_ge!(size.x, 0);
        check_ge!(size.y, 0);
        Self {
            size,
            alpha: vec![alpha; (size.x * size.y) as usize],
        }
    }

    /// Wraps an existing row-major alpha byte vector.
    ///
    /// # Errors
    /// Fails if `alpha.len()` does not match the given size.
    pub fn from_alpha(size: Vec2i, alpha: Vec<u8>) -> Result<Self> {
        check_ge!(size.x, 0);
        check_ge!(size.y, 0);
        if alpha.len() != (size.x * size.y) as usize {
            bail!(
                "alpha buffer of {} bytes does not match extent {}",
                alpha.len(),
                size
            );
        }
        Ok(Self { size, alpha })
    }

    /// Creates a buffer by sampling `f` at every pixel coordinate.
    pub fn from_fn(size: Vec2i, f: impl Fn(Vec2i) -> u8) -> Self {
        let mut buf = Self::new(size);
        for (x, y) in Vec2i::range_from_zero(size) {
            let p = Vec2i { x, y };
            buf.set_alpha(p, f(p));
        }
        buf
    }

    /// Sets a single pixel. The coordinate must be inside the buffer.
    pub fn set_alpha(&mut self, p: Vec2i, alpha: u8) {
        let idx = p.as_index(self.size.x as u32, self.size.y as u32);
        self.alpha[idx] = alpha;
    }

    /// Overwrites every pixel with `alpha`.
    pub fn fill(&mut self, alpha: u8) {
        self.alpha.fill(alpha);
    }

    /// True if no pixel is non-transparent.
    pub fn is_blank(&self) -> bool {
        self.alpha.iter().all(|&a| a == 0)
    }

    /// Draws `src` into this buffer through the forward transform `mat`
    /// (source pixel space → destination pixel space), by inverse-mapping
    /// each destination pixel centre and sampling nearest-neighbour.
    /// Out-of-range samples contribute nothing. A singular transform (e.g.
    /// zero scale) draws nothing.
    pub fn draw_transformed(&mut self, src: &impl AlphaSource, mat: Mat3x3) {
        let Some(inv) = mat.inverse() else {
            warn_every_seconds!(5, "draw_transformed: singular transform, nothing drawn");
            return;
        };
        for (x, y) in Vec2i::range_from_zero(self.size) {
            let dest_centre = Vec2 {
                x: f64::from(x) + 0.5,
                y: f64::from(y) + 0.5,
            };
            let sample = src.alpha_at(floor_pixel(inv * dest_centre));
            if sample > 0 {
                self.set_alpha(Vec2i { x, y }, sample);
            }
        }
    }
}

impl AlphaSource for PixelBuffer {
    fn size(&self) -> Vec2i {
        self.size
    }

    fn alpha_at(&self, p: Vec2i) -> u8 {
        if p.x < 0 || p.y < 0 || p.x >= self.size.x || p.y >= self.size.y {
            return 0;
        }
        self.alpha[p.as_index(self.size.x as u32, self.size.y as u32)]
    }
}

fn floor_pixel(v: Vec2) -> Vec2i {
    Vec2i {
        x: v.x.floor() as i32,
        y: v.y.floor() as i32,
    }
}

thread_local! {
    static BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

/// The number of recycled byte vectors waiting in this thread's scratch
/// pool.
pub fn buffer_pool_free_count() -> usize {
    BUFFER_POOL.with(|pool| pool.borrow().len())
}

/// Drops all free byte vectors held by this thread's scratch pool.
pub fn buffer_pool_clear() {
    BUFFER_POOL.with(|pool| pool.borrow_mut().clear());
}

/// A pooled temporary [`PixelBuffer`].
///
/// Dereferences to [`PixelBuffer`]; the backing byte vector returns to the
/// thread-local pool when the guard drops, on every path.
#[derive(Debug)]
pub struct ScratchBuffer {
    buf: PixelBuffer,
}

impl PixelBuffer {
    /// Acquires a zeroed scratch buffer of the given size, reusing a pooled
    /// byte vector when one is available.
    pub fn scratch(size: Vec2i) -> ScratchBuffer {
        check_ge!(size.x, 0);
        check_ge!(size.y, 0);
        let mut bytes = if USE_BUFFER_POOL {
            BUFFER_POOL
                .with(|pool| pool.borrow_mut().pop())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        bytes.clear();
        bytes.resize((size.x * size.y) as usize, 0);
        ScratchBuffer {
            buf: PixelBuffer { size, alpha: bytes },
        }
    }
}

impl Deref for ScratchBuffer {
    type Target = PixelBuffer;

    fn deref(&self) -> &PixelBuffer {
        &self.buf
    }
}
impl DerefMut for ScratchBuffer {
    fn deref_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buf
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        if USE_BUFFER_POOL {
            let bytes = mem::take(&mut self.buf.alpha);
            BUFFER_POOL.with(|pool| pool.borrow_mut().push(bytes));
        }
    }
}
