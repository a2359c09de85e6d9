#[allow(unused_imports)]
pub use itertools::Itertools;
#[allow(unused_imports)]
pub use num_traits;

#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, Context, Result};
#[allow(unused_imports)]
pub use tracing::{error, info, warn};

#[allow(unused_imports)]
pub use crate::{
    core::config::*,
    resource::{
        bitmap::{AlphaSource, PixelBuffer, ScratchBuffer},
        sprite::{Camera, Sprite},
    },
    util::{
        assert::*,
        collision, linalg,
        linalg::{AxisAlignedExtent, Mat3x3, Rect, Transform, Vec2, Vec2i},
        math,
        point::{Point, PointSource, Weak},
    },
};
