#[allow(unused_imports)]
use crate::core::prelude::*;

use tracing_subscriber::fmt::time::OffsetTime;

pub mod assert;
pub mod collision;
pub mod linalg;
pub mod log;
pub mod math;
pub mod point;

/// Installs the crate's tracing subscriber, writing to `run.log` with
/// microsecond timestamps. Call once at startup; later calls fail because a
/// global subscriber is already set.
pub fn setup_log() -> Result<()> {
    let logfile = std::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open("run.log")?;
    let timer = OffsetTime::new(
        time::UtcOffset::UTC,
        time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:6]"),
    );
    tracing_subscriber::fmt()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_target(false)
                .with_source_location(true)
                .with_timer(timer),
        )
        .with_writer(logfile)
        .init();
    Ok(())
}

pub mod gm_float {
    use crate::util::linalg::{Transform, Vec2};
    use anyhow::{bail, Result};
    use num_traits::Zero;
    use std::num::FpCategory;

    pub trait GmFloat {
        fn is_finite(&self) -> bool;
    }

    impl GmFloat for f64 {
        fn is_finite(&self) -> bool {
            self.is_normal() || self.is_zero()
        }
    }

    impl GmFloat for Vec2 {
        fn is_finite(&self) -> bool {
            self.x.is_finite() && self.y.is_finite()
        }
    }

    impl GmFloat for Transform {
        fn is_finite(&self) -> bool {
            self.centre.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
        }
    }

    pub fn is_finite(x: f64) -> bool {
        matches!(x.classify(), FpCategory::Zero | FpCategory::Normal)
    }

    pub fn f64_to_u32(x: f64) -> Result<u32> {
        if x > f64::from(u32::MAX) || x < 0.0 {
            bail!("{x} does not fit in range of u32");
        }
        #[allow(clippy::cast_sign_loss)]
        Ok(x as u32)
    }

    pub fn force_positive_zero(x: f64) -> f64 {
        if x.is_zero() { 0.0 } else { x }
    }
}

pub mod gm_range {
    use crate::core::config::EPSILON;
    use std::ops::Range;

    pub fn contains_f64(r1: &Range<f64>, r2: &Range<f64>) -> bool {
        r1.start <= r2.start && r1.end >= r2.end
    }

    pub fn overlap_f64(r1: &Range<f64>, r2: &Range<f64>) -> Option<Range<f64>> {
        if r1.start > r2.start {
            return overlap_f64(r2, r1);
        }
        if r1.end < r2.start {
            return None;
        }

        let start = r2.start;
        let end = f64::min(r1.end, r2.end);
        if (start - end).abs() < EPSILON {
            None
        } else {
            Some(start..end)
        }
    }

    pub fn overlap_len_f64(r1: &Range<f64>, r2: &Range<f64>) -> Option<f64> {
        overlap_f64(r1, r2).map(|r| r.end - r.start)
    }
}
